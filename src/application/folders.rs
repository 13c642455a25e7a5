//! Folder actions - locate, delete and open a package's installation folder.

use std::path::{Path, PathBuf};

use anyhow::Result;
use log::debug;

use crate::package::Package;
use crate::runtime::Runtime;

/// What a folder deletion did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderRemoval {
    Removed(PathBuf),
    /// No folder exists for the package; nothing was touched.
    Missing,
    /// The site-packages directory is unknown.
    Unavailable,
}

/// Package folders under one site-packages directory.
pub struct PackageFolders<'a, R: Runtime> {
    runtime: &'a R,
    site_packages: Option<&'a Path>,
}

impl<'a, R: Runtime> PackageFolders<'a, R> {
    pub fn new(runtime: &'a R, site_packages: Option<&'a Path>) -> Self {
        Self {
            runtime,
            site_packages,
        }
    }

    /// The existing folder for `name`, if any.
    pub fn locate(&self, name: &str) -> Option<PathBuf> {
        let site_packages = self.site_packages?;
        Package::new(name)
            .candidate_dirs(site_packages)
            .into_iter()
            .find(|dir| self.runtime.is_dir(dir))
    }

    /// Remove the package folder if it is empty.
    ///
    /// A non-empty folder is left as is and reported as an error naming
    /// how many entries it still holds.
    pub fn delete_if_empty(&self, name: &str) -> Result<FolderRemoval> {
        if self.site_packages.is_none() {
            return Ok(FolderRemoval::Unavailable);
        }
        let Some(dir) = self.locate(name) else {
            debug!("No folder for {} under {:?}", name, self.site_packages);
            return Ok(FolderRemoval::Missing);
        };

        let entries = self.runtime.read_dir(&dir)?;
        if !entries.is_empty() {
            anyhow::bail!("Folder {:?} is not empty ({} entries)", dir, entries.len());
        }

        debug!("Removing folder {:?}", dir);
        self.runtime.remove_dir(&dir)?;
        Ok(FolderRemoval::Removed(dir))
    }

    /// Open the package folder in the file browser.
    ///
    /// Returns the opened folder, or `None` when there is nothing to open.
    pub fn open(&self, name: &str) -> Result<Option<PathBuf>> {
        let Some(dir) = self.locate(name) else {
            debug!("No folder to open for {}", name);
            return Ok(None);
        };
        self.runtime.open_in_file_browser(&dir)?;
        Ok(Some(dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{MockRuntime, RealRuntime};
    use mockall::predicate::eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_locate_prefers_verbatim_name() {
        let site = PathBuf::from("/site");
        let mut runtime = MockRuntime::new();
        runtime
            .expect_is_dir()
            .with(eq(site.join("PyYAML")))
            .returning(|_| true);

        let folders = PackageFolders::new(&runtime, Some(site.as_path()));
        assert_eq!(folders.locate("PyYAML"), Some(site.join("PyYAML")));
    }

    #[test]
    fn test_locate_falls_back_to_import_name() {
        let site = PathBuf::from("/site");
        let mut runtime = MockRuntime::new();
        runtime
            .expect_is_dir()
            .with(eq(site.join("typing-extensions")))
            .returning(|_| false);
        runtime
            .expect_is_dir()
            .with(eq(site.join("typing_extensions")))
            .returning(|_| true);

        let folders = PackageFolders::new(&runtime, Some(site.as_path()));
        assert_eq!(
            folders.locate("typing-extensions"),
            Some(site.join("typing_extensions"))
        );
    }

    #[test]
    fn test_locate_without_site_packages() {
        let runtime = MockRuntime::new();
        let folders = PackageFolders::new(&runtime, None);
        assert_eq!(folders.locate("six"), None);
    }

    #[test]
    fn test_delete_removes_empty_folder() {
        let site = tempdir().unwrap();
        let pkg = site.path().join("leftover");
        fs::create_dir(&pkg).unwrap();

        let runtime = RealRuntime;
        let folders = PackageFolders::new(&runtime, Some(site.path()));

        assert_eq!(
            folders.delete_if_empty("leftover").unwrap(),
            FolderRemoval::Removed(pkg.clone())
        );
        assert!(!pkg.exists());
    }

    #[test]
    fn test_delete_leaves_non_empty_folder() {
        let site = tempdir().unwrap();
        let pkg = site.path().join("requests");
        fs::create_dir_all(pkg.join("adapters")).unwrap();
        fs::write(pkg.join("__init__.py"), b"__version__ = '2.31.0'\n").unwrap();

        let runtime = RealRuntime;
        let folders = PackageFolders::new(&runtime, Some(site.path()));

        let err = folders.delete_if_empty("requests").unwrap_err();
        assert!(err.to_string().contains("is not empty (2 entries)"));
        assert!(pkg.join("adapters").is_dir());
        assert_eq!(
            fs::read_to_string(pkg.join("__init__.py")).unwrap(),
            "__version__ = '2.31.0'\n"
        );
    }

    #[test]
    fn test_delete_checks_emptiness_before_removing() {
        let site = PathBuf::from("/site");
        let mut runtime = MockRuntime::new();
        runtime.expect_is_dir().returning(|_| true);
        runtime
            .expect_read_dir()
            .with(eq(site.join("six")))
            .times(1)
            .returning(|_| Ok(vec![PathBuf::from("/site/six/six.py")]));
        runtime.expect_remove_dir().never();

        let folders = PackageFolders::new(&runtime, Some(site.as_path()));
        let err = folders.delete_if_empty("six").unwrap_err();
        assert!(err.to_string().contains("is not empty (1 entries)"));
    }

    #[test]
    fn test_delete_unreadable_folder_is_kept() {
        let site = PathBuf::from("/site");
        let mut runtime = MockRuntime::new();
        runtime.expect_is_dir().returning(|_| true);
        runtime
            .expect_read_dir()
            .returning(|_| Err(anyhow::anyhow!("Permission denied")));
        runtime.expect_remove_dir().never();

        let folders = PackageFolders::new(&runtime, Some(site.as_path()));
        assert!(folders.delete_if_empty("six").is_err());
    }

    #[test]
    fn test_delete_missing_folder_is_noop() {
        let site = PathBuf::from("/site");
        let mut runtime = MockRuntime::new();
        runtime.expect_is_dir().returning(|_| false);
        runtime.expect_read_dir().never();
        runtime.expect_remove_dir().never();

        let folders = PackageFolders::new(&runtime, Some(site.as_path()));
        assert_eq!(folders.delete_if_empty("six").unwrap(), FolderRemoval::Missing);
    }

    #[test]
    fn test_delete_without_site_packages() {
        let mut runtime = MockRuntime::new();
        runtime.expect_remove_dir().never();

        let folders = PackageFolders::new(&runtime, None);
        assert_eq!(
            folders.delete_if_empty("six").unwrap(),
            FolderRemoval::Unavailable
        );
    }

    #[test]
    fn test_open_existing_folder() {
        let site = PathBuf::from("/site");
        let mut runtime = MockRuntime::new();
        runtime.expect_is_dir().returning(|_| true);
        runtime
            .expect_open_in_file_browser()
            .with(eq(site.join("numpy")))
            .times(1)
            .returning(|_| Ok(()));

        let folders = PackageFolders::new(&runtime, Some(site.as_path()));
        assert_eq!(folders.open("numpy").unwrap(), Some(site.join("numpy")));
    }

    #[test]
    fn test_open_missing_folder_does_nothing() {
        let site = PathBuf::from("/site");
        let mut runtime = MockRuntime::new();
        runtime.expect_is_dir().returning(|_| false);
        runtime.expect_open_in_file_browser().never();

        let folders = PackageFolders::new(&runtime, Some(site.as_path()));
        assert_eq!(folders.open("numpy").unwrap(), None);
    }
}
