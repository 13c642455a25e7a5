//! Package records and `pip list` output parsing.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Lines preceding the package rows: the column header and the dashed separator.
const HEADER_LINES: usize = 2;

/// An installed package, identified by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Package {
    pub name: String,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Folders under `site_packages` that may hold this package, most specific first.
    ///
    /// The distribution name is tried verbatim, then as an import name
    /// (`Typing-Extensions` -> `typing_extensions`).
    pub fn candidate_dirs(&self, site_packages: &Path) -> Vec<PathBuf> {
        let mut dirs = vec![site_packages.join(&self.name)];
        let import_name = import_name(&self.name);
        if import_name != self.name {
            dirs.push(site_packages.join(import_name));
        }
        dirs
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn import_name(name: &str) -> String {
    name.to_lowercase().replace(['-', '.'], "_")
}

/// Parse the plain-text table printed by `pip list`.
///
/// ```text
/// Package    Version
/// ---------- -------
/// requests   2.31.0
/// ```
///
/// Rows keep the order they were printed in. Blank lines are skipped and
/// only the first whitespace-delimited token of a row is kept.
pub fn parse_list_output(output: &str) -> Vec<Package> {
    output
        .lines()
        .skip(HEADER_LINES)
        .filter_map(|line| line.split_whitespace().next())
        .map(Package::new)
        .collect()
}
