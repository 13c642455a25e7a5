use anyhow::{Context, Result};
use log::debug;
use std::io::Write;
use std::sync::Arc;

use crate::{
    application::{DeleteMode, FolderRemoval, Lister, PackageFolders},
    package::Package,
    runtime::Runtime,
};

pub mod config;
mod shell;

pub use shell::{run_shell, shell};

use config::Config;

/// Print the installed packages, one per line or as JSON.
#[tracing::instrument(skip(runtime, config))]
pub async fn list<R: Runtime + 'static>(runtime: Arc<R>, config: &Config, json: bool) -> Result<()> {
    let packages = Lister::new(runtime, config.pip()).list().await?;
    let mut stdout = std::io::stdout().lock();
    write_list(&mut stdout, &packages, json)
}

fn write_list<W: Write>(out: &mut W, packages: &[Package], json: bool) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, packages)?;
        writeln!(out)?;
        return Ok(());
    }

    if packages.is_empty() {
        writeln!(out, "No packages installed.")?;
        return Ok(());
    }
    for package in packages {
        writeln!(out, "{}", package)?;
    }
    Ok(())
}

/// Install a package and wait for pip to finish.
#[tracing::instrument(skip(runtime, config))]
pub async fn install<R: Runtime>(runtime: &R, config: &Config, name: &str) -> Result<()> {
    let invocation = config.pip().install(name);
    if !runtime.status(&invocation).await? {
        anyhow::bail!("Failed to install {}.", name);
    }
    Ok(())
}

/// Uninstall a package without confirmation and wait for pip to finish.
#[tracing::instrument(skip(runtime, config))]
pub async fn uninstall<R: Runtime>(runtime: &R, config: &Config, name: &str) -> Result<()> {
    let invocation = config.pip().uninstall(name);
    if !runtime.status(&invocation).await? {
        anyhow::bail!("Failed to uninstall {}.", name);
    }
    Ok(())
}

/// Delete a package's (empty) folder, or uninstall it.
#[tracing::instrument(skip(runtime, config))]
pub async fn delete<R: Runtime>(
    runtime: &R,
    config: &Config,
    name: &str,
    mode: DeleteMode,
) -> Result<()> {
    match mode {
        DeleteMode::Uninstall => uninstall(runtime, config, name).await,
        DeleteMode::Folder => {
            let site_packages = config.site_packages(runtime).await;
            let folders = PackageFolders::new(runtime, site_packages.as_deref());
            match folders
                .delete_if_empty(name)
                .with_context(|| format!("Failed to delete the folder of {}", name))?
            {
                FolderRemoval::Removed(dir) => println!("Deleted {}", dir.display()),
                FolderRemoval::Missing => debug!("No folder for {}, nothing to delete", name),
                FolderRemoval::Unavailable => {
                    debug!("site-packages unknown, nothing to delete for {}", name)
                }
            }
            Ok(())
        }
    }
}

/// Open a package's folder in the file browser if it exists.
#[tracing::instrument(skip(runtime, config))]
pub async fn open<R: Runtime>(runtime: &R, config: &Config, name: &str) -> Result<()> {
    let site_packages = config.site_packages(runtime).await;
    let folders = PackageFolders::new(runtime, site_packages.as_deref());
    if folders.open(name)?.is_none() {
        debug!("No folder for {}, nothing to open", name);
    }
    Ok(())
}

/// Print the folder a package is installed in.
#[tracing::instrument(skip(runtime, config))]
pub async fn path<R: Runtime>(runtime: &R, config: &Config, name: &str) -> Result<()> {
    let site_packages = config.site_packages(runtime).await;
    let folders = PackageFolders::new(runtime, site_packages.as_deref());
    match folders.locate(name) {
        Some(dir) => {
            println!("{}", dir.display());
            Ok(())
        }
        None => anyhow::bail!("No folder found for {}.", name),
    }
}
