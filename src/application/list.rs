//! List action - runs `pip list` and decodes the installed packages.

use std::sync::Arc;

use anyhow::{Context, Result};
use log::debug;

use crate::manager::PipCommand;
use crate::package::{Package, parse_list_output};
use crate::runtime::Runtime;

/// Runs the package manager's list command.
///
/// Cheap to clone; every clone shares the same runtime.
pub struct Lister<R: Runtime> {
    runtime: Arc<R>,
    pip: PipCommand,
}

impl<R: Runtime> Clone for Lister<R> {
    fn clone(&self) -> Self {
        Self {
            runtime: Arc::clone(&self.runtime),
            pip: self.pip.clone(),
        }
    }
}

impl<R: Runtime> Lister<R> {
    pub fn new(runtime: Arc<R>, pip: PipCommand) -> Self {
        Self { runtime, pip }
    }

    /// List installed packages in the order pip prints them.
    pub async fn list(&self) -> Result<Vec<Package>> {
        let invocation = self.pip.list();
        debug!("Listing packages with `{}`", invocation);

        let output = self.runtime.output(&invocation).await?;
        if !output.success {
            anyhow::bail!(
                "`{}` failed ({}): {}",
                invocation,
                output
                    .code
                    .map_or_else(|| "terminated by signal".to_string(), |c| format!("exit code {}", c)),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let text = String::from_utf8(output.stdout)
            .with_context(|| format!("Output of `{}` is not valid UTF-8", invocation))?;

        let packages = parse_list_output(&text);
        debug!("Found {} package(s)", packages.len());
        Ok(packages)
    }
}
