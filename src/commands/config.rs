use log::{debug, warn};
use std::path::PathBuf;

use crate::{manager::PipCommand, runtime::Runtime};

#[cfg(windows)]
const DEFAULT_PYTHON: &str = "python";
#[cfg(not(windows))]
const DEFAULT_PYTHON: &str = "python3";

/// Settings gathered from the command line and environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub python: PathBuf,
    pub site_packages: Option<PathBuf>,
}

impl Config {
    pub fn new(python: Option<PathBuf>, site_packages: Option<PathBuf>) -> Self {
        Self {
            python: python.unwrap_or_else(|| PathBuf::from(DEFAULT_PYTHON)),
            site_packages,
        }
    }

    pub fn pip(&self) -> PipCommand {
        PipCommand::new(&self.python)
    }

    /// The configured site-packages directory, or the interpreter's own.
    ///
    /// Returns `None` (and logs why) when the interpreter cannot be asked.
    pub async fn site_packages<R: Runtime>(&self, runtime: &R) -> Option<PathBuf> {
        if let Some(path) = &self.site_packages {
            return Some(path.clone());
        }

        let probe = self.pip().site_packages_probe();
        let output = match runtime.output(&probe).await {
            Ok(output) if output.success => output,
            Ok(output) => {
                warn!(
                    "Could not locate site-packages with {:?}: {}",
                    self.python,
                    String::from_utf8_lossy(&output.stderr).trim()
                );
                return None;
            }
            Err(e) => {
                warn!("Could not locate site-packages: {:#}", e);
                return None;
            }
        };

        let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if path.is_empty() {
            warn!("{:?} reported an empty site-packages path", self.python);
            return None;
        }
        debug!("Using site-packages {:?}", path);
        Some(PathBuf::from(path))
    }
}
