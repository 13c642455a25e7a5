//! `pip` command lines.

use std::path::PathBuf;

use crate::runtime::Invocation;

/// Prints the interpreter's pure-Python library directory.
const PURELIB_PROBE: &str = "import sysconfig; print(sysconfig.get_paths()['purelib'])";

/// Builds `pip` invocations for one Python interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipCommand {
    python: PathBuf,
}

impl PipCommand {
    pub fn new(python: impl Into<PathBuf>) -> Self {
        Self {
            python: python.into(),
        }
    }

    /// `--format=columns` overrides any `format` set in pip's config or `PIP_FORMAT`.
    pub fn list(&self) -> Invocation {
        self.pip(["list", "--format=columns"])
    }

    pub fn install(&self, name: &str) -> Invocation {
        self.pip(["install", name])
    }

    pub fn uninstall(&self, name: &str) -> Invocation {
        self.pip(["uninstall", "-y", name])
    }

    pub fn site_packages_probe(&self) -> Invocation {
        Invocation::new(&self.python, ["-c", PURELIB_PROBE])
    }

    fn pip<'a>(&self, args: impl IntoIterator<Item = &'a str>) -> Invocation {
        let mut full = vec!["-m", "pip"];
        full.extend(args);
        Invocation::new(&self.python, full)
    }
}
