//! External process operations.

use anyhow::{Context, Result};
use log::debug;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use super::RealRuntime;

/// A fully specified external command: program plus arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<P, I, S>(program: P, args: I) -> Self
    where
        P: Into<PathBuf>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) async fn output_impl(&self, invocation: &Invocation) -> Result<CommandOutput> {
        let output = invocation
            .command()
            .stdin(Stdio::null())
            .output()
            .await
            .with_context(|| format!("Failed to run `{}`", invocation))?;

        debug!("`{}` exited with {}", invocation, output.status);

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }

    #[tracing::instrument(skip(self))]
    pub(crate) async fn status_impl(&self, invocation: &Invocation) -> Result<bool> {
        let status = invocation
            .command()
            .status()
            .await
            .with_context(|| format!("Failed to run `{}`", invocation))?;

        debug!("`{}` exited with {}", invocation, status);
        Ok(status.success())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn spawn_detached_impl(&self, invocation: &Invocation) -> Result<()> {
        // The child keeps running once its handle is dropped; tokio reaps it.
        let child = invocation
            .command()
            .stdin(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to launch `{}`", invocation))?;

        debug!("Launched `{}` (pid {:?})", invocation, child.id());
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn open_in_file_browser_impl(&self, path: &Path) -> Result<()> {
        open::that_detached(path)
            .with_context(|| format!("Failed to open {:?} in the file browser", path))
    }
}
