//! Runtime abstraction for system operations.
//!
//! This module provides a trait-based abstraction over system operations,
//! enabling dependency injection and testability.
//!
//! # Structure
//!
//! - `fs` - File system operations (directory checks, listing and removal)
//! - `process` - External commands (captured, attached and detached) and the file browser

mod fs;
mod process;

use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub use process::{CommandOutput, Invocation};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Runtime: Send + Sync {
    // File System
    fn is_dir(&self, path: &Path) -> bool;
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// Remove a directory. Fails if the directory is not empty.
    fn remove_dir(&self, path: &Path) -> Result<()>;

    // Processes
    /// Run a command to completion and capture its stdout and stderr.
    async fn output(&self, invocation: &Invocation) -> Result<CommandOutput>;

    /// Run a command to completion with inherited stdio. Returns whether it succeeded.
    async fn status(&self, invocation: &Invocation) -> Result<bool>;

    /// Launch a command without waiting for it. Only launch errors are reported.
    fn spawn_detached(&self, invocation: &Invocation) -> Result<()>;

    /// Open a directory in the platform's file browser.
    fn open_in_file_browser(&self, path: &Path) -> Result<()>;
}

pub struct RealRuntime;

#[async_trait]
impl Runtime for RealRuntime {
    fn is_dir(&self, path: &Path) -> bool {
        self.is_dir_impl(path)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        self.read_dir_impl(path)
    }

    fn remove_dir(&self, path: &Path) -> Result<()> {
        self.remove_dir_impl(path)
    }

    async fn output(&self, invocation: &Invocation) -> Result<CommandOutput> {
        self.output_impl(invocation).await
    }

    async fn status(&self, invocation: &Invocation) -> Result<bool> {
        self.status_impl(invocation).await
    }

    fn spawn_detached(&self, invocation: &Invocation) -> Result<()> {
        self.spawn_detached_impl(invocation)
    }

    fn open_in_file_browser(&self, path: &Path) -> Result<()> {
        self.open_in_file_browser_impl(path)
    }
}
