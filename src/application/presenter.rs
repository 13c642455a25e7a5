//! Presenter - owns the displayed package list and forwards user actions.
//!
//! Listing runs in a background task so the front-end stays responsive.
//! A refresh drops the in-flight task and starts a new one; results are
//! tagged with the generation of the refresh that produced them, and a
//! result from an older generation never replaces a newer list.
//!
//! Install, uninstall and open-folder are fire-and-forget: the child
//! process is launched and never observed again. Every failure is logged
//! and swallowed.

use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::folders::{FolderRemoval, PackageFolders};
use super::list::Lister;
use crate::manager::PipCommand;
use crate::package::Package;
use crate::runtime::Runtime;

/// How `delete` gets rid of a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    /// Remove the package's folder, only if it is empty.
    Folder,
    /// Run the package manager's uninstall command.
    Uninstall,
}

/// What `delete` did before refreshing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// No package was given; the front-end should warn the user.
    NothingSelected,
    FolderRemoved(PathBuf),
    /// No folder exists for the package (or site-packages is unknown).
    FolderMissing,
    /// The folder could not be removed (usually not empty).
    FolderKept,
    UninstallStarted,
    UninstallFailed,
}

/// One listing result.
#[derive(Debug)]
struct Listing {
    generation: u64,
    packages: Vec<Package>,
}

pub struct Presenter<R: Runtime + 'static> {
    runtime: Arc<R>,
    pip: PipCommand,
    site_packages: Option<PathBuf>,
    lister: Lister<R>,
    packages: Vec<Package>,
    selected: Option<usize>,
    generation: u64,
    listing: Option<JoinHandle<()>>,
    results_tx: mpsc::UnboundedSender<Listing>,
    results_rx: mpsc::UnboundedReceiver<Listing>,
}

impl<R: Runtime + 'static> Presenter<R> {
    pub fn new(runtime: Arc<R>, pip: PipCommand, site_packages: Option<PathBuf>) -> Self {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        Self {
            lister: Lister::new(Arc::clone(&runtime), pip.clone()),
            runtime,
            pip,
            site_packages,
            packages: Vec::new(),
            selected: None,
            generation: 0,
            listing: None,
            results_tx,
            results_rx,
        }
    }

    /// The displayed package list.
    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    pub fn selected(&self) -> Option<&Package> {
        self.selected.and_then(|i| self.packages.get(i))
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Select by position in the displayed list.
    pub fn select_index(&mut self, index: usize) -> bool {
        if index < self.packages.len() {
            self.selected = Some(index);
            true
        } else {
            false
        }
    }

    /// Select by package name (exact match first, then case-insensitive).
    pub fn select_name(&mut self, name: &str) -> bool {
        let position = self
            .packages
            .iter()
            .position(|p| p.name == name)
            .or_else(|| {
                self.packages
                    .iter()
                    .position(|p| p.name.eq_ignore_ascii_case(name))
            });
        match position {
            Some(i) => {
                self.selected = Some(i);
                true
            }
            None => false,
        }
    }

    /// Restart the listing in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn refresh(&mut self) {
        if let Some(previous) = self.listing.take() {
            previous.abort();
        }
        self.generation += 1;

        let generation = self.generation;
        let lister = self.lister.clone();
        let results = self.results_tx.clone();
        debug!("Starting listing #{}", generation);

        self.listing = Some(tokio::spawn(async move {
            match lister.list().await {
                Ok(packages) => {
                    // The receiver lives as long as the presenter.
                    let _ = results.send(Listing {
                        generation,
                        packages,
                    });
                }
                Err(e) => warn!("Error fetching package list: {:#}", e),
            }
        }));
    }

    /// Wait until a current listing arrives and display it.
    ///
    /// Returns the number of packages now displayed. Cancel-safe.
    pub async fn next_listing(&mut self) -> usize {
        loop {
            let Some(listing) = self.results_rx.recv().await else {
                // Unreachable while `results_tx` is held.
                return self.packages.len();
            };
            if self.apply(listing) {
                return self.packages.len();
            }
        }
    }

    /// Display any listing that has already arrived. Returns whether the list changed.
    pub fn apply_pending(&mut self) -> bool {
        let mut replaced = false;
        while let Ok(listing) = self.results_rx.try_recv() {
            replaced |= self.apply(listing);
        }
        replaced
    }

    /// Wait for the in-flight listing to finish, then apply what it produced.
    ///
    /// Returns whether the displayed list was replaced.
    pub async fn settle(&mut self) -> bool {
        if let Some(handle) = self.listing.take() {
            if let Err(e) = handle.await {
                debug!("Listing task ended early: {}", e);
            }
        }
        self.apply_pending()
    }

    fn apply(&mut self, listing: Listing) -> bool {
        if listing.generation != self.generation {
            debug!(
                "Dropping stale listing #{} (current #{})",
                listing.generation, self.generation
            );
            return false;
        }

        let selected_name = self.selected().map(|p| p.name.clone());
        self.packages = listing.packages;
        self.selected = selected_name.and_then(|name| self.packages.iter().position(|p| p.name == name));
        debug!("Displaying {} package(s)", self.packages.len());
        true
    }

    /// Launch `pip install <name>` without waiting for it.
    ///
    /// Returns whether the command was launched.
    pub fn install(&self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }

        let invocation = self.pip.install(name);
        match self.runtime.spawn_detached(&invocation) {
            Ok(()) => {
                info!("Installing {}", name);
                true
            }
            Err(e) => {
                error!("Error installing package: {:#}", e);
                false
            }
        }
    }

    /// Delete a package's folder or uninstall it, then refresh.
    pub fn delete(&mut self, name: Option<&str>, mode: DeleteMode) -> DeleteOutcome {
        let outcome = match name.map(str::trim).filter(|n| !n.is_empty()) {
            None => DeleteOutcome::NothingSelected,
            Some(name) => match mode {
                DeleteMode::Folder => self.delete_folder(name),
                DeleteMode::Uninstall => self.uninstall(name),
            },
        };

        self.refresh();
        outcome
    }

    fn delete_folder(&self, name: &str) -> DeleteOutcome {
        let folders = PackageFolders::new(self.runtime.as_ref(), self.site_packages.as_deref());
        match folders.delete_if_empty(name) {
            Ok(FolderRemoval::Removed(dir)) => {
                info!("Deleted {:?}", dir);
                DeleteOutcome::FolderRemoved(dir)
            }
            Ok(FolderRemoval::Missing) => DeleteOutcome::FolderMissing,
            Ok(FolderRemoval::Unavailable) => {
                warn!("site-packages is unknown; cannot delete the folder of {}", name);
                DeleteOutcome::FolderMissing
            }
            Err(e) => {
                error!("Error deleting folder: {:#}", e);
                DeleteOutcome::FolderKept
            }
        }
    }

    fn uninstall(&self, name: &str) -> DeleteOutcome {
        let invocation = self.pip.uninstall(name);
        match self.runtime.spawn_detached(&invocation) {
            Ok(()) => {
                info!("Uninstalling {}", name);
                DeleteOutcome::UninstallStarted
            }
            Err(e) => {
                error!("Error uninstalling package: {:#}", e);
                DeleteOutcome::UninstallFailed
            }
        }
    }

    /// Open the package's folder in the file browser if it exists.
    ///
    /// Returns the opened folder.
    pub fn open_folder(&self, name: &str) -> Option<PathBuf> {
        let folders = PackageFolders::new(self.runtime.as_ref(), self.site_packages.as_deref());
        match folders.open(name) {
            Ok(opened) => opened,
            Err(e) => {
                error!("Error opening folder: {:#}", e);
                None
            }
        }
    }
}

impl<R: Runtime + 'static> Drop for Presenter<R> {
    fn drop(&mut self) {
        if let Some(handle) = self.listing.take() {
            handle.abort();
        }
    }
}
