//! Application layer - the listing, folder and presenter use cases.
//!
//! Front-ends drive the [`Presenter`]; it owns the displayed list and
//! delegates to [`Lister`] and [`PackageFolders`].

mod folders;
mod list;
mod presenter;

pub use folders::{FolderRemoval, PackageFolders};
pub use list::Lister;
pub use presenter::{DeleteMode, DeleteOutcome, Presenter};
