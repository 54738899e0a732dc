//! Storage backend abstraction
//!
//! The remote storage only understands a flat folder listing and atomic
//! create / delete / reparent commands. Transport, authentication and
//! response decoding all live behind this trait.

mod memory;

pub use memory::{MemoryBackend, MemoryBackendError, Operation};

use vfs_tree::{FolderId, Listing};

/// A backend call, as recorded by [`MemoryBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    List,
    Create { parent: FolderId, name: String },
    Delete { id: FolderId },
    Move { ids: Vec<FolderId>, parent: FolderId },
}

/// Trait for the folder commands of a remote storage backend.
///
/// Every call blocks until the backend answered. Errors are opaque to the
/// session and surface as [`crate::Error::Backend`].
pub trait FolderBackend: Send + Sync {
    /// Backend specific failure.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch the complete flat folder listing.
    ///
    /// Returns [`Listing::Empty`] when the account has no folders at all.
    fn list_folders(&self) -> Result<Listing, Self::Error>;

    /// Create a folder named `name` below `parent` and return its new id.
    ///
    /// `parent` is [`FolderId::ROOT`] for top-level folders.
    fn create_folder(&self, parent: FolderId, name: &str) -> Result<FolderId, Self::Error>;

    /// Delete a single folder.
    ///
    /// Children are not touched; a backend may leave them behind as orphans.
    fn delete_folder(&self, id: FolderId) -> Result<(), Self::Error>;

    /// Reparent a batch of folders in one call.
    fn move_folders(&self, ids: &[FolderId], new_parent: FolderId) -> Result<(), Self::Error>;
}
