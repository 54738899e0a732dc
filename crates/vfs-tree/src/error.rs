//! Error types for vfs-tree

use crate::{FolderId, FolderPath};

/// Result type for vfs-tree operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or inspecting a folder hierarchy
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A folder references a parent that is not part of the hierarchy.
    #[error(
        "Folder tree consistency error: parent folder #{missing_parent} for folder \"{path}\" [{id}] could not be found"
    )]
    InconsistentTree {
        id: FolderId,
        path: FolderPath,
        missing_parent: FolderId,
    },

    /// Walking the parent chain revisited a folder.
    #[error("Parent chain of folder #{id} forms a cycle")]
    ParentCycle { id: FolderId },

    #[error("Malformed folder listing record {record:?}: {reason}")]
    MalformedListing { record: String, reason: String },
}

impl Error {
    pub(crate) fn malformed(record: &str, reason: impl Into<String>) -> Self {
        Self::MalformedListing {
            record: record.to_string(),
            reason: reason.into(),
        }
    }
}
