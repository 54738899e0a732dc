//! Error types for vfs-core

use std::path::PathBuf;

/// Result type for vfs-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error produced by a storage backend
pub type BackendError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur in vfs-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A path does not resolve to any folder
    #[error("Folder {path} could not be found")]
    FolderNotFound { path: String },

    /// A folder cannot be moved into itself or one of its descendants
    #[error("Cannot move folder {path} into {destination}")]
    InvalidMove { path: String, destination: String },

    /// Failure reported by the storage backend, passed through untouched
    #[error("Backend operation failed: {0}")]
    Backend(#[source] BackendError),

    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Failed to set up logging: {message}")]
    Logging { message: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Transparent wrappers for underlying crate errors
    /// Hierarchy error from vfs-tree
    #[error(transparent)]
    Tree(#[from] vfs_tree::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}

impl Error {
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::FolderNotFound { path: path.into() }
    }

    pub fn backend(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(source))
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
