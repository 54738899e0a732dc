//! Folder hierarchy engine for Virtual Folder Manager
//!
//! Turns the flat `(id, parent, name)` listing of a remote storage backend
//! into an addressable folder tree:
//!
//! - **Listing**: parsing of the backend's raw folder listing
//! - **TreeBuilder**: hierarchy construction, path derivation and validation
//! - **Resolution**: path ↔ id conversion on a built [`Hierarchy`]
//! - **Consistency**: root / gap / orphan classification
//! - **Slicing**: sub-hierarchies with paths relative to a folder
//!
//! This crate performs no I/O. Backend calls and caching live in `vfs-core`.

pub mod builder;
pub mod consistency;
pub mod error;
pub mod hierarchy;
pub mod listing;
pub mod path;
mod resolve;
mod slice;

pub use builder::{BuildOptions, TreeBuilder};
pub use consistency::{ConsistencyReport, FolderStatus};
pub use error::{Error, Result};
pub use hierarchy::{FolderId, FolderRecord, Hierarchy};
pub use listing::{Listing, RawFolder};
pub use path::FolderPath;
