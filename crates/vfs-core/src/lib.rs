//! Core orchestration layer for Virtual Folder Manager
//!
//! This crate connects the pure hierarchy engine of `vfs-tree` to a storage
//! backend, implementing:
//!
//! - **Backend abstraction**: the flat create / delete / move / list command set
//! - **FolderSession**: cached hierarchy with forced and lenient reloads
//! - **Mutations**: add, remove and move folders with incremental cache patches
//! - **Orphan repair**: delete orphans or reattach gaps
//!
//! # Architecture
//!
//! ```text
//!          API caller
//!              |
//!          vfs-core  ---- FolderBackend (transport, auth, parsing)
//!              |
//!          vfs-tree
//! ```
//!
//! # Example
//!
//! ```
//! use vfs_core::{FolderSession, HierarchyOptions, MemoryBackend, Result};
//!
//! fn example() -> Result<()> {
//!     let mut session = FolderSession::new(MemoryBackend::new());
//!     session.add_folder("/photos/2024")?;
//!
//!     let tree = session.folders_hierarchy(HierarchyOptions::new().starting_at("/photos"))?;
//!     assert_eq!(tree.len(), 1);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod logging;
pub mod session;

pub use backend::{BackendCall, FolderBackend, MemoryBackend, MemoryBackendError, Operation};
pub use config::SessionConfig;
pub use error::{BackendError, Error, Result};
pub use session::{CacheState, FolderSession, HierarchyOptions};

pub use vfs_tree::{FolderId, FolderPath, FolderRecord, Hierarchy, Listing, RawFolder};
