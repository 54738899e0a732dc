//! In-process folder backend

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;
use vfs_tree::{FolderId, Listing, RawFolder};

use super::{BackendCall, FolderBackend};

/// Backend command kinds, used to inject failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Delete,
    Move,
}

/// Errors produced by [`MemoryBackend`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MemoryBackendError {
    #[error("Folder #{id} does not exist")]
    UnknownFolder { id: FolderId },

    #[error("Parent folder #{id} does not exist")]
    UnknownParent { id: FolderId },

    #[error("Moving folder #{id} below #{parent} would create a cycle")]
    WouldCycle { id: FolderId, parent: FolderId },

    #[error("No folder ids left to allocate")]
    IdsExhausted,

    #[error("Injected {operation:?} failure")]
    Injected { operation: Operation },
}

#[derive(Debug, Default)]
struct MemoryState {
    /// id -> (parent, name)
    folders: BTreeMap<FolderId, (FolderId, String)>,
    next_id: u64,
    /// Set once `u64::MAX` has been stored or handed out
    exhausted: bool,
    journal: Vec<BackendCall>,
    fail_on: Option<Operation>,
}

impl MemoryState {
    fn allocate(&mut self) -> Result<FolderId, MemoryBackendError> {
        let raw = self.next_id.max(1);
        if self.exhausted {
            return Err(MemoryBackendError::IdsExhausted);
        }
        match raw.checked_add(1) {
            Some(next) => self.next_id = next,
            None => self.exhausted = true,
        }
        Ok(FolderId::new(raw))
    }

    /// Keep allocated ids above every stored id.
    fn reserve(&mut self, id: FolderId) {
        if id.get() == u64::MAX {
            self.exhausted = true;
        }
        self.next_id = self.next_id.max(id.get().saturating_add(1));
    }

    fn check_failure(&mut self, operation: Operation) -> Result<(), MemoryBackendError> {
        if self.fail_on == Some(operation) {
            self.fail_on = None;
            return Err(MemoryBackendError::Injected { operation });
        }
        Ok(())
    }

    /// Whether `ancestor` appears in the parent chain of `id` (or is `id`).
    fn is_ancestor_or_self(&self, ancestor: FolderId, id: FolderId) -> bool {
        let mut seen = HashSet::new();
        let mut cursor = id;
        while !cursor.is_root() && seen.insert(cursor) {
            if cursor == ancestor {
                return true;
            }
            match self.folders.get(&cursor) {
                Some((parent, _)) => cursor = *parent,
                None => break,
            }
        }
        false
    }
}

/// Flat folder store living in memory.
///
/// Behaves like the remote storage: deleting a folder leaves its children in
/// place, and [`MemoryBackend::insert_raw`] / [`MemoryBackend::forget`] can
/// put the store into the inconsistent states a real backend may report.
/// Every command is recorded in a journal.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend pre-populated with raw folders.
    pub fn with_folders(folders: impl IntoIterator<Item = RawFolder>) -> Self {
        let backend = Self::new();
        for folder in folders {
            backend.insert_raw(folder);
        }
        backend
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a folder as-is, without checking its parent.
    pub fn insert_raw(&self, folder: RawFolder) {
        let mut state = self.state();
        state.reserve(folder.id);
        state.folders.insert(folder.id, (folder.parent, folder.name));
    }

    /// Drop a folder without recording a call, leaving its children dangling.
    pub fn forget(&self, id: FolderId) -> bool {
        self.state().folders.remove(&id).is_some()
    }

    /// Make the next call of the given kind fail.
    pub fn fail_next(&self, operation: Operation) {
        self.state().fail_on = Some(operation);
    }

    /// Current contents as a listing.
    pub fn snapshot(&self) -> Listing {
        let state = self.state();
        if state.folders.is_empty() {
            return Listing::Empty;
        }
        state
            .folders
            .iter()
            .map(|(id, (parent, name))| RawFolder::new(*id, *parent, name.as_str()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state().folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().folders.is_empty()
    }

    pub fn contains(&self, id: FolderId) -> bool {
        self.state().folders.contains_key(&id)
    }

    /// Parent of a stored folder.
    pub fn parent_of(&self, id: FolderId) -> Option<FolderId> {
        self.state().folders.get(&id).map(|(parent, _)| *parent)
    }

    /// All calls received so far.
    pub fn journal(&self) -> Vec<BackendCall> {
        self.state().journal.clone()
    }

    pub fn clear_journal(&self) {
        self.state().journal.clear();
    }
}

impl FolderBackend for MemoryBackend {
    type Error = MemoryBackendError;

    fn list_folders(&self) -> Result<Listing, Self::Error> {
        self.state().journal.push(BackendCall::List);
        self.state().check_failure(Operation::List)?;
        Ok(self.snapshot())
    }

    fn create_folder(&self, parent: FolderId, name: &str) -> Result<FolderId, Self::Error> {
        let mut state = self.state();
        state.journal.push(BackendCall::Create {
            parent,
            name: name.to_string(),
        });
        state.check_failure(Operation::Create)?;

        if !parent.is_root() && !state.folders.contains_key(&parent) {
            return Err(MemoryBackendError::UnknownParent { id: parent });
        }

        let id = state.allocate()?;
        state.folders.insert(id, (parent, name.to_string()));
        debug!(%id, %parent, name, "Memory backend created folder");
        Ok(id)
    }

    fn delete_folder(&self, id: FolderId) -> Result<(), Self::Error> {
        let mut state = self.state();
        state.journal.push(BackendCall::Delete { id });
        state.check_failure(Operation::Delete)?;

        state
            .folders
            .remove(&id)
            .map(|_| ())
            .ok_or(MemoryBackendError::UnknownFolder { id })
    }

    fn move_folders(&self, ids: &[FolderId], new_parent: FolderId) -> Result<(), Self::Error> {
        let mut state = self.state();
        state.journal.push(BackendCall::Move {
            ids: ids.to_vec(),
            parent: new_parent,
        });
        state.check_failure(Operation::Move)?;

        if !new_parent.is_root() && !state.folders.contains_key(&new_parent) {
            return Err(MemoryBackendError::UnknownParent { id: new_parent });
        }
        // Validate the whole batch before touching anything
        for &id in ids {
            if !state.folders.contains_key(&id) {
                return Err(MemoryBackendError::UnknownFolder { id });
            }
            if state.is_ancestor_or_self(id, new_parent) {
                return Err(MemoryBackendError::WouldCycle {
                    id,
                    parent: new_parent,
                });
            }
        }

        for id in ids {
            if let Some(entry) = state.folders.get_mut(id) {
                entry.0 = new_parent;
            }
        }
        Ok(())
    }
}
