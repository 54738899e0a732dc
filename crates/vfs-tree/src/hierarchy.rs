//! In-memory folder store
//!
//! The [`Hierarchy`] is the single source of truth for the cached folder
//! tree. It is a plain owned value: whoever holds it (normally a session)
//! mutates it in place.

use std::collections::BTreeMap;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::FolderPath;

/// Identifier of a folder in the remote storage.
///
/// The value `0` is reserved for the root, which is never stored as a record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct FolderId(u64);

impl FolderId {
    /// The root sentinel.
    pub const ROOT: FolderId = FolderId(0);

    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    pub const fn is_root(self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for FolderId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl FromStr for FolderId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One folder of the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderRecord {
    /// Parent folder id, [`FolderId::ROOT`] for top-level folders
    pub parent: FolderId,
    /// Folder name (a single path segment)
    pub name: String,
    /// Absolute path derived from the parent chain
    pub path: FolderPath,
}

impl FolderRecord {
    pub fn new(parent: FolderId, name: impl Into<String>, path: FolderPath) -> Self {
        Self {
            parent,
            name: name.into(),
            path,
        }
    }
}

/// Mapping from folder id to folder record.
///
/// Records are kept in id order so that scans (path lookup, gap detection)
/// are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hierarchy {
    folders: BTreeMap<FolderId, FolderRecord>,
}

impl Hierarchy {
    /// Create an empty hierarchy.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    /// Get a record by id.
    pub fn get(&self, id: FolderId) -> Option<&FolderRecord> {
        self.folders.get(&id)
    }

    /// Check if a record with the given id exists.
    pub fn contains(&self, id: FolderId) -> bool {
        self.folders.contains_key(&id)
    }

    /// Insert or replace a record, returning the previous one.
    pub fn insert(&mut self, id: FolderId, record: FolderRecord) -> Option<FolderRecord> {
        self.folders.insert(id, record)
    }

    /// Remove a record by id.
    pub fn remove(&mut self, id: FolderId) -> Option<FolderRecord> {
        self.folders.remove(&id)
    }

    /// Change the parent of a record without touching any path.
    ///
    /// Returns `false` if the record does not exist. Call
    /// [`Hierarchy::refresh_paths`] afterwards to re-derive paths.
    pub fn set_parent(&mut self, id: FolderId, parent: FolderId) -> bool {
        match self.folders.get_mut(&id) {
            Some(record) => {
                record.parent = parent;
                true
            }
            None => false,
        }
    }

    /// Iterate over records in id order.
    pub fn iter(&self) -> impl Iterator<Item = (FolderId, &FolderRecord)> {
        self.folders.iter().map(|(id, record)| (*id, record))
    }

    /// All folder ids in ascending order.
    pub fn ids(&self) -> Vec<FolderId> {
        self.folders.keys().copied().collect()
    }

    /// Rendered path of every record, keyed by id.
    pub fn path_map(&self) -> BTreeMap<FolderId, String> {
        self.iter()
            .map(|(id, record)| (id, record.path.to_string()))
            .collect()
    }

    pub(crate) fn records_mut(&mut self) -> impl Iterator<Item = (&FolderId, &mut FolderRecord)> {
        self.folders.iter_mut()
    }
}

impl FromIterator<(FolderId, FolderRecord)> for Hierarchy {
    fn from_iter<I: IntoIterator<Item = (FolderId, FolderRecord)>>(iter: I) -> Self {
        Self {
            folders: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Hierarchy {
    type Item = (&'a FolderId, &'a FolderRecord);
    type IntoIter = std::collections::btree_map::Iter<'a, FolderId, FolderRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.folders.iter()
    }
}
