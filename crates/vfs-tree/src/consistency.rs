//! Structural consistency checks
//!
//! A flat backend listing can reference parents that no longer exist. Given
//! the tree
//!
//! ```text
//! ROOT
//! `-a      <- deleting only this folder...
//!   `-b    <- ...turns b into a gap (its parent is missing)
//!     `-c  <- ...and c into an orphan (its chain passes through a gap)
//! ```
//!
//! every gap is an orphan, but an orphan is only a gap when the break is
//! exactly one hop above it.

use std::collections::HashSet;

use serde::Serialize;

use crate::{Error, FolderId, Hierarchy, Result};

/// Classification of a single folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FolderStatus {
    /// Parent is the root sentinel
    Root,
    /// Reaches a root through existing ancestors
    Attached,
    /// Parent id is not part of the hierarchy
    Gap,
    /// Reaches a gap before reaching a root
    Orphan,
}

/// Result of a full consistency scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConsistencyReport {
    pub roots: Vec<FolderId>,
    pub gaps: Vec<FolderId>,
    /// Every orphan, gaps included
    pub orphans: Vec<FolderId>,
}

impl ConsistencyReport {
    /// True when every folder can reach a root.
    pub fn is_consistent(&self) -> bool {
        self.orphans.is_empty()
    }
}

impl Hierarchy {
    /// Whether the folder sits directly below the root.
    pub fn is_root(&self, id: FolderId) -> bool {
        self.get(id).is_some_and(|record| record.parent.is_root())
    }

    /// Whether the folder's parent is missing from the hierarchy.
    pub fn is_gap(&self, id: FolderId) -> bool {
        self.get(id)
            .is_some_and(|record| !record.parent.is_root() && !self.contains(record.parent))
    }

    /// Whether the folder's ancestor chain hits a gap before a root.
    ///
    /// Unknown ids are not orphans.
    pub fn is_orphan(&self, id: FolderId) -> Result<bool> {
        let mut seen = HashSet::new();
        let mut cursor = id;
        loop {
            let Some(record) = self.get(cursor) else {
                return Ok(false);
            };
            if record.parent.is_root() {
                return Ok(false);
            }
            if !self.contains(record.parent) {
                return Ok(true);
            }
            if !seen.insert(cursor) {
                return Err(Error::ParentCycle { id: cursor });
            }
            cursor = record.parent;
        }
    }

    /// Classify a folder, `None` if it is unknown.
    pub fn status(&self, id: FolderId) -> Result<Option<FolderStatus>> {
        if !self.contains(id) {
            return Ok(None);
        }
        let status = if self.is_root(id) {
            FolderStatus::Root
        } else if self.is_gap(id) {
            FolderStatus::Gap
        } else if self.is_orphan(id)? {
            FolderStatus::Orphan
        } else {
            FolderStatus::Attached
        };
        Ok(Some(status))
    }

    /// Ids of all folders whose parent is missing.
    ///
    /// Folders further below a break are not included, see
    /// [`Hierarchy::orphans`].
    pub fn detect_gaps(&self) -> Vec<FolderId> {
        self.iter()
            .map(|(id, _)| id)
            .filter(|id| self.is_gap(*id))
            .collect()
    }

    /// Ids of all folders that cannot reach a root.
    pub fn orphans(&self) -> Result<Vec<FolderId>> {
        let mut orphans = Vec::new();
        for (id, _) in self.iter() {
            if self.is_orphan(id)? {
                orphans.push(id);
            }
        }
        Ok(orphans)
    }

    /// Scan the whole hierarchy.
    pub fn check(&self) -> Result<ConsistencyReport> {
        Ok(ConsistencyReport {
            roots: self
                .iter()
                .map(|(id, _)| id)
                .filter(|id| self.is_root(*id))
                .collect(),
            gaps: self.detect_gaps(),
            orphans: self.orphans()?,
        })
    }
}
