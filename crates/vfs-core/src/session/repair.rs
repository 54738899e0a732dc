//! Orphan repair
//!
//! A folder whose parent chain is broken is invisible to anyone browsing the
//! tree from the root. Orphans can be deleted, or their gaps can be moved
//! under a reachable folder.

use tracing::{debug, info};
use vfs_tree::{FolderId, Hierarchy};

use super::{FolderSession, LoadPlan};
use crate::backend::FolderBackend;
use crate::{Error, Result};

/// Delete every orphan of `tree` on the backend and drop it locally.
///
/// Orphans are computed once, up front. Folders that only become orphans
/// through these deletions (or through concurrent remote changes) are left
/// for the next pass.
pub(super) fn prune_orphans<B: FolderBackend>(
    backend: &B,
    tree: &mut Hierarchy,
) -> Result<Vec<FolderId>> {
    let orphans = tree.orphans()?;
    for &id in &orphans {
        backend.delete_folder(id).map_err(Error::backend)?;
        tree.remove(id);
        debug!(%id, "Deleted orphan folder");
    }
    if !orphans.is_empty() {
        info!(count = orphans.len(), "Removed orphan folders");
    }
    Ok(orphans)
}

impl<B: FolderBackend> FolderSession<B> {
    /// Delete every orphan folder, gaps and their subtrees alike.
    ///
    /// Works on the cached hierarchy as it is when the call starts, so a
    /// single call may not converge if the backend changes underneath;
    /// call again until it returns an empty list.
    pub fn remove_orphans(&mut self) -> Result<Vec<FolderId>> {
        self.load(LoadPlan {
            force: false,
            validate: false,
            repair: false,
        })?;
        let result = prune_orphans(&self.backend, &mut self.tree);
        self.mark_patched();
        result
    }

    /// Move every gap under the folder at `to` in one backend call.
    ///
    /// Only the folders directly below a break are moved; their subtrees
    /// follow them. Returns the moved ids, empty if there was nothing to do.
    pub fn move_orphans(&mut self, to: &str) -> Result<Vec<FolderId>> {
        self.load(LoadPlan {
            force: false,
            validate: false,
            repair: false,
        })?;
        let destination = self.tree.id_of(to).ok_or_else(|| Error::not_found(to))?;

        let gaps = self.tree.detect_gaps();
        if gaps.is_empty() {
            return Ok(gaps);
        }

        self.backend
            .move_folders(&gaps, destination)
            .map_err(Error::backend)?;
        info!(count = gaps.len(), %destination, "Moved orphan folders");

        self.reload()?;
        Ok(gaps)
    }
}
