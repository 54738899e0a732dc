//! Folder mutations
//!
//! Each mutation issues backend commands and then patches the cached
//! hierarchy instead of listing all folders again. `move_folder` is the
//! exception: it reloads, because a move changes the path of a whole
//! subtree.

use tracing::{debug, info, warn};
use vfs_tree::{FolderId, FolderPath, FolderRecord, path};

use super::{FolderSession, LoadPlan};
use crate::backend::FolderBackend;
use crate::{Error, Result};

impl<B: FolderBackend> FolderSession<B> {
    /// Create the folder at `path`, including any missing ancestors.
    ///
    /// Returns the id of the last path segment. Creating a folder that
    /// already exists is a no-op returning its id; the root path returns
    /// [`FolderId::ROOT`].
    ///
    /// ```
    /// use vfs_core::{FolderSession, MemoryBackend};
    ///
    /// let mut session = FolderSession::new(MemoryBackend::new());
    /// let leaf = session.add_folder("/a/b/c").unwrap();
    ///
    /// assert_eq!(session.add_folder("a/b/c/").unwrap(), leaf);
    /// assert_eq!(session.backend().len(), 3);
    /// ```
    pub fn add_folder(&mut self, path: &str) -> Result<FolderId> {
        self.load(self.default_plan(false))?;

        let mut parent = FolderId::ROOT;
        let mut current = String::new();
        for name in path::segments(path) {
            current.push('/');
            current.push_str(name);

            if let Some(id) = self.tree.id_of(&current) {
                parent = id;
                continue;
            }

            let id = self
                .backend
                .create_folder(parent, name)
                .map_err(Error::backend)?;
            self.tree.insert(
                id,
                FolderRecord::new(parent, name, FolderPath::Resolved(current.clone())),
            );
            info!(%id, %parent, path = %current, "Created folder");
            parent = id;
        }

        self.mark_patched();
        Ok(parent)
    }

    /// Delete the folder at `path` together with all of its descendants.
    ///
    /// Descendants are deleted deepest first, the folder itself last.
    /// Returns every deleted id in deletion order.
    pub fn remove_folder(&mut self, path: &str) -> Result<Vec<FolderId>> {
        self.load(self.default_plan(false))?;

        let id = match self.tree.id_of(path) {
            Some(id) if !id.is_root() => id,
            _ => return Err(Error::not_found(path)),
        };

        let mut doomed: Vec<(FolderId, usize)> = self
            .tree
            .slice(path)
            .iter()
            .map(|(child, record)| (child, record.path.depth()))
            .collect();
        doomed.sort_by(|a, b| b.1.cmp(&a.1));

        let mut removed = Vec::with_capacity(doomed.len() + 1);
        for child in doomed.into_iter().map(|(child, _)| child).chain([id]) {
            self.backend
                .delete_folder(child)
                .map_err(Error::backend)?;
            self.tree.remove(child);
            self.mark_patched();
            removed.push(child);
        }

        info!(%id, path = %path::canonicalize(path), count = removed.len(), "Removed folder");
        Ok(removed)
    }

    /// Move the folder at `path` below the folder at `to` (`"/"` for the
    /// root).
    pub fn move_folder(&mut self, path: &str, to: &str) -> Result<()> {
        self.load(self.default_plan(false))?;

        let source = match self.tree.id_of(path) {
            Some(id) if !id.is_root() => id,
            _ => return Err(Error::not_found(path)),
        };
        let destination = self.tree.id_of(to).ok_or_else(|| Error::not_found(to))?;
        if destination == source || self.tree.slice(path).contains(destination) {
            return Err(Error::InvalidMove {
                path: path::canonicalize(path),
                destination: path::canonicalize(to),
            });
        }

        self.backend
            .move_folders(&[source], destination)
            .map_err(Error::backend)?;
        self.load(self.default_plan(true))?;

        // The listing may lag behind the move; trust the command we just sent
        if self.tree.set_parent(source, destination) {
            self.tree.refresh_paths()?;
        } else {
            warn!(id = %source, "Moved folder missing from reloaded hierarchy");
        }
        info!(id = %source, %destination, "Moved folder");
        Ok(())
    }

    /// Delete every folder of the account.
    ///
    /// Lists all folders without validation, deletes each of them, then
    /// reloads to confirm nothing is left. Returns the number of deleted
    /// folders.
    pub fn erase_all(&mut self) -> Result<usize> {
        self.load(LoadPlan {
            force: true,
            validate: false,
            repair: false,
        })?;

        let ids = self.tree.ids();
        for &id in &ids {
            self.backend.delete_folder(id).map_err(Error::backend)?;
            self.tree.remove(id);
            debug!(%id, "Deleted folder");
        }

        self.load(LoadPlan {
            force: true,
            validate: self.config.validate,
            repair: false,
        })?;
        let remaining = self.tree.len();
        if remaining > 0 {
            warn!(remaining, "Folders left after erasing all data");
        }
        info!(count = ids.len(), "Erased all folders");
        Ok(ids.len())
    }
}
