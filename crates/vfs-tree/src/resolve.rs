//! Conversion between folder paths and folder ids

use std::collections::HashSet;

use crate::{Error, FolderId, FolderPath, Hierarchy, Result, path};

impl Hierarchy {
    /// Get the id of the folder at `path`.
    ///
    /// The root path (`""` or `"/"`) resolves to [`FolderId::ROOT`]. Any other
    /// path is compared against the full derived path of every record, in id
    /// order; the first match wins. Partial paths never match.
    ///
    /// ```
    /// use vfs_tree::{FolderId, Listing, TreeBuilder};
    ///
    /// let tree = TreeBuilder::new().build(Listing::parse("1,0,a 2,1,b").unwrap()).unwrap();
    /// assert_eq!(tree.id_of("a/b/"), Some(FolderId::new(2)));
    /// assert_eq!(tree.id_of("/"), Some(FolderId::ROOT));
    /// assert_eq!(tree.id_of("/b"), None);
    /// ```
    pub fn id_of(&self, path: &str) -> Option<FolderId> {
        if path::is_root(path) {
            return Some(FolderId::ROOT);
        }

        let canonical = path::canonicalize(path);
        self.iter()
            .find(|(_, record)| record.path.matches(&canonical))
            .map(|(id, _)| id)
    }

    /// Reconstruct the path of a folder by walking its parent chain.
    ///
    /// Unlike the cached `path` field this never relies on previously derived
    /// paths. When an ancestor is missing the result is a
    /// [`FolderPath::Partial`]; an id that is not in the hierarchy at all
    /// yields a partial path broken at that id.
    pub fn path_of(&self, id: FolderId) -> Result<FolderPath> {
        if id.is_root() {
            return Ok(FolderPath::root());
        }

        let mut names = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = id;
        let base = loop {
            let Some(record) = self.get(cursor) else {
                break FolderPath::unresolved(cursor);
            };
            if !seen.insert(cursor) {
                return Err(Error::ParentCycle { id: cursor });
            }
            names.push(record.name.as_str());
            if record.parent.is_root() {
                break FolderPath::root();
            }
            cursor = record.parent;
        };

        Ok(names
            .into_iter()
            .rev()
            .fold(base, |path, name| path.child(name)))
    }
}
