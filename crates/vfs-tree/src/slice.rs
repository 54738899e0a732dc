//! Relative sub-hierarchies

use crate::{FolderRecord, Hierarchy, path};

impl Hierarchy {
    /// Extract the strict descendants of the folder at `from`.
    ///
    /// Paths in the result are relative to `from`, while parent ids keep
    /// pointing at the original absolute ids:
    ///
    /// ```
    /// use vfs_tree::{FolderId, Listing, TreeBuilder};
    ///
    /// let tree = TreeBuilder::new()
    ///     .build(Listing::parse("1,0,a 2,1,b 3,2,c").unwrap())
    ///     .unwrap();
    /// let slice = tree.slice("/a");
    ///
    /// assert_eq!(slice.ids(), vec![FolderId::new(2), FolderId::new(3)]);
    /// assert_eq!(slice.get(FolderId::new(3)).unwrap().path.to_string(), "/b/c");
    /// assert_eq!(slice.get(FolderId::new(2)).unwrap().parent, FolderId::new(1));
    /// ```
    ///
    /// Slicing from the root returns the whole hierarchy unchanged.
    pub fn slice(&self, from: &str) -> Hierarchy {
        if path::is_root(from) {
            return self.clone();
        }

        let from = path::canonicalize(from);
        self.iter()
            .filter_map(|(id, record)| {
                let relative = record.path.relative_to(&from)?;
                Some((
                    id,
                    FolderRecord {
                        path: relative,
                        ..record.clone()
                    },
                ))
            })
            .collect()
    }
}
