//! [`TreeFixture`] builder for folder hierarchy test scenarios.

use vfs_tree::{BuildOptions, FolderId, Hierarchy, Listing, RawFolder, TreeBuilder};

/// A raw backend listing under construction.
///
/// # Example
///
/// ```rust
/// use vfs_test_utils::TreeFixture;
/// use vfs_tree::FolderId;
///
/// let tree = TreeFixture::chain().without(1).build_unvalidated();
/// assert!(tree.is_gap(FolderId::new(2)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TreeFixture {
    folders: Vec<RawFolder>,
}

impl TreeFixture {
    /// Start from an empty listing.
    pub fn new() -> Self {
        Self::default()
    }

    /// The `/a/b/c` chain: `[(1,0,a), (2,1,b), (3,2,c)]`.
    pub fn chain() -> Self {
        Self::from_tuples(&[(1, 0, "a"), (2, 1, "b"), (3, 2, "c")])
    }

    /// Two top-level trees: `/a/b/c`, `/a/d` and `/x/y`.
    pub fn forest() -> Self {
        Self::from_tuples(&[
            (1, 0, "a"),
            (2, 1, "b"),
            (3, 2, "c"),
            (4, 1, "d"),
            (10, 0, "x"),
            (11, 10, "y"),
        ])
    }

    pub fn from_tuples(tuples: &[(u64, u64, &str)]) -> Self {
        Self {
            folders: tuples.iter().copied().map(RawFolder::from).collect(),
        }
    }

    /// Append a folder.
    pub fn folder(mut self, id: u64, parent: u64, name: &str) -> Self {
        self.folders.push(RawFolder::new(id, parent, name));
        self
    }

    /// Drop a folder from the listing, leaving its children behind.
    pub fn without(mut self, id: u64) -> Self {
        self.folders.retain(|folder| folder.id != FolderId::new(id));
        self
    }

    pub fn folders(&self) -> &[RawFolder] {
        &self.folders
    }

    pub fn listing(&self) -> Listing {
        self.folders.iter().cloned().collect()
    }

    /// Render the listing the way the backend does, `NONE` when empty.
    pub fn text(&self) -> String {
        if self.folders.is_empty() {
            return vfs_tree::listing::EMPTY_SENTINEL.to_string();
        }
        self.folders
            .iter()
            .map(|f| format!("{},{},{}", f.id, f.parent, f.name))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Build with validation, panicking on failure.
    pub fn build(&self) -> Hierarchy {
        TreeBuilder::new()
            .build(self.listing())
            .expect("TreeFixture::build: listing should form a consistent tree")
    }

    /// Build without validation, panicking on failure.
    pub fn build_unvalidated(&self) -> Hierarchy {
        TreeBuilder::with_options(BuildOptions::unvalidated())
            .build(self.listing())
            .expect("TreeFixture::build_unvalidated: listing should not contain cycles")
    }
}

/// Convert raw ids into [`FolderId`]s.
pub fn ids(raw: &[u64]) -> Vec<FolderId> {
    raw.iter().copied().map(FolderId::new).collect()
}
