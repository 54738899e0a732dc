//! Folder Session Integration Tests
//!
//! These tests drive a [`FolderSession`] over an in-memory backend through
//! the situations a client of the remote storage runs into: building the
//! tree, losing a parent folder remotely, deleting subtrees and validating
//! broken listings.

use std::collections::BTreeMap;
use vfs_core::{
    CacheState, Error, FolderId, FolderSession, HierarchyOptions, MemoryBackend, SessionConfig,
};
use vfs_test_utils::{TreeFixture, ids};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// A storage account seeded from a fixture, with a session on top
struct TestAccount {
    session: FolderSession<MemoryBackend>,
}

impl TestAccount {
    fn new(fixture: &TreeFixture) -> Self {
        Self::with_config(fixture, SessionConfig::default())
    }

    fn with_config(fixture: &TreeFixture, config: SessionConfig) -> Self {
        let backend = MemoryBackend::with_folders(fixture.folders().to_vec());
        Self {
            session: FolderSession::with_config(backend, config),
        }
    }

    /// Lose a folder on the remote side without telling the session
    fn lose_remotely(&self, id: u64) {
        assert!(
            self.session.backend().forget(FolderId::new(id)),
            "folder #{id} should exist remotely"
        );
    }

    fn paths(&mut self, options: HierarchyOptions) -> BTreeMap<u64, String> {
        self.session
            .folders_hierarchy(options)
            .unwrap()
            .path_map()
            .into_iter()
            .map(|(id, path)| (id.get(), path))
            .collect()
    }
}

fn expected(entries: &[(u64, &str)]) -> BTreeMap<u64, String> {
    entries
        .iter()
        .map(|(id, path)| (*id, path.to_string()))
        .collect()
}

// =============================================================================
// Building: absolute paths, slices and lookups
// =============================================================================

mod building {
    use super::*;
    use pretty_assertions::assert_eq;

    /// 1.1: Every folder gets its absolute path
    #[test]
    fn chain_paths() {
        let mut account = TestAccount::new(&TreeFixture::chain());

        assert_eq!(
            account.paths(HierarchyOptions::new()),
            expected(&[(1, "/a"), (2, "/a/b"), (3, "/a/b/c")])
        );
    }

    /// 1.2: Slicing keeps strict descendants with relative paths
    #[test]
    fn slice_is_relative() {
        let mut account = TestAccount::new(&TreeFixture::chain());
        let tree = account.session.hierarchy().unwrap().clone();

        let slice = FolderSession::<MemoryBackend>::slice_tree(&tree, "/a/b");
        assert_eq!(slice.path_map(), BTreeMap::from([(FolderId::new(3), "/c".to_string())]));

        assert_eq!(
            account.paths(HierarchyOptions::new().starting_at("/a/b")),
            expected(&[(3, "/c")])
        );
    }

    /// 1.3: Slicing at the root is the whole tree
    #[test]
    fn slice_at_root() {
        let mut account = TestAccount::new(&TreeFixture::forest());

        assert_eq!(
            account.paths(HierarchyOptions::new().starting_at("/")),
            account.paths(HierarchyOptions::new())
        );
    }

    /// 1.4: Path and id lookups invert each other
    #[test]
    fn lookup_round_trip() {
        let mut account = TestAccount::new(&TreeFixture::forest());

        for (id, path) in account.paths(HierarchyOptions::new()) {
            assert_eq!(account.session.folder_id(&path).unwrap(), FolderId::new(id));
            assert_eq!(
                account.session.folder_path(FolderId::new(id)).unwrap().to_string(),
                path
            );
        }
    }
}

// =============================================================================
// Lost parent: a folder disappears on the remote side
// =============================================================================

mod lost_parent {
    use super::*;
    use pretty_assertions::assert_eq;

    /// 2.1: Gaps and orphans are told apart
    #[test]
    fn classification() {
        let mut account = TestAccount::new(&TreeFixture::chain());
        account.lose_remotely(1);
        account
            .session
            .folders_hierarchy(HierarchyOptions::new().forced().validate(false))
            .unwrap();

        assert!(account.session.is_gap(FolderId::new(2)).unwrap());
        assert!(account.session.is_orphan(FolderId::new(2)).unwrap());
        assert!(account.session.is_orphan(FolderId::new(3)).unwrap());
        assert!(!account.session.is_gap(FolderId::new(3)).unwrap());
        assert_eq!(account.session.detect_gaps().unwrap(), ids(&[2]));
    }

    /// 2.2: Lenient paths are flagged as partial
    #[test]
    fn partial_paths() {
        let mut account = TestAccount::new(&TreeFixture::chain());
        account.lose_remotely(1);

        let tree = account
            .session
            .folders_hierarchy(HierarchyOptions::new().forced().validate(false))
            .unwrap();

        let path = &tree.get(FolderId::new(3)).unwrap().path;
        assert!(path.is_partial());
        assert_eq!(path.to_string(), "/<unresolved>/b/c");
        assert_eq!(tree.id_of("/b/c"), None);
    }

    /// 2.3: The stale cache hides the loss until a forced reload
    #[test]
    fn cache_is_stale_until_forced() {
        let mut account = TestAccount::new(&TreeFixture::chain());
        account.session.hierarchy().unwrap();
        account.lose_remotely(1);

        assert!(account.session.check().unwrap().is_consistent());
        assert_eq!(account.session.cache_state(), CacheState::Stale);

        let err = account.session.reload().unwrap_err();
        assert!(matches!(err, Error::Tree(vfs_tree::Error::InconsistentTree { .. })));
    }

    /// 2.4: Orphans can be reattached and the tree validates again
    #[test]
    fn reattach_then_validate() {
        let mut account = TestAccount::new(&TreeFixture::forest());
        account.lose_remotely(1);

        assert_eq!(account.session.move_orphans("/x").unwrap(), ids(&[2, 4]));
        assert_eq!(
            account.paths(HierarchyOptions::new().forced()),
            expected(&[
                (2, "/x/b"),
                (3, "/x/b/c"),
                (4, "/x/d"),
                (10, "/x"),
                (11, "/x/y"),
            ])
        );
    }

    /// 2.5: Orphans can be deleted and the tree validates again
    #[test]
    fn remove_then_validate() {
        let mut account = TestAccount::new(&TreeFixture::forest());
        account.lose_remotely(1);
        account
            .session
            .folders_hierarchy(HierarchyOptions::new().forced().validate(false))
            .unwrap();

        assert_eq!(account.session.remove_orphans().unwrap(), ids(&[2, 3, 4]));
        assert_eq!(account.session.remove_orphans().unwrap(), ids(&[]));
        assert_eq!(
            account.paths(HierarchyOptions::new().forced()),
            expected(&[(10, "/x"), (11, "/x/y")])
        );
    }
}

// =============================================================================
// Removal: deleting a subtree
// =============================================================================

mod removal {
    use super::*;
    use pretty_assertions::assert_eq;

    /// 3.1: Removing the only top-level folder empties the hierarchy
    #[test]
    fn remove_everything_below_root() {
        let mut account = TestAccount::new(&TreeFixture::chain());

        account.session.remove_folder("/a").unwrap();

        assert_eq!(account.paths(HierarchyOptions::new()), expected(&[]));
        assert!(account.session.backend().is_empty());
    }

    /// 3.2: Removal followed by re-creation reuses nothing
    #[test]
    fn recreate_after_remove() {
        let mut account = TestAccount::new(&TreeFixture::chain());
        account.session.remove_folder("/a").unwrap();

        let id = account.session.add_folder("/a/b").unwrap();

        assert!(id.get() > 3);
        assert_eq!(account.session.backend().len(), 2);
    }
}

// =============================================================================
// Validation: rejecting or repairing a broken listing
// =============================================================================

mod validation {
    use super::*;
    use pretty_assertions::assert_eq;

    /// 4.1: The first broken folder and its missing parent are reported
    #[test]
    fn inconsistent_tree_is_reported() {
        let mut account = TestAccount::new(&TreeFixture::chain().without(1));

        let err = account.session.hierarchy().unwrap_err();

        let Error::Tree(vfs_tree::Error::InconsistentTree {
            id, missing_parent, ..
        }) = &err
        else {
            panic!("expected InconsistentTree, got {err:?}");
        };
        assert_eq!(*id, FolderId::new(2));
        assert_eq!(*missing_parent, FolderId::new(1));
        assert!(err.to_string().contains("parent folder #1"));
        assert_eq!(account.session.cache_state(), CacheState::Invalid);
    }

    /// 4.2: Repair on build turns the failure into a pruned tree
    #[test]
    fn repair_on_build() {
        let config = SessionConfig {
            validate: true,
            repair_on_build: true,
        };
        let mut account = TestAccount::with_config(&TreeFixture::forest().without(1), config);

        assert_eq!(
            account.paths(HierarchyOptions::new()),
            expected(&[(10, "/x"), (11, "/x/y")])
        );
    }
}

// =============================================================================
// Robustness
// =============================================================================

mod robustness {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Sibling folders with the same name resolve to the lowest id
    #[test]
    fn duplicate_paths_resolve_to_first_id() {
        let mut account = TestAccount::new(
            &TreeFixture::new()
                .folder(7, 0, "dup")
                .folder(3, 0, "dup"),
        );

        assert_eq!(account.session.folder_id("/dup").unwrap(), FolderId::new(3));
        assert_eq!(account.session.hierarchy().unwrap().len(), 2);
    }

    /// Parent cycles in the listing are reported, not looped on
    #[test]
    fn cycles_are_errors() {
        let mut account = TestAccount::new(&TreeFixture::new().folder(1, 2, "a").folder(2, 1, "b"));

        let err = account
            .session
            .folders_hierarchy(HierarchyOptions::new().validate(false))
            .unwrap_err();
        assert!(matches!(err, Error::Tree(vfs_tree::Error::ParentCycle { .. })));
    }

    /// Deep chains do not exhaust the stack
    #[test]
    fn deep_chain() {
        let mut fixture = TreeFixture::new();
        for id in 1..=1_000u64 {
            fixture = fixture.folder(id, id - 1, "d");
        }
        let mut account = TestAccount::new(&fixture);

        let path = account.session.folder_path(FolderId::new(1_000)).unwrap();
        assert_eq!(path.depth(), 1_000);
        assert_eq!(account.session.remove_folder("/d").unwrap().len(), 1_000);
    }

    /// Paths are compared after collapsing redundant slashes
    #[test]
    fn sloppy_paths() {
        let mut account = TestAccount::new(&TreeFixture::chain());

        for path in ["a/b/c", "/a/b/c/", "//a///b/c"] {
            assert_eq!(account.session.folder_id(path).unwrap(), FolderId::new(3));
        }
    }
}
