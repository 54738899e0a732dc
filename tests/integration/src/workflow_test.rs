//! End-to-end workflow over a text-protocol backend
//!
//! This test exercises the complete flow: config loading -> raw listing
//! parsing -> hierarchy building -> mutations -> repair, against a backend
//! that answers listings in the storage service's wire format.

use pretty_assertions::assert_eq;
use std::fs;
use std::sync::Mutex;
use tempfile::TempDir;
use vfs_core::{
    Error, FolderBackend, FolderId, FolderSession, HierarchyOptions, Listing, SessionConfig,
};
use vfs_test_utils::TreeFixture;

/// Errors of [`TextBackend`]
#[derive(Debug, thiserror::Error)]
enum TextBackendError {
    #[error("no such folder #{0}")]
    NoSuchFolder(FolderId),

    #[error(transparent)]
    Listing(#[from] vfs_tree::Error),
}

/// Backend that stores its folders as the raw `id,parent,name` text the
/// remote service returns, and parses it on every listing.
struct TextBackend {
    text: Mutex<String>,
}

impl TextBackend {
    fn new(text: impl Into<String>) -> Self {
        Self {
            text: Mutex::new(text.into()),
        }
    }

    fn text(&self) -> String {
        self.text.lock().unwrap().clone()
    }

    fn records(&self) -> Vec<(u64, u64, String)> {
        Listing::parse(&self.text())
            .unwrap()
            .folders()
            .iter()
            .map(|f| (f.id.get(), f.parent.get(), f.name.clone()))
            .collect()
    }

    fn store(&self, records: Vec<(u64, u64, String)>) {
        let text = if records.is_empty() {
            "NONE".to_string()
        } else {
            records
                .iter()
                .map(|(id, parent, name)| format!("{id},{parent},{name}"))
                .collect::<Vec<_>>()
                .join("\n")
        };
        *self.text.lock().unwrap() = text;
    }
}

impl FolderBackend for TextBackend {
    type Error = TextBackendError;

    fn list_folders(&self) -> Result<Listing, Self::Error> {
        Ok(Listing::parse(&self.text())?)
    }

    fn create_folder(&self, parent: FolderId, name: &str) -> Result<FolderId, Self::Error> {
        let mut records = self.records();
        let id = records.iter().map(|r| r.0).max().unwrap_or(0) + 1;
        records.push((id, parent.get(), name.to_string()));
        self.store(records);
        Ok(FolderId::new(id))
    }

    fn delete_folder(&self, id: FolderId) -> Result<(), Self::Error> {
        let mut records = self.records();
        let before = records.len();
        records.retain(|r| r.0 != id.get());
        if records.len() == before {
            return Err(TextBackendError::NoSuchFolder(id));
        }
        self.store(records);
        Ok(())
    }

    fn move_folders(&self, ids: &[FolderId], new_parent: FolderId) -> Result<(), Self::Error> {
        let mut records = self.records();
        for record in &mut records {
            if ids.contains(&FolderId::new(record.0)) {
                record.1 = new_parent.get();
            }
        }
        self.store(records);
        Ok(())
    }
}

fn write_config(dir: &TempDir, content: &str) -> SessionConfig {
    let path = dir.path().join("vfs.toml");
    fs::write(&path, content).unwrap();
    SessionConfig::load(&path).unwrap()
}

#[test]
fn test_full_workflow() {
    let _ = vfs_core::logging::init();
    let temp = TempDir::new().unwrap();
    let config = write_config(&temp, "[session]\nvalidate = true\n");
    let backend = TextBackend::new(TreeFixture::forest().text());
    let mut session = FolderSession::with_config(backend, config);

    // 1. Build and query
    assert_eq!(session.folder_id("/a/b/c").unwrap(), FolderId::new(3));
    assert_eq!(
        session
            .folders_hierarchy(HierarchyOptions::new().starting_at("/x"))
            .unwrap()
            .path_map()
            .into_values()
            .collect::<Vec<_>>(),
        vec!["/y"]
    );

    // 2. Mutate
    let new = session.add_folder("/x/y/z").unwrap();
    assert_eq!(new, FolderId::new(12));
    session.move_folder("/a/d", "/x/y/z").unwrap();
    assert_eq!(session.folder_id("/x/y/z/d").unwrap(), FolderId::new(4));
    session.remove_folder("/a/b").unwrap();

    // 3. The backend text agrees with the cache
    let fresh = session
        .folders_hierarchy(HierarchyOptions::new().forced())
        .unwrap();
    assert_eq!(
        fresh.path_map().into_values().collect::<Vec<_>>(),
        vec!["/a", "/x/y/z/d", "/x", "/x/y", "/x/y/z"]
    );

    // 4. Erase
    assert_eq!(session.erase_all().unwrap(), 5);
    let backend = session.into_backend();
    assert_eq!(backend.text(), "NONE");
}

#[test]
fn test_repair_workflow() {
    let temp = TempDir::new().unwrap();
    let config = write_config(&temp, "[session]\nvalidate = true\nrepair_on_build = false\n");
    let backend = TextBackend::new(TreeFixture::forest().without(10).text());
    let mut session = FolderSession::with_config(backend, config);

    assert!(matches!(
        session.hierarchy(),
        Err(Error::Tree(vfs_tree::Error::InconsistentTree { .. }))
    ));

    let gaps = session.move_orphans("/a").unwrap();
    assert_eq!(gaps, vec![FolderId::new(11)]);
    assert_eq!(session.folder_id("/a/y").unwrap(), FolderId::new(11));
}

#[test]
fn test_malformed_listing_is_a_backend_error() {
    let backend = TextBackend::new("1,0,a 2,oops,b");
    let mut session = FolderSession::new(backend);

    let err = session.hierarchy().unwrap_err();
    let Error::Backend(source) = &err else {
        panic!("expected backend error, got {err:?}");
    };
    assert!(matches!(
        source.downcast_ref::<TextBackendError>(),
        Some(TextBackendError::Listing(vfs_tree::Error::MalformedListing { .. }))
    ));
}

#[test]
fn test_hierarchy_serializes_to_json() {
    let backend = TextBackend::new(TreeFixture::chain().text());
    let mut session = FolderSession::new(backend);

    let json = serde_json::to_value(session.hierarchy().unwrap()).unwrap();

    assert_eq!(json["3"]["path"]["resolved"], "/a/b/c");
    assert_eq!(json["3"]["parent"], 2);
}
