//! Live filesystem-backed document store.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::ports::store::{DocumentStore, Expected, RawDocument, StoreError};

/// On-disk envelope carrying the revision next to the document.
#[derive(Serialize, Deserialize)]
struct Envelope {
    revision: u64,
    doc: serde_yaml::Value,
}

/// Document store writing one YAML file per document.
///
/// Layout: `<root>/<collection>/<id>.yaml`. Conditional writes are
/// serialized through an in-process lock; per-user update serialization
/// across processes is out of scope (one service process owns the data
/// directory).
pub struct FsDocStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FsDocStore {
    /// Creates a store rooted at the given directory.
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self { root: root.to_path_buf(), write_lock: Mutex::new(()) }
    }

    fn doc_path(&self, collection: &str, id: &str) -> PathBuf {
        self.root.join(collection).join(format!("{id}.yaml"))
    }

    fn read_envelope(&self, collection: &str, id: &str) -> Result<Option<Envelope>, StoreError> {
        let path = self.doc_path(collection, id);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)
            .map_err(|e| StoreError::Backend(format!("read {}: {e}", path.display())))?;
        let envelope = serde_yaml::from_str(&contents)
            .map_err(|e| StoreError::Backend(format!("parse {}: {e}", path.display())))?;
        Ok(Some(envelope))
    }
}

impl DocumentStore for FsDocStore {
    fn load(&self, collection: &str, id: &str) -> Result<Option<RawDocument>, StoreError> {
        let Some(envelope) = self.read_envelope(collection, id)? else {
            return Ok(None);
        };
        let body = serde_yaml::to_string(&envelope.doc)
            .map_err(|e| StoreError::Backend(format!("reserialize {collection}/{id}: {e}")))?;
        Ok(Some(RawDocument { body, revision: envelope.revision }))
    }

    fn save(
        &self,
        collection: &str,
        id: &str,
        body: &str,
        expected: Expected,
    ) -> Result<u64, StoreError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Backend("store write lock poisoned".into()))?;

        let found = self.read_envelope(collection, id)?.map(|e| e.revision);
        let next = match (expected, found) {
            (Expected::New, None) => 1,
            (Expected::Revision(rev), Some(current)) if rev == current => current + 1,
            _ => {
                return Err(StoreError::Conflict {
                    collection: collection.to_string(),
                    id: id.to_string(),
                    expected,
                    found,
                })
            }
        };

        let doc: serde_yaml::Value = serde_yaml::from_str(body)
            .map_err(|e| StoreError::Backend(format!("invalid document body: {e}")))?;
        let envelope = Envelope { revision: next, doc };
        let contents = serde_yaml::to_string(&envelope)
            .map_err(|e| StoreError::Backend(format!("serialize envelope: {e}")))?;

        let path = self.doc_path(collection, id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StoreError::Backend(format!("mkdir {}: {e}", parent.display())))?;
        }
        fs::write(&path, contents)
            .map_err(|e| StoreError::Backend(format!("write {}: {e}", path.display())))?;
        Ok(next)
    }

    fn list(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        let dir = self.root.join(collection);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&dir)
            .map_err(|e| StoreError::Backend(format!("list {}: {e}", dir.display())))?;
        let mut ids = Vec::new();
        for entry in entries {
            let entry =
                entry.map_err(|e| StoreError::Backend(format!("list {}: {e}", dir.display())))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some(id) = name.strip_suffix(".yaml") {
                ids.push(id.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(tag: &str) -> (FsDocStore, PathBuf) {
        let dir = std::env::temp_dir().join(format!("aura_store_test_{tag}"));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        (FsDocStore::new(&dir), dir)
    }

    #[test]
    fn save_load_round_trips_with_revision() {
        let (store, dir) = temp_store("roundtrip");

        let rev = store.save("users", "u-1", "name: Robin\n", Expected::New).unwrap();
        assert_eq!(rev, 1);

        let doc = store.load("users", "u-1").unwrap().expect("present");
        assert_eq!(doc.revision, 1);
        assert!(doc.body.contains("Robin"));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn stale_conditional_write_conflicts() {
        let (store, dir) = temp_store("conflict");

        store.save("users", "u-1", "xp: 0\n", Expected::New).unwrap();
        store.save("users", "u-1", "xp: 50\n", Expected::Revision(1)).unwrap();

        let err = store.save("users", "u-1", "xp: 99\n", Expected::Revision(1)).unwrap_err();
        assert!(matches!(err, StoreError::Conflict { found: Some(2), .. }));
        // Losing write left the winner's data intact.
        assert!(store.load("users", "u-1").unwrap().unwrap().body.contains("50"));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn list_returns_sorted_ids_and_empty_for_missing_collection() {
        let (store, dir) = temp_store("list");

        store.save("quests", "b", "x: 1\n", Expected::New).unwrap();
        store.save("quests", "a", "x: 2\n", Expected::New).unwrap();

        assert_eq!(store.list("quests").unwrap(), vec!["a", "b"]);
        assert!(store.list("users").unwrap().is_empty());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_missing_document_is_none() {
        let (store, dir) = temp_store("missing");
        assert!(store.load("users", "ghost").unwrap().is_none());
        let _ = fs::remove_dir_all(&dir);
    }
}
