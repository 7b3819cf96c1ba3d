//! In-memory document store with real compare-and-swap semantics.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::ports::store::{DocumentStore, Expected, RawDocument, StoreError};

/// Thread-safe in-memory store keyed by (collection, id).
///
/// Revisions start at 1 and bump on every successful write, which makes
/// this a faithful stand-in for the conditional-write behavior of the
/// live store in concurrency tests.
#[derive(Default)]
pub struct MemoryDocStore {
    docs: Mutex<HashMap<(String, String), (String, u64)>>,
}

impl MemoryDocStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryDocStore {
    fn load(&self, collection: &str, id: &str) -> Result<Option<RawDocument>, StoreError> {
        let docs = self
            .docs
            .lock()
            .map_err(|_| StoreError::Backend("store mutex poisoned".into()))?;
        Ok(docs
            .get(&(collection.to_string(), id.to_string()))
            .map(|(body, revision)| RawDocument { body: body.clone(), revision: *revision }))
    }

    fn save(
        &self,
        collection: &str,
        id: &str,
        body: &str,
        expected: Expected,
    ) -> Result<u64, StoreError> {
        let mut docs = self
            .docs
            .lock()
            .map_err(|_| StoreError::Backend("store mutex poisoned".into()))?;
        let key = (collection.to_string(), id.to_string());
        let found = docs.get(&key).map(|(_, revision)| *revision);

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
        docs.insert(key, (body.to_string(), next));
        Ok(next)
    }

    fn list(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        let docs = self
            .docs
            .lock()
            .map_err(|_| StoreError::Backend("store mutex poisoned".into()))?;
        let mut ids: Vec<String> = docs
            .keys()
            .filter(|(c, _)| c == collection)
            .map(|(_, id)| id.clone())
            .collect();
        ids.sort();
        Ok(ids)
    }
}
