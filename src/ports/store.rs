//! Keyed document store port with optimistic concurrency.

use thiserror::Error;

/// A raw document as returned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    /// Serialized document body.
    pub body: String,
    /// Revision the body was read at.
    pub revision: u64,
}

/// The revision a caller expects to be replacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    /// The document must not exist yet.
    New,
    /// The document must currently be at this revision.
    Revision(u64),
}

/// Errors surfaced by a [`DocumentStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The document changed between read and write.
    ///
    /// This is the signal the per-user retry loop keys on: re-read,
    /// reapply the delta, and try the conditional write again.
    #[error("revision conflict on {collection}/{id}: expected {expected:?}, found {found:?}")]
    Conflict {
        /// Collection name.
        collection: String,
        /// Document ID.
        id: String,
        /// Revision the writer expected.
        expected: Expected,
        /// Revision actually present (`None` when the document is missing).
        found: Option<u64>,
    },
    /// Any other backend failure (I/O, corrupt file, ...).
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Abstract keyed store for serialized documents.
///
/// Collections are flat namespaces ("users", "quests"). The conditional
/// `save` is the only write primitive; there is no unconditional
/// last-write-wins path, which keeps lost updates impossible by
/// construction at this boundary.
pub trait DocumentStore: Send + Sync {
    /// Loads a document, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn load(&self, collection: &str, id: &str) -> Result<Option<RawDocument>, StoreError>;

    /// Writes a document body if the stored revision matches `expected`.
    ///
    /// Returns the new revision on success.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] when the revision check fails,
    /// or [`StoreError::Backend`] for other failures.
    fn save(
        &self,
        collection: &str,
        id: &str,
        body: &str,
        expected: Expected,
    ) -> Result<u64, StoreError>;

    /// Lists all document IDs in a collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn list(&self, collection: &str) -> Result<Vec<String>, StoreError>;
}
