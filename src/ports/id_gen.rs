//! ID generator port for unique document identifiers.

/// Produces unique identifiers for persisted documents.
///
/// Abstracted so tests can generate predictable sequential IDs while the
/// live adapter produces random UUIDs.
pub trait IdGenerator: Send + Sync {
    /// Returns a new unique identifier.
    fn generate_id(&self) -> String;
}
