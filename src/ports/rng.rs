//! Randomness port for the engine's few non-deterministic choices.

/// Source of randomness for selection among fixed alternatives.
///
/// The engine only ever needs "pick one of N" (e.g. choosing an
/// encouragement line after a skip), so the port is a single method and
/// tests can pin the choice to any index.
pub trait Randomness: Send + Sync {
    /// Returns an index in `0..len`. `len` is always non-zero.
    fn pick(&self, len: usize) -> usize;
}
