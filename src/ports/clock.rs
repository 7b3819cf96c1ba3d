//! Clock port for obtaining the current time.

use chrono::{DateTime, Utc};

/// Provides the current time.
///
/// Every timestamp the engine records (streaks, preferred-time buckets,
/// pattern `last_attempt`) flows through this trait, so tests can
/// substitute a fixed instant and assert on time-dependent behavior.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;
}
