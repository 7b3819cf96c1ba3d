//! Error taxonomy for engine operations.
//!
//! A rejected draft is not an error: validation rejection is an
//! expected outcome and travels as structured data. The variants here
//! are the genuinely exceptional paths.

use thiserror::Error;

use crate::ports::StoreError;

/// Errors surfaced by engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The external draft backend failed or returned unparseable content.
    ///
    /// Recovered internally with a template draft; callers only ever see
    /// this in logs, never as a hard failure.
    #[error("draft source unavailable: {0}")]
    DraftUnavailable(String),

    /// No user document with this ID.
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// No quest document with this ID.
    #[error("quest not found: {0}")]
    QuestNotFound(String),

    /// The addressed task index does not exist on the quest.
    #[error("task index {0} out of range")]
    TaskNotFound(usize),

    /// The quest exists but belongs to a different user. No state is
    /// mutated when this is returned.
    #[error("quest {quest_id} does not belong to user {user_id}")]
    NotAuthorized {
        /// The quest that was addressed.
        quest_id: String,
        /// The user who addressed it.
        user_id: String,
    },

    /// Concurrent memory updates kept colliding and retries ran out.
    #[error("memory update conflicted {attempts} times, giving up")]
    ConcurrentMemoryUpdate {
        /// How many conditional writes were attempted.
        attempts: u32,
    },

    /// A stored document failed to serialize or deserialize.
    #[error("corrupt document: {0}")]
    Corrupt(String),

    /// The document store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
