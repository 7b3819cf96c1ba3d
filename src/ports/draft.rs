//! Draft source port for the generative quest backend.

use std::error::Error;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::quest::{Difficulty, QuestDraft, QuestType};

/// Boxed future type alias used by [`DraftSource`] to keep the trait dyn-compatible.
pub type DraftFuture<'a> =
    Pin<Box<dyn Future<Output = Result<QuestDraft, Box<dyn Error + Send + Sync>>> + Send + 'a>>;

/// A request to draft a quest from a user's stated goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftRequest {
    /// Life-area domain the quest should stay within (e.g. `"Fitness"`).
    pub domain: String,
    /// The user's stated goal, in their own words.
    pub specific_goal: String,
    /// Requested difficulty.
    pub difficulty: Difficulty,
    /// Minutes the user has available for the quest.
    pub time_available: f64,
    /// Free-text constraints ("no equipment", "at my desk").
    pub constraints: String,
    /// Free-text preferences ("prefer writing over video").
    pub preferences: String,
    /// Quest timeframe.
    pub quest_type: QuestType,
    /// The user's current level, for tone calibration.
    pub user_level: u32,
}

/// Produces an unvalidated quest draft from a request.
///
/// This is the only network suspension point in the engine. Failures are
/// recovered by the caller with a deterministic template draft, so an
/// error here never surfaces to the user as a hard failure.
pub trait DraftSource: Send + Sync {
    /// Drafts a quest for the given request.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable, times out, or
    /// returns content that cannot be parsed as a draft.
    fn draft(&self, request: &DraftRequest) -> DraftFuture<'_>;
}
