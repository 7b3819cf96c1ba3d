//! Per-user behavioral memory of quest outcomes.
//!
//! The memory is the adaptive state behind insights and impact scoring:
//! domain-level success patterns, a bounded window of recent outcomes,
//! theme preference lists, and textual adaptation notes. It is mutated
//! only by [`update::update_memory`], once per completion or skip.

pub mod impact;
pub mod insights;
pub mod update;

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::quest::Difficulty;

/// Maximum entries kept in the recent-completions window.
pub const RECENT_COMPLETIONS_CAP: usize = 20;

/// Maximum adaptation notes kept.
pub const ADAPTATION_NOTES_CAP: usize = 50;

/// Coarse time-of-day bucket for completion times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredTime {
    /// Before noon.
    Morning,
    /// Noon to 5pm.
    Afternoon,
    /// 5pm onward.
    Evening,
}

impl PreferredTime {
    /// Buckets an hour of day (0-23).
    #[must_use]
    pub fn from_hour(hour: u32) -> Self {
        if hour < 12 {
            Self::Morning
        } else if hour < 17 {
            Self::Afternoon
        } else {
            Self::Evening
        }
    }
}

/// Success statistics for one (user, domain) pair.
///
/// Created lazily on the first attempt in a domain, never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainSuccessPattern {
    /// The domain this pattern tracks.
    pub domain: String,
    /// Quests attempted (completions and skips both count).
    pub total_attempts: u32,
    /// Quests completed.
    pub completed: u32,
    /// `completed / total_attempts`, recomputed on every update.
    pub rate: f64,
    /// Last observed completion time bucket.
    #[serde(default)]
    pub preferred_time: Option<PreferredTime>,
    /// Running mean of completion minutes in this domain.
    pub average_completion_time: f64,
    /// When the domain was last attempted.
    pub last_attempt: DateTime<Utc>,
}

impl DomainSuccessPattern {
    fn new(domain: String, now: DateTime<Utc>) -> Self {
        Self {
            domain,
            total_attempts: 0,
            completed: 0,
            rate: 0.0,
            preferred_time: None,
            average_completion_time: 0.0,
            last_attempt: now,
        }
    }
}

/// One entry in the recent-completions window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRecord {
    /// The quest this outcome belongs to.
    pub quest_id: String,
    /// Domain the quest was bucketed under.
    pub domain: String,
    /// Quest difficulty.
    pub difficulty: Difficulty,
    /// Completion time, `None` for skips.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Minutes the quest took (zero when unknown).
    pub time_taken: f64,
    /// Whether the quest was skipped rather than completed.
    pub skipped: bool,
}

/// Kind of adaptation note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    /// Observed behavioral pattern.
    Pattern,
    /// Stated or inferred preference.
    Preference,
    /// Logged after a skip.
    Skip,
    /// Logged after a strong completion run.
    Success,
}

/// A short textual observation recorded during memory updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdaptationNote {
    /// The observation.
    pub note: String,
    /// What kind of observation it is.
    pub kind: NoteKind,
    /// When it was recorded.
    pub created_at: DateTime<Utc>,
}

/// The per-user quest memory, embedded in the user document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestMemory {
    /// Lowercased titles of completed quests, deduplicated, append-only.
    #[serde(default)]
    pub completed_themes: Vec<String>,
    /// Lowercased titles of skipped quests, deduplicated, append-only.
    #[serde(default)]
    pub avoided_themes: Vec<String>,
    /// Domain patterns in insertion order.
    ///
    /// Kept as an ordered list rather than a hash map so that iteration
    /// order (which insight generation depends on) is well-defined.
    #[serde(default)]
    pub success_patterns: Vec<DomainSuccessPattern>,
    /// Most-recent-first window of outcomes, capped at
    /// [`RECENT_COMPLETIONS_CAP`] with eviction on push.
    #[serde(default)]
    pub recent_completions: VecDeque<CompletionRecord>,
    /// Most-recent-first notes, capped at [`ADAPTATION_NOTES_CAP`].
    #[serde(default)]
    pub adaptation_notes: VecDeque<AdaptationNote>,
    /// The difficulty tier the user tends to pick.
    #[serde(default = "default_difficulty")]
    pub preferred_difficulty: Difficulty,
    /// Running mean of completion minutes across all domains.
    #[serde(default)]
    pub average_completion_time: f64,
}

fn default_difficulty() -> Difficulty {
    Difficulty::Medium
}

impl Default for QuestMemory {
    fn default() -> Self {
        Self {
            completed_themes: Vec::new(),
            avoided_themes: Vec::new(),
            success_patterns: Vec::new(),
            recent_completions: VecDeque::new(),
            adaptation_notes: VecDeque::new(),
            preferred_difficulty: Difficulty::Medium,
            average_completion_time: 0.0,
        }
    }
}

impl QuestMemory {
    /// Looks up the pattern for a domain.
    #[must_use]
    pub fn pattern(&self, domain: &str) -> Option<&DomainSuccessPattern> {
        self.success_patterns.iter().find(|p| p.domain == domain)
    }

    /// Fetches the pattern for a domain, creating a zeroed one on first use.
    pub fn pattern_mut_or_insert(
        &mut self,
        domain: &str,
        now: DateTime<Utc>,
    ) -> &mut DomainSuccessPattern {
        let idx = match self.success_patterns.iter().position(|p| p.domain == domain) {
            Some(idx) => idx,
            None => {
                self.success_patterns
                    .push(DomainSuccessPattern::new(domain.to_string(), now));
                self.success_patterns.len() - 1
            }
        };
        &mut self.success_patterns[idx]
    }

    /// Pushes an outcome to the front of the window, evicting the oldest
    /// entry when the cap is reached.
    pub fn push_recent(&mut self, record: CompletionRecord) {
        self.recent_completions.push_front(record);
        if self.recent_completions.len() > RECENT_COMPLETIONS_CAP {
            self.recent_completions.pop_back();
        }
    }

    /// Pushes a note to the front, evicting the oldest past the cap.
    pub fn push_note(&mut self, note: AdaptationNote) {
        self.adaptation_notes.push_front(note);
        if self.adaptation_notes.len() > ADAPTATION_NOTES_CAP {
            self.adaptation_notes.pop_back();
        }
    }

    /// Records a completed theme if it is not already present.
    pub fn add_completed_theme(&mut self, title: &str) {
        let theme = title.to_lowercase();
        if !self.completed_themes.contains(&theme) {
            self.completed_themes.push(theme);
        }
    }

    /// Records an avoided theme if it is not already present.
    pub fn add_avoided_theme(&mut self, title: &str) {
        let theme = title.to_lowercase();
        if !self.avoided_themes.contains(&theme) {
            self.avoided_themes.push(theme);
        }
    }
}
