//! Transactional memory update applied after every completion or skip.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::quest::Quest;

use super::{AdaptationNote, CompletionRecord, NoteKind, PreferredTime, QuestMemory};

/// The outcome event driving a memory update.
///
/// Exactly one of `completed`/`skipped` is normally true. An event with
/// neither (a partial or aborted attempt) still counts as an attempt and
/// is logged to the recent window, but moves no themes or notes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuestOutcome {
    /// The quest was completed.
    pub completed: bool,
    /// The quest was skipped.
    pub skipped: bool,
    /// Minutes the quest took (zero when unknown).
    pub time_taken: f64,
}

impl QuestOutcome {
    /// A completion that took `time_taken` minutes.
    #[must_use]
    pub fn completed(time_taken: f64) -> Self {
        Self { completed: true, skipped: false, time_taken }
    }

    /// A skip.
    #[must_use]
    pub fn skipped() -> Self {
        Self { completed: false, skipped: true, time_taken: 0.0 }
    }
}

/// Applies one outcome event to the user's quest memory.
///
/// This is the single writer for all memory state. The whole function is
/// one in-memory mutation; persistence (and the per-user concurrency
/// retry around it) is the store's concern, which keeps the update
/// all-or-nothing: either the mutated memory is written or nothing is.
///
/// A skip adds to `total_attempts` but not `completed`, which lowers the
/// rate without any extra penalty.
pub fn update_memory(
    memory: &mut QuestMemory,
    quest: &Quest,
    outcome: &QuestOutcome,
    now: DateTime<Utc>,
) {
    let domain = quest.memory_domain().to_string();

    let rate = {
        let pattern = memory.pattern_mut_or_insert(&domain, now);
        pattern.total_attempts += 1;
        pattern.last_attempt = now;

        if outcome.completed {
            pattern.completed += 1;
            if outcome.time_taken > 0.0 {
                let prev_total =
                    pattern.average_completion_time * f64::from(pattern.completed - 1);
                pattern.average_completion_time =
                    (prev_total + outcome.time_taken) / f64::from(pattern.completed);
            }
            pattern.preferred_time = Some(PreferredTime::from_hour(now.hour()));
        }

        pattern.rate = if pattern.total_attempts == 0 {
            0.0
        } else {
            f64::from(pattern.completed) / f64::from(pattern.total_attempts)
        };
        pattern.rate
    };

    if outcome.completed {
        memory.add_completed_theme(&quest.title);
        if outcome.time_taken > 0.0 {
            let total_completed: u32 =
                memory.success_patterns.iter().map(|p| p.completed).sum();
            let prev_total =
                memory.average_completion_time * f64::from(total_completed.saturating_sub(1));
            memory.average_completion_time =
                (prev_total + outcome.time_taken) / f64::from(total_completed.max(1));
        }
    } else if outcome.skipped {
        memory.add_avoided_theme(&quest.title);
    }

    memory.push_recent(CompletionRecord {
        quest_id: quest.id.clone(),
        domain: domain.clone(),
        difficulty: quest.difficulty,
        completed_at: outcome.completed.then_some(now),
        time_taken: outcome.time_taken,
        skipped: outcome.skipped,
    });

    if outcome.completed && rate > 0.8 {
        memory.push_note(AdaptationNote {
            note: format!(
                "Strong performance in {domain} ({}% success rate)",
                (rate * 100.0).round()
            ),
            kind: NoteKind::Success,
            created_at: now,
        });
    } else if outcome.skipped {
        memory.push_note(AdaptationNote {
            note: format!(
                "Skipped {domain} quest ({:?} difficulty). Consider easier alternatives.",
                quest.difficulty
            ),
            kind: NoteKind::Skip,
            created_at: now,
        });
    }
}
