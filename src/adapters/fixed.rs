//! Deterministic adapters for tests and scripted runs.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::ports::clock::Clock;
use crate::ports::draft::{DraftFuture, DraftRequest, DraftSource};
use crate::ports::id_gen::IdGenerator;
use crate::ports::rng::Randomness;
use crate::quest::QuestDraft;

/// Clock pinned to a preset instant.
pub struct FixedClock {
    instant: DateTime<Utc>,
}

impl FixedClock {
    /// Creates a clock that always reports `instant`.
    #[must_use]
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
    }
}

/// ID generator producing `prefix-1`, `prefix-2`, ...
pub struct SeqIdGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl SeqIdGenerator {
    /// Creates a sequential generator with the given prefix.
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        Self { prefix: prefix.to_string(), counter: AtomicU64::new(0) }
    }
}

impl IdGenerator for SeqIdGenerator {
    fn generate_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}-{n}", self.prefix)
    }
}

/// Randomness pinned to one index (modulo the requested length).
pub struct FixedRandomness {
    index: usize,
}

impl FixedRandomness {
    /// Creates a source that always picks `index % len`.
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self { index }
    }
}

impl Randomness for FixedRandomness {
    fn pick(&self, len: usize) -> usize {
        if len == 0 {
            0
        } else {
            self.index % len
        }
    }
}

/// Draft source that replays a scripted queue of responses.
///
/// Each call pops the front entry; an exhausted queue fails, which is
/// also how tests exercise the fallback-draft path.
pub struct ScriptedDraftSource {
    responses: Mutex<VecDeque<Result<QuestDraft, String>>>,
}

impl ScriptedDraftSource {
    /// Creates a source that will serve the given responses in order.
    #[must_use]
    pub fn new(responses: Vec<Result<QuestDraft, String>>) -> Self {
        Self { responses: Mutex::new(responses.into_iter().collect()) }
    }

    /// Convenience: a source that always fails.
    #[must_use]
    pub fn failing() -> Self {
        Self::new(Vec::new())
    }
}

impl DraftSource for ScriptedDraftSource {
    fn draft(&self, _request: &DraftRequest) -> DraftFuture<'_> {
        let next = self
            .responses
            .lock()
            .map_or(None, |mut queue| queue.pop_front());
        Box::pin(async move {
            match next {
                Some(Ok(draft)) => Ok(draft),
                Some(Err(message)) => Err(message.into()),
                None => Err("scripted draft source exhausted".into()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fixed_clock_reports_the_pinned_instant() {
        let instant = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let clock = FixedClock::new(instant);
        assert_eq!(clock.now(), instant);
        assert_eq!(clock.now(), instant);
    }

    #[test]
    fn seq_ids_count_up_from_one() {
        let ids = SeqIdGenerator::new("quest");
        assert_eq!(ids.generate_id(), "quest-1");
        assert_eq!(ids.generate_id(), "quest-2");
    }

    #[test]
    fn fixed_randomness_wraps_around() {
        let rng = FixedRandomness::new(4);
        assert_eq!(rng.pick(3), 1);
        assert_eq!(rng.pick(5), 4);
        assert_eq!(rng.pick(0), 0);
    }

    #[tokio::test]
    async fn scripted_source_serves_in_order_then_fails() {
        use crate::quest::{Difficulty, EnergyLevel, QuestType};

        let draft = QuestDraft {
            title: "Scripted".into(),
            description: "From the queue".into(),
            category: "Fitness".into(),
            domain: Some("Fitness".into()),
            difficulty: Difficulty::Easy,
            tasks: vec![],
            success_criteria: vec![],
            output_type: None,
            deliverable: None,
            energy_required: EnergyLevel::Low,
            estimated_minutes: None,
            reasoning: None,
            user_inputs: None,
        };
        let source = ScriptedDraftSource::new(vec![Ok(draft.clone()), Err("down".into())]);
        let request = DraftRequest {
            domain: "Fitness".into(),
            specific_goal: "run".into(),
            difficulty: Difficulty::Easy,
            time_available: 30.0,
            constraints: String::new(),
            preferences: String::new(),
            quest_type: QuestType::Daily,
            user_level: 1,
        };

        assert_eq!(source.draft(&request).await.unwrap().title, "Scripted");
        assert!(source.draft(&request).await.is_err());
        assert!(source.draft(&request).await.is_err());
    }
}
