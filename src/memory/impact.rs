//! Impact scoring for ranking a user's active quests.

use tracing::debug;

use crate::quest::Quest;

use super::QuestMemory;

/// How many recent completions count for the freshness bonus.
const FRESHNESS_WINDOW: usize = 5;

/// How many non-skipped domain completions count for momentum.
const MOMENTUM_WINDOW: usize = 7;

/// Completions within the momentum window needed for the bonus.
const MOMENTUM_THRESHOLD: usize = 3;

/// Computes the priority score for one candidate quest.
///
/// Additive bonuses: proven domain (+30), freshness (+20), momentum
/// (+25), difficulty match (+15), time feasibility (+10). The sum is
/// deliberately left unclamped; scores only rank a single user's
/// candidates against each other, so absolute magnitude carries no
/// meaning.
#[must_use]
pub fn impact_score(quest: &Quest, memory: &QuestMemory) -> i64 {
    let domain = quest.memory_domain();
    let mut score = 0i64;

    // Alignment with a domain the user already succeeds in.
    if memory.pattern(domain).is_some_and(|p| p.rate > 0.7) {
        score += 30;
    }

    // Freshness: the domain is absent from the latest completions.
    let recently_done = memory
        .recent_completions
        .iter()
        .take(FRESHNESS_WINDOW)
        .any(|c| c.domain == domain);
    if !recently_done {
        score += 20;
    }

    // Momentum: an active run of real completions in this domain.
    let momentum = memory
        .recent_completions
        .iter()
        .filter(|c| c.domain == domain && !c.skipped)
        .take(MOMENTUM_WINDOW)
        .count();
    if momentum >= MOMENTUM_THRESHOLD {
        score += 25;
    }

    // Difficulty the user tends to finish.
    if quest.difficulty == memory.preferred_difficulty {
        score += 15;
    }

    // Fits inside the user's typical completion time.
    let requested_minutes = quest
        .user_inputs
        .as_ref()
        .and_then(|inputs| inputs.time_available)
        .unwrap_or(30.0);
    if requested_minutes <= memory.average_completion_time {
        score += 10;
    }

    debug!(quest_id = %quest.id, domain, score, "scored candidate quest");
    score
}

/// Picks the main quest among active candidates.
///
/// `quests` must be ordered most-recently-created first; ties keep the
/// earliest slice entry, which makes the newest quest win. Returns the
/// winning index and its score, or `None` when no quest is active.
#[must_use]
pub fn select_main_quest(quests: &[Quest], memory: &QuestMemory) -> Option<(usize, i64)> {
    let mut best: Option<(usize, i64)> = None;
    for (idx, quest) in quests.iter().enumerate() {
        if !quest.is_active() {
            continue;
        }
        let score = impact_score(quest, memory);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((idx, score)),
        }
    }
    best
}
