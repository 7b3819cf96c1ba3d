//! Read-only behavioral insights derived from quest memory.

use serde::{Deserialize, Serialize};

use crate::user::User;

/// Maximum insights returned per call.
const INSIGHT_CAP: usize = 3;

/// Attempts needed before a domain can yield a strength insight.
const STRENGTH_MIN_ATTEMPTS: u32 = 5;

/// Attempts needed before a domain can yield an opportunity insight.
const OPPORTUNITY_MIN_ATTEMPTS: u32 = 3;

/// What an insight is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    /// The user is consistently strong here.
    Strength,
    /// Something the user could change or try.
    Opportunity,
    /// An observed behavioral pattern.
    Pattern,
}

/// One human-readable behavioral observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    /// What kind of observation this is.
    pub kind: InsightKind,
    /// The observation itself.
    pub message: String,
    /// A suggested next step.
    pub action: String,
    /// The domain the observation is about, when there is one.
    #[serde(default)]
    pub domain: Option<String>,
}

/// Derives at most three insights from the user's memory.
///
/// Scanning order is fixed and doubles as priority: domain strengths
/// and struggles first (pattern-map insertion order), then the short-
/// quest time pattern, then the first unexplored onboarding category.
/// The cap is applied after all steps, so earlier steps win.
#[must_use]
pub fn insights(user: &User) -> Vec<Insight> {
    let memory = &user.quest_memory;
    let mut found = Vec::new();

    // 1. High- and low-performing domains.
    for pattern in &memory.success_patterns {
        if pattern.rate > 0.8 && pattern.total_attempts >= STRENGTH_MIN_ATTEMPTS {
            found.push(Insight {
                kind: InsightKind::Strength,
                message: format!(
                    "Your {} consistency is incredible! {}% success rate",
                    pattern.domain,
                    (pattern.rate * 100.0).round()
                ),
                action: "Keep that momentum going 💪".into(),
                domain: Some(pattern.domain.clone()),
            });
        } else if pattern.rate < 0.5 && pattern.total_attempts >= OPPORTUNITY_MIN_ATTEMPTS {
            found.push(Insight {
                kind: InsightKind::Opportunity,
                message: format!(
                    "{} quests seem challenging ({}% completion)",
                    pattern.domain,
                    (pattern.rate * 100.0).round()
                ),
                action: "Try easier difficulty or shorter time frames".into(),
                domain: Some(pattern.domain.clone()),
            });
        }
    }

    // 2. Short-quest time pattern over the ten most recent outcomes.
    let recent: Vec<_> = memory.recent_completions.iter().take(10).collect();
    if !recent.is_empty() {
        #[allow(clippy::cast_precision_loss)]
        let len = recent.len() as f64;
        let avg: f64 = recent.iter().map(|c| c.time_taken).sum::<f64>() / len;
        if avg > 0.0 && avg < 30.0 {
            let short = recent.iter().filter(|c| c.time_taken < 30.0).count();
            #[allow(clippy::cast_precision_loss)]
            let percent = (short as f64 / len * 100.0).round();
            found.push(Insight {
                kind: InsightKind::Pattern,
                message: format!("You complete {percent}% of quests under 30 minutes"),
                action: "Focus on shorter, high-impact tasks".into(),
                domain: None,
            });
        }
    }

    // 3. First onboarding category with no pattern yet.
    let unexplored = user
        .onboarding
        .goal_categories
        .iter()
        .find(|category| memory.pattern(category).is_none());
    if let Some(category) = unexplored {
        found.push(Insight {
            kind: InsightKind::Opportunity,
            message: format!("You haven't tried {category} quests yet"),
            action: "Ready to explore something new?".into(),
            domain: Some(category.clone()),
        });
    }

    found.truncate(INSIGHT_CAP);
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{CompletionRecord, QuestMemory};
    use crate::quest::Difficulty;
    use crate::user::OnboardingSettings;
    use chrono::{TimeZone, Utc};

    fn user_with_memory(memory: QuestMemory, categories: &[&str]) -> User {
        let mut user = User::new(
            "u-1".into(),
            "Robin".into(),
            OnboardingSettings {
                goal_categories: categories.iter().map(|c| (*c).to_string()).collect(),
                ..OnboardingSettings::default()
            },
            Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap(),
        );
        user.quest_memory = memory;
        user
    }

    fn memory_with_pattern(domain: &str, attempts: u32, completed: u32) -> QuestMemory {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
        let mut memory = QuestMemory::default();
        let pattern = memory.pattern_mut_or_insert(domain, now);
        pattern.total_attempts = attempts;
        pattern.completed = completed;
        pattern.rate = f64::from(completed) / f64::from(attempts);
        memory
    }

    fn short_completion(minutes: f64) -> CompletionRecord {
        CompletionRecord {
            quest_id: "q".into(),
            domain: "Fitness".into(),
            difficulty: Difficulty::Easy,
            completed_at: None,
            time_taken: minutes,
            skipped: false,
        }
    }

    #[test]
    fn strong_domain_yields_strength_insight() {
        let memory = memory_with_pattern("Fitness", 9, 8);
        let user = user_with_memory(memory, &[]);
        let result = insights(&user);
        assert!(result
            .iter()
            .any(|i| i.kind == InsightKind::Strength && i.domain.as_deref() == Some("Fitness")));
        assert!(result[0].message.contains("89%"));
    }

    #[test]
    fn struggling_domain_yields_opportunity() {
        let memory = memory_with_pattern("Career", 4, 1);
        let user = user_with_memory(memory, &[]);
        let result = insights(&user);
        assert!(result
            .iter()
            .any(|i| i.kind == InsightKind::Opportunity && i.domain.as_deref() == Some("Career")));
    }

    #[test]
    fn too_few_attempts_yield_nothing() {
        let memory = memory_with_pattern("Fitness", 4, 4);
        let user = user_with_memory(memory, &[]);
        assert!(insights(&user).is_empty());
    }

    #[test]
    fn quick_finisher_gets_time_pattern_insight() {
        let mut memory = QuestMemory::default();
        for _ in 0..6 {
            memory.push_recent(short_completion(15.0));
        }
        let user = user_with_memory(memory, &[]);
        let result = insights(&user);
        let pattern = result
            .iter()
            .find(|i| i.kind == InsightKind::Pattern)
            .expect("time pattern insight");
        assert!(pattern.message.contains("100%"));
    }

    #[test]
    fn slow_finisher_gets_no_time_pattern() {
        let mut memory = QuestMemory::default();
        for _ in 0..6 {
            memory.push_recent(short_completion(45.0));
        }
        let user = user_with_memory(memory, &[]);
        assert!(insights(&user).iter().all(|i| i.kind != InsightKind::Pattern));
    }

    #[test]
    fn first_unexplored_category_is_suggested() {
        let memory = memory_with_pattern("Fitness", 6, 5);
        let user = user_with_memory(memory, &["Fitness", "Mindfulness", "Career"]);
        let result = insights(&user);
        assert!(result
            .iter()
            .any(|i| i.domain.as_deref() == Some("Mindfulness")
                && i.message.contains("haven't tried")));
    }

    #[test]
    fn cap_is_three_and_domain_insights_win() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
        let mut memory = QuestMemory::default();
        for domain in ["Fitness", "Career", "Learning", "Health"] {
            let pattern = memory.pattern_mut_or_insert(domain, now);
            pattern.total_attempts = 6;
            pattern.completed = 6;
            pattern.rate = 1.0;
        }
        let user = user_with_memory(memory, &["Creativity"]);
        let result = insights(&user);
        assert_eq!(result.len(), 3);
        // All three slots go to step-1 domain insights, in insertion order.
        assert!(result.iter().all(|i| i.kind == InsightKind::Strength));
        assert_eq!(result[0].domain.as_deref(), Some("Fitness"));
        assert_eq!(result[2].domain.as_deref(), Some("Learning"));
    }
}
