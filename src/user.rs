//! The persisted user record: identity, onboarding, stats, quest memory.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::memory::QuestMemory;
use crate::quest::Difficulty;

/// How much time the user committed to per quest during onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeCommitment {
    /// Fifteen minutes.
    #[serde(rename = "15min")]
    FifteenMinutes,
    /// Half an hour.
    #[serde(rename = "30min")]
    ThirtyMinutes,
    /// One hour.
    #[serde(rename = "1hour")]
    OneHour,
    /// Two hours.
    #[serde(rename = "2hours")]
    TwoHours,
    /// No fixed commitment.
    Flexible,
}

impl TimeCommitment {
    /// Minutes this commitment translates to for drafting.
    #[must_use]
    pub fn minutes(self) -> f64 {
        match self {
            Self::FifteenMinutes => 15.0,
            Self::ThirtyMinutes => 30.0,
            Self::OneHour => 60.0,
            Self::TwoHours => 120.0,
            Self::Flexible => 45.0,
        }
    }
}

/// Goal preferences captured during onboarding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnboardingSettings {
    /// Life-area categories the user wants quests in, in stated order.
    #[serde(default)]
    pub goal_categories: Vec<String>,
    /// Preferred difficulty tier.
    pub difficulty_level: Difficulty,
    /// Time budget per quest.
    pub time_commitment: TimeCommitment,
}

impl Default for OnboardingSettings {
    fn default() -> Self {
        Self {
            goal_categories: Vec::new(),
            difficulty_level: Difficulty::Medium,
            time_commitment: TimeCommitment::ThirtyMinutes,
        }
    }
}

/// Progress counters: XP, level, streaks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    /// Lifetime completed quest count.
    pub total_quests_completed: u32,
    /// Consecutive days with at least one completion.
    pub current_streak: u32,
    /// Best streak ever reached.
    pub longest_streak: u32,
    /// Current level, derived from XP.
    pub level: u32,
    /// Accumulated experience points.
    pub xp: u32,
    /// When the user last completed a quest.
    #[serde(default)]
    pub last_quest_completed_date: Option<DateTime<Utc>>,
}

impl UserStats {
    /// Applies a quest completion: XP, level, and the day streak.
    ///
    /// A second completion on the same day leaves the streak unchanged;
    /// a completion the day after the last one extends it; anything
    /// else resets it to one.
    pub fn apply_completion(&mut self, xp_reward: u32, now: DateTime<Utc>) {
        self.total_quests_completed += 1;
        self.xp += xp_reward;
        self.level = self.xp / 1000 + 1;

        let today = now.date_naive();
        let last_day = self.last_quest_completed_date.map(|d| d.date_naive());
        let yesterday = (now - Duration::days(1)).date_naive();

        if last_day == Some(today) {
            // Streak already counted today.
        } else if last_day == Some(yesterday) {
            self.current_streak += 1;
        } else {
            self.current_streak = 1;
        }

        if self.current_streak > self.longest_streak {
            self.longest_streak = self.current_streak;
        }
        self.last_quest_completed_date = Some(now);
    }
}

/// The durable user document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Onboarding preferences.
    #[serde(default)]
    pub onboarding: OnboardingSettings,
    /// Progress counters.
    #[serde(default)]
    pub stats: UserStats,
    /// Behavioral quest memory.
    #[serde(default)]
    pub quest_memory: QuestMemory,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a fresh user with empty memory and zeroed stats.
    #[must_use]
    pub fn new(id: String, name: String, onboarding: OnboardingSettings, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            onboarding,
            stats: UserStats::default(),
            quest_memory: QuestMemory::default(),
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn first_completion_starts_streak_and_levels_up_from_zero() {
        let mut stats = UserStats::default();
        stats.apply_completion(75, at(1, 9));
        assert_eq!(stats.total_quests_completed, 1);
        assert_eq!(stats.xp, 75);
        assert_eq!(stats.level, 1);
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.longest_streak, 1);
    }

    #[test]
    fn next_day_completion_extends_streak() {
        let mut stats = UserStats::default();
        stats.apply_completion(50, at(1, 9));
        stats.apply_completion(50, at(2, 9));
        stats.apply_completion(50, at(3, 9));
        assert_eq!(stats.current_streak, 3);
        assert_eq!(stats.longest_streak, 3);
    }

    #[test]
    fn same_day_completion_does_not_double_count() {
        let mut stats = UserStats::default();
        stats.apply_completion(50, at(1, 9));
        stats.apply_completion(50, at(1, 20));
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.total_quests_completed, 2);
    }

    #[test]
    fn missed_day_resets_streak_but_keeps_longest() {
        let mut stats = UserStats::default();
        stats.apply_completion(50, at(1, 9));
        stats.apply_completion(50, at(2, 9));
        stats.apply_completion(50, at(5, 9));
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.longest_streak, 2);
    }

    #[test]
    fn level_crosses_thresholds_every_thousand_xp() {
        let mut stats = UserStats::default();
        stats.apply_completion(999, at(1, 9));
        assert_eq!(stats.level, 1);
        stats.apply_completion(1, at(2, 9));
        assert_eq!(stats.level, 2);
    }

    #[test]
    fn time_commitment_minutes_cover_all_variants() {
        assert!((TimeCommitment::FifteenMinutes.minutes() - 15.0).abs() < f64::EPSILON);
        assert!((TimeCommitment::Flexible.minutes() - 45.0).abs() < f64::EPSILON);
    }

    #[test]
    fn time_commitment_serializes_with_original_labels() {
        assert_eq!(
            serde_json::to_string(&TimeCommitment::ThirtyMinutes).unwrap(),
            "\"30min\""
        );
        assert_eq!(serde_json::to_string(&TimeCommitment::Flexible).unwrap(), "\"Flexible\"");
    }
}
