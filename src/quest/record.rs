//! Persisted quest record and its derived fields.

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::validate::Issue;

use super::draft::{
    Difficulty, EnergyLevel, OutputType, QuestDraft, QuestType, TaskDraft, UserInputs,
};

/// Lifecycle state of a persisted quest.
///
/// Transitions are monotonic `Pending -> InProgress -> Completed`;
/// `Failed` is reachable only through an explicit skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestStatus {
    /// Created, no task touched yet.
    Pending,
    /// At least one task completed.
    InProgress,
    /// All tasks done, or completed wholesale.
    Completed,
    /// Skipped by the user.
    Failed,
}

/// A task inside a persisted quest, with completion tracking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Short imperative title.
    pub title: String,
    /// What doing the task looks like.
    pub description: String,
    /// Estimated minutes to complete.
    pub estimated_minutes: f64,
    /// Whether the task has been checked off.
    #[serde(default)]
    pub completed: bool,
    /// When the task was checked off.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<TaskDraft> for TaskRecord {
    fn from(task: TaskDraft) -> Self {
        Self {
            title: task.title,
            description: task.description,
            estimated_minutes: task.estimated_minutes,
            completed: false,
            completed_at: None,
        }
    }
}

/// Validation outcome embedded in the quest at promotion time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// Whether the draft passed validation (possibly after rescoping).
    pub validated: bool,
    /// Final validation score, 0-100.
    pub score: i32,
    /// Issues found on the draft that was promoted.
    #[serde(default)]
    pub issues: Vec<Issue>,
    /// Whether the rescoper modified the draft before promotion.
    #[serde(default)]
    pub auto_rescoped: bool,
    /// Human-readable descriptions of what the rescoper changed.
    #[serde(default)]
    pub rescope_changes: Vec<String>,
}

/// Skip metadata recorded when a user skips a quest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipMetadata {
    /// Whether the quest was skipped.
    pub skipped: bool,
    /// The user's stated reason, if any.
    #[serde(default)]
    pub skip_reason: Option<String>,
}

/// Intent-mapping metadata maintained by main-quest selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentMetadata {
    /// Impact score at the last selection pass.
    #[serde(default)]
    pub impact_score: Option<i64>,
    /// Whether this quest is the current main quest.
    #[serde(default)]
    pub is_main_quest: bool,
}

/// The durable quest record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    /// Unique quest ID.
    pub id: String,
    /// Owning user's ID.
    pub user_id: String,
    /// Timeframe the quest was generated for.
    pub quest_type: QuestType,
    /// Quest title.
    pub title: String,
    /// Why this quest matters.
    pub description: String,
    /// Category label.
    pub category: String,
    /// Life-area domain, when generated for one.
    #[serde(default)]
    pub domain: Option<String>,
    /// Difficulty tier.
    pub difficulty: Difficulty,
    /// Ordered task list with completion state.
    pub tasks: Vec<TaskRecord>,
    /// What "done" looks like.
    #[serde(default)]
    pub success_criteria: Vec<String>,
    /// Concrete deliverable kind.
    #[serde(default)]
    pub output_type: Option<OutputType>,
    /// Free-text deliverable description.
    #[serde(default)]
    pub deliverable: Option<String>,
    /// Energy the quest demands.
    pub energy_required: EnergyLevel,
    /// Whole-quest time estimate in minutes.
    #[serde(default)]
    pub estimated_minutes: Option<f64>,
    /// Why the backend generated this quest.
    #[serde(default)]
    pub reasoning: Option<String>,
    /// The inputs the quest was generated from.
    #[serde(default)]
    pub user_inputs: Option<UserInputs>,
    /// Lifecycle state.
    pub status: QuestStatus,
    /// Completion percentage derived from the task ratio.
    pub progress: u8,
    /// XP awarded on completion.
    pub xp_reward: u32,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Deadline derived from the quest type.
    pub end_date: DateTime<Utc>,
    /// Completion time, once completed.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Embedded validation outcome.
    #[serde(default)]
    pub validation: ValidationOutcome,
    /// Skip metadata.
    #[serde(default)]
    pub skip: SkipMetadata,
    /// Intent-mapping metadata.
    #[serde(default)]
    pub intent: IntentMetadata,
}

/// XP reward for a quest: type base times difficulty multiplier, floored.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn xp_reward(quest_type: QuestType, difficulty: Difficulty) -> u32 {
    (f64::from(quest_type.base_xp()) * difficulty.multiplier()).floor() as u32
}

/// Deadline for a quest created at `now`: end of day for daily quests,
/// otherwise the start time shifted by the quest-type span.
#[must_use]
pub fn end_date(quest_type: QuestType, now: DateTime<Utc>) -> DateTime<Utc> {
    match quest_type {
        QuestType::Daily => now
            .date_naive()
            .and_hms_milli_opt(23, 59, 59, 999)
            .map_or(now, |t| t.and_utc()),
        QuestType::Weekly => now + Duration::days(7),
        QuestType::Monthly => now.checked_add_months(Months::new(1)).unwrap_or(now),
        QuestType::Yearly => now.checked_add_months(Months::new(12)).unwrap_or(now),
    }
}

impl Quest {
    /// Promotes a validated (or rescoped) draft to a persisted quest.
    #[must_use]
    pub fn from_draft(
        id: String,
        user_id: String,
        quest_type: QuestType,
        draft: QuestDraft,
        validation: ValidationOutcome,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            quest_type,
            title: draft.title,
            description: draft.description,
            category: draft.category,
            domain: draft.domain,
            difficulty: draft.difficulty,
            tasks: draft.tasks.into_iter().map(TaskRecord::from).collect(),
            success_criteria: draft.success_criteria,
            output_type: draft.output_type,
            deliverable: draft.deliverable,
            energy_required: draft.energy_required,
            estimated_minutes: draft.estimated_minutes,
            reasoning: draft.reasoning,
            user_inputs: draft.user_inputs,
            status: QuestStatus::Pending,
            progress: 0,
            xp_reward: xp_reward(quest_type, draft.difficulty),
            created_at: now,
            end_date: end_date(quest_type, now),
            completed_at: None,
            validation,
            skip: SkipMetadata::default(),
            intent: IntentMetadata::default(),
        }
    }

    /// The domain used for memory bucketing: `domain`, else `category`.
    #[must_use]
    pub fn memory_domain(&self) -> &str {
        self.domain.as_deref().unwrap_or(&self.category)
    }

    /// Whether the quest still counts as active for main-quest selection.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.status, QuestStatus::Pending | QuestStatus::InProgress)
    }

    /// Checks a task on or off. Returns `false` if the index is out of range.
    pub fn set_task_completed(&mut self, index: usize, completed: bool, now: DateTime<Utc>) -> bool {
        let Some(task) = self.tasks.get_mut(index) else {
            return false;
        };
        task.completed = completed;
        task.completed_at = completed.then_some(now);
        true
    }

    /// Recomputes `progress` from the task completion ratio and applies
    /// the monotonic status transitions.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn update_progress(&mut self, now: DateTime<Utc>) {
        if self.tasks.is_empty() {
            self.progress = 0;
        } else {
            let done = self.tasks.iter().filter(|t| t.completed).count();
            #[allow(clippy::cast_precision_loss)]
            let ratio = done as f64 / self.tasks.len() as f64;
            self.progress = (ratio * 100.0).round() as u8;
        }

        if self.progress == 100 && self.status != QuestStatus::Completed {
            self.status = QuestStatus::Completed;
            self.completed_at = Some(now);
        } else if self.progress > 0 && self.status == QuestStatus::Pending {
            self.status = QuestStatus::InProgress;
        }
    }

    /// Marks the whole quest completed: every task checked, progress 100.
    pub fn mark_completed(&mut self, now: DateTime<Utc>) {
        for task in &mut self.tasks {
            task.completed = true;
            task.completed_at = Some(now);
        }
        self.progress = 100;
        self.status = QuestStatus::Completed;
        self.completed_at = Some(now);
    }

    /// Marks the quest skipped: status `Failed` plus skip metadata.
    pub fn mark_skipped(&mut self, reason: Option<String>) {
        self.status = QuestStatus::Failed;
        self.skip = SkipMetadata { skipped: true, skip_reason: reason };
    }
}
