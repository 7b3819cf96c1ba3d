//! Transient quest draft types produced by the draft source.

use serde::{Deserialize, Serialize};

/// Quest difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    /// Low effort, quick wins.
    Easy,
    /// The default tier.
    Medium,
    /// Demanding, high-reward.
    Hard,
}

impl Difficulty {
    /// XP multiplier applied to the quest-type base reward.
    #[must_use]
    pub fn multiplier(self) -> f64 {
        match self {
            Self::Easy => 1.0,
            Self::Medium => 1.5,
            Self::Hard => 2.0,
        }
    }

    /// One tier easier, saturating at `Easy`.
    #[must_use]
    pub fn step_down(self) -> Self {
        match self {
            Self::Hard => Self::Medium,
            Self::Medium | Self::Easy => Self::Easy,
        }
    }
}

/// Energy a quest demands, or a user reports having.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnergyLevel {
    /// Tired, low-focus.
    Low,
    /// Normal.
    Medium,
    /// Fully charged.
    High,
}

impl EnergyLevel {
    /// Numeric rank used for mismatch comparisons (Low=1 .. High=3).
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}

/// Quest timeframe, which sets the base XP reward and the deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestType {
    /// Due by the end of today.
    Daily,
    /// A seven-day arc.
    Weekly,
    /// A thirty-day arc.
    Monthly,
    /// A year-long commitment.
    Yearly,
}

impl QuestType {
    /// Base XP awarded on completion, before the difficulty multiplier.
    #[must_use]
    pub fn base_xp(self) -> u32 {
        match self {
            Self::Daily => 50,
            Self::Weekly => 200,
            Self::Monthly => 800,
            Self::Yearly => 5000,
        }
    }
}

/// Concrete deliverable kinds a quest can produce.
///
/// A quest with neither an output type nor a free-text deliverable is
/// rejected by validation as having no verifiable outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutputType {
    /// Written note or summary.
    WrittenNote,
    /// Completed checklist.
    Checklist,
    /// Exercise set logged.
    ExerciseSet,
    /// Measurement recorded.
    MetricLogged,
    /// Decision documented.
    DecisionMade,
    /// File or document created.
    FileCreated,
    /// Working code written.
    CodeSnippet,
    /// Working demo or prototype.
    Prototype,
    /// Action plan documented.
    PlanCreated,
    /// Curated list created.
    ListCompiled,
}

impl OutputType {
    /// Human-readable description of the deliverable.
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::WrittenNote => "Written note or summary",
            Self::Checklist => "Completed checklist",
            Self::ExerciseSet => "Exercise set logged",
            Self::MetricLogged => "Measurement recorded",
            Self::DecisionMade => "Decision documented",
            Self::FileCreated => "File or document created",
            Self::CodeSnippet => "Working code written",
            Self::Prototype => "Working demo or prototype",
            Self::PlanCreated => "Action plan documented",
            Self::ListCompiled => "Curated list created",
        }
    }
}

/// A single task inside a quest draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDraft {
    /// Short imperative title.
    pub title: String,
    /// What doing the task looks like.
    pub description: String,
    /// Estimated minutes to complete.
    pub estimated_minutes: f64,
}

/// The user inputs a quest was generated from, kept for later scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserInputs {
    /// The goal as the user stated it.
    #[serde(default)]
    pub specific_goal: String,
    /// Minutes the user said they had available.
    #[serde(default)]
    pub time_available: Option<f64>,
    /// Free-text constraints.
    #[serde(default)]
    pub constraints: String,
    /// Free-text preferences.
    #[serde(default)]
    pub preferences: String,
}

/// An unvalidated quest proposal.
///
/// Created by the draft source, annotated by the validator and rescoper,
/// then either discarded or promoted to a persisted [`super::Quest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestDraft {
    /// Quest title.
    pub title: String,
    /// Why this quest matters.
    pub description: String,
    /// Category label (always set; mirrors `domain` for generated quests).
    pub category: String,
    /// Life-area domain, when the draft was generated for one.
    #[serde(default)]
    pub domain: Option<String>,
    /// Difficulty tier.
    pub difficulty: Difficulty,
    /// Ordered task list.
    pub tasks: Vec<TaskDraft>,
    /// What "done" looks like, objectively.
    #[serde(default)]
    pub success_criteria: Vec<String>,
    /// Concrete deliverable kind, when one was identified.
    #[serde(default)]
    pub output_type: Option<OutputType>,
    /// Free-text deliverable description.
    #[serde(default)]
    pub deliverable: Option<String>,
    /// Energy the quest demands.
    pub energy_required: EnergyLevel,
    /// Whole-quest time estimate, used when tasks carry no estimates.
    #[serde(default)]
    pub estimated_minutes: Option<f64>,
    /// Why the backend generated this quest.
    #[serde(default)]
    pub reasoning: Option<String>,
    /// The inputs the draft was generated from.
    #[serde(default)]
    pub user_inputs: Option<UserInputs>,
}

impl QuestDraft {
    /// Total estimated minutes: the task sum, falling back to the
    /// whole-quest estimate, falling back to zero.
    #[must_use]
    pub fn total_estimated_minutes(&self) -> f64 {
        let task_sum: f64 = self.tasks.iter().map(|t| t.estimated_minutes).sum();
        if task_sum > 0.0 {
            task_sum
        } else {
            self.estimated_minutes.unwrap_or(0.0)
        }
    }

    /// Lowercased concatenation of title, description, and task titles,
    /// scanned by the vague-language and domain-contamination checks.
    #[must_use]
    pub fn combined_text(&self) -> String {
        let mut text = format!("{} {}", self.title, self.description);
        for task in &self.tasks {
            text.push(' ');
            text.push_str(&task.title);
        }
        text.to_lowercase()
    }

    /// Whether the draft names a concrete output (type or deliverable).
    #[must_use]
    pub fn has_concrete_output(&self) -> bool {
        self.output_type.is_some() || self.deliverable.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft_with_tasks(estimates: &[f64]) -> QuestDraft {
        QuestDraft {
            title: "Morning routine".into(),
            description: "Start the day deliberately".into(),
            category: "Personal Development".into(),
            domain: Some("Personal Development".into()),
            difficulty: Difficulty::Medium,
            tasks: estimates
                .iter()
                .enumerate()
                .map(|(i, &m)| TaskDraft {
                    title: format!("Step {i}"),
                    description: String::new(),
                    estimated_minutes: m,
                })
                .collect(),
            success_criteria: vec![],
            output_type: None,
            deliverable: None,
            energy_required: EnergyLevel::Medium,
            estimated_minutes: Some(45.0),
            reasoning: None,
            user_inputs: None,
        }
    }

    #[test]
    fn task_sum_wins_over_whole_quest_estimate() {
        let draft = draft_with_tasks(&[10.0, 20.0]);
        assert!((draft.total_estimated_minutes() - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn falls_back_to_whole_quest_estimate_when_tasks_carry_none() {
        let draft = draft_with_tasks(&[]);
        assert!((draft.total_estimated_minutes() - 45.0).abs() < f64::EPSILON);
    }

    #[test]
    fn combined_text_is_lowercased_and_includes_task_titles() {
        let draft = draft_with_tasks(&[10.0]);
        let text = draft.combined_text();
        assert!(text.contains("morning routine"));
        assert!(text.contains("step 0"));
        assert_eq!(text, text.to_lowercase());
    }

    #[test]
    fn difficulty_steps_down_and_saturates() {
        assert_eq!(Difficulty::Hard.step_down(), Difficulty::Medium);
        assert_eq!(Difficulty::Medium.step_down(), Difficulty::Easy);
        assert_eq!(Difficulty::Easy.step_down(), Difficulty::Easy);
    }

    #[test]
    fn output_type_serializes_as_screaming_snake_case() {
        let json = serde_json::to_string(&OutputType::WrittenNote).unwrap();
        assert_eq!(json, "\"WRITTEN_NOTE\"");
    }

    #[test]
    fn energy_ranks_are_ordered() {
        assert!(EnergyLevel::Low.rank() < EnergyLevel::Medium.rank());
        assert!(EnergyLevel::Medium.rank() < EnergyLevel::High.rank());
    }
}
