//! Orchestration of the quest lifecycle.
//!
//! Wires the ports together and exposes the engine operations: generate
//! and validate a quest, record completions and skips, pick the main
//! quest, and derive insights. Each operation is one synchronous unit of
//! work; the only awaited call is the external draft source.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::EngineError;
use crate::memory::impact::select_main_quest;
use crate::memory::insights::{insights, Insight};
use crate::memory::update::{update_memory, QuestOutcome};
use crate::ports::{Clock, DocumentStore, DraftRequest, DraftSource, IdGenerator, Randomness};
use crate::quest::{
    Difficulty, EnergyLevel, Quest, QuestDraft, QuestType, TaskDraft, ValidationOutcome,
};
use crate::store::{QuestStore, UserStore};
use crate::user::{OnboardingSettings, User};
use crate::validate::alternative::{suggest_alternative, Alternative};
use crate::validate::rescope::rescope;
use crate::validate::{validate, Issue, IssueType, UserContext, ValidationResult};

/// Encouragement lines offered with a gentler alternative after a skip.
const ENCOURAGEMENTS: [&str; 3] = [
    "This is a gentler start. You got this! 💪",
    "Smaller steps, same direction 🚀",
    "Progress over perfection ✨",
];

/// Inputs for generating a quest.
#[derive(Debug, Clone)]
pub struct GenerateInputs {
    /// Domain to generate in.
    pub domain: String,
    /// The user's stated goal.
    pub specific_goal: String,
    /// Requested difficulty.
    pub difficulty: Difficulty,
    /// Minutes available.
    pub time_available: f64,
    /// Reported energy level, if any.
    pub energy_level: Option<EnergyLevel>,
    /// Free-text constraints.
    pub constraints: String,
    /// Free-text preferences.
    pub preferences: String,
    /// Quest timeframe.
    pub quest_type: QuestType,
}

/// Result of a generation attempt.
#[derive(Debug, Clone)]
pub enum GenerationOutcome {
    /// The draft passed validation (possibly after rescoping) and was
    /// persisted.
    Accepted(Box<Quest>),
    /// The draft had blockers no automatic repair could clear. Nothing
    /// was persisted; this is an expected outcome, not a fault.
    Rejected {
        /// The issues found on the draft.
        issues: Vec<Issue>,
        /// Remediation options for the user.
        alternative: Alternative,
    },
}

/// What a completion returns: the updated quest plus fresh insights.
#[derive(Debug, Clone)]
pub struct CompletionReport {
    /// The completed quest as persisted.
    pub quest: Quest,
    /// Insights derived from the updated memory.
    pub insights: Vec<Insight>,
}

/// A gentler follow-up offered after a skip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GentlerAlternative {
    /// One tier easier than the skipped quest.
    pub difficulty: Difficulty,
    /// Multiplier to apply to the time budget.
    pub time_reduction: f64,
    /// Whether tasks should also be simplified.
    pub task_simplification: bool,
    /// One of three fixed encouragement lines.
    pub encouragement: String,
}

/// What a skip returns: the failed quest plus a gentler suggestion.
#[derive(Debug, Clone)]
pub struct SkipReport {
    /// The skipped quest as persisted.
    pub quest: Quest,
    /// The gentler follow-up suggestion.
    pub suggestion: GentlerAlternative,
}

/// The quest engine, bundling all port implementations.
pub struct Engine {
    clock: Box<dyn Clock>,
    id_gen: Box<dyn IdGenerator>,
    rng: Box<dyn Randomness>,
    draft_source: Box<dyn DraftSource>,
    store: Box<dyn DocumentStore>,
}

impl Engine {
    /// Creates an engine over explicit port implementations.
    #[must_use]
    pub fn new(
        clock: Box<dyn Clock>,
        id_gen: Box<dyn IdGenerator>,
        rng: Box<dyn Randomness>,
        draft_source: Box<dyn DraftSource>,
        store: Box<dyn DocumentStore>,
    ) -> Self {
        Self { clock, id_gen, rng, draft_source, store }
    }

    /// Creates an engine with live adapters for the given configuration.
    #[must_use]
    pub fn live(config: &Config) -> Self {
        use crate::adapters::live::clock::LiveClock;
        use crate::adapters::live::draft::GeminiDraftSource;
        use crate::adapters::live::id_gen::LiveIdGenerator;
        use crate::adapters::live::rng::LiveRandomness;
        use crate::adapters::live::store::FsDocStore;

        Self {
            clock: Box::new(LiveClock),
            id_gen: Box::new(LiveIdGenerator),
            rng: Box::new(LiveRandomness),
            draft_source: Box::new(GeminiDraftSource::new(config.model.clone())),
            store: Box::new(FsDocStore::new(&config.data_dir)),
        }
    }

    fn users(&self) -> UserStore<'_> {
        UserStore::new(self.store.as_ref())
    }

    fn quests(&self) -> QuestStore<'_> {
        QuestStore::new(self.store.as_ref())
    }

    /// Creates and persists a new user.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn create_user(
        &self,
        name: &str,
        onboarding: OnboardingSettings,
    ) -> Result<User, EngineError> {
        let user = User::new(
            self.id_gen.generate_id(),
            name.to_string(),
            onboarding,
            self.clock.now(),
        );
        self.users().create(&user)?;
        info!(user_id = %user.id, "created user");
        Ok(user)
    }

    /// Loads a user by ID.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UserNotFound`] for unknown IDs.
    pub fn user(&self, user_id: &str) -> Result<User, EngineError> {
        self.users()
            .load(user_id)?
            .ok_or_else(|| EngineError::UserNotFound(user_id.to_string()))
    }

    /// Loads all quests for a user, most recently created first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn quests_for(&self, user_id: &str) -> Result<Vec<Quest>, EngineError> {
        Ok(self
            .quests()
            .list_for_user(user_id)?
            .into_iter()
            .map(|(quest, _)| quest)
            .collect())
    }

    /// Drafts, validates, and (when possible) persists a quest.
    ///
    /// Draft-source failures are recovered with a deterministic template
    /// draft, which then goes through the same validation pipeline as
    /// any other draft. A draft with blockers is auto-rescoped; if the
    /// repair does not clear every blocker, the caller gets a structured
    /// rejection with remediation options instead of a persisted quest.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown users or store failures. Validation
    /// rejection is NOT an error.
    pub async fn generate_and_validate(
        &self,
        user_id: &str,
        inputs: GenerateInputs,
    ) -> Result<GenerationOutcome, EngineError> {
        let user = self.user(user_id)?;

        let request = DraftRequest {
            domain: inputs.domain.clone(),
            specific_goal: inputs.specific_goal.clone(),
            difficulty: inputs.difficulty,
            time_available: inputs.time_available,
            constraints: inputs.constraints.clone(),
            preferences: inputs.preferences.clone(),
            quest_type: inputs.quest_type,
            user_level: user.stats.level,
        };

        let draft = match self.draft_source.draft(&request).await {
            Ok(draft) => draft,
            Err(cause) => {
                let err = EngineError::DraftUnavailable(cause.to_string());
                warn!(error = %err, "draft source failed, using template draft");
                fallback_draft(&request)
            }
        };

        let ctx = UserContext {
            time_available: Some(inputs.time_available),
            selected_domain: Some(inputs.domain.clone()),
            energy_level: inputs.energy_level,
        };

        let result = validate(&draft, &ctx);
        let (accepted_draft, outcome) = if result.is_valid() {
            let outcome = embed_validation(&result, false, Vec::new());
            (draft, outcome)
        } else {
            // Domain blockers have no unambiguous repair; their presence
            // sends the draft to the alternative suggester even when
            // other blockers were fixed.
            let unfixable = result.blockers().iter().any(|b| {
                matches!(
                    b.issue_type,
                    IssueType::DomainMismatch | IssueType::DomainContamination
                )
            });
            let repair = rescope(&draft, &result, &ctx);
            if repair.auto_fixed && !unfixable {
                info!(changes = ?repair.changes, "draft auto-rescoped");
                let revalidated = validate(&repair.rescoped, &ctx);
                let outcome = embed_validation(&revalidated, true, repair.changes);
                (repair.rescoped, outcome)
            } else {
                let alternative = suggest_alternative(&draft, &result, &ctx);
                info!(
                    blockers = result.blockers().len(),
                    "draft rejected, offering alternative"
                );
                return Ok(GenerationOutcome::Rejected { issues: result.issues, alternative });
            }
        };

        let quest = Quest::from_draft(
            self.id_gen.generate_id(),
            user_id.to_string(),
            inputs.quest_type,
            accepted_draft,
            outcome,
            self.clock.now(),
        );
        self.quests().create(&quest)?;
        info!(quest_id = %quest.id, score = quest.validation.score, "persisted quest");
        Ok(GenerationOutcome::Accepted(Box::new(quest)))
    }

    /// Marks a quest complete, updates stats and memory, returns insights.
    ///
    /// # Errors
    ///
    /// Returns `QuestNotFound`/`NotAuthorized` without mutating anything,
    /// and `ConcurrentMemoryUpdate` if the memory write keeps racing.
    pub fn record_completion(
        &self,
        user_id: &str,
        quest_id: &str,
        time_taken: f64,
    ) -> Result<CompletionReport, EngineError> {
        let (mut quest, revision) = self.owned_quest(user_id, quest_id)?;
        let now = self.clock.now();

        quest.mark_completed(now);
        self.quests().save(&quest, revision)?;

        let xp = quest.xp_reward;
        let outcome = QuestOutcome::completed(time_taken);
        let user = self.users().update(user_id, |user| {
            user.stats.apply_completion(xp, now);
            update_memory(&mut user.quest_memory, &quest, &outcome, now);
        })?;
        info!(quest_id, xp, streak = user.stats.current_streak, "quest completed");

        Ok(CompletionReport { insights: insights(&user), quest })
    }

    /// Marks a quest skipped, updates memory, returns a gentler follow-up.
    ///
    /// # Errors
    ///
    /// Same error surface as [`Self::record_completion`].
    pub fn record_skip(
        &self,
        user_id: &str,
        quest_id: &str,
        reason: Option<String>,
    ) -> Result<SkipReport, EngineError> {
        let (mut quest, revision) = self.owned_quest(user_id, quest_id)?;
        let now = self.clock.now();

        quest.mark_skipped(reason);
        self.quests().save(&quest, revision)?;

        let outcome = QuestOutcome::skipped();
        self.users().update(user_id, |user| {
            update_memory(&mut user.quest_memory, &quest, &outcome, now);
        })?;
        info!(quest_id, "quest skipped");

        let suggestion = GentlerAlternative {
            difficulty: quest.difficulty.step_down(),
            time_reduction: 0.5,
            task_simplification: true,
            encouragement: ENCOURAGEMENTS[self.rng.pick(ENCOURAGEMENTS.len())].to_string(),
        };
        Ok(SkipReport { quest, suggestion })
    }

    /// Scores the user's active quests and persists the winner as the
    /// main quest. Returns `None` when no quest is active.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown users or store failures.
    pub fn main_quest(&self, user_id: &str) -> Result<Option<Quest>, EngineError> {
        let user = self.user(user_id)?;
        let mut quests = self.quests().list_for_user(user_id)?;
        let candidates: Vec<Quest> = quests.iter().map(|(q, _)| q.clone()).collect();

        let Some((winner_idx, score)) = select_main_quest(&candidates, &user.quest_memory)
        else {
            return Ok(None);
        };

        for (idx, (quest, revision)) in quests.iter_mut().enumerate() {
            let is_winner = idx == winner_idx;
            let needs_write = quest.intent.is_main_quest != is_winner
                || (is_winner && quest.intent.impact_score != Some(score));
            if !needs_write {
                continue;
            }
            quest.intent.is_main_quest = is_winner;
            if is_winner {
                quest.intent.impact_score = Some(score);
            }
            *revision = self.quests().save(quest, *revision)?;
        }

        let winner = quests[winner_idx].0.clone();
        info!(quest_id = %winner.id, score, "selected main quest");
        Ok(Some(winner))
    }

    /// Derives behavioral insights for a user.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown users or store failures.
    pub fn insights(&self, user_id: &str) -> Result<Vec<Insight>, EngineError> {
        Ok(insights(&self.user(user_id)?))
    }

    /// Checks a task on or off and recomputes quest progress.
    ///
    /// # Errors
    ///
    /// Returns `TaskNotFound` for a bad index, plus the usual lookup and
    /// store errors.
    pub fn toggle_task(
        &self,
        user_id: &str,
        quest_id: &str,
        index: usize,
        completed: bool,
    ) -> Result<Quest, EngineError> {
        let (mut quest, revision) = self.owned_quest(user_id, quest_id)?;
        let now = self.clock.now();
        if !quest.set_task_completed(index, completed, now) {
            return Err(EngineError::TaskNotFound(index));
        }
        quest.update_progress(now);
        self.quests().save(&quest, revision)?;
        Ok(quest)
    }

    /// Loads a quest and verifies it belongs to `user_id`.
    fn owned_quest(&self, user_id: &str, quest_id: &str) -> Result<(Quest, u64), EngineError> {
        let (quest, revision) = self
            .quests()
            .load(quest_id)?
            .ok_or_else(|| EngineError::QuestNotFound(quest_id.to_string()))?;
        if quest.user_id != user_id {
            return Err(EngineError::NotAuthorized {
                quest_id: quest_id.to_string(),
                user_id: user_id.to_string(),
            });
        }
        Ok((quest, revision))
    }
}

/// Embeds a validation result into the persisted form.
fn embed_validation(
    result: &ValidationResult,
    auto_rescoped: bool,
    rescope_changes: Vec<String>,
) -> ValidationOutcome {
    let mut issues = result.issues.clone();
    issues.extend(result.warnings.iter().cloned());
    ValidationOutcome {
        validated: true,
        score: result.score,
        issues,
        auto_rescoped,
        rescope_changes,
    }
}

/// Deterministic template draft used when the draft source fails.
///
/// Deliberately generic: it has no concrete output and hedged task
/// titles, so it flows through the same validate-then-rescope pipeline
/// as a real draft and comes out with a checklist deliverable attached.
fn fallback_draft(request: &DraftRequest) -> QuestDraft {
    let minutes = request.time_available.max(10.0);
    QuestDraft {
        title: format!("{}: {}", request.domain, request.specific_goal),
        description: format!(
            "Work towards your goal: {}. Follow the structured tasks below.",
            request.specific_goal
        ),
        category: request.domain.clone(),
        domain: Some(request.domain.clone()),
        difficulty: request.difficulty,
        tasks: vec![
            TaskDraft {
                title: "Research and Plan".into(),
                description: format!("Research best practices for {}", request.specific_goal),
                estimated_minutes: (minutes * 0.3).floor(),
            },
            TaskDraft {
                title: "Take Action".into(),
                description: format!("Work on {} with focus", request.specific_goal),
                estimated_minutes: (minutes * 0.5).floor(),
            },
            TaskDraft {
                title: "Review and Reflect".into(),
                description: "Document progress and learnings".into(),
                estimated_minutes: (minutes * 0.2).floor(),
            },
        ],
        success_criteria: vec![
            "Completed all tasks within time limit".into(),
            "Made measurable progress toward goal".into(),
        ],
        output_type: None,
        deliverable: None,
        energy_required: EnergyLevel::Medium,
        estimated_minutes: Some(minutes),
        reasoning: Some(format!(
            "Template quest generated for your {} goal: {}",
            request.domain, request.specific_goal
        )),
        user_inputs: Some(crate::quest::UserInputs {
            specific_goal: request.specific_goal.clone(),
            time_available: Some(request.time_available),
            constraints: request.constraints.clone(),
            preferences: request.preferences.clone(),
        }),
    }
}
