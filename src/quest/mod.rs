//! Quest types: transient drafts and persisted quest records.
//!
//! A [`QuestDraft`] is what the draft source produces and the validator
//! consumes; a [`Quest`] is the durable record a draft is promoted to
//! once it passes (or is rescoped through) validation.

mod draft;
mod record;

pub use draft::{Difficulty, EnergyLevel, OutputType, QuestDraft, QuestType, TaskDraft, UserInputs};
pub use record::{
    end_date, xp_reward, IntentMetadata, Quest, QuestStatus, SkipMetadata, TaskRecord,
    ValidationOutcome,
};
