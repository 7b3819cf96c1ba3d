//! Bounded automatic repair of drafts that failed validation.

use crate::quest::{Difficulty, OutputType, QuestDraft};

use super::{IssueType, UserContext, ValidationResult};

/// What the rescoper produced for one draft.
#[derive(Debug, Clone, PartialEq)]
pub struct RescopeOutcome {
    /// The (possibly modified) draft.
    pub rescoped: QuestDraft,
    /// Human-readable descriptions of the applied changes.
    pub changes: Vec<String>,
    /// Whether at least one change was applied.
    pub auto_fixed: bool,
}

/// Attempts a one-shot deterministic repair of a failed draft.
///
/// Applies one fix per blocker, in the order the blockers were
/// discovered. A change is recorded only when the draft actually
/// mutated, so re-running on an already-fixed draft reports nothing.
/// Domain blockers have no unambiguous repair and are left alone; the
/// caller falls through to the alternative suggester.
#[must_use]
pub fn rescope(
    draft: &QuestDraft,
    result: &ValidationResult,
    ctx: &UserContext,
) -> RescopeOutcome {
    let mut rescoped = draft.clone();
    let mut changes = Vec::new();

    for blocker in result.blockers() {
        match blocker.issue_type {
            IssueType::TimeUnrealistic => {
                let Some(available) = ctx.time_available else {
                    continue;
                };
                let reduction = available / rescoped.estimated_minutes.unwrap_or(30.0);
                #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
                #[allow(clippy::cast_sign_loss)]
                let keep = ((rescoped.tasks.len() as f64 * reduction).ceil() as usize)
                    .min(rescoped.tasks.len());
                let trimmed = keep < rescoped.tasks.len();
                rescoped.tasks.truncate(keep);

                let target = available * 0.9;
                let retimed = rescoped.estimated_minutes != Some(target);
                rescoped.estimated_minutes = Some(target);

                if trimmed || retimed {
                    changes.push(format!("Reduced to fit {available} minutes"));
                }
            }
            IssueType::VagueOutput => {
                let changed =
                    rescoped.output_type.is_none() || rescoped.deliverable.is_none();
                rescoped.output_type = Some(OutputType::Checklist);
                rescoped
                    .deliverable
                    .get_or_insert_with(|| "Completed action checklist".into());
                if changed {
                    changes.push("Added concrete deliverable".into());
                }
            }
            IssueType::VagueLanguage => {
                if rescoped.deliverable.is_none() {
                    let kind = rescoped
                        .output_type
                        .map_or("Document", OutputType::describe);
                    rescoped.deliverable = Some(format!("{kind} showing completion"));
                    changes.push("Specified expected output".into());
                }
            }
            IssueType::EnergyMismatch => {
                let Some(user_energy) = ctx.energy_level else {
                    continue;
                };
                let changed = rescoped.difficulty != Difficulty::Easy
                    || rescoped.energy_required != user_energy;
                rescoped.difficulty = Difficulty::Easy;
                rescoped.energy_required = user_energy;
                if changed {
                    changes.push(format!("Adjusted to {user_energy:?} energy"));
                }
            }
            // Ambiguous repairs: regenerating for another domain or
            // stripping contamination would change the quest's meaning.
            _ => {}
        }
    }

    let auto_fixed = !changes.is_empty();
    RescopeOutcome { rescoped, changes, auto_fixed }
}
