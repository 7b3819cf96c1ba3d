//! User-facing remediation options for drafts that cannot be rescoped.

use serde::{Deserialize, Serialize};

use crate::quest::QuestDraft;

use super::{IssueType, UserContext, ValidationResult};

/// One remediation option offered to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Short option label.
    pub title: String,
    /// What picking this option means.
    pub description: String,
    /// The action the client should trigger.
    pub action: String,
}

/// The remediation message and its options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alternative {
    /// Why the quest was rejected, phrased for the user.
    pub message: String,
    /// One or two concrete options.
    pub suggestions: Vec<Suggestion>,
}

/// Builds remediation options for a rejected draft.
///
/// Dispatches on the first blocker only: with several blockers the
/// earliest-discovered one decides which template the user sees, so
/// the validator's check order carries through here.
#[must_use]
pub fn suggest_alternative(
    draft: &QuestDraft,
    result: &ValidationResult,
    ctx: &UserContext,
) -> Alternative {
    let first = result.blockers().first().map(|issue| issue.issue_type);

    match first {
        Some(IssueType::TimeUnrealistic) => {
            let available = ctx.time_available.unwrap_or(0.0);
            let quick_start = (available * 0.8).floor();
            Alternative {
                message: format!(
                    "\"{}\" cannot fit in {available} minutes.",
                    draft.title
                ),
                suggestions: vec![
                    Suggestion {
                        title: "Break it down".into(),
                        description: "Complete just the first step as a standalone quest".into(),
                        action: "Create smaller quest".into(),
                    },
                    Suggestion {
                        title: "Shorter version".into(),
                        description: format!(
                            "{} - Quick Start ({quick_start} min)",
                            draft.title
                        ),
                        action: "Generate condensed version".into(),
                    },
                ],
            }
        }
        Some(IssueType::VagueOutput) => Alternative {
            message: format!("\"{}\" is too vague. What should you produce?", draft.title),
            suggestions: vec![
                Suggestion {
                    title: "Create a note".into(),
                    description: "Write a short summary or list".into(),
                    action: "Define output as WRITTEN_NOTE".into(),
                },
                Suggestion {
                    title: "Make a checklist".into(),
                    description: "List specific actions or items".into(),
                    action: "Define output as CHECKLIST".into(),
                },
            ],
        },
        Some(IssueType::DomainMismatch) => {
            let quest_domain = draft.domain.clone().unwrap_or_else(|| draft.category.clone());
            let selected = ctx.selected_domain.clone().unwrap_or_default();
            Alternative {
                message: format!(
                    "This quest is for {quest_domain} but you selected {selected}."
                ),
                suggestions: vec![Suggestion {
                    title: "Generate for correct domain".into(),
                    description: format!("Create {selected} quest instead"),
                    action: "Regenerate with correct domain".into(),
                }],
            }
        }
        _ => Alternative {
            message: "This quest has validation issues.".into(),
            suggestions: vec![Suggestion {
                title: "Try again".into(),
                description: "Generate a new quest with clearer parameters".into(),
                action: "Regenerate".into(),
            }],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{clean_draft, ctx_with_time};
    use super::super::validate;
    use super::*;

    #[test]
    fn time_blocker_offers_two_options() {
        let mut draft = clean_draft();
        for task in &mut draft.tasks {
            task.estimated_minutes = 40.0;
        }
        let ctx = ctx_with_time(30.0);
        let result = validate(&draft, &ctx);

        let alternative = suggest_alternative(&draft, &result, &ctx);
        assert!(alternative.message.contains("cannot fit in 30 minutes"));
        assert_eq!(alternative.suggestions.len(), 2);
        assert!(alternative.suggestions[1].description.contains("Quick Start (24 min)"));
    }

    #[test]
    fn first_blocker_wins_over_later_ones() {
        // Both a time blocker and a vague-output blocker exist; the time
        // check runs first, so the time template must be chosen.
        let mut draft = clean_draft();
        draft.output_type = None;
        draft.deliverable = None;
        for task in &mut draft.tasks {
            task.estimated_minutes = 40.0;
        }
        let ctx = ctx_with_time(30.0);
        let result = validate(&draft, &ctx);
        assert!(result.blockers().len() >= 2);

        let alternative = suggest_alternative(&draft, &result, &ctx);
        assert!(alternative.message.contains("cannot fit"));
    }

    #[test]
    fn vague_output_blocker_offers_output_kinds() {
        let mut draft = clean_draft();
        draft.output_type = None;
        draft.deliverable = None;
        let ctx = ctx_with_time(60.0);
        let result = validate(&draft, &ctx);

        let alternative = suggest_alternative(&draft, &result, &ctx);
        assert!(alternative.message.contains("too vague"));
        assert_eq!(alternative.suggestions.len(), 2);
        assert!(alternative.suggestions[0].action.contains("WRITTEN_NOTE"));
    }

    #[test]
    fn domain_mismatch_names_both_domains() {
        let draft = clean_draft();
        let ctx = UserContext {
            selected_domain: Some("Fitness".into()),
            ..ctx_with_time(60.0)
        };
        let result = validate(&draft, &ctx);

        let alternative = suggest_alternative(&draft, &result, &ctx);
        assert!(alternative.message.contains("Career"));
        assert!(alternative.message.contains("Fitness"));
        assert_eq!(alternative.suggestions.len(), 1);
    }

    #[test]
    fn unknown_blocker_falls_back_to_generic_retry() {
        let draft = clean_draft();
        let ctx = ctx_with_time(60.0);
        let result = ValidationResult { issues: vec![], warnings: vec![], score: 100 };

        let alternative = suggest_alternative(&draft, &result, &ctx);
        assert_eq!(alternative.suggestions.len(), 1);
        assert_eq!(alternative.suggestions[0].title, "Try again");
    }
}
