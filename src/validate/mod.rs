//! Quest validation: reality checks before a draft is shown to the user.
//!
//! Inspects a freshly drafted quest against the user's stated time,
//! energy, and domain, and returns a verdict with classified issues.
//! Check order matters: the alternative suggester dispatches on the
//! first blocker found, so the sequence below is part of the contract.

pub mod alternative;
pub mod rescope;

use serde::{Deserialize, Serialize};

use crate::quest::{EnergyLevel, QuestDraft};

/// Hedge phrases that signal a quest without a concrete action.
pub const VAGUE_WORDS: &[&str] = &[
    "work on",
    "research",
    "improve",
    "explore",
    "learn about",
    "study",
    "look into",
    "think about",
    "consider",
    "try to",
];

/// Keywords that signal content leaking in from another life area.
///
/// Contamination is a warning, not a rejection: it flags drift without
/// blocking the quest.
#[must_use]
pub fn domain_forbidden_keywords(domain: &str) -> &'static [&'static str] {
    match domain {
        "Fitness" => &["code", "programming", "work", "job", "study", "exam"],
        "Career" => &["exercise", "workout", "meditation", "relationship"],
        "Learning" => &["exercise", "job search", "meditation"],
        "Personal Development" => &["exercise routine", "job application", "code project"],
        "Health" => &["work", "career", "coding", "job"],
        "Mindfulness" => &["exercise", "work", "study", "code"],
        "Creativity" => &["work task", "job", "career"],
        "Productivity" => &["exercise", "meditation"],
        _ => &[],
    }
}

/// How serious a validation issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Prevents the draft from being shown unmodified.
    Blocking,
    /// Worth surfacing, does not reject the draft.
    Warning,
}

/// The kind of problem a check found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueType {
    /// Estimated time exceeds available time by more than the 20% buffer.
    TimeUnrealistic,
    /// Estimated time exceeds available time but fits within the buffer.
    TimeTight,
    /// No output type and no deliverable.
    VagueOutput,
    /// Hedge phrasing in the title, description, or tasks.
    VagueLanguage,
    /// Draft domain differs from the domain the user selected.
    DomainMismatch,
    /// Content from another life area leaked into this quest.
    DomainContamination,
    /// Quest demands more energy than the user reported having.
    EnergyMismatch,
    /// More tasks than fit a single session.
    TooManyTasks,
    /// No success criteria defined.
    NoSuccessCriteria,
}

/// A single classified finding from validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// What kind of problem this is.
    pub issue_type: IssueType,
    /// Whether it blocks the draft.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
    /// The draft field the issue points at, when there is one.
    #[serde(default)]
    pub field: Option<String>,
    /// Suggested remediation.
    pub suggestion: String,
}

/// User context a draft is validated against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserContext {
    /// Minutes the user has available.
    pub time_available: Option<f64>,
    /// The domain the user asked for.
    pub selected_domain: Option<String>,
    /// The energy level the user reported.
    pub energy_level: Option<EnergyLevel>,
}

/// Aggregated verdict for one draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Classified issues; blocking entries reject the draft.
    pub issues: Vec<Issue>,
    /// Non-blocking observations, kept apart from issues for scoring.
    pub warnings: Vec<Issue>,
    /// Quality score, 0-100.
    pub score: i32,
}

impl ValidationResult {
    /// `true` when no issue is blocking.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.blockers().is_empty()
    }

    /// The blocking subset of `issues`, in discovery order.
    #[must_use]
    pub fn blockers(&self) -> Vec<&Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Blocking).collect()
    }
}

/// Validates a draft quest against the user's context.
///
/// Runs the fixed check sequence (time, output, language, domain,
/// energy, task count, success criteria), then scores the draft.
#[must_use]
pub fn validate(draft: &QuestDraft, ctx: &UserContext) -> ValidationResult {
    let mut issues = Vec::new();
    let mut warnings = Vec::new();
    let combined = draft.combined_text();

    // 1. Time feasibility, with a 20% buffer before rejecting outright.
    if let Some(available) = ctx.time_available.filter(|t| *t > 0.0) {
        let estimated = draft.total_estimated_minutes();
        if estimated > available * 1.2 {
            issues.push(Issue {
                issue_type: IssueType::TimeUnrealistic,
                severity: Severity::Blocking,
                message: format!(
                    "Quest requires {estimated} min but only {available} min available"
                ),
                field: Some("estimated_minutes".into()),
                suggestion: "Reduce scope or split into multiple quests".into(),
            });
        } else if estimated > available {
            warnings.push(Issue {
                issue_type: IssueType::TimeTight,
                severity: Severity::Warning,
                message: format!("Quest uses full time slot ({estimated}/{available} min)"),
                field: None,
                suggestion: "Consider adding buffer time".into(),
            });
        }
    }

    // 2. Concrete output.
    if !draft.has_concrete_output() {
        issues.push(Issue {
            issue_type: IssueType::VagueOutput,
            severity: Severity::Blocking,
            message: "Quest has no concrete deliverable or output type defined".into(),
            field: Some("output_type".into()),
            suggestion: "Define what the user will create or produce".into(),
        });
    }

    // 3. Vague language. Blocking only when no concrete output exists.
    let found: Vec<&str> =
        VAGUE_WORDS.iter().copied().filter(|w| combined.contains(w)).collect();
    if !found.is_empty() {
        let severity = if draft.has_concrete_output() {
            Severity::Warning
        } else {
            Severity::Blocking
        };
        let suggestion = if draft.has_concrete_output() {
            "Consider more specific action verbs"
        } else {
            "Replace with concrete actions (Create, Write, Log, Complete, Build)"
        };
        issues.push(Issue {
            issue_type: IssueType::VagueLanguage,
            severity,
            message: format!("Quest contains vague language: \"{}\"", found.join("\", \"")),
            field: Some("description".into()),
            suggestion: suggestion.into(),
        });
    }

    // 4. Domain match and contamination.
    if let (Some(domain), Some(selected)) = (&draft.domain, &ctx.selected_domain) {
        if domain != selected {
            issues.push(Issue {
                issue_type: IssueType::DomainMismatch,
                severity: Severity::Blocking,
                message: format!(
                    "Quest domain ({domain}) doesn't match selected domain ({selected})"
                ),
                field: Some("domain".into()),
                suggestion: format!("Generate quest for {selected} instead"),
            });
        }
    }
    if let Some(domain) = &draft.domain {
        let contaminants: Vec<&str> = domain_forbidden_keywords(domain)
            .iter()
            .copied()
            .filter(|w| combined.contains(&w.to_lowercase()))
            .collect();
        if !contaminants.is_empty() {
            issues.push(Issue {
                issue_type: IssueType::DomainContamination,
                severity: Severity::Warning,
                message: format!(
                    "Quest contains elements from other domains: \"{}\"",
                    contaminants.join("\", \"")
                ),
                field: Some("tasks".into()),
                suggestion: format!("Keep quest strictly within {domain} domain"),
            });
        }
    }

    // 5. Energy mismatch: flag only a gap of more than one level.
    if let Some(user_energy) = ctx.energy_level {
        if draft.energy_required.rank() > user_energy.rank() + 1 {
            issues.push(Issue {
                issue_type: IssueType::EnergyMismatch,
                severity: Severity::Warning,
                message: format!(
                    "Quest requires {:?} energy but user selected {:?}",
                    draft.energy_required, user_energy
                ),
                field: Some("energy_required".into()),
                suggestion: "Simplify tasks or reduce intensity".into(),
            });
        }
    }

    // 6. Single-session task count.
    if draft.tasks.len() > 5 {
        warnings.push(Issue {
            issue_type: IssueType::TooManyTasks,
            severity: Severity::Warning,
            message: format!("Quest has {} tasks - may not be single-session", draft.tasks.len()),
            field: None,
            suggestion: "Consider splitting into multiple focused quests".into(),
        });
    }

    // 7. Success criteria.
    if draft.success_criteria.is_empty() {
        warnings.push(Issue {
            issue_type: IssueType::NoSuccessCriteria,
            severity: Severity::Warning,
            message: "Quest has no defined success criteria".into(),
            field: None,
            suggestion: "Add specific completion conditions".into(),
        });
    }

    let score = calculate_score(draft, &issues, &warnings);
    ValidationResult { issues, warnings, score }
}

/// Quality score: 100 minus penalties per finding, plus fixed bonuses
/// for concrete outputs, clamped to [0, 100].
fn calculate_score(draft: &QuestDraft, issues: &[Issue], warnings: &[Issue]) -> i32 {
    let mut score = 100i32;

    for issue in issues {
        score -= match issue.severity {
            Severity::Blocking => 30,
            Severity::Warning => 10,
        };
    }
    score -= 5 * i32::try_from(warnings.len()).unwrap_or(i32::MAX / 5);

    if draft.output_type.is_some() {
        score += 10;
    }
    if !draft.success_criteria.is_empty() {
        score += 10;
    }
    if draft.deliverable.is_some() {
        score += 5;
    }

    score.clamp(0, 100)
}
