//! Command dispatch and handlers.

pub mod complete;
pub mod generate;
pub mod init;
pub mod insights;
pub mod list;
pub mod main_quest;
pub mod show;
pub mod skip;
pub mod task;

use crate::cli::Command;
use crate::config::Config;
use crate::engine::{Engine, GenerateInputs};
use crate::quest::Quest;

/// Dispatch a parsed command to its handler using live adapters.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let config = Config::from_env();
    let engine = Engine::live(&config);
    dispatch_with_engine(command, &engine)
}

/// Dispatch a command against a given engine.
pub(crate) fn dispatch_with_engine(command: &Command, engine: &Engine) -> Result<(), String> {
    match command {
        Command::Init { name, categories, difficulty } => {
            init::run(engine, name, categories, *difficulty)
        }
        Command::Generate {
            user,
            domain,
            goal,
            difficulty,
            time,
            energy,
            constraints,
            preferences,
            quest_type,
        } => generate::run(
            engine,
            user,
            GenerateInputs {
                domain: domain.clone(),
                specific_goal: goal.clone(),
                difficulty: *difficulty,
                time_available: *time,
                energy_level: *energy,
                constraints: constraints.clone(),
                preferences: preferences.clone(),
                quest_type: *quest_type,
            },
        ),
        Command::Complete { user, quest, time_taken } => {
            complete::run(engine, user, quest, *time_taken)
        }
        Command::Skip { user, quest, reason } => {
            skip::run(engine, user, quest, reason.clone())
        }
        Command::Task { user, quest, index, undo } => {
            task::run(engine, user, quest, *index, !*undo)
        }
        Command::Main { user } => main_quest::run(engine, user),
        Command::Insights { user } => insights::run(engine, user),
        Command::List { user } => list::run(engine, user),
        Command::Show { user, quest } => show::run(engine, user, quest),
    }
}

/// Renders a quest as a human-readable block.
pub(crate) fn render_quest(quest: &Quest) -> String {
    let mut lines = Vec::new();
    lines.push(format!("{} [{}]", quest.title, quest.id));
    lines.push(format!(
        "  {} | {:?} | {:?} | {}% | {} XP",
        quest.memory_domain(),
        quest.difficulty,
        quest.status,
        quest.progress,
        quest.xp_reward,
    ));
    if !quest.description.is_empty() {
        lines.push(format!("  {}", quest.description));
    }
    for (idx, task) in quest.tasks.iter().enumerate() {
        let mark = if task.completed { "x" } else { " " };
        lines.push(format!(
            "  [{mark}] {idx}. {} ({} min)",
            task.title, task.estimated_minutes
        ));
    }
    if let Some(deliverable) = &quest.deliverable {
        lines.push(format!("  deliverable: {deliverable}"));
    }
    if !quest.success_criteria.is_empty() {
        lines.push(format!("  done when: {}", quest.success_criteria.join("; ")));
    }
    let rescoped = if quest.validation.auto_rescoped { ", auto-rescoped" } else { "" };
    lines.push(format!("  validation score: {}{rescoped}", quest.validation.score));
    lines.join("\n")
}
