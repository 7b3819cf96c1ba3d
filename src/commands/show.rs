//! `aura show` command.

use crate::engine::Engine;
use crate::error::EngineError;

use super::render_quest;

/// Prints one quest in full, including its validation record.
///
/// # Errors
///
/// Returns an error string for unknown or foreign quests.
pub fn run(engine: &Engine, user: &str, quest_id: &str) -> Result<(), String> {
    let quest = engine
        .quests_for(user)
        .map_err(|e| e.to_string())?
        .into_iter()
        .find(|q| q.id == quest_id)
        .ok_or_else(|| EngineError::QuestNotFound(quest_id.to_string()).to_string())?;

    println!("{}", render_quest(&quest));
    if !quest.validation.issues.is_empty() {
        println!("  validation findings:");
        for issue in &quest.validation.issues {
            println!("    [{:?}] {}", issue.severity, issue.message);
        }
    }
    if quest.skip.skipped {
        println!(
            "  skipped{}",
            quest
                .skip
                .skip_reason
                .as_deref()
                .map(|r| format!(": {r}"))
                .unwrap_or_default()
        );
    }
    Ok(())
}
