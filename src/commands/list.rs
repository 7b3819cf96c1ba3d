//! `aura list` command.

use crate::engine::Engine;

/// Lists the user's quests, newest first, one line each.
///
/// # Errors
///
/// Returns an error string for unknown users or store failures.
pub fn run(engine: &Engine, user: &str) -> Result<(), String> {
    // Surface unknown users as an error rather than an empty list.
    engine.user(user).map_err(|e| e.to_string())?;

    let quests = engine.quests_for(user).map_err(|e| e.to_string())?;
    if quests.is_empty() {
        println!("No quests yet.");
        return Ok(());
    }
    for quest in &quests {
        let main = if quest.intent.is_main_quest { " *main*" } else { "" };
        println!(
            "{} | {:?} | {}%{main} | {} [{}]",
            quest.memory_domain(),
            quest.status,
            quest.progress,
            quest.title,
            quest.id,
        );
    }
    Ok(())
}
