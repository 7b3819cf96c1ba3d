//! `aura task` command.

use crate::engine::Engine;

use super::render_quest;

/// Checks a task on or off and prints the updated quest.
///
/// # Errors
///
/// Returns an error string for bad indexes, unknown quests, or store
/// failures.
pub fn run(
    engine: &Engine,
    user: &str,
    quest: &str,
    index: usize,
    completed: bool,
) -> Result<(), String> {
    let quest = engine
        .toggle_task(user, quest, index, completed)
        .map_err(|e| e.to_string())?;
    println!("{}", render_quest(&quest));
    Ok(())
}
