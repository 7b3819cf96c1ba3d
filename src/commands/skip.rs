//! `aura skip` command.

use crate::engine::Engine;

/// Skips a quest and prints the gentler follow-up suggestion.
///
/// # Errors
///
/// Returns an error string for unknown or foreign quests, or store
/// failures.
pub fn run(
    engine: &Engine,
    user: &str,
    quest: &str,
    reason: Option<String>,
) -> Result<(), String> {
    let report = engine
        .record_skip(user, quest, reason)
        .map_err(|e| e.to_string())?;

    println!("Skipped: {}", report.quest.title);
    println!(
        "Next time, try {:?} difficulty at about half the time.",
        report.suggestion.difficulty
    );
    println!("{}", report.suggestion.encouragement);
    Ok(())
}
