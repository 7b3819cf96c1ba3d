//! `aura insights` command.

use crate::engine::Engine;

/// Prints the user's behavioral insights.
///
/// # Errors
///
/// Returns an error string for unknown users or store failures.
pub fn run(engine: &Engine, user: &str) -> Result<(), String> {
    let insights = engine.insights(user).map_err(|e| e.to_string())?;
    if insights.is_empty() {
        println!("No insights yet — complete a few quests first.");
        return Ok(());
    }
    for insight in &insights {
        println!("[{:?}] {}", insight.kind, insight.message);
        println!("        {}", insight.action);
    }
    Ok(())
}
