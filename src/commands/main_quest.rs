//! `aura main` command.

use crate::engine::Engine;

use super::render_quest;

/// Picks today's main quest and prints it, or reports that there is none.
///
/// # Errors
///
/// Returns an error string for unknown users or store failures.
pub fn run(engine: &Engine, user: &str) -> Result<(), String> {
    match engine.main_quest(user).map_err(|e| e.to_string())? {
        Some(quest) => {
            let score = quest.intent.impact_score.unwrap_or_default();
            println!("Main quest (impact {score}):");
            println!("{}", render_quest(&quest));
        }
        None => println!("No active quests — nothing to prioritize today."),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::testutil;
    use super::*;

    #[test]
    fn no_active_quests_is_not_an_error() {
        let engine = testutil::engine(vec![]);
        let user = testutil::seed_user(&engine);
        assert!(run(&engine, &user.id).is_ok());
    }

    #[test]
    fn unknown_user_errors() {
        let engine = testutil::engine(vec![]);
        assert!(run(&engine, "ghost").is_err());
    }
}
