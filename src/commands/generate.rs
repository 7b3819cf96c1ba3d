//! `aura generate` command.

use crate::engine::{Engine, GenerateInputs, GenerationOutcome};

use super::render_quest;

/// Generates a quest, printing either the stored quest or the rejection
/// with its remediation options.
///
/// # Errors
///
/// Returns an error string if the user is unknown or the store fails.
/// A rejected draft is a normal outcome, not an error.
pub fn run(engine: &Engine, user: &str, inputs: GenerateInputs) -> Result<(), String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to start async runtime: {e}"))?;

    let outcome = runtime
        .block_on(engine.generate_and_validate(user, inputs))
        .map_err(|e| e.to_string())?;

    match outcome {
        GenerationOutcome::Accepted(quest) => {
            println!("Quest created:");
            println!("{}", render_quest(&quest));
            if quest.validation.auto_rescoped {
                println!("Auto-rescoped: {}", quest.validation.rescope_changes.join("; "));
            }
        }
        GenerationOutcome::Rejected { issues, alternative } => {
            println!("Quest rejected:");
            for issue in &issues {
                println!("  [{:?}] {}", issue.severity, issue.message);
            }
            println!("{}", alternative.message);
            for suggestion in &alternative.suggestions {
                println!("  - {}: {}", suggestion.title, suggestion.description);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::testutil;
    use super::*;
    use crate::quest::{Difficulty, QuestType};

    fn inputs(domain: &str) -> GenerateInputs {
        GenerateInputs {
            domain: domain.into(),
            specific_goal: "make progress".into(),
            difficulty: Difficulty::Medium,
            time_available: 30.0,
            energy_level: None,
            constraints: String::new(),
            preferences: String::new(),
            quest_type: QuestType::Daily,
        }
    }

    #[test]
    fn accepted_draft_is_stored() {
        let engine = testutil::engine(vec![Ok(testutil::valid_draft("Fitness"))]);
        let user = testutil::seed_user(&engine);

        run(&engine, &user.id, inputs("Fitness")).unwrap();
        assert_eq!(engine.quests_for(&user.id).unwrap().len(), 1);
    }

    #[test]
    fn rejected_draft_stores_nothing_but_still_succeeds() {
        // Draft in Career, selection in Fitness: unfixable domain mismatch.
        let engine = testutil::engine(vec![Ok(testutil::valid_draft("Career"))]);
        let user = testutil::seed_user(&engine);

        run(&engine, &user.id, inputs("Fitness")).unwrap();
        assert!(engine.quests_for(&user.id).unwrap().is_empty());
    }

    #[test]
    fn unknown_user_errors() {
        let engine = testutil::engine(vec![]);
        let err = run(&engine, "ghost", inputs("Fitness")).unwrap_err();
        assert!(err.contains("not found"));
    }
}
