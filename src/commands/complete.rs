//! `aura complete` command.

use crate::engine::Engine;

use super::render_quest;

/// Marks a quest completed and prints the XP gain plus fresh insights.
///
/// # Errors
///
/// Returns an error string for unknown or foreign quests, or store
/// failures.
pub fn run(engine: &Engine, user: &str, quest: &str, time_taken: f64) -> Result<(), String> {
    let report = engine
        .record_completion(user, quest, time_taken)
        .map_err(|e| e.to_string())?;

    println!("Completed: {} (+{} XP)", report.quest.title, report.quest.xp_reward);
    println!("{}", render_quest(&report.quest));
    if !report.insights.is_empty() {
        println!("Insights:");
        for insight in &report.insights {
            println!("  [{:?}] {} — {}", insight.kind, insight.message, insight.action);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::testutil;
    use super::*;
    use crate::engine::{GenerateInputs, GenerationOutcome};
    use crate::quest::{Difficulty, QuestStatus, QuestType};

    async fn seeded_quest(engine: &Engine, user: &str) -> String {
        let outcome = engine
            .generate_and_validate(
                user,
                GenerateInputs {
                    domain: "Fitness".into(),
                    specific_goal: "run".into(),
                    difficulty: Difficulty::Medium,
                    time_available: 30.0,
                    energy_level: None,
                    constraints: String::new(),
                    preferences: String::new(),
                    quest_type: QuestType::Daily,
                },
            )
            .await
            .unwrap();
        match outcome {
            GenerationOutcome::Accepted(quest) => quest.id,
            GenerationOutcome::Rejected { .. } => panic!("expected acceptance"),
        }
    }

    #[tokio::test]
    async fn completes_a_quest() {
        let engine = testutil::engine(vec![Ok(testutil::valid_draft("Fitness"))]);
        let user = testutil::seed_user(&engine);
        let quest_id = seeded_quest(&engine, &user.id).await;

        run(&engine, &user.id, &quest_id, 20.0).unwrap();

        let stored = engine.quests_for(&user.id).unwrap();
        assert_eq!(stored[0].status, QuestStatus::Completed);
        assert_eq!(engine.user(&user.id).unwrap().stats.total_quests_completed, 1);
    }

    #[test]
    fn unknown_quest_errors() {
        let engine = testutil::engine(vec![]);
        let user = testutil::seed_user(&engine);
        let err = run(&engine, &user.id, "ghost", 10.0).unwrap_err();
        assert!(err.contains("not found"));
    }
}
