//! `aura init` command.

use crate::engine::Engine;
use crate::quest::Difficulty;
use crate::user::OnboardingSettings;

/// Creates a user profile and prints its ID.
///
/// # Errors
///
/// Returns an error string if the store rejects the new user.
pub fn run(
    engine: &Engine,
    name: &str,
    categories: &[String],
    difficulty: Difficulty,
) -> Result<(), String> {
    let onboarding = OnboardingSettings {
        goal_categories: categories.to_vec(),
        difficulty_level: difficulty,
        ..OnboardingSettings::default()
    };
    let user = engine
        .create_user(name, onboarding)
        .map_err(|e| e.to_string())?;

    println!("Created user {} ({})", user.name, user.id);
    if !user.onboarding.goal_categories.is_empty() {
        println!("Goal categories: {}", user.onboarding.goal_categories.join(", "));
    }
    Ok(())
}
