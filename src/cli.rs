//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::quest::{Difficulty, EnergyLevel, QuestType};

/// Top-level CLI parser for `aura`.
#[derive(Debug, Parser)]
#[command(name = "aura", version, about = "Generate and track adaptive daily quests")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a user profile and print its ID.
    Init {
        /// Display name for the new user.
        #[arg(long)]
        name: String,
        /// Goal categories, repeatable (e.g. --category Fitness).
        #[arg(long = "category")]
        categories: Vec<String>,
        /// Preferred difficulty.
        #[arg(long, default_value = "Medium", value_parser = parse_difficulty)]
        difficulty: Difficulty,
    },
    /// Generate, validate, and store a quest.
    Generate {
        /// User ID.
        #[arg(long)]
        user: String,
        /// Life-area domain (e.g. Fitness, Career).
        #[arg(long)]
        domain: String,
        /// The goal in your own words.
        #[arg(long)]
        goal: String,
        /// Requested difficulty.
        #[arg(long, default_value = "Medium", value_parser = parse_difficulty)]
        difficulty: Difficulty,
        /// Minutes available.
        #[arg(long, default_value_t = 30.0)]
        time: f64,
        /// Current energy level (Low, Medium, High).
        #[arg(long, value_parser = parse_energy)]
        energy: Option<EnergyLevel>,
        /// Free-text constraints.
        #[arg(long, default_value = "")]
        constraints: String,
        /// Free-text preferences.
        #[arg(long, default_value = "")]
        preferences: String,
        /// Quest timeframe (daily, weekly, monthly, yearly).
        #[arg(long = "type", default_value = "daily", value_parser = parse_quest_type)]
        quest_type: QuestType,
    },
    /// Mark a quest completed.
    Complete {
        /// User ID.
        #[arg(long)]
        user: String,
        /// Quest ID.
        #[arg(long)]
        quest: String,
        /// Minutes the quest actually took.
        #[arg(long, default_value_t = 0.0)]
        time_taken: f64,
    },
    /// Skip a quest and get a gentler suggestion.
    Skip {
        /// User ID.
        #[arg(long)]
        user: String,
        /// Quest ID.
        #[arg(long)]
        quest: String,
        /// Why the quest is being skipped.
        #[arg(long)]
        reason: Option<String>,
    },
    /// Check a task on or off.
    Task {
        /// User ID.
        #[arg(long)]
        user: String,
        /// Quest ID.
        #[arg(long)]
        quest: String,
        /// Zero-based task index.
        #[arg(long)]
        index: usize,
        /// Uncheck instead of check.
        #[arg(long)]
        undo: bool,
    },
    /// Pick and show today's main quest.
    Main {
        /// User ID.
        #[arg(long)]
        user: String,
    },
    /// Show behavioral insights.
    Insights {
        /// User ID.
        #[arg(long)]
        user: String,
    },
    /// List a user's quests.
    List {
        /// User ID.
        #[arg(long)]
        user: String,
    },
    /// Show one quest in full.
    Show {
        /// User ID.
        #[arg(long)]
        user: String,
        /// Quest ID.
        #[arg(long)]
        quest: String,
    },
}

fn parse_difficulty(value: &str) -> Result<Difficulty, String> {
    match value.to_lowercase().as_str() {
        "easy" => Ok(Difficulty::Easy),
        "medium" => Ok(Difficulty::Medium),
        "hard" => Ok(Difficulty::Hard),
        other => Err(format!("unknown difficulty '{other}' (expected Easy, Medium, or Hard)")),
    }
}

fn parse_energy(value: &str) -> Result<EnergyLevel, String> {
    match value.to_lowercase().as_str() {
        "low" => Ok(EnergyLevel::Low),
        "medium" => Ok(EnergyLevel::Medium),
        "high" => Ok(EnergyLevel::High),
        other => Err(format!("unknown energy level '{other}' (expected Low, Medium, or High)")),
    }
}

fn parse_quest_type(value: &str) -> Result<QuestType, String> {
    match value.to_lowercase().as_str() {
        "daily" => Ok(QuestType::Daily),
        "weekly" => Ok(QuestType::Weekly),
        "monthly" => Ok(QuestType::Monthly),
        "yearly" => Ok(QuestType::Yearly),
        other => Err(format!(
            "unknown quest type '{other}' (expected daily, weekly, monthly, or yearly)"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parses_generate_with_defaults() {
        let cli = Cli::parse_from([
            "aura", "generate", "--user", "u-1", "--domain", "Fitness", "--goal", "run a 5k",
        ]);
        let Command::Generate { difficulty, time, quest_type, energy, .. } = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(difficulty, Difficulty::Medium);
        assert!((time - 30.0).abs() < f64::EPSILON);
        assert_eq!(quest_type, QuestType::Daily);
        assert!(energy.is_none());
    }

    #[test]
    fn parses_case_insensitive_enums() {
        let cli = Cli::parse_from([
            "aura", "generate", "--user", "u", "--domain", "Career", "--goal", "g",
            "--difficulty", "hard", "--energy", "LOW", "--type", "Weekly",
        ]);
        let Command::Generate { difficulty, energy, quest_type, .. } = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(difficulty, Difficulty::Hard);
        assert_eq!(energy, Some(EnergyLevel::Low));
        assert_eq!(quest_type, QuestType::Weekly);
    }

    #[test]
    fn rejects_unknown_difficulty() {
        let result = Cli::try_parse_from([
            "aura", "init", "--name", "Robin", "--difficulty", "Impossible",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn parses_repeated_categories() {
        let cli = Cli::parse_from([
            "aura", "init", "--name", "Robin", "--category", "Fitness", "--category", "Career",
        ]);
        let Command::Init { categories, .. } = cli.command else {
            panic!("expected init");
        };
        assert_eq!(categories, vec!["Fitness", "Career"]);
    }

    #[test]
    fn parses_skip_with_reason() {
        let cli = Cli::parse_from([
            "aura", "skip", "--user", "u", "--quest", "q", "--reason", "tired",
        ]);
        let Command::Skip { reason, .. } = cli.command else {
            panic!("expected skip");
        };
        assert_eq!(reason.as_deref(), Some("tired"));
    }
}
