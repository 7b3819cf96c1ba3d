//! Core library for the `aura` CLI: a quest generation and adaptation
//! engine that validates drafted quests against real constraints, learns
//! from completions and skips, and surfaces the highest-impact quest.

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod memory;
pub mod ports;
pub mod quest;
pub mod store;
pub mod user;
pub mod validate;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    commands::dispatch(&cli.command)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["aura", "unknown"]);
        assert!(result.is_err());
    }

    #[test]
    fn run_errors_on_missing_required_args() {
        let result = run(["aura", "generate"]);
        assert!(result.is_err());
    }
}
