//! Environment-derived runtime configuration.
//!
//! Values come from the process environment (a `.env` file is loaded by
//! `main` before this runs). The Gemini API key is intentionally not
//! read here: the live draft adapter reads it at call time, so commands
//! that never draft a quest work without one.

use std::env;
use std::path::PathBuf;

/// Default directory for the document store.
const DEFAULT_DATA_DIR: &str = ".aura";

/// Default generative model for drafting quests.
const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory of the document store.
    pub data_dir: PathBuf,
    /// Generative model identifier for the draft source.
    pub model: String,
}

impl Config {
    /// Builds a configuration from `AURA_DATA_DIR` and `AURA_MODEL`,
    /// falling back to defaults for anything unset.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            data_dir: env::var("AURA_DATA_DIR")
                .map_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from),
            model: env::var("AURA_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        }
    }
}
