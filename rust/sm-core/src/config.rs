//! Configuration schema for spymaster runs.
//!
//! One YAML file configures the agent, the oracle adapter, and the event log.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Agent selection and search settings.
    #[serde(default)]
    pub agent: AgentConfig,
    /// Lexical oracle settings.
    #[serde(default)]
    pub oracle: OracleConfig,
    /// Event log settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which spymaster implementation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    /// Oracle-driven relatedness search + dissimilarity selection.
    #[default]
    Heuristic,
    /// Uniform choice over the allowed vocabulary.
    Random,
    /// Always the same clue.
    Constant,
}

/// Agent configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AgentConfig {
    #[serde(default)]
    pub kind: AgentKind,
    /// Base seed. Per-turn RNG streams are derived from it and the turn index.
    #[serde(default)]
    pub seed: u64,
    /// Upper bound on mind words tried per clue request.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Clue returned by the constant agent.
    #[serde(default = "default_constant_clue")]
    pub constant_clue: String,
    /// Guess count claimed by the random agent.
    #[serde(default = "default_random_guess_count")]
    pub random_guess_count: u32,
}

fn default_max_attempts() -> u32 {
    25
}

fn default_constant_clue() -> String {
    "dumb".to_string()
}

fn default_random_guess_count() -> u32 {
    2
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            kind: AgentKind::default(),
            seed: 0,
            max_attempts: default_max_attempts(),
            constant_clue: default_constant_clue(),
            random_guess_count: default_random_guess_count(),
        }
    }
}

/// Oracle configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OracleConfig {
    /// Sense-graph file (YAML or JSON) for the in-process lexicon.
    #[serde(default)]
    pub lexicon_path: Option<String>,
    /// Per-call deadline in milliseconds. 0 disables the deadline.
    #[serde(default = "default_oracle_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_oracle_timeout_ms() -> u64 {
    2000
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            lexicon_path: None,
            timeout_ms: default_oracle_timeout_ms(),
        }
    }
}

/// NDJSON event log configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Append events here. If None, events are not written.
    #[serde(default)]
    pub events_path: Option<String>,
    /// Flush every N lines (0 = only on drop/explicit flush).
    #[serde(default)]
    pub flush_every_lines: u64,
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }
}
