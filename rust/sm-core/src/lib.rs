//! sm-core: Board partition, vocabulary, candidate filtering, and configuration.

pub mod board;
pub mod config;
pub mod filter;
pub mod vocab;
pub mod word;

pub use board::{AgentState, BoardError, TurnReport};
pub use config::{AgentKind, Config, ConfigError};
pub use filter::{exclude_all, is_single_token, retain_vocabulary, strip_phrases, PHRASE_SEPARATOR};
pub use vocab::{VocabError, Vocabulary};
pub use word::{normalize, Side};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod board_tests;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_nonempty() {
        assert!(!VERSION.is_empty());
    }
}
