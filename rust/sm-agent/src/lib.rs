//! sm-agent: Spymaster agents for a Codenames-style word game.
//!
//! Every agent implements [`SpyMaster`]:
//! - [`ConstantBot`]: always the same clue (baseline stub)
//! - [`RandomBot`]: uniform over the allowed vocabulary
//! - [`HeuristicBot`]: relatedness search over an oracle, then picks the candidate
//!   least similar to the assassin word

pub mod agents;
pub mod rng;
pub mod search;
pub mod select;

use std::collections::BTreeSet;

use thiserror::Error;

use sm_core::{AgentKind, AgentState, BoardError, Side, TurnReport, Vocabulary};
use sm_oracle::{LexicalOracle, OracleError};

pub use agents::{ConstantBot, HeuristicBot, RandomBot};
pub use search::{find_candidates, SearchOutcome};
pub use select::{select_best, Selection};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClueError {
    #[error("malformed board: {0}")]
    MalformedBoard(#[from] BoardError),
    #[error("no own words left to clue")]
    NoOwnWordsAvailable,
    #[error("no candidate clue found after {attempts} mind words")]
    NoCandidateFound { attempts: u32 },
    #[error("candidate set is empty")]
    EmptyCandidateSet,
    #[error(transparent)]
    OracleUnavailable(#[from] OracleError),
}

/// A clue word plus the number of board words it is meant to cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clue {
    pub word: String,
    pub num_guesses: u32,
}

impl Clue {
    pub fn new(word: impl Into<String>, num_guesses: u32) -> Self {
        Self {
            word: word.into(),
            num_guesses,
        }
    }
}

/// What an oracle-driven clue request looked at, for offline analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct ClueDiagnostics {
    pub turn_idx: u64,
    pub mind_word: String,
    pub attempts: u32,
    pub candidates: Vec<String>,
    pub clue: String,
    pub num_guesses: u32,
    /// Similarity of the clue to the assassin word, if scorable.
    pub score: Option<f64>,
    /// True when no candidate was scorable and the clue was drawn at random.
    pub fallback: bool,
}

pub trait ClueSink {
    fn on_clue(&mut self, diag: &ClueDiagnostics);
}

/// A spymaster: gives clues and is told what happened each turn.
///
/// A failed `get_clue` leaves the agent's board state untouched.
pub trait SpyMaster {
    fn name(&self) -> &'static str;
    fn get_clue(&mut self, invalid_words: &BTreeSet<String>) -> Result<Clue, ClueError>;
    fn update(&mut self, report: TurnReport);
}

/// Settings shared by the agent constructors.
#[derive(Debug, Clone)]
pub struct AgentOptions {
    pub kind: AgentKind,
    pub seed: u64,
    pub max_attempts: u32,
    pub constant_clue: String,
    pub random_guess_count: u32,
}

impl From<&sm_core::config::AgentConfig> for AgentOptions {
    fn from(cfg: &sm_core::config::AgentConfig) -> Self {
        Self {
            kind: cfg.kind,
            seed: cfg.seed,
            max_attempts: cfg.max_attempts,
            constant_clue: cfg.constant_clue.clone(),
            random_guess_count: cfg.random_guess_count,
        }
    }
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self::from(&sm_core::config::AgentConfig::default())
    }
}

/// Build the agent selected by `opts.kind` for `player_id` on `board`.
pub fn build_agent<'a, I, O>(
    opts: &AgentOptions,
    vocab: Vocabulary,
    board: I,
    player_id: u8,
    oracle: O,
) -> Result<Box<dyn SpyMaster>, ClueError>
where
    I: IntoIterator<Item = (&'a String, &'a Side)>,
    O: LexicalOracle + 'static,
{
    build_agent_with_sink(opts, vocab, board, player_id, oracle, None)
}

/// Like [`build_agent`]; `sink` receives diagnostics from the heuristic agent
/// and is ignored by the baselines.
pub fn build_agent_with_sink<'a, I, O>(
    opts: &AgentOptions,
    vocab: Vocabulary,
    board: I,
    player_id: u8,
    oracle: O,
    sink: Option<Box<dyn ClueSink>>,
) -> Result<Box<dyn SpyMaster>, ClueError>
where
    I: IntoIterator<Item = (&'a String, &'a Side)>,
    O: LexicalOracle + 'static,
{
    let state = AgentState::new(board, player_id)?;
    let agent: Box<dyn SpyMaster> = match opts.kind {
        AgentKind::Constant => Box::new(ConstantBot::new(state, opts.constant_clue.clone())),
        AgentKind::Random => Box::new(RandomBot::new(
            vocab,
            state,
            opts.seed,
            opts.random_guess_count,
        )),
        AgentKind::Heuristic => {
            let bot = HeuristicBot::new(vocab, state, oracle, opts.seed, opts.max_attempts);
            match sink {
                Some(sink) => Box::new(bot.with_sink(sink)),
                None => Box::new(bot),
            }
        }
    };
    Ok(agent)
}
