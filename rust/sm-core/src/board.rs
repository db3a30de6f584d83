//! Board partition from one spymaster's point of view.
//!
//! This module is the single place that mutates the partition; the only mutation
//! is `report_turn`, which removes revealed words.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::word::{normalize, Side};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("player id must be 0 or 1, got {0}")]
    BadPlayerId(u8),
    #[error("unrecognized side code {code} for word {word:?}")]
    UnknownSide { word: String, code: u8 },
    #[error("board must contain exactly one assassin word, found {0}")]
    AssassinCount(usize),
    #[error("word {0:?} appears more than once on the board")]
    DuplicateWord(String),
}

/// What happened during one turn, as reported by the game platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    pub is_own_turn: bool,
    pub clue_word: String,
    pub num_guesses: u32,
    pub guesses: Vec<String>,
}

/// Mutable board partition: own words, opponent words, the assassin, and clue history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentState {
    player_id: u8,
    own_words: BTreeSet<String>,
    opponent_words: BTreeSet<String>,
    neutral_words: BTreeSet<String>,
    forbidden_word: String,
    given_clues: BTreeSet<String>,
    history: Vec<TurnReport>,
}

impl AgentState {
    /// Partition a board for `player_id`.
    pub fn new<'a, I>(board: I, player_id: u8) -> Result<Self, BoardError>
    where
        I: IntoIterator<Item = (&'a String, &'a Side)>,
    {
        let own_side = Side::for_player(player_id).ok_or(BoardError::BadPlayerId(player_id))?;

        let mut seen = BTreeSet::new();
        let mut own_words = BTreeSet::new();
        let mut opponent_words = BTreeSet::new();
        let mut neutral_words = BTreeSet::new();
        let mut assassins = Vec::new();

        for (word, &side) in board {
            let word = normalize(word);
            if !seen.insert(word.clone()) {
                return Err(BoardError::DuplicateWord(word));
            }
            match side {
                Side::Assassin => assassins.push(word),
                Side::Neutral => {
                    neutral_words.insert(word);
                }
                s if s == own_side => {
                    own_words.insert(word);
                }
                _ => {
                    opponent_words.insert(word);
                }
            }
        }

        if assassins.len() != 1 {
            return Err(BoardError::AssassinCount(assassins.len()));
        }
        let forbidden_word = assassins.remove(0);

        Ok(Self {
            player_id,
            own_words,
            opponent_words,
            neutral_words,
            forbidden_word,
            given_clues: BTreeSet::new(),
            history: Vec::new(),
        })
    }

    /// Partition a board given as raw platform side codes (see [`Side::from_code`]).
    pub fn from_codes(board: &BTreeMap<String, u8>, player_id: u8) -> Result<Self, BoardError> {
        let mut sides = BTreeMap::new();
        for (word, &code) in board {
            let side = Side::from_code(code).ok_or_else(|| BoardError::UnknownSide {
                word: word.clone(),
                code,
            })?;
            sides.insert(word.clone(), side);
        }
        Self::new(&sides, player_id)
    }

    /// Record a turn. Guessed words leave both team sets; absent words are ignored.
    pub fn report_turn(&mut self, report: TurnReport) {
        for guess in &report.guesses {
            let g = normalize(guess);
            self.own_words.remove(&g);
            self.opponent_words.remove(&g);
        }
        self.given_clues.insert(normalize(&report.clue_word));
        self.history.push(report);
    }

    pub fn player_id(&self) -> u8 {
        self.player_id
    }

    pub fn own_words(&self) -> &BTreeSet<String> {
        &self.own_words
    }

    pub fn opponent_words(&self) -> &BTreeSet<String> {
        &self.opponent_words
    }

    pub fn neutral_words(&self) -> &BTreeSet<String> {
        &self.neutral_words
    }

    pub fn forbidden_word(&self) -> &str {
        &self.forbidden_word
    }

    pub fn given_clues(&self) -> &BTreeSet<String> {
        &self.given_clues
    }

    pub fn history(&self) -> &[TurnReport] {
        &self.history
    }

    /// Number of turns reported so far.
    pub fn turn_idx(&self) -> u64 {
        self.history.len() as u64
    }

    /// Words a clue may not be for this turn: `invalid_words`, the remaining own
    /// and opponent words, the neutral words, the assassin and every given clue.
    pub fn exclusion_union(&self, invalid_words: &BTreeSet<String>) -> BTreeSet<String> {
        invalid_words
            .iter()
            .chain(&self.own_words)
            .chain(&self.opponent_words)
            .chain(&self.neutral_words)
            .chain(std::iter::once(&self.forbidden_word))
            .chain(&self.given_clues)
            .cloned()
            .collect()
    }
}
