//! Spymaster implementations.

use std::collections::BTreeSet;

use rand::Rng;

use sm_core::{is_single_token, normalize, AgentState, TurnReport, Vocabulary};
use sm_oracle::LexicalOracle;

use crate::rng::turn_rng;
use crate::search::find_candidates;
use crate::select::select_best;
use crate::{Clue, ClueDiagnostics, ClueError, ClueSink, SpyMaster};

fn normalized(words: &BTreeSet<String>) -> BTreeSet<String> {
    words.iter().map(|w| normalize(w)).collect()
}

/// Always answers with the same clue (one guess), ignoring the board.
///
/// A plumbing stub: the clue is not checked against `invalid_words`, the board
/// or the vocabulary, so it may be an illegal clue.
pub struct ConstantBot {
    state: AgentState,
    clue: String,
}

impl ConstantBot {
    pub fn new(state: AgentState, clue: impl Into<String>) -> Self {
        Self {
            state,
            clue: clue.into(),
        }
    }

    pub fn state(&self) -> &AgentState {
        &self.state
    }
}

impl SpyMaster for ConstantBot {
    fn name(&self) -> &'static str {
        "constant"
    }

    fn get_clue(&mut self, _invalid_words: &BTreeSet<String>) -> Result<Clue, ClueError> {
        Ok(Clue::new(self.clue.clone(), 1))
    }

    fn update(&mut self, report: TurnReport) {
        self.state.report_turn(report);
    }
}

/// Uniformly random single-token vocabulary word outside the exclusion union.
pub struct RandomBot {
    vocab: Vocabulary,
    state: AgentState,
    seed: u64,
    num_guesses: u32,
}

impl RandomBot {
    pub fn new(vocab: Vocabulary, state: AgentState, seed: u64, num_guesses: u32) -> Self {
        Self {
            vocab,
            state,
            seed,
            num_guesses,
        }
    }

    pub fn state(&self) -> &AgentState {
        &self.state
    }
}

impl SpyMaster for RandomBot {
    fn name(&self) -> &'static str {
        "random"
    }

    fn get_clue(&mut self, invalid_words: &BTreeSet<String>) -> Result<Clue, ClueError> {
        let excluded = self.state.exclusion_union(&normalized(invalid_words));
        let allowed: Vec<&String> = self
            .vocab
            .words()
            .difference(&excluded)
            .filter(|w| is_single_token(w))
            .collect();
        if allowed.is_empty() {
            return Err(ClueError::EmptyCandidateSet);
        }
        let mut rng = turn_rng(self.seed, self.state.turn_idx());
        let word = allowed[rng.gen_range(0..allowed.len())];
        Ok(Clue::new(word.clone(), self.num_guesses))
    }

    fn update(&mut self, report: TurnReport) {
        self.state.report_turn(report);
    }
}

/// Oracle-driven spymaster.
///
/// Picks a mind word among our remaining words, collects related vocabulary
/// words through the oracle, then offers the one least similar to the assassin
/// word. Always claims one guess.
pub struct HeuristicBot<O> {
    vocab: Vocabulary,
    state: AgentState,
    oracle: O,
    seed: u64,
    max_attempts: u32,
    sink: Option<Box<dyn ClueSink>>,
}

impl<O: LexicalOracle> HeuristicBot<O> {
    pub fn new(vocab: Vocabulary, state: AgentState, oracle: O, seed: u64, max_attempts: u32) -> Self {
        Self {
            vocab,
            state,
            oracle,
            seed,
            max_attempts,
            sink: None,
        }
    }

    /// Report per-clue diagnostics to `sink`.
    pub fn with_sink(mut self, sink: Box<dyn ClueSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn state(&self) -> &AgentState {
        &self.state
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }
}

impl<O: LexicalOracle> SpyMaster for HeuristicBot<O> {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn get_clue(&mut self, invalid_words: &BTreeSet<String>) -> Result<Clue, ClueError> {
        let invalid = normalized(invalid_words);
        let turn_idx = self.state.turn_idx();
        let mut rng = turn_rng(self.seed, turn_idx);

        let found = find_candidates(
            &self.oracle,
            &self.state,
            &self.vocab,
            &invalid,
            self.max_attempts,
            &mut rng,
        )?;
        let selection = select_best(
            &self.oracle,
            self.state.forbidden_word(),
            &found.candidates,
            &mut rng,
        )?;
        let clue = Clue::new(selection.word.clone(), 1);

        if let Some(sink) = self.sink.as_mut() {
            sink.on_clue(&ClueDiagnostics {
                turn_idx,
                mind_word: found.mind_word,
                attempts: found.attempts,
                candidates: found.candidates.into_iter().collect(),
                clue: clue.word.clone(),
                num_guesses: clue.num_guesses,
                score: selection.score,
                fallback: selection.is_fallback(),
            });
        }
        Ok(clue)
    }

    fn update(&mut self, report: TurnReport) {
        self.state.report_turn(report);
    }
}
