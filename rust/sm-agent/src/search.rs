//! Relatedness search: expand own-team "mind words" into clue candidates.
//!
//! Mind words are tried in a seeded random order without replacement, so a
//! request makes at most `min(max_attempts, |own words|)` oracle lookups and
//! never revisits a word that already produced nothing.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;

use sm_core::{exclude_all, normalize, retain_vocabulary, strip_phrases, AgentState, Vocabulary};
use sm_oracle::LexicalOracle;

use crate::ClueError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub mind_word: String,
    /// Nonempty, sorted, and disjoint from the request's exclusion union.
    pub candidates: BTreeSet<String>,
    /// Mind words tried, including the successful one.
    pub attempts: u32,
}

/// Raw candidates for one mind word: the first lemma of each sense, lower-cased.
fn expand<O: LexicalOracle + ?Sized>(
    oracle: &O,
    mind_word: &str,
) -> Result<BTreeSet<String>, ClueError> {
    Ok(oracle
        .senses(mind_word)?
        .iter()
        .filter_map(|sense| sense.first_lemma())
        .map(normalize)
        .collect())
}

/// Find a nonempty set of legal clue candidates related to one of our words.
///
/// Candidates exclude `invalid_words`, every remaining board word (both teams,
/// neutral words and the assassin), and clues already given; they are single
/// tokens from `vocab`.
pub fn find_candidates<O, R>(
    oracle: &O,
    state: &AgentState,
    vocab: &Vocabulary,
    invalid_words: &BTreeSet<String>,
    max_attempts: u32,
    rng: &mut R,
) -> Result<SearchOutcome, ClueError>
where
    O: LexicalOracle + ?Sized,
    R: Rng + ?Sized,
{
    if state.own_words().is_empty() {
        return Err(ClueError::NoOwnWordsAvailable);
    }

    let mut order: Vec<&String> = state.own_words().iter().collect();
    order.shuffle(rng);
    let limit = order.len().min(max_attempts as usize);
    let forbidden = BTreeSet::from([state.forbidden_word().to_string()]);

    for (i, mind_word) in order.into_iter().take(limit).enumerate() {
        let raw = expand(oracle, mind_word)?;
        let kept = exclude_all(
            raw,
            [
                invalid_words,
                state.own_words(),
                state.opponent_words(),
                state.neutral_words(),
                &forbidden,
                state.given_clues(),
            ],
        );
        let kept = retain_vocabulary(strip_phrases(kept), vocab);
        if !kept.is_empty() {
            return Ok(SearchOutcome {
                mind_word: mind_word.clone(),
                candidates: kept,
                attempts: (i + 1) as u32,
            });
        }
    }

    Err(ClueError::NoCandidateFound {
        attempts: limit as u32,
    })
}
