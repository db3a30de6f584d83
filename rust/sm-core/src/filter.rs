//! Candidate filtering: pure set transforms over clue candidates.

use std::collections::BTreeSet;

use crate::vocab::Vocabulary;

/// Joins the words of a multi-word lemma (e.g. `ice_cream`).
pub const PHRASE_SEPARATOR: char = '_';

/// True if `word` is usable as a one-word clue.
pub fn is_single_token(word: &str) -> bool {
    !word.is_empty() && !word.contains(PHRASE_SEPARATOR) && !word.chars().any(char::is_whitespace)
}

/// Drop multi-word phrases (and empty strings) from `candidates`.
pub fn strip_phrases(mut candidates: BTreeSet<String>) -> BTreeSet<String> {
    candidates.retain(|w| is_single_token(w));
    candidates
}

/// `candidates` minus the union of every set in `exclusions`.
pub fn exclude_all<'a, I>(mut candidates: BTreeSet<String>, exclusions: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a BTreeSet<String>>,
{
    for set in exclusions {
        if candidates.is_empty() {
            break;
        }
        candidates.retain(|w| !set.contains(w));
    }
    candidates
}

/// Keep only words that are legal clues.
pub fn retain_vocabulary(mut candidates: BTreeSet<String>, vocab: &Vocabulary) -> BTreeSet<String> {
    candidates.retain(|w| vocab.contains(w));
    candidates
}
