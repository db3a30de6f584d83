//! Clue vocabulary: the fixed set of words a spymaster may say.

use std::collections::BTreeSet;
use std::path::Path;

use thiserror::Error;

use crate::word::normalize;

#[derive(Error, Debug)]
pub enum VocabError {
    #[error("Failed to read vocabulary file: {0}")]
    Io(#[from] std::io::Error),
    #[error("vocabulary is empty")]
    Empty,
}

/// Immutable set of legal clue words (normalized, sorted).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    words: BTreeSet<String>,
}

impl Vocabulary {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| normalize(w.as_ref()))
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// Load a word-per-line file. Blank lines and `#` comments are skipped.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, VocabError> {
        let contents = std::fs::read_to_string(path)?;
        let vocab = Self::from_words(
            contents
                .lines()
                .map(str::trim)
                .filter(|l| !l.starts_with('#')),
        );
        if vocab.is_empty() {
            return Err(VocabError::Empty);
        }
        Ok(vocab)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &BTreeSet<String> {
        &self.words
    }
}
