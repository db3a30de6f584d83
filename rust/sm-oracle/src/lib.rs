//! sm-oracle: Lexical relatedness oracle interface + implementations.
//!
//! The agent only sees [`LexicalOracle`]. Concrete oracles:
//! - [`StubOracle`]: fixed tables, for tests and baselines
//! - [`Lexicon`]: in-process sense graph with Wu-Palmer similarity
//! - [`DeadlineOracle`]: wraps another oracle and bounds every call with a timeout

pub mod deadline;
pub mod lexicon;
pub mod stub;

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use deadline::DeadlineOracle;
pub use lexicon::{Lexicon, LexiconError, SynsetRecord};
pub use stub::StubOracle;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Error, Clone, PartialEq)]
pub enum OracleError {
    #[error("oracle unavailable: {0}")]
    Unavailable(String),
    #[error("oracle call timed out after {0:?}")]
    Timeout(Duration),
}

/// Lemmas for one sense of a word, most common lemma first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SenseCluster {
    pub lemmas: Vec<String>,
}

impl SenseCluster {
    pub fn new<I, S>(lemmas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lemmas: lemmas.into_iter().map(Into::into).collect(),
        }
    }

    pub fn first_lemma(&self) -> Option<&str> {
        self.lemmas.first().map(String::as_str)
    }
}

/// Sense lookup + pairwise similarity.
///
/// - `senses` returns an empty list for unknown words; it only fails when the
///   oracle itself cannot answer.
/// - `similarity` is `Ok(None)` when the pair cannot be scored; higher means more related.
pub trait LexicalOracle {
    fn senses(&self, word: &str) -> Result<Vec<SenseCluster>, OracleError>;
    fn similarity(&self, a: &str, b: &str) -> Result<Option<f64>, OracleError>;
}

impl<T: LexicalOracle + ?Sized> LexicalOracle for &T {
    fn senses(&self, word: &str) -> Result<Vec<SenseCluster>, OracleError> {
        (**self).senses(word)
    }

    fn similarity(&self, a: &str, b: &str) -> Result<Option<f64>, OracleError> {
        (**self).similarity(a, b)
    }
}

impl<T: LexicalOracle + ?Sized> LexicalOracle for Box<T> {
    fn senses(&self, word: &str) -> Result<Vec<SenseCluster>, OracleError> {
        (**self).senses(word)
    }

    fn similarity(&self, a: &str, b: &str) -> Result<Option<f64>, OracleError> {
        (**self).similarity(a, b)
    }
}

impl<T: LexicalOracle + ?Sized> LexicalOracle for Arc<T> {
    fn senses(&self, word: &str) -> Result<Vec<SenseCluster>, OracleError> {
        (**self).senses(word)
    }

    fn similarity(&self, a: &str, b: &str) -> Result<Option<f64>, OracleError> {
        (**self).similarity(a, b)
    }
}
