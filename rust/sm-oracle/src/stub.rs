//! Table-driven oracle (baseline stub).

use std::collections::HashMap;

use crate::{LexicalOracle, OracleError, SenseCluster};

/// Fixed sense lists and symmetric pairwise scores. Unlisted pairs are unscorable.
#[derive(Debug, Clone, Default)]
pub struct StubOracle {
    senses: HashMap<String, Vec<SenseCluster>>,
    scores: HashMap<(String, String), f64>,
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

impl StubOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the senses of `word`; each inner slice is one sense cluster.
    pub fn with_senses(mut self, word: &str, senses: &[&[&str]]) -> Self {
        let clusters = senses
            .iter()
            .map(|lemmas| SenseCluster::new(lemmas.iter().copied()))
            .collect();
        self.senses.insert(word.to_string(), clusters);
        self
    }

    pub fn with_score(mut self, a: &str, b: &str, score: f64) -> Self {
        self.scores.insert(pair_key(a, b), score);
        self
    }
}

impl LexicalOracle for StubOracle {
    fn senses(&self, word: &str) -> Result<Vec<SenseCluster>, OracleError> {
        Ok(self.senses.get(word).cloned().unwrap_or_default())
    }

    fn similarity(&self, a: &str, b: &str) -> Result<Option<f64>, OracleError> {
        Ok(self.scores.get(&pair_key(a, b)).copied())
    }
}
