//! Scored selection: pick the candidate least similar to the assassin word.

use std::collections::BTreeSet;

use rand::Rng;

use sm_oracle::LexicalOracle;

use crate::ClueError;

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub word: String,
    /// Similarity to the forbidden word; None when chosen by fallback.
    pub score: Option<f64>,
    /// Number of candidates the oracle could score.
    pub scored: usize,
}

impl Selection {
    pub fn is_fallback(&self) -> bool {
        self.score.is_none()
    }
}

/// Lowest-scoring candidate against `forbidden_word`.
///
/// - unscorable (and NaN) candidates are skipped
/// - ties go to the lexically smallest word (candidates iterate sorted)
/// - if nothing is scorable, a uniformly random candidate drawn from `rng`
pub fn select_best<O, R>(
    oracle: &O,
    forbidden_word: &str,
    candidates: &BTreeSet<String>,
    rng: &mut R,
) -> Result<Selection, ClueError>
where
    O: LexicalOracle + ?Sized,
    R: Rng + ?Sized,
{
    if candidates.is_empty() {
        return Err(ClueError::EmptyCandidateSet);
    }

    let mut best: Option<(&String, f64)> = None;
    let mut scored = 0usize;
    for candidate in candidates {
        let Some(score) = oracle.similarity(forbidden_word, candidate)? else {
            continue;
        };
        if score.is_nan() {
            continue;
        }
        scored += 1;
        match best {
            Some((_, s)) if s <= score => {}
            _ => best = Some((candidate, score)),
        }
    }

    if let Some((word, score)) = best {
        return Ok(Selection {
            word: word.clone(),
            score: Some(score),
            scored,
        });
    }

    let idx = rng.gen_range(0..candidates.len());
    let word = candidates
        .iter()
        .nth(idx)
        .cloned()
        .ok_or(ClueError::EmptyCandidateSet)?;
    Ok(Selection {
        word,
        score: None,
        scored: 0,
    })
}
