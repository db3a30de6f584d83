//! Shared deterministic fixtures for the criterion benches.

use std::collections::{BTreeMap, BTreeSet};

use sm_core::{AgentState, Side, Vocabulary};
use sm_oracle::StubOracle;

/// Deterministic word generator (LCG); words look like `w0042x`.
pub fn gen_words(n: usize, salt: u64) -> Vec<String> {
    let mut out = Vec::with_capacity(n);
    let mut x: u64 = 0xA5A5_A5A5_0123_4567 ^ salt;
    for i in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        let tail = (b'a' + (x >> 59) as u8 % 26) as char;
        // Every 8th word is a multi-word phrase.
        if i % 8 == 7 {
            out.push(format!("w{i:04}_{tail}"));
        } else {
            out.push(format!("w{i:04}{tail}"));
        }
    }
    out
}

/// 25-word board: 9 for player 0, 8 for player 1, 7 neutral, 1 assassin.
pub fn board() -> BTreeMap<String, Side> {
    let mut b = BTreeMap::new();
    for (i, w) in gen_words(25, 1).into_iter().enumerate() {
        let side = match i {
            0..=8 => Side::Player0,
            9..=16 => Side::Player1,
            17..=23 => Side::Neutral,
            _ => Side::Assassin,
        };
        b.insert(w.replace('_', ""), side);
    }
    b
}

pub fn state() -> AgentState {
    // Generated board words are unique.
    match AgentState::new(&board(), 0) {
        Ok(s) => s,
        Err(e) => panic!("bench board is malformed: {e}"),
    }
}

pub fn vocabulary(n: usize) -> Vocabulary {
    Vocabulary::from_words(gen_words(n, 2))
}

/// Candidate set plus an oracle that scores every candidate against `forbidden`.
pub fn scored_candidates(n: usize, forbidden: &str) -> (BTreeSet<String>, StubOracle) {
    let words: BTreeSet<String> = gen_words(n, 3).into_iter().collect();
    let mut oracle = StubOracle::new();
    for (i, w) in words.iter().enumerate() {
        // Skip every 5th word so the selector also walks unscorable entries.
        if i % 5 != 4 {
            let score = ((i * 37) % 101) as f64 / 100.0;
            oracle = oracle.with_score(forbidden, w, score);
        }
    }
    (words, oracle)
}
