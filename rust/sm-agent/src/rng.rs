//! Per-turn RNG streams.
//!
//! A clue request never advances shared RNG state: each turn gets a fresh
//! ChaCha8 stream derived from the agent seed and the turn index, so repeating a
//! request against the same state repeats its answer.

use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;

/// Stable seed mixer (SplitMix64).
pub fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

pub fn turn_rng(seed: u64, turn_idx: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(splitmix64(seed ^ turn_idx.wrapping_mul(0x9E37_79B9_7F4A_7C15)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn same_turn_same_stream() {
        let a: u64 = turn_rng(7, 3).gen();
        let b: u64 = turn_rng(7, 3).gen();
        assert_eq!(a, b);
    }

    #[test]
    fn turns_get_distinct_streams() {
        let a: u64 = turn_rng(7, 3).gen();
        let b: u64 = turn_rng(7, 4).gen();
        let c: u64 = turn_rng(8, 3).gen();
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}
