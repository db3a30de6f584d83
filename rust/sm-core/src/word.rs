//! Words and board side markers.

use serde::{Deserialize, Serialize};

/// Canonical form of a word: trimmed and lower-cased.
pub fn normalize(word: &str) -> String {
    word.trim().to_lowercase()
}

/// Owner of a board word, as reported by the game platform.
///
/// Numeric codes follow the platform convention:
/// - 0, 1: player ids
/// - 2: neutral
/// - 3: assassin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player0,
    Player1,
    Neutral,
    Assassin,
}

impl Side {
    pub fn from_code(code: u8) -> Option<Side> {
        match code {
            0 => Some(Side::Player0),
            1 => Some(Side::Player1),
            2 => Some(Side::Neutral),
            3 => Some(Side::Assassin),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Side::Player0 => 0,
            Side::Player1 => 1,
            Side::Neutral => 2,
            Side::Assassin => 3,
        }
    }

    /// Side for a player id (0 or 1).
    pub fn for_player(player_id: u8) -> Option<Side> {
        match player_id {
            0 => Some(Side::Player0),
            1 => Some(Side::Player1),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_roundtrip() {
        for code in 0..4u8 {
            let side = Side::from_code(code).unwrap();
            assert_eq!(side.code(), code);
        }
        assert_eq!(Side::from_code(4), None);
    }

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize("  Zebra\n"), "zebra");
    }

    #[test]
    fn side_parses_from_yaml_names() {
        let s: Side = serde_yaml::from_str("assassin").unwrap();
        assert_eq!(s, Side::Assassin);
        let s: Side = serde_yaml::from_str("player1").unwrap();
        assert_eq!(s, Side::Player1);
    }
}
