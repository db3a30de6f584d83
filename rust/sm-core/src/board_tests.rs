#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use crate::{AgentState, BoardError, Side, TurnReport};

    fn board(entries: &[(&str, Side)]) -> BTreeMap<String, Side> {
        entries
            .iter()
            .map(|(w, s)| (w.to_string(), *s))
            .collect()
    }

    fn sample_board() -> BTreeMap<String, Side> {
        board(&[
            ("alice", Side::Player0),
            ("bob", Side::Player1),
            ("cat", Side::Neutral),
            ("zebra", Side::Assassin),
        ])
    }

    fn set(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn turn(clue: &str, guesses: &[&str]) -> TurnReport {
        TurnReport {
            is_own_turn: true,
            clue_word: clue.to_string(),
            num_guesses: 1,
            guesses: guesses.iter().map(|g| g.to_string()).collect(),
        }
    }

    #[test]
    fn partitions_board_for_player_zero() {
        let s = AgentState::new(&sample_board(), 0).unwrap();
        assert_eq!(s.own_words(), &set(&["alice"]));
        assert_eq!(s.opponent_words(), &set(&["bob"]));
        assert_eq!(s.neutral_words(), &set(&["cat"]));
        assert_eq!(s.forbidden_word(), "zebra");
        assert!(s.given_clues().is_empty());
    }

    #[test]
    fn partitions_board_for_player_one() {
        let s = AgentState::new(&sample_board(), 1).unwrap();
        assert_eq!(s.own_words(), &set(&["bob"]));
        assert_eq!(s.opponent_words(), &set(&["alice"]));
    }

    #[test]
    fn partition_is_disjoint_and_covers_board() {
        let b = board(&[
            ("apple", Side::Player0),
            ("berlin", Side::Player0),
            ("cloud", Side::Player1),
            ("drum", Side::Player1),
            ("eagle", Side::Neutral),
            ("fire", Side::Neutral),
            ("ghost", Side::Assassin),
        ]);
        let s = AgentState::new(&b, 0).unwrap();

        let forbidden = set(&[s.forbidden_word()]);
        assert!(s.own_words().is_disjoint(s.opponent_words()));
        assert!(s.own_words().is_disjoint(&forbidden));
        assert!(s.opponent_words().is_disjoint(&forbidden));

        let mut all: BTreeSet<String> = BTreeSet::new();
        all.extend(s.own_words().iter().cloned());
        all.extend(s.opponent_words().iter().cloned());
        all.extend(s.neutral_words().iter().cloned());
        all.extend(forbidden);
        let expected: BTreeSet<String> = b.keys().cloned().collect();
        assert_eq!(all, expected);
    }

    #[test]
    fn board_words_are_lowercased() {
        let b = board(&[("Alice", Side::Player0), ("ZEBRA", Side::Assassin)]);
        let s = AgentState::new(&b, 0).unwrap();
        assert!(s.own_words().contains("alice"));
        assert_eq!(s.forbidden_word(), "zebra");
    }

    #[test]
    fn missing_assassin_is_malformed() {
        let b = board(&[("alice", Side::Player0), ("bob", Side::Player1)]);
        assert_eq!(
            AgentState::new(&b, 0).unwrap_err(),
            BoardError::AssassinCount(0)
        );
    }

    #[test]
    fn two_assassins_are_malformed() {
        let b = board(&[
            ("alice", Side::Player0),
            ("x", Side::Assassin),
            ("y", Side::Assassin),
        ]);
        assert_eq!(
            AgentState::new(&b, 0).unwrap_err(),
            BoardError::AssassinCount(2)
        );
    }

    #[test]
    fn unknown_side_code_is_malformed() {
        let mut b = BTreeMap::new();
        b.insert("alice".to_string(), 0u8);
        b.insert("zebra".to_string(), 3u8);
        b.insert("odd".to_string(), 7u8);
        let err = AgentState::from_codes(&b, 0).unwrap_err();
        assert_eq!(
            err,
            BoardError::UnknownSide {
                word: "odd".to_string(),
                code: 7
            }
        );
    }

    #[test]
    fn from_codes_matches_platform_convention() {
        let mut b = BTreeMap::new();
        b.insert("alice".to_string(), 0u8);
        b.insert("bob".to_string(), 1u8);
        b.insert("cat".to_string(), 2u8);
        b.insert("zebra".to_string(), 3u8);
        let s = AgentState::from_codes(&b, 0).unwrap();
        assert_eq!(s, AgentState::new(&sample_board(), 0).unwrap());
    }

    #[test]
    fn bad_player_id_is_rejected() {
        assert_eq!(
            AgentState::new(&sample_board(), 2).unwrap_err(),
            BoardError::BadPlayerId(2)
        );
    }

    #[test]
    fn case_collision_is_duplicate() {
        let b = board(&[
            ("Alice", Side::Player0),
            ("alice", Side::Player1),
            ("zebra", Side::Assassin),
        ]);
        assert!(matches!(
            AgentState::new(&b, 0),
            Err(BoardError::DuplicateWord(_))
        ));
    }

    #[test]
    fn report_turn_removes_guesses_from_both_sides() {
        let mut s = AgentState::new(&sample_board(), 0).unwrap();
        s.report_turn(turn("dog", &["alice", "bob"]));
        assert!(s.own_words().is_empty());
        assert!(s.opponent_words().is_empty());
        assert_eq!(s.given_clues(), &set(&["dog"]));
        assert_eq!(s.turn_idx(), 1);
    }

    #[test]
    fn report_turn_is_idempotent_on_board_sets() {
        let mut once = AgentState::new(&sample_board(), 0).unwrap();
        once.report_turn(turn("dog", &["alice"]));

        let mut twice = once.clone();
        twice.report_turn(turn("dog", &["alice"]));

        assert_eq!(once.own_words(), twice.own_words());
        assert_eq!(once.opponent_words(), twice.opponent_words());
        assert_eq!(once.given_clues(), twice.given_clues());
    }

    #[test]
    fn report_turn_ignores_absent_and_neutral_words() {
        let mut s = AgentState::new(&sample_board(), 0).unwrap();
        s.report_turn(turn("pet", &["cat", "nonexistent"]));
        assert_eq!(s.own_words(), &set(&["alice"]));
        assert_eq!(s.opponent_words(), &set(&["bob"]));
    }

    #[test]
    fn team_words_shrink_monotonically() {
        let mut s = AgentState::new(&sample_board(), 0).unwrap();
        let mut prev = s.own_words().len() + s.opponent_words().len();
        let rounds: [&[&str]; 4] = [&["cat"], &["bob"], &["bob", "alice"], &[]];
        for guesses in rounds {
            s.report_turn(turn("x", guesses));
            let now = s.own_words().len() + s.opponent_words().len();
            assert!(now <= prev);
            prev = now;
        }
        assert_eq!(prev, 0);
        assert_eq!(s.forbidden_word(), "zebra");
    }

    #[test]
    fn exclusion_union_covers_all_sources() {
        let mut s = AgentState::new(&sample_board(), 0).unwrap();
        s.report_turn(TurnReport {
            is_own_turn: false,
            clue_word: "Mouse".to_string(),
            num_guesses: 2,
            guesses: vec![],
        });
        let ex = s.exclusion_union(&set(&["alicelike"]));
        assert_eq!(ex, set(&["alice", "alicelike", "bob", "cat", "mouse", "zebra"]));
    }
}
