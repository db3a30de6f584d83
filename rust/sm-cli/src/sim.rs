//! Two-spymaster game loop with a similarity-driven guesser.

use std::collections::{BTreeMap, BTreeSet};

use sm_agent::{Clue, ClueError, SpyMaster};
use sm_core::{Side, TurnReport};
use sm_oracle::{LexicalOracle, OracleError};

/// Consecutive failed clue requests (across both players) that end the game.
pub const MAX_CONSECUTIVE_FAILURES: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every word of this player was revealed.
    Won(u8),
    /// This player's guesser hit the assassin word.
    HitAssassin(u8),
    /// Turn limit reached, or nobody could produce a clue.
    Stalled,
}

/// One played turn, as seen from the clue giver.
#[derive(Debug, Clone)]
pub enum TurnRecord {
    Clue {
        turn_idx: u64,
        player_id: u8,
        clue: Clue,
        guesses: Vec<String>,
    },
    Failed {
        turn_idx: u64,
        player_id: u8,
        error: ClueError,
    },
}

/// Revealed/unrevealed words of a running game.
pub struct Game {
    sides: BTreeMap<String, Side>,
    revealed: BTreeSet<String>,
}

impl Game {
    /// `sides` keys must already be normalized.
    pub fn new(sides: BTreeMap<String, Side>) -> Self {
        Self {
            sides,
            revealed: BTreeSet::new(),
        }
    }

    pub fn unrevealed(&self) -> BTreeSet<String> {
        self.sides
            .keys()
            .filter(|w| !self.revealed.contains(*w))
            .cloned()
            .collect()
    }

    pub fn words_left(&self, side: Side) -> usize {
        self.sides
            .iter()
            .filter(|(w, s)| **s == side && !self.revealed.contains(*w))
            .count()
    }

    fn reveal(&mut self, word: &str) -> Option<Side> {
        let side = *self.sides.get(word)?;
        self.revealed.insert(word.to_string());
        Some(side)
    }
}

/// Guesser: picks the unrevealed word most similar to the clue.
///
/// Unscorable words rank below every scored word; ties go to the lexically
/// first word.
pub fn best_guess<O: LexicalOracle + ?Sized>(
    oracle: &O,
    clue: &str,
    unrevealed: &BTreeSet<String>,
) -> Result<Option<String>, OracleError> {
    let mut best: Option<(&String, Option<f64>)> = None;
    for word in unrevealed {
        let score = oracle.similarity(clue, word)?.filter(|s| !s.is_nan());
        let better = match best {
            None => true,
            Some((_, None)) => score.is_some(),
            Some((_, Some(b))) => matches!(score, Some(s) if s > b),
        };
        if better {
            best = Some((word, score));
        }
    }
    Ok(best.map(|(w, _)| w.clone()))
}

/// Play until someone wins, the assassin is hit, or `max_turns` turns passed.
///
/// `agents[p]` is the spymaster of player `p`. Every turn report is delivered
/// to both agents; a failed clue request passes the turn without a report.
pub fn play<O, F>(
    game: &mut Game,
    agents: &mut [Box<dyn SpyMaster>; 2],
    guesser: &O,
    max_turns: u64,
    mut on_turn: F,
) -> Result<Outcome, OracleError>
where
    O: LexicalOracle + ?Sized,
    F: FnMut(&TurnRecord, &Game),
{
    let mut failures = 0u32;
    for turn_idx in 0..max_turns {
        let player_id = (turn_idx % 2) as u8;
        let p = player_id as usize;

        let invalid = game.unrevealed();
        let clue = match agents[p].get_clue(&invalid) {
            Ok(c) => c,
            Err(error) => {
                on_turn(
                    &TurnRecord::Failed {
                        turn_idx,
                        player_id,
                        error,
                    },
                    &*game,
                );
                failures += 1;
                if failures >= MAX_CONSECUTIVE_FAILURES {
                    return Ok(Outcome::Stalled);
                }
                continue;
            }
        };
        failures = 0;

        let own_side = Side::for_player(player_id);
        let mut guesses = Vec::new();
        let mut outcome = None;
        for _ in 0..clue.num_guesses {
            let Some(word) = best_guess(guesser, &clue.word, &game.unrevealed())? else {
                break;
            };
            let side = game.reveal(&word);
            guesses.push(word);
            match side {
                Some(Side::Assassin) => {
                    outcome = Some(Outcome::HitAssassin(player_id));
                    break;
                }
                Some(s) if Some(s) == own_side => {
                    // Last own word: the game is over before any further guess.
                    if game.words_left(s) == 0 {
                        outcome = Some(Outcome::Won(player_id));
                        break;
                    }
                }
                _ => break,
            }
        }

        for (q, agent) in agents.iter_mut().enumerate() {
            agent.update(TurnReport {
                is_own_turn: q == p,
                clue_word: clue.word.clone(),
                num_guesses: clue.num_guesses,
                guesses: guesses.clone(),
            });
        }
        on_turn(
            &TurnRecord::Clue {
                turn_idx,
                player_id,
                clue,
                guesses,
            },
            &*game,
        );

        if let Some(o) = outcome {
            return Ok(o);
        }
        for id in [player_id, 1 - player_id] {
            if let Some(side) = Side::for_player(id) {
                if game.words_left(side) == 0 {
                    return Ok(Outcome::Won(id));
                }
            }
        }
    }
    Ok(Outcome::Stalled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sm_agent::ConstantBot;
    use sm_core::AgentState;
    use sm_oracle::StubOracle;

    fn board() -> BTreeMap<String, Side> {
        [
            ("alice", Side::Player0),
            ("anna", Side::Player0),
            ("bob", Side::Player1),
            ("cat", Side::Neutral),
            ("zebra", Side::Assassin),
        ]
        .into_iter()
        .map(|(w, s)| (w.to_string(), s))
        .collect()
    }

    fn constant(player_id: u8, clue: &str) -> Box<dyn SpyMaster> {
        let state = AgentState::new(&board(), player_id).unwrap();
        Box::new(ConstantBot::new(state, clue))
    }

    #[test]
    fn guesser_prefers_scored_then_lexical() {
        let words: BTreeSet<String> = ["a", "b", "c"].iter().map(|w| w.to_string()).collect();
        let none = StubOracle::new();
        assert_eq!(best_guess(&none, "x", &words).unwrap().as_deref(), Some("a"));

        let oracle = StubOracle::new().with_score("x", "c", 0.2).with_score("x", "b", 0.2);
        assert_eq!(best_guess(&oracle, "x", &words).unwrap().as_deref(), Some("b"));

        let oracle = oracle.with_score("x", "c", 0.9);
        assert_eq!(best_guess(&oracle, "x", &words).unwrap().as_deref(), Some("c"));
        assert_eq!(best_guess(&oracle, "x", &BTreeSet::new()).unwrap(), None);
    }

    #[test]
    fn player_wins_by_revealing_own_words() {
        let guesser = StubOracle::new()
            .with_score("people", "alice", 0.9)
            .with_score("people", "anna", 0.8);
        let mut game = Game::new(board());
        let mut agents = [constant(0, "people"), constant(1, "people")];

        let mut records = Vec::new();
        let out = play(&mut game, &mut agents, &guesser, 10, |r, _| records.push(r.clone())).unwrap();
        assert_eq!(out, Outcome::Won(0));
        assert_eq!(records.len(), 2);
        assert_eq!(game.words_left(Side::Player0), 0);
    }

    /// Fixed clue with a fixed guess count, whatever the board.
    struct Fixed(&'static str, u32);

    impl SpyMaster for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }
        fn get_clue(&mut self, _invalid: &BTreeSet<String>) -> Result<Clue, ClueError> {
            Ok(Clue::new(self.0, self.1))
        }
        fn update(&mut self, _report: TurnReport) {}
    }

    #[test]
    fn revealing_last_own_word_wins_before_further_guesses() {
        let sides: BTreeMap<String, Side> = [
            ("alice", Side::Player0),
            ("bob", Side::Player1),
            ("zebra", Side::Assassin),
        ]
        .into_iter()
        .map(|(w, s)| (w.to_string(), s))
        .collect();
        // The assassin ranks second; a second guess would hit it.
        let guesser = StubOracle::new()
            .with_score("people", "alice", 0.9)
            .with_score("people", "zebra", 0.5);
        let mut game = Game::new(sides);
        let mut agents: [Box<dyn SpyMaster>; 2] =
            [Box::new(Fixed("people", 2)), Box::new(Fixed("people", 2))];

        let mut guesses = Vec::new();
        let out = play(&mut game, &mut agents, &guesser, 10, |r, _| {
            if let TurnRecord::Clue { guesses: g, .. } = r {
                guesses.push(g.clone());
            }
        })
        .unwrap();
        assert_eq!(out, Outcome::Won(0));
        assert_eq!(guesses, vec![vec!["alice".to_string()]]);
        assert_eq!(game.words_left(Side::Assassin), 1);
    }

    #[test]
    fn hitting_the_assassin_ends_the_game() {
        let guesser = StubOracle::new().with_score("stripes", "zebra", 0.9);
        let mut game = Game::new(board());
        let mut agents = [constant(0, "stripes"), constant(1, "stripes")];

        let out = play(&mut game, &mut agents, &guesser, 10, |_, _| {}).unwrap();
        assert_eq!(out, Outcome::HitAssassin(0));
    }

    #[test]
    fn wrong_guess_passes_the_turn() {
        // Unscored: the guesser walks the board in lexical order.
        let guesser = StubOracle::new();
        let mut game = Game::new(board());
        let mut agents = [constant(0, "x"), constant(1, "x")];

        let mut guesses = Vec::new();
        play(&mut game, &mut agents, &guesser, 2, |r, _| {
            if let TurnRecord::Clue { guesses: g, .. } = r {
                guesses.push(g.clone());
            }
        })
        .unwrap();
        // Player 0 guesses "alice" (own) but the clue claims one guess; player 1
        // then guesses "anna" (opponent's) and stops.
        assert_eq!(guesses, vec![vec!["alice".to_string()], vec!["anna".to_string()]]);
    }

    #[test]
    fn repeated_clue_failures_stall() {
        struct Mute;
        impl SpyMaster for Mute {
            fn name(&self) -> &'static str {
                "mute"
            }
            fn get_clue(&mut self, _invalid: &BTreeSet<String>) -> Result<Clue, ClueError> {
                Err(ClueError::EmptyCandidateSet)
            }
            fn update(&mut self, _report: TurnReport) {
                panic!("failed turns must not be reported");
            }
        }

        let mut game = Game::new(board());
        let mut agents: [Box<dyn SpyMaster>; 2] = [Box::new(Mute), Box::new(Mute)];
        let mut failed = 0;
        let out = play(&mut game, &mut agents, &StubOracle::new(), 10, |r, _| {
            if matches!(r, TurnRecord::Failed { .. }) {
                failed += 1;
            }
        })
        .unwrap();
        assert_eq!(out, Outcome::Stalled);
        assert_eq!(failed, MAX_CONSECUTIVE_FAILURES);
    }
}
