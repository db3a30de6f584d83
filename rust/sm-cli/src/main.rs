//! sm: CLI binary for the spymaster agent.
//!
//! Subcommands:
//! - clue
//! - sim
//! - senses

mod setup;
mod sim;

use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::process;

use sm_agent::{build_agent_with_sink, AgentOptions, ClueDiagnostics, ClueSink, SpyMaster};
use sm_core::{normalize, AgentKind, Config, Side, Vocabulary};
use sm_logging::{ClueErrorEventV1, ClueEventV1, SessionHeaderV1, TurnEventV1, EVENT_SCHEMA_VERSION};
use sm_oracle::LexicalOracle;

use setup::{EventLog, LastDiagnostics, SharedOracle};
use sim::{Game, Outcome, TurnRecord};

fn value_of(args: &[String], i: usize) -> String {
    if i + 1 >= args.len() {
        eprintln!("Missing value for {}", args[i]);
        process::exit(1);
    }
    args[i + 1].clone()
}

fn parse_or_exit<T: std::str::FromStr>(flag: &str, raw: &str) -> T {
    raw.parse().unwrap_or_else(|_| {
        eprintln!("Invalid {flag} value: {raw}");
        process::exit(1);
    })
}

fn parse_kind(raw: &str) -> AgentKind {
    match raw {
        "heuristic" => AgentKind::Heuristic,
        "random" => AgentKind::Random,
        "constant" => AgentKind::Constant,
        other => {
            eprintln!("Invalid --agent value: {other} (expected heuristic|random|constant)");
            process::exit(1);
        }
    }
}

fn or_exit<T>(res: Result<T, String>) -> T {
    res.unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    })
}

/// Shared `--config/--lexicon/--agent/--seed` overrides.
#[derive(Default)]
struct CommonArgs {
    config: Option<String>,
    lexicon: Option<String>,
    agent: Option<AgentKind>,
    seed: Option<u64>,
    board: Option<String>,
    vocab: Option<String>,
}

impl CommonArgs {
    /// Consume the flag at `args[i]` if it is a shared one; returns the next index.
    fn take(&mut self, args: &[String], i: usize) -> Option<usize> {
        match args[i].as_str() {
            "--config" => self.config = Some(value_of(args, i)),
            "--lexicon" => self.lexicon = Some(value_of(args, i)),
            "--agent" => self.agent = Some(parse_kind(&value_of(args, i))),
            "--seed" => self.seed = Some(parse_or_exit("--seed", &value_of(args, i))),
            "--board" => self.board = Some(value_of(args, i)),
            "--vocab" => self.vocab = Some(value_of(args, i)),
            _ => return None,
        }
        Some(i + 2)
    }

    fn resolve(&self, cmd: &str) -> (Config, Option<String>, BTreeMap<String, Side>, Vocabulary) {
        let (mut cfg, config_hash) = or_exit(setup::load_config(self.config.as_deref()));
        if let Some(l) = &self.lexicon {
            cfg.oracle.lexicon_path = Some(l.clone());
        }
        if let Some(k) = self.agent {
            cfg.agent.kind = k;
        }
        if let Some(s) = self.seed {
            cfg.agent.seed = s;
        }

        let Some(board_path) = self.board.as_deref() else {
            eprintln!("Missing --board (run `sm {cmd} --help`)");
            process::exit(1);
        };
        let board = or_exit(setup::load_board(board_path));
        let vocab = match self.vocab.as_deref() {
            Some(p) => Vocabulary::load(p).unwrap_or_else(|e| {
                eprintln!("Failed to load vocabulary {p}: {e}");
                process::exit(1);
            }),
            None if cfg.agent.kind == AgentKind::Constant => Vocabulary::default(),
            None => {
                eprintln!("Missing --vocab (run `sm {cmd} --help`)");
                process::exit(1);
            }
        };
        (cfg, config_hash, board, vocab)
    }
}

fn session_header(
    log: &EventLog,
    config_hash: Option<String>,
    agents: Vec<String>,
    seed: u64,
    board_size: usize,
) -> SessionHeaderV1 {
    SessionHeaderV1 {
        event: "session".to_string(),
        ts_ms: sm_logging::now_ms(),
        schema_version: EVENT_SCHEMA_VERSION,
        session_id: log.session_id.clone(),
        git_hash: sm_logging::try_git_hash(),
        config_hash,
        agents,
        seed,
        board_size: board_size as u32,
    }
}

fn clue_event(
    log: &EventLog,
    player_id: u8,
    turn_idx: u64,
    clue: &sm_agent::Clue,
    diag: Option<ClueDiagnostics>,
) -> ClueEventV1 {
    let (mind_word, attempts, candidates, score, fallback) = match diag {
        Some(d) => (
            Some(d.mind_word),
            Some(d.attempts),
            Some(d.candidates),
            d.score,
            Some(d.fallback),
        ),
        None => (None, None, None, None, None),
    };
    ClueEventV1 {
        event: "clue".to_string(),
        ts_ms: sm_logging::now_ms(),
        session_id: log.session_id.clone(),
        player_id,
        turn_idx,
        clue: clue.word.clone(),
        num_guesses: clue.num_guesses,
        mind_word,
        attempts,
        candidates,
        score,
        fallback,
    }
}

fn clue_error_event(log: &EventLog, player_id: u8, turn_idx: u64, error: String) -> ClueErrorEventV1 {
    ClueErrorEventV1 {
        event: "clue_error".to_string(),
        ts_ms: sm_logging::now_ms(),
        session_id: log.session_id.clone(),
        player_id,
        turn_idx,
        error,
    }
}

fn make_agent(
    cfg: &Config,
    seed: u64,
    vocab: Vocabulary,
    board: &BTreeMap<String, Side>,
    player_id: u8,
    oracle: SharedOracle,
    diag: &LastDiagnostics,
) -> Box<dyn SpyMaster> {
    let mut opts = AgentOptions::from(&cfg.agent);
    opts.seed = seed;
    let sink: Box<dyn ClueSink> = Box::new(diag.clone());
    build_agent_with_sink(&opts, vocab, board, player_id, oracle, Some(sink))
        .unwrap_or_else(|e| {
            eprintln!("Failed to build agent for player {player_id}: {e}");
            process::exit(1);
        })
}

fn cmd_clue(args: &[String]) {
    let mut common = CommonArgs::default();
    let mut player: u8 = 0;
    let mut invalid: BTreeSet<String> = BTreeSet::new();

    let mut i = 0usize;
    while i < args.len() {
        if let Some(next) = common.take(args, i) {
            i = next;
            continue;
        }
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"sm clue

USAGE:
    sm clue --board B [--vocab V] [--config C] [--player P] [--invalid a,b,...]
            [--lexicon L] [--agent heuristic|random|constant] [--seed S]

OPTIONS:
    --board B      Board YAML (word: player0|player1|neutral|assassin)
    --vocab V      Vocabulary file, one word per line (not needed for constant)
    --config C     Config YAML (default: built-in defaults)
    --player P     Player id, 0 or 1 (default: 0)
    --invalid W    Comma-separated words the clue must not be
    --lexicon L    Lexicon file, overrides oracle.lexicon_path
    --agent K      Agent kind, overrides agent.kind
    --seed S       RNG seed, overrides agent.seed
"#
                );
                return;
            }
            "--player" => {
                player = parse_or_exit("--player", &value_of(args, i));
                i += 2;
            }
            "--invalid" => {
                invalid = value_of(args, i)
                    .split(',')
                    .map(str::trim)
                    .filter(|w| !w.is_empty())
                    .map(str::to_string)
                    .collect();
                i += 2;
            }
            other => {
                eprintln!("Unknown option for `sm clue`: {}", other);
                eprintln!("Run `sm clue --help` for usage.");
                process::exit(1);
            }
        }
    }

    let (cfg, config_hash, board, vocab) = common.resolve("clue");
    let oracle = or_exit(setup::build_oracle(&cfg));
    let mut log = or_exit(EventLog::open(&cfg));
    let diag = LastDiagnostics::default();
    let mut agent = make_agent(&cfg, cfg.agent.seed, vocab, &board, player, oracle, &diag);

    let header = session_header(
        &log,
        config_hash,
        vec![agent.name().to_string()],
        cfg.agent.seed,
        board.len(),
    );
    log.write(&header);

    match agent.get_clue(&invalid) {
        Ok(clue) => {
            let ev = clue_event(&log, player, 0, &clue, diag.take());
            log.write(&ev);
            log.flush();
            println!("{} {}", clue.word, clue.num_guesses);
        }
        Err(e) => {
            let ev = clue_error_event(&log, player, 0, e.to_string());
            log.write(&ev);
            log.flush();
            eprintln!("No clue: {e}");
            process::exit(2);
        }
    }
}

fn cmd_sim(args: &[String]) {
    let mut common = CommonArgs::default();
    let mut turns: u64 = 50;

    let mut i = 0usize;
    while i < args.len() {
        if let Some(next) = common.take(args, i) {
            i = next;
            continue;
        }
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"sm sim

USAGE:
    sm sim --board B [--vocab V] [--config C] [--turns N]
           [--lexicon L] [--agent heuristic|random|constant] [--seed S]

Both players use the configured agent; player 1 gets seed S+1. Guesses pick
the unrevealed word most similar to the clue.

OPTIONS:
    --board B      Board YAML (word: player0|player1|neutral|assassin)
    --vocab V      Vocabulary file, one word per line (not needed for constant)
    --config C     Config YAML (default: built-in defaults)
    --turns N      Turn limit (default: 50)
    --lexicon L    Lexicon file, overrides oracle.lexicon_path
    --agent K      Agent kind, overrides agent.kind
    --seed S       RNG seed, overrides agent.seed
"#
                );
                return;
            }
            "--turns" => {
                turns = parse_or_exit("--turns", &value_of(args, i));
                i += 2;
            }
            other => {
                eprintln!("Unknown option for `sm sim`: {}", other);
                eprintln!("Run `sm sim --help` for usage.");
                process::exit(1);
            }
        }
    }

    let (cfg, config_hash, board, vocab) = common.resolve("sim");
    let oracle = or_exit(setup::build_oracle(&cfg));
    let mut log = or_exit(EventLog::open(&cfg));

    let diags = [LastDiagnostics::default(), LastDiagnostics::default()];
    let mut agents: [Box<dyn SpyMaster>; 2] = [0u8, 1u8].map(|p| {
        make_agent(
            &cfg,
            cfg.agent.seed.wrapping_add(p as u64),
            vocab.clone(),
            &board,
            p,
            oracle.clone(),
            &diags[p as usize],
        )
    });
    let header = session_header(
        &log,
        config_hash,
        agents.iter().map(|a| a.name().to_string()).collect(),
        cfg.agent.seed,
        board.len(),
    );
    log.write(&header);

    let sides: BTreeMap<String, Side> = board.iter().map(|(w, s)| (normalize(w), *s)).collect();
    let mut game = Game::new(sides);
    let guesser: &dyn LexicalOracle = &*oracle;

    let outcome = sim::play(&mut game, &mut agents, guesser, turns, |record, game| match record {
        TurnRecord::Clue {
            turn_idx,
            player_id,
            clue,
            guesses,
        } => {
            println!(
                "turn {turn_idx}: player {player_id} clue={} x{} guesses=[{}]",
                clue.word,
                clue.num_guesses,
                guesses.join(", ")
            );
            let diag = diags[*player_id as usize].take();
            let ev = clue_event(&log, *player_id, *turn_idx, clue, diag);
            log.write(&ev);
            for q in [0u8, 1u8] {
                let (own, opp) = match (Side::for_player(q), Side::for_player(1 - q)) {
                    (Some(o), Some(p)) => (game.words_left(o), game.words_left(p)),
                    _ => (0, 0),
                };
                let ev = TurnEventV1 {
                    event: "turn".to_string(),
                    ts_ms: sm_logging::now_ms(),
                    session_id: log.session_id.clone(),
                    player_id: q,
                    turn_idx: *turn_idx,
                    is_own_turn: q == *player_id,
                    clue_word: clue.word.clone(),
                    num_guesses: clue.num_guesses,
                    guesses: guesses.clone(),
                    own_left: own as u32,
                    opponent_left: opp as u32,
                };
                log.write(&ev);
            }
        }
        TurnRecord::Failed {
            turn_idx,
            player_id,
            error,
        } => {
            println!("turn {turn_idx}: player {player_id} passes ({error})");
            let ev = clue_error_event(&log, *player_id, *turn_idx, error.to_string());
            log.write(&ev);
        }
    });
    log.flush();

    match outcome {
        Ok(Outcome::Won(p)) => println!("Result: player {p} wins"),
        Ok(Outcome::HitAssassin(p)) => println!("Result: player {p} hit the assassin and loses"),
        Ok(Outcome::Stalled) => println!("Result: no winner"),
        Err(e) => {
            eprintln!("Guesser failed: {e}");
            process::exit(1);
        }
    }
}

fn cmd_senses(args: &[String]) {
    let mut word: Option<String> = None;
    let mut lexicon: Option<String> = None;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"sm senses

USAGE:
    sm senses WORD --lexicon L

Prints the sense clusters of WORD, one per line, most common lemma first.
"#
                );
                return;
            }
            "--lexicon" => {
                lexicon = Some(value_of(args, i));
                i += 2;
            }
            other if other.starts_with("--") => {
                eprintln!("Unknown option for `sm senses`: {}", other);
                eprintln!("Run `sm senses --help` for usage.");
                process::exit(1);
            }
            other => {
                word = Some(other.to_string());
                i += 1;
            }
        }
    }

    let Some(word) = word else {
        eprintln!("Usage: sm senses WORD --lexicon L");
        process::exit(1);
    };
    let Some(path) = lexicon else {
        eprintln!("Missing --lexicon");
        process::exit(1);
    };
    let lex = sm_oracle::lexicon::init_global(&path).unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });
    let senses = lex.senses(&word).unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });
    if senses.is_empty() {
        println!("(no senses for {word})");
    }
    for (k, s) in senses.iter().enumerate() {
        println!("{k}: {}", s.lemmas.join(", "));
    }
}

fn print_help() {
    eprintln!(
        r#"sm - Spymaster agent CLI

USAGE:
    sm <COMMAND> [OPTIONS]

COMMANDS:
    clue        Build the configured agent and print one clue
    sim         Play both spymasters against a similarity guesser
    senses      Print the sense clusters of a word

OPTIONS:
    -h, --help          Print this help message
    -V, --version       Print version

Run `sm <COMMAND> --help` for command options.
"#
    );
}

fn print_version() {
    println!("sm {}", env!("CARGO_PKG_VERSION"));
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_help();
        process::exit(0);
    }

    match args[1].as_str() {
        "-h" | "--help" | "help" => {
            print_help();
        }
        "-V" | "--version" => {
            print_version();
        }
        "clue" => {
            cmd_clue(&args[2..]);
        }
        "sim" => {
            cmd_sim(&args[2..]);
        }
        "senses" => {
            cmd_senses(&args[2..]);
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            eprintln!("Run `sm --help` for usage.");
            process::exit(1);
        }
    }
}
