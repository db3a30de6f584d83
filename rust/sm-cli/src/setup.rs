//! Loading run inputs and wiring agents for the CLI.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use sm_agent::{ClueDiagnostics, ClueSink};
use sm_core::{AgentKind, Config, Side};
use sm_logging::NdjsonWriter;
use sm_oracle::{lexicon, DeadlineOracle, LexicalOracle, StubOracle};

pub type SharedOracle = Arc<dyn LexicalOracle + Send + Sync>;

/// Board file: YAML map `word: player0|player1|neutral|assassin`.
pub fn load_board(path: &str) -> Result<BTreeMap<String, Side>, String> {
    let s = std::fs::read_to_string(path).map_err(|e| format!("Failed to read board {path}: {e}"))?;
    serde_yaml::from_str(&s).map_err(|e| format!("Failed to parse board {path}: {e}"))
}

pub fn load_config(path: Option<&str>) -> Result<(Config, Option<String>), String> {
    match path {
        None => Ok((Config::default(), None)),
        Some(p) => {
            let bytes = std::fs::read(p).map_err(|e| format!("Failed to read config {p}: {e}"))?;
            let cfg = Config::load(p).map_err(|e| format!("Failed to load config {p}: {e}"))?;
            Ok((cfg, Some(sm_logging::hash_config_bytes(&bytes))))
        }
    }
}

/// Build the oracle for `cfg`: the process-wide lexicon behind a deadline.
///
/// Baseline agents don't consult the oracle and get an empty stub when no
/// lexicon is configured.
pub fn build_oracle(cfg: &Config) -> Result<SharedOracle, String> {
    let Some(path) = cfg.oracle.lexicon_path.as_deref() else {
        if cfg.agent.kind == AgentKind::Heuristic {
            return Err("heuristic agent needs oracle.lexicon_path (or --lexicon)".to_string());
        }
        return Ok(Arc::new(StubOracle::new()));
    };

    let lex = lexicon::init_global(path).map_err(|e| e.to_string())?;
    if cfg.oracle.timeout_ms == 0 {
        return Ok(Arc::new(lex));
    }
    let timeout = Duration::from_millis(cfg.oracle.timeout_ms);
    let oracle = DeadlineOracle::spawn(Arc::new(lex), timeout).map_err(|e| e.to_string())?;
    Ok(Arc::new(oracle))
}

/// Keeps the diagnostics of the latest clue so the caller can log them next
/// to the clue itself.
#[derive(Clone, Default)]
pub struct LastDiagnostics(Rc<RefCell<Option<ClueDiagnostics>>>);

impl LastDiagnostics {
    pub fn take(&self) -> Option<ClueDiagnostics> {
        self.0.borrow_mut().take()
    }
}

impl ClueSink for LastDiagnostics {
    fn on_clue(&mut self, diag: &ClueDiagnostics) {
        *self.0.borrow_mut() = Some(diag.clone());
    }
}

/// Optional event log; all writes are no-ops without a path.
pub struct EventLog {
    writer: Option<NdjsonWriter>,
    pub session_id: String,
}

impl EventLog {
    pub fn open(cfg: &Config) -> Result<Self, String> {
        let writer = match cfg.logging.events_path.as_deref() {
            None => None,
            Some(p) => Some(
                NdjsonWriter::open_append_with_flush(p, cfg.logging.flush_every_lines)
                    .map_err(|e| format!("Failed to open event log {p}: {e}"))?,
            ),
        };
        Ok(Self {
            writer,
            session_id: format!("sm-{}", sm_logging::now_ms()),
        })
    }

    pub fn write<T: serde::Serialize>(&mut self, event: &T) {
        if let Some(w) = self.writer.as_mut() {
            if let Err(e) = w.write_event(event) {
                eprintln!("warning: failed to write event: {e}");
            }
        }
    }

    pub fn flush(&mut self) {
        if let Some(w) = self.writer.as_mut() {
            if let Err(e) = w.flush() {
                eprintln!("warning: failed to flush event log: {e}");
            }
        }
    }
}
