//! sm-logging: NDJSON event log for spymaster sessions.
//!
//! Append-only, one JSON object per line, so a crashed run leaves at most one
//! torn trailing line behind.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Event schema version, bumped on incompatible field changes.
pub const EVENT_SCHEMA_VERSION: u32 = 1;

pub fn now_ms() -> u64 {
    let d = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    d.as_millis() as u64
}

pub fn hash_config_bytes(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

pub fn try_git_hash() -> Option<String> {
    use std::process::Command;

    let out = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
    if !out.status.success() {
        return None;
    }
    let s = String::from_utf8(out.stdout).ok()?;
    let t = s.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

/// First line of every session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionHeaderV1 {
    pub event: String,
    pub ts_ms: u64,
    pub schema_version: u32,
    pub session_id: String,
    pub git_hash: Option<String>,
    pub config_hash: Option<String>,
    /// Agent kind per player id.
    pub agents: Vec<String>,
    pub seed: u64,
    pub board_size: u32,
}

/// One successful clue request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClueEventV1 {
    pub event: String,
    pub ts_ms: u64,
    pub session_id: String,
    pub player_id: u8,
    pub turn_idx: u64,
    pub clue: String,
    pub num_guesses: u32,

    // Present for oracle-driven agents only.
    pub mind_word: Option<String>,
    pub attempts: Option<u32>,
    pub candidates: Option<Vec<String>>,
    pub score: Option<f64>,
    pub fallback: Option<bool>,
}

/// A clue request that failed; the game continues without a clue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClueErrorEventV1 {
    pub event: String,
    pub ts_ms: u64,
    pub session_id: String,
    pub player_id: u8,
    pub turn_idx: u64,
    pub error: String,
}

/// A turn report as delivered to one agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnEventV1 {
    pub event: String,
    pub ts_ms: u64,
    pub session_id: String,
    pub player_id: u8,
    pub turn_idx: u64,
    pub is_own_turn: bool,
    pub clue_word: String,
    pub num_guesses: u32,
    pub guesses: Vec<String>,
    pub own_left: u32,
    pub opponent_left: u32,
}

#[derive(Debug)]
pub enum NdjsonError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for NdjsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NdjsonError::Io(e) => write!(f, "io error: {e}"),
            NdjsonError::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl std::error::Error for NdjsonError {}

impl From<io::Error> for NdjsonError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for NdjsonError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Append-only NDJSON writer.
///
/// Contract: each call writes exactly one JSON object followed by a newline.
pub struct NdjsonWriter {
    w: BufWriter<File>,
    lines_since_flush: u64,
    flush_every_lines: u64,
}

impl NdjsonWriter {
    /// Open a file for append. Creates it if it doesn't exist.
    pub fn open_append(path: impl AsRef<Path>) -> Result<Self, NdjsonError> {
        Self::open_append_with_flush(path, 0)
    }

    /// `flush_every_lines=0` disables periodic flushing.
    pub fn open_append_with_flush(
        path: impl AsRef<Path>,
        flush_every_lines: u64,
    ) -> Result<Self, NdjsonError> {
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            w: BufWriter::new(f),
            lines_since_flush: 0,
            flush_every_lines,
        })
    }

    pub fn write_event<T: Serialize>(&mut self, event: &T) -> Result<(), NdjsonError> {
        let mut buf = serde_json::to_vec(event)?;
        buf.push(b'\n');
        self.w.write_all(&buf)?;
        self.lines_since_flush += 1;
        if self.flush_every_lines > 0 && self.lines_since_flush >= self.flush_every_lines {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), NdjsonError> {
        self.w.flush()?;
        self.lines_since_flush = 0;
        Ok(())
    }
}

/// Read every parseable line; blank and torn lines are skipped.
pub fn read_ndjson_lenient(path: impl AsRef<Path>) -> Result<Vec<serde_json::Value>, NdjsonError> {
    let s = std::fs::read_to_string(path)?;
    Ok(s.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn writes_one_valid_json_object_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.ndjson");
        let mut w = NdjsonWriter::open_append(&path).unwrap();

        let mk = |turn_idx: u64, clue: &str| ClueEventV1 {
            event: "clue".to_string(),
            ts_ms: now_ms(),
            session_id: "s".to_string(),
            player_id: 0,
            turn_idx,
            clue: clue.to_string(),
            num_guesses: 1,
            mind_word: Some("alice".to_string()),
            attempts: Some(1),
            candidates: Some(vec!["dog".to_string(), "house".to_string()]),
            score: Some(0.1),
            fallback: Some(false),
        };
        w.write_event(&mk(0, "dog")).unwrap();
        w.write_event(&mk(1, "house")).unwrap();
        w.flush().unwrap();

        let vals = read_ndjson_lenient(&path).unwrap();
        assert_eq!(vals.len(), 2);
        assert_eq!(vals[0]["clue"], "dog");
        assert_eq!(vals[1]["turn_idx"], 1);
        assert_eq!(vals[0]["candidates"][1], "house");

        let back: ClueEventV1 = serde_json::from_value(vals[1].clone()).unwrap();
        assert_eq!(back.clue, "house");
    }

    #[test]
    fn periodic_flush_makes_lines_visible() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.ndjson");
        let mut w = NdjsonWriter::open_append_with_flush(&path, 1).unwrap();
        w.write_event(&serde_json::json!({"event": "e", "x": 1})).unwrap();
        // No explicit flush: the writer flushed after one line.
        let vals = read_ndjson_lenient(&path).unwrap();
        assert_eq!(vals.len(), 1);
    }

    #[test]
    fn lenient_reader_tolerates_trailing_partial_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.ndjson");

        {
            let mut w = NdjsonWriter::open_append(&path).unwrap();
            w.write_event(&serde_json::json!({"event": "e", "x": 1})).unwrap();
            w.flush().unwrap();
        }

        // Simulate crash: append a partial JSON line (no newline, invalid JSON).
        let mut f = OpenOptions::new().append(true).open(&path).unwrap();
        f.write_all(br#"{"event":"e","x":"#).unwrap();
        f.flush().unwrap();

        let vals = read_ndjson_lenient(&path).unwrap();
        assert_eq!(vals.len(), 1);
        assert_eq!(vals[0]["x"], 1);
    }

    #[test]
    fn reopening_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.ndjson");
        for i in 0..3 {
            let mut w = NdjsonWriter::open_append(&path).unwrap();
            w.write_event(&serde_json::json!({"event": "e", "i": i})).unwrap();
            w.flush().unwrap();
        }
        let s = fs::read_to_string(&path).unwrap();
        assert_eq!(s.lines().count(), 3);
    }

    #[test]
    fn config_hash_is_stable() {
        assert_eq!(hash_config_bytes(b"agent: {}"), hash_config_bytes(b"agent: {}"));
        assert_ne!(hash_config_bytes(b"a"), hash_config_bytes(b"b"));
        assert_eq!(hash_config_bytes(b"a").len(), 64);
    }
}
