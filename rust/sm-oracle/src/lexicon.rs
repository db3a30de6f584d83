//! In-process sense graph ("lexicon") with Wu-Palmer similarity.
//!
//! ## File format (YAML or JSON)
//! ```yaml
//! synsets:
//!   - id: dog.n.01
//!     lemmas: [dog, domestic_dog]
//!     hypernyms: [canine.n.02]
//!   - id: canine.n.02
//!     lemmas: [canine]
//! ```
//! - A word's senses are the synsets listing it as a lemma, in file order; the
//!   first one is its primary sense.
//! - `hypernyms` must reference ids defined in the same file; the graph must be acyclic.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::OnceLock;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{LexicalOracle, OracleError, SenseCluster};

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("Failed to read lexicon file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate synset id {0:?}")]
    DuplicateId(String),
    #[error("synset {synset:?} references unknown hypernym {hypernym:?}")]
    UnknownHypernym { synset: String, hypernym: String },
    #[error("hypernym cycle through synset {0:?}")]
    Cycle(String),
}

/// One synset as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynsetRecord {
    pub id: String,
    pub lemmas: Vec<String>,
    #[serde(default)]
    pub hypernyms: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct LexiconFile {
    synsets: Vec<SynsetRecord>,
}

#[derive(Debug)]
struct Synset {
    id: String,
    lemmas: Vec<String>,
    hypernyms: Vec<usize>,
    /// Longest hypernym path to a root (roots are 0).
    max_depth: u32,
}

#[derive(Debug)]
pub struct Lexicon {
    synsets: Vec<Synset>,
    by_lemma: FxHashMap<String, Vec<usize>>,
}

impl Lexicon {
    pub fn from_records(records: Vec<SynsetRecord>) -> Result<Self, LexiconError> {
        let mut by_id: FxHashMap<String, usize> = FxHashMap::default();
        for (i, r) in records.iter().enumerate() {
            if by_id.insert(r.id.clone(), i).is_some() {
                return Err(LexiconError::DuplicateId(r.id.clone()));
            }
        }

        let mut synsets = Vec::with_capacity(records.len());
        let mut by_lemma: FxHashMap<String, Vec<usize>> = FxHashMap::default();
        for (i, r) in records.into_iter().enumerate() {
            let mut hypernyms = Vec::with_capacity(r.hypernyms.len());
            for h in &r.hypernyms {
                let &j = by_id.get(h).ok_or_else(|| LexiconError::UnknownHypernym {
                    synset: r.id.clone(),
                    hypernym: h.clone(),
                })?;
                hypernyms.push(j);
            }
            let lemmas: Vec<String> = r.lemmas.iter().map(|l| l.trim().to_lowercase()).collect();
            for l in &lemmas {
                let senses = by_lemma.entry(l.clone()).or_default();
                if senses.last() != Some(&i) {
                    senses.push(i);
                }
            }
            synsets.push(Synset {
                id: r.id,
                lemmas,
                hypernyms,
                max_depth: 0,
            });
        }

        compute_max_depths(&mut synsets)?;
        Ok(Self { synsets, by_lemma })
    }

    /// Parse a YAML document (JSON is valid YAML too).
    pub fn from_yaml(yaml: &str) -> Result<Self, LexiconError> {
        let file: LexiconFile = serde_yaml::from_str(yaml)?;
        Self::from_records(file.synsets)
    }

    /// Load from disk; `.json` files go through serde_json, everything else through YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LexiconError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let file: LexiconFile = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&contents)?,
            _ => serde_yaml::from_str(&contents)?,
        };
        Self::from_records(file.synsets)
    }

    pub fn len(&self) -> usize {
        self.synsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.synsets.is_empty()
    }

    fn sense_ids(&self, word: &str) -> &[usize] {
        self.by_lemma
            .get(&word.trim().to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Synset ids for `word`, primary sense first.
    pub fn synset_ids(&self, word: &str) -> Vec<&str> {
        self.sense_ids(word)
            .iter()
            .map(|&i| self.synsets[i].id.as_str())
            .collect()
    }

    /// Shortest hypernym distance from `start` to each of its ancestors (itself at 0).
    fn ancestor_distances(&self, start: usize) -> FxHashMap<usize, u32> {
        let mut dist = FxHashMap::default();
        let mut q = VecDeque::new();
        dist.insert(start, 0u32);
        q.push_back(start);
        while let Some(s) = q.pop_front() {
            let d = dist[&s];
            for &h in &self.synsets[s].hypernyms {
                if !dist.contains_key(&h) {
                    dist.insert(h, d + 1);
                    q.push_back(h);
                }
            }
        }
        dist
    }

    /// Wu-Palmer similarity between two synsets, or None without a common hypernym.
    ///
    /// The subsumer is the deepest shared ancestor (ties: lowest synset index);
    /// depth counts the root as 1.
    fn wup(&self, a: usize, b: usize) -> Option<f64> {
        let da = self.ancestor_distances(a);
        let db = self.ancestor_distances(b);

        let mut best: Option<usize> = None;
        for &s in da.keys() {
            if !db.contains_key(&s) {
                continue;
            }
            best = match best {
                None => Some(s),
                Some(cur) => {
                    let (ds, dc) = (self.synsets[s].max_depth, self.synsets[cur].max_depth);
                    if ds > dc || (ds == dc && s < cur) {
                        Some(s)
                    } else {
                        Some(cur)
                    }
                }
            };
        }
        let lcs = best?;

        let depth = f64::from(self.synsets[lcs].max_depth + 1);
        let len_a = f64::from(da[&lcs]) + depth;
        let len_b = f64::from(db[&lcs]) + depth;
        Some(2.0 * depth / (len_a + len_b))
    }
}

/// Fill `max_depth` for every synset; fails on a hypernym cycle.
fn compute_max_depths(synsets: &mut [Synset]) -> Result<(), LexiconError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        New,
        Active,
        Done,
    }

    let n = synsets.len();
    let mut mark = vec![Mark::New; n];
    let mut depth = vec![0u32; n];

    for root in 0..n {
        if mark[root] == Mark::Done {
            continue;
        }
        // Iterative DFS: (node, next hypernym index to visit).
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        mark[root] = Mark::Active;
        while let Some(top) = stack.last_mut() {
            let (s, next) = *top;
            if let Some(&h) = synsets[s].hypernyms.get(next) {
                top.1 += 1;
                match mark[h] {
                    Mark::Active => return Err(LexiconError::Cycle(synsets[h].id.clone())),
                    Mark::New => {
                        mark[h] = Mark::Active;
                        stack.push((h, 0));
                    }
                    Mark::Done => {}
                }
            } else {
                let d = synsets[s]
                    .hypernyms
                    .iter()
                    .map(|&h| depth[h] + 1)
                    .max()
                    .unwrap_or(0);
                depth[s] = d;
                mark[s] = Mark::Done;
                stack.pop();
            }
        }
    }

    for (s, d) in synsets.iter_mut().zip(depth) {
        s.max_depth = d;
    }
    Ok(())
}

impl LexicalOracle for Lexicon {
    fn senses(&self, word: &str) -> Result<Vec<SenseCluster>, OracleError> {
        Ok(self
            .sense_ids(word)
            .iter()
            .map(|&i| SenseCluster::new(self.synsets[i].lemmas.iter().cloned()))
            .collect())
    }

    fn similarity(&self, a: &str, b: &str) -> Result<Option<f64>, OracleError> {
        let (Some(&sa), Some(&sb)) = (self.sense_ids(a).first(), self.sense_ids(b).first()) else {
            return Ok(None);
        };
        Ok(self.wup(sa, sb))
    }
}

static GLOBAL: OnceLock<Lexicon> = OnceLock::new();

/// Load the process-wide lexicon once. Later calls return the already loaded
/// lexicon and ignore `path`.
pub fn init_global<P: AsRef<Path>>(path: P) -> Result<&'static Lexicon, OracleError> {
    if let Some(lex) = GLOBAL.get() {
        return Ok(lex);
    }
    let path = path.as_ref();
    let lex = Lexicon::load(path)
        .map_err(|e| OracleError::Unavailable(format!("{}: {e}", path.display())))?;
    Ok(GLOBAL.get_or_init(|| lex))
}

/// The process-wide lexicon, if [`init_global`] has succeeded.
pub fn global() -> Result<&'static Lexicon, OracleError> {
    GLOBAL
        .get()
        .ok_or_else(|| OracleError::Unavailable("lexicon not initialized".to_string()))
}
