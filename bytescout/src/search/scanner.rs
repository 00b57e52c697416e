use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::kmp;
use super::prefix::PrefixTable;
use super::simd::{self, VectorScan};
use crate::errors::SearchError;

/// Matching algorithm run inside each chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Prefix-function automaton, linear in text length
    #[serde(alias = "kmp")]
    Automaton,
    /// 32-byte first/last byte comparison with interior verification
    #[default]
    #[serde(alias = "simd")]
    Vectorized,
}

impl Algorithm {
    pub const ALL: [Algorithm; 2] = [Algorithm::Automaton, Algorithm::Vectorized];

    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Automaton => "kmp",
            Algorithm::Vectorized => "simd",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "kmp" | "automaton" => Ok(Algorithm::Automaton),
            "simd" | "vectorized" => Ok(Algorithm::Vectorized),
            other => Err(SearchError::config_error(format!(
                "unknown algorithm '{}' (expected kmp or simd)",
                other
            ))),
        }
    }
}

/// Offsets found in one chunk, relative to the chunk start
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkScan {
    pub offsets: Vec<usize>,
    /// Candidate lanes verified by the vectorized scanner; zero for the automaton
    pub candidates: usize,
}

impl From<VectorScan> for ChunkScan {
    fn from(scan: VectorScan) -> Self {
        Self {
            offsets: scan.offsets,
            candidates: scan.candidates,
        }
    }
}

/// Per-search scanner state shared read-only by every worker.
///
/// Derived data such as the prefix table is built once per search and
/// dropped with it.
#[derive(Debug, Clone)]
pub struct Scanner<'p> {
    pattern: &'p [u8],
    strategy: Strategy,
}

#[derive(Debug, Clone)]
enum Strategy {
    Automaton(PrefixTable),
    Vectorized,
}

impl<'p> Scanner<'p> {
    pub fn new(algorithm: Algorithm, pattern: &'p [u8]) -> Self {
        let strategy = match algorithm {
            Algorithm::Automaton => Strategy::Automaton(PrefixTable::build(pattern)),
            Algorithm::Vectorized => Strategy::Vectorized,
        };
        Self { pattern, strategy }
    }

    pub fn algorithm(&self) -> Algorithm {
        match self.strategy {
            Strategy::Automaton(_) => Algorithm::Automaton,
            Strategy::Vectorized => Algorithm::Vectorized,
        }
    }

    pub fn pattern(&self) -> &[u8] {
        self.pattern
    }

    /// Scans `text` and returns offsets relative to its first byte
    pub fn scan(&self, text: &[u8]) -> ChunkScan {
        match &self.strategy {
            Strategy::Automaton(table) => ChunkScan {
                offsets: kmp::find_all_with(text, self.pattern, table),
                candidates: 0,
            },
            Strategy::Vectorized => simd::scan(text, self.pattern).into(),
        }
    }
}
