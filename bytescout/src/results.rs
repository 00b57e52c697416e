use serde::Serialize;

use crate::search::partition::Chunk;
use crate::search::scanner::{Algorithm, ChunkScan};

/// Matches found by one worker, already rebased to buffer offsets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkResult {
    pub chunk: Chunk,
    /// Absolute offsets, ascending
    pub offsets: Vec<usize>,
    pub candidates: usize,
}

impl ChunkResult {
    /// Converts chunk-local offsets to buffer offsets
    pub fn rebase(chunk: Chunk, scan: ChunkScan) -> Self {
        let offsets = scan
            .offsets
            .into_iter()
            .map(|local| local + chunk.start)
            .collect();
        Self {
            chunk,
            offsets,
            candidates: scan.candidates,
        }
    }
}

/// Per-chunk summary kept in the final result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkSummary {
    #[serde(flatten)]
    pub chunk: Chunk,
    pub matches: usize,
    pub candidates: usize,
}

/// The complete result of one search.
///
/// Offsets are grouped by chunk and concatenated in chunk order. Chunks
/// cover disjoint, ascending start ranges, so the sequence is also sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchSet {
    pub offsets: Vec<usize>,
    pub chunks: Vec<ChunkSummary>,
    pub total_matches: usize,
    pub candidates: usize,
    pub buffer_len: usize,
    pub pattern_len: usize,
    pub algorithm: Algorithm,
}

impl MatchSet {
    /// Creates an empty result for a search over `buffer_len` bytes
    pub fn new(algorithm: Algorithm, buffer_len: usize, pattern_len: usize) -> Self {
        Self {
            offsets: Vec::new(),
            chunks: Vec::new(),
            total_matches: 0,
            candidates: 0,
            buffer_len,
            pattern_len,
            algorithm,
        }
    }

    /// Concatenates chunk results in the order given
    pub fn merge(
        algorithm: Algorithm,
        buffer_len: usize,
        pattern_len: usize,
        results: impl IntoIterator<Item = ChunkResult>,
    ) -> Self {
        let mut set = Self::new(algorithm, buffer_len, pattern_len);
        for result in results {
            set.add_chunk_result(result);
        }
        set
    }

    /// Appends the next chunk's matches
    pub fn add_chunk_result(&mut self, result: ChunkResult) {
        debug_assert_eq!(result.chunk.index, self.chunks.len());
        self.total_matches += result.offsets.len();
        self.candidates += result.candidates;
        self.chunks.push(ChunkSummary {
            chunk: result.chunk,
            matches: result.offsets.len(),
            candidates: result.candidates,
        });
        self.offsets.extend(result.offsets);
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.offsets.iter()
    }
}

impl<'a> IntoIterator for &'a MatchSet {
    type Item = &'a usize;
    type IntoIter = std::slice::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.offsets.iter()
    }
}
