use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::{debug, info, trace};

use super::partition::{partition, Chunk};
use super::scanner::{Algorithm, ChunkScan, Scanner};
use crate::buffer::MappedBuffer;
use crate::config::SearchConfig;
use crate::errors::{SearchError, SearchResult};
use crate::metrics::SearchMetrics;
use crate::results::{ChunkResult, MatchSet};
use crate::verify::verify_matches;

/// Finds every occurrence of `pattern` in `buffer` using `worker_count`
/// threads running `algorithm`.
///
/// Offsets come back grouped by chunk in chunk order, which makes them
/// ascending. Invalid input is rejected before any thread is started, and a
/// failure in any worker fails the whole search.
pub fn search(
    buffer: &[u8],
    pattern: &[u8],
    algorithm: Algorithm,
    worker_count: usize,
) -> SearchResult<MatchSet> {
    Searcher::new(algorithm, worker_count).search(buffer, pattern)
}

/// Reusable search settings plus the metrics they accumulate
#[derive(Debug, Clone)]
pub struct Searcher {
    algorithm: Algorithm,
    worker_count: usize,
    verify: bool,
    metrics: SearchMetrics,
}

impl Searcher {
    pub fn new(algorithm: Algorithm, worker_count: usize) -> Self {
        Self {
            algorithm,
            worker_count,
            verify: false,
            metrics: SearchMetrics::new(),
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.algorithm, config.thread_count.get()).with_verification(config.verify)
    }

    /// Re-checks every reported offset against the buffer before returning
    pub fn with_verification(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn metrics(&self) -> &SearchMetrics {
        &self.metrics
    }

    pub fn search(&self, buffer: &[u8], pattern: &[u8]) -> SearchResult<MatchSet> {
        if pattern.is_empty() {
            return Err(SearchError::invalid_input("pattern must not be empty"));
        }
        if self.worker_count == 0 {
            return Err(SearchError::invalid_input("worker count must be at least 1"));
        }

        info!(
            "Starting {} search for {}-byte pattern in {} bytes with {} workers",
            self.algorithm,
            pattern.len(),
            buffer.len(),
            self.worker_count
        );

        if buffer.len() < pattern.len() {
            debug!("Buffer shorter than pattern, returning empty result");
            let result = MatchSet::new(self.algorithm, buffer.len(), pattern.len());
            self.metrics.record_search(&result);
            return Ok(result);
        }

        let chunks = partition(buffer.len(), pattern.len(), self.worker_count)?;
        debug!("Partitioned buffer into {} chunks", chunks.len());

        let scanner = Scanner::new(self.algorithm, pattern);
        let results = dispatch(buffer, &chunks, |text| scanner.scan(text))?;
        let result = MatchSet::merge(self.algorithm, buffer.len(), pattern.len(), results);

        if self.verify {
            verify_matches(buffer, pattern, &result.offsets)?;
        }

        self.metrics.record_search(&result);
        info!(
            "Search complete. Found {} matches across {} chunks",
            result.total_matches,
            result.chunks.len()
        );

        Ok(result)
    }

    /// Maps the file at `path` and searches it; the mapping is released before returning
    pub fn search_file(&self, path: impl AsRef<Path>, pattern: &[u8]) -> SearchResult<MatchSet> {
        let buffer = MappedBuffer::open_with_metrics(path, &self.metrics)?;
        self.search(buffer.as_bytes(), pattern)
    }
}

/// Runs `scan` once per chunk, one worker each, and returns the rebased
/// results in chunk order.
///
/// Each worker owns one slot of a pre-sized vector until the scope joins, so
/// no locking is involved. Offsets are rebased after the join. The first
/// failing chunk, in chunk order, becomes the error for the whole search and
/// every other result is dropped.
pub(crate) fn dispatch<F>(
    buffer: &[u8],
    chunks: &[Chunk],
    scan: F,
) -> SearchResult<Vec<ChunkResult>>
where
    F: Fn(&[u8]) -> ChunkScan + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(chunks.len())
        .thread_name(|i| format!("bytescout-worker-{}", i))
        .build()
        .map_err(|e| SearchError::ThreadPool(e.to_string()))?;

    let mut slots: Vec<Option<SearchResult<ChunkScan>>> = Vec::with_capacity(chunks.len());
    slots.resize_with(chunks.len(), || None);

    let scan = &scan;
    pool.scope(|scope| {
        for (slot, &chunk) in slots.iter_mut().zip(chunks) {
            scope.spawn(move |_| {
                *slot = Some(run_worker(buffer, chunk, scan));
            });
        }
    });

    slots
        .into_iter()
        .zip(chunks)
        .map(|(slot, &chunk)| {
            let chunk_scan = slot.unwrap_or_else(|| {
                Err(SearchError::worker_failed(
                    chunk.index,
                    "worker finished without a result",
                ))
            })?;
            Ok(ChunkResult::rebase(chunk, chunk_scan))
        })
        .collect()
}

fn run_worker<F>(buffer: &[u8], chunk: Chunk, scan: &F) -> SearchResult<ChunkScan>
where
    F: Fn(&[u8]) -> ChunkScan,
{
    let text = buffer
        .get(chunk.range())
        .ok_or(SearchError::BufferAccessFault {
            chunk: chunk.index,
            start: chunk.start,
            end: chunk.end(),
            len: buffer.len(),
        })?;

    let result = panic::catch_unwind(AssertUnwindSafe(|| scan(text)))
        .map_err(|payload| SearchError::worker_failed(chunk.index, panic_message(&*payload)))?;

    trace!(
        "Chunk {} ({}..{}) found {} matches",
        chunk.index,
        chunk.start,
        chunk.end(),
        result.offsets.len()
    );

    Ok(result)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "worker panicked".to_string()
    }
}
