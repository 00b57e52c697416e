use serde::Serialize;
use std::ops::Range;
use tracing::debug;

use crate::errors::{SearchError, SearchResult};

/// A sub-range of the buffer scanned by one worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Chunk {
    /// Position of the chunk in worker order
    pub index: usize,
    /// Offset of the first byte in the buffer
    pub start: usize,
    /// Number of bytes in the chunk
    pub len: usize,
}

impl Chunk {
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }
}

/// Splits a buffer of `buffer_len` bytes into chunks for `worker_count` workers.
///
/// With `base = buffer_len / workers`, chunk 0 is `[0, base)`, chunk `i` is
/// `[i * base - (pattern_len - 1), (i + 1) * base)` and the last chunk runs
/// to the end of the buffer. Consecutive chunks share exactly
/// `pattern_len - 1` bytes, so a match that starts in region `i - 1` and ends
/// in region `i` is fully inside chunk `i`, while a match that ends inside
/// region `i - 1` is only inside chunk `i - 1`. Every possible start offset is
/// therefore visible to exactly one chunk.
///
/// When `base` would be shorter than the pattern the worker count drops to
/// `max(1, buffer_len / pattern_len)`, so fewer chunks than requested may be
/// returned. A buffer shorter than the pattern is one chunk.
pub fn partition(
    buffer_len: usize,
    pattern_len: usize,
    worker_count: usize,
) -> SearchResult<Vec<Chunk>> {
    if pattern_len == 0 {
        return Err(SearchError::invalid_input("pattern must not be empty"));
    }
    if worker_count == 0 {
        return Err(SearchError::invalid_input("worker count must be at least 1"));
    }

    let workers = effective_workers(buffer_len, pattern_len, worker_count);
    if workers < worker_count {
        debug!(
            "Reducing workers from {} to {}: {} bytes cannot hold {}-byte chunks",
            worker_count, workers, buffer_len, pattern_len
        );
    }

    let overlap = pattern_len - 1;
    let base = buffer_len / workers;

    let chunks = (0..workers)
        .map(|index| {
            let start = if index == 0 { 0 } else { index * base - overlap };
            let end = if index + 1 == workers {
                buffer_len
            } else {
                (index + 1) * base
            };
            Chunk {
                index,
                start,
                len: end - start,
            }
        })
        .collect();

    Ok(chunks)
}

/// Largest usable worker count not above `requested` whose regions are at
/// least one pattern long.
fn effective_workers(buffer_len: usize, pattern_len: usize, requested: usize) -> usize {
    if buffer_len / requested >= pattern_len {
        requested
    } else {
        (buffer_len / pattern_len).clamp(1, requested)
    }
}
