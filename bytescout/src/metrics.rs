use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::results::MatchSet;

/// Running totals across searches.
///
/// Counters are only touched after a search has joined its workers, or by the
/// buffer provider when it maps and unmaps files. Workers never see this type.
#[derive(Debug, Clone)]
pub struct SearchMetrics {
    searches: Arc<AtomicU64>,
    bytes_scanned: Arc<AtomicU64>,
    chunks_scanned: Arc<AtomicU64>,
    candidates: Arc<AtomicU64>,
    matches: Arc<AtomicU64>,
    mmap_allocated: Arc<AtomicU64>,
    peak_mmap_allocated: Arc<AtomicU64>,
}

impl SearchMetrics {
    pub fn new() -> Self {
        Self {
            searches: Arc::new(AtomicU64::new(0)),
            bytes_scanned: Arc::new(AtomicU64::new(0)),
            chunks_scanned: Arc::new(AtomicU64::new(0)),
            candidates: Arc::new(AtomicU64::new(0)),
            matches: Arc::new(AtomicU64::new(0)),
            mmap_allocated: Arc::new(AtomicU64::new(0)),
            peak_mmap_allocated: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Records a completed search
    pub fn record_search(&self, result: &MatchSet) {
        self.searches.fetch_add(1, Ordering::Relaxed);
        // Overlap bytes are read twice, so count what the workers actually scanned.
        let scanned: u64 = result.chunks.iter().map(|c| c.chunk.len as u64).sum();
        self.bytes_scanned.fetch_add(scanned, Ordering::Relaxed);
        self.chunks_scanned
            .fetch_add(result.chunks.len() as u64, Ordering::Relaxed);
        self.candidates
            .fetch_add(result.candidates as u64, Ordering::Relaxed);
        self.matches
            .fetch_add(result.total_matches as u64, Ordering::Relaxed);
    }

    /// Records a memory mapped file
    pub fn record_mmap(&self, bytes: u64) {
        let total = self.mmap_allocated.fetch_add(bytes, Ordering::Relaxed) + bytes;
        let mut peak = self.peak_mmap_allocated.load(Ordering::Relaxed);
        while total > peak {
            match self.peak_mmap_allocated.compare_exchange_weak(
                peak,
                total,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(current) => peak = current,
            }
        }
        debug!(
            "Memory mapped: {} bytes, total mapped: {} bytes",
            bytes, total
        );
    }

    /// Records unmapping of a file
    pub fn record_munmap(&self, bytes: u64) {
        let total = self.mmap_allocated.fetch_sub(bytes, Ordering::Relaxed) - bytes;
        debug!(
            "Memory unmapped: {} bytes, total mapped: {} bytes",
            bytes, total
        );
    }

    pub fn get_stats(&self) -> SearchStats {
        SearchStats {
            searches: self.searches.load(Ordering::Relaxed),
            bytes_scanned: self.bytes_scanned.load(Ordering::Relaxed),
            chunks_scanned: self.chunks_scanned.load(Ordering::Relaxed),
            candidates: self.candidates.load(Ordering::Relaxed),
            matches: self.matches.load(Ordering::Relaxed),
            mmap_allocated: self.mmap_allocated.load(Ordering::Relaxed),
            peak_mmap_allocated: self.peak_mmap_allocated.load(Ordering::Relaxed),
        }
    }

    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Search stats:\n\
             Searches: {}\n\
             Bytes scanned: {}\n\
             Chunks scanned: {}\n\
             Candidate lanes: {}\n\
             Matches: {}\n\
             Memory mapped (current/peak): {}/{} bytes",
            stats.searches,
            stats.bytes_scanned,
            stats.chunks_scanned,
            stats.candidates,
            stats.matches,
            stats.mmap_allocated,
            stats.peak_mmap_allocated
        );
    }
}

impl Default for SearchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of [`SearchMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    pub searches: u64,
    pub bytes_scanned: u64,
    pub chunks_scanned: u64,
    pub candidates: u64,
    pub matches: u64,
    pub mmap_allocated: u64,
    pub peak_mmap_allocated: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::ChunkResult;
    use crate::search::partition::Chunk;
    use crate::search::scanner::Algorithm;

    #[test]
    fn test_search_tracking() {
        let metrics = SearchMetrics::new();
        let set = MatchSet::merge(
            Algorithm::Vectorized,
            100,
            4,
            vec![
                ChunkResult {
                    chunk: Chunk { index: 0, start: 0, len: 50 },
                    offsets: vec![10],
                    candidates: 3,
                },
                ChunkResult {
                    chunk: Chunk { index: 1, start: 47, len: 53 },
                    offsets: vec![60, 80],
                    candidates: 2,
                },
            ],
        );

        metrics.record_search(&set);
        metrics.record_search(&set);

        let stats = metrics.get_stats();
        assert_eq!(stats.searches, 2);
        assert_eq!(stats.bytes_scanned, 206);
        assert_eq!(stats.chunks_scanned, 4);
        assert_eq!(stats.candidates, 10);
        assert_eq!(stats.matches, 6);
    }

    #[test]
    fn test_mmap_tracking() {
        let metrics = SearchMetrics::new();

        metrics.record_mmap(5000);
        metrics.record_mmap(3000);
        assert_eq!(metrics.get_stats().mmap_allocated, 8000);

        metrics.record_munmap(3000);
        let stats = metrics.get_stats();
        assert_eq!(stats.mmap_allocated, 5000);
        assert_eq!(stats.peak_mmap_allocated, 8000);
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = SearchMetrics::default();
        let clone = metrics.clone();
        clone.record_mmap(10);
        assert_eq!(metrics.get_stats().mmap_allocated, 10);
    }
}
