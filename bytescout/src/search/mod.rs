//! Parallel chunked exact-match search.
//!
//! A search runs in four steps:
//!
//! 1. [`partition()`] splits the buffer into one [`Chunk`] per worker. Each chunk
//!    after the first starts `pattern.len() - 1` bytes before its region so a
//!    match crossing the boundary is seen whole by exactly one chunk.
//! 2. [`engine`] starts a thread pool with one thread per chunk. Every worker
//!    runs a [`Scanner`] over its chunk and writes only its own result slot.
//! 3. Each worker's chunk-local offsets are rebased by the chunk start.
//! 4. Results are concatenated in chunk order into a [`MatchSet`](crate::results::MatchSet),
//!    which is sorted because chunks own ascending, disjoint start ranges.
//!
//! Two interchangeable algorithms run inside a chunk:
//!
//! - [`kmp`]: prefix-function automaton, O(text + pattern), reports overlapping matches.
//! - [`simd`]: 32-byte first/last byte masks with interior verification, AVX2 when
//!   available and a portable mask otherwise.
//!
//! ```rust
//! use bytescout::{search, Algorithm};
//!
//! let result = search(b"ABABDABACDABABCABAB", b"ABABCABAB", Algorithm::Vectorized, 4).unwrap();
//! assert_eq!(result.offsets, vec![10]);
//! ```
pub mod engine;
pub mod kmp;
pub mod partition;
pub mod prefix;
pub mod scanner;
pub mod simd;

pub use engine::{search, Searcher};
pub use partition::{partition, Chunk};
pub use prefix::PrefixTable;
pub use scanner::{Algorithm, ChunkScan, Scanner};
