pub mod buffer;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod results;
pub mod search;
pub mod testdata;
pub mod verify;

pub use buffer::MappedBuffer;
pub use config::{CliOverrides, SearchConfig};
pub use errors::{SearchError, SearchResult};
pub use metrics::{SearchMetrics, SearchStats};
pub use results::{ChunkResult, ChunkSummary, MatchSet};
pub use search::{search, Algorithm, Chunk, Searcher};
pub use testdata::{generate_test_data, PlantedBuffer};
pub use verify::{verify_expected, verify_matches};
