//! Error types for bytescout.
//!
//! Search failures and buffer-provider failures share one enum so callers can
//! propagate either with `?`, but they stay distinguishable:
//! [`SearchError::is_buffer_error`] is true only for failures that happened
//! while obtaining the buffer, before any scan ran.
//!
//! ```rust,ignore
//! match search(&buffer, b"needle", Algorithm::Vectorized, 4) {
//!     Ok(set) => println!("{} matches", set.total_matches),
//!     Err(SearchError::InvalidInput(msg)) => eprintln!("bad request: {msg}"),
//!     Err(SearchError::WorkerFailed { chunk, .. }) => eprintln!("chunk {chunk} failed"),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```
use std::path::PathBuf;
use thiserror::Error;

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur while obtaining a buffer or searching it
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Buffer access fault in chunk {chunk}: range {start}..{end} exceeds buffer length {len}")]
    BufferAccessFault {
        chunk: usize,
        start: usize,
        end: usize,
        len: usize,
    },
    #[error("Verification failed at offset {offset}: {reason}")]
    VerificationFailure { offset: usize, reason: String },
    #[error("Worker for chunk {chunk} failed: {reason}")]
    WorkerFailed { chunk: usize, reason: String },
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("Failed to map {path}: {source}")]
    MapFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SearchError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn verification_failure(offset: usize, reason: impl Into<String>) -> Self {
        Self::VerificationFailure {
            offset,
            reason: reason.into(),
        }
    }

    pub fn worker_failed(chunk: usize, reason: impl Into<String>) -> Self {
        Self::WorkerFailed {
            chunk,
            reason: reason.into(),
        }
    }

    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound(path.into())
    }

    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        Self::PermissionDenied(path.into())
    }

    pub fn map_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::MapFailed {
            path: path.into(),
            source,
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Whether this error came from the buffer provider rather than the search itself
    pub fn is_buffer_error(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound(_) | Self::PermissionDenied(_) | Self::MapFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_creation() {
        let err = SearchError::invalid_input("empty pattern");
        assert!(matches!(err, SearchError::InvalidInput(_)));

        let err = SearchError::verification_failure(42, "bytes differ");
        assert!(matches!(
            err,
            SearchError::VerificationFailure { offset: 42, .. }
        ));

        let err = SearchError::worker_failed(3, "panicked");
        assert!(matches!(err, SearchError::WorkerFailed { chunk: 3, .. }));

        let err = SearchError::file_not_found("data.bin");
        assert!(matches!(err, SearchError::FileNotFound(_)));
    }

    #[test]
    fn test_error_messages() {
        let err = SearchError::invalid_input("worker count must be at least 1");
        assert_eq!(
            err.to_string(),
            "Invalid input: worker count must be at least 1"
        );

        let err = SearchError::BufferAccessFault {
            chunk: 2,
            start: 90,
            end: 120,
            len: 100,
        };
        assert_eq!(
            err.to_string(),
            "Buffer access fault in chunk 2: range 90..120 exceeds buffer length 100"
        );

        let err = SearchError::verification_failure(7, "pattern mismatch");
        assert_eq!(
            err.to_string(),
            "Verification failed at offset 7: pattern mismatch"
        );

        let err = SearchError::file_not_found("missing.bin");
        assert_eq!(err.to_string(), "File not found: missing.bin");
    }

    #[test]
    fn test_buffer_error_classification() {
        assert!(SearchError::file_not_found("a").is_buffer_error());
        assert!(SearchError::permission_denied("a").is_buffer_error());
        assert!(SearchError::map_failed("a", io::Error::other("boom")).is_buffer_error());
        assert!(!SearchError::invalid_input("x").is_buffer_error());
        assert!(!SearchError::worker_failed(0, "x").is_buffer_error());
    }
}
