use memmap2::Mmap;
use std::fs::File;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::errors::{SearchError, SearchResult};
use crate::metrics::SearchMetrics;

/// A read-only, memory-mapped file.
///
/// The mapping lives exactly as long as this value; dropping it unmaps the
/// file on every exit path. Searches borrow it through [`MappedBuffer::as_bytes`],
/// which always carries the mapped length with the pointer.
#[derive(Debug)]
pub struct MappedBuffer {
    path: PathBuf,
    // Empty files are not mapped; mmap of a zero-length file fails on some platforms.
    map: Option<Mmap>,
    metrics: Option<SearchMetrics>,
}

impl MappedBuffer {
    /// Maps `path` read-only
    pub fn open(path: impl AsRef<Path>) -> SearchResult<Self> {
        Self::open_inner(path.as_ref(), None)
    }

    /// Maps `path` and records the mapping in `metrics` until dropped
    pub fn open_with_metrics(
        path: impl AsRef<Path>,
        metrics: &SearchMetrics,
    ) -> SearchResult<Self> {
        Self::open_inner(path.as_ref(), Some(metrics.clone()))
    }

    fn open_inner(path: &Path, metrics: Option<SearchMetrics>) -> SearchResult<Self> {
        trace!("Mapping file: {}", path.display());

        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => SearchError::file_not_found(path),
            std::io::ErrorKind::PermissionDenied => SearchError::permission_denied(path),
            _ => SearchError::IoError(e),
        })?;

        let size = file
            .metadata()
            .map_err(|e| SearchError::map_failed(path, e))?
            .len();

        let map = if size == 0 {
            debug!("{} is empty, skipping mmap", path.display());
            None
        } else {
            // SAFETY: the mapping is read-only; concurrent truncation of the
            // underlying file by another process is outside our control.
            let map = unsafe { Mmap::map(&file) }.map_err(|e| SearchError::map_failed(path, e))?;
            if let Some(metrics) = &metrics {
                metrics.record_mmap(map.len() as u64);
            }
            Some(map)
        };

        Ok(Self {
            path: path.to_path_buf(),
            map,
            metrics,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.map.as_deref().unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Deref for MappedBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for MappedBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Drop for MappedBuffer {
    fn drop(&mut self) {
        if let (Some(map), Some(metrics)) = (&self.map, &self.metrics) {
            metrics.record_munmap(map.len() as u64);
        }
    }
}
