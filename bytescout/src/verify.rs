//! Correctness checks for search results.
//!
//! These are used by tests, the `bench` driver and `--verify` runs. A failure
//! here means the partition overlap or a scanner is wrong, never bad input.

use std::collections::BTreeSet;
use tracing::{debug, error};

use crate::errors::{SearchError, SearchResult};

/// Checks that every offset is in bounds and points at `pattern`.
///
/// Fails on the first offending offset.
pub fn verify_matches(buffer: &[u8], pattern: &[u8], offsets: &[usize]) -> SearchResult<()> {
    for &offset in offsets {
        let end = offset
            .checked_add(pattern.len())
            .filter(|&end| end <= buffer.len())
            .ok_or_else(|| {
                error!(
                    "Offset {} out of range for {}-byte buffer",
                    offset,
                    buffer.len()
                );
                SearchError::verification_failure(
                    offset,
                    format!(
                        "match of {} bytes runs past buffer end {}",
                        pattern.len(),
                        buffer.len()
                    ),
                )
            })?;

        let found = &buffer[offset..end];
        if found != pattern {
            error!("Offset {} does not match the pattern: {:02x?}", offset, found);
            return Err(SearchError::verification_failure(
                offset,
                format!("bytes {:02x?} differ from pattern", found),
            ));
        }
    }

    debug!("Verified {} matches", offsets.len());
    Ok(())
}

/// Compares found offsets against a known set, reporting the lowest
/// offset that was missed or not expected.
///
/// An offset reported twice fails before the sets are compared, since a
/// chunk overlap that is too wide shows up only as a duplicate.
pub fn verify_expected(found: &[usize], expected: &[usize]) -> SearchResult<()> {
    let mut unique = BTreeSet::new();
    if let Some(&repeated) = found.iter().find(|&&offset| !unique.insert(offset)) {
        error!("Offset {} reported more than once", repeated);
        return Err(SearchError::verification_failure(repeated, "match reported more than once"));
    }
    let found = unique;
    let expected: BTreeSet<usize> = expected.iter().copied().collect();

    let missed = expected.difference(&found).next().copied();
    let unexpected = found.difference(&expected).next().copied();

    match (missed, unexpected) {
        (Some(m), Some(u)) if u < m => Err(SearchError::verification_failure(
            u,
            "reported match was not expected",
        )),
        (Some(m), _) => Err(SearchError::verification_failure(
            m,
            "expected match was missed",
        )),
        (None, Some(u)) => Err(SearchError::verification_failure(
            u,
            "reported match was not expected",
        )),
        (None, None) => Ok(()),
    }
}
