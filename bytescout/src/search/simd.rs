//! First/last byte vectorized scanner.
//!
//! Each step compares a 32-byte window against the pattern's first byte and
//! the window shifted by `pattern.len() - 1` against its last byte. The AND of
//! both comparisons gives a 32-bit candidate mask; every set bit is then
//! checked against the pattern interior before it is reported.
//!
//! Windows are only loaded while both of them lie inside `text`. Whatever is
//! left goes through [`portable_mask`], which builds the same mask with scalar
//! comparisons over the lanes that still fit, so the scanner never reads past
//! its slice and both paths decode masks with the same routine.

/// Width of one comparison window in bytes.
pub const LANES: usize = 32;

/// Matches found by one scan plus the number of candidate lanes verified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VectorScan {
    pub offsets: Vec<usize>,
    pub candidates: usize,
}

/// Finds every start offset of `pattern` in `text`, ascending, including
/// overlapping occurrences.
pub fn find_all(text: &[u8], pattern: &[u8]) -> Vec<usize> {
    scan(text, pattern).offsets
}

/// Runs the scanner, using AVX2 when the CPU supports it.
pub fn scan(text: &[u8], pattern: &[u8]) -> VectorScan {
    scan_with(text, pattern, is_accelerated())
}

/// Whether [`scan`] will take the AVX2 path on this machine.
pub fn is_accelerated() -> bool {
    #[cfg(target_arch = "x86_64")]
    {
        std::is_x86_feature_detected!("avx2")
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        false
    }
}

pub(crate) fn scan_with(text: &[u8], pattern: &[u8], accelerated: bool) -> VectorScan {
    let mut out = VectorScan::default();
    let m = pattern.len();
    if m == 0 || text.len() < m {
        return out;
    }

    #[cfg(target_arch = "x86_64")]
    let mut i = if accelerated {
        // SAFETY: callers only pass `accelerated = true` after AVX2 detection.
        unsafe { avx2::scan_blocks(text, pattern, &mut out) }
    } else {
        0
    };
    #[cfg(not(target_arch = "x86_64"))]
    let mut i = {
        let _ = accelerated;
        0
    };

    while i + m <= text.len() {
        let mask = portable_mask(text, pattern, i);
        drain_mask(text, pattern, i, mask, &mut out);
        i += LANES;
    }

    out
}

/// Scalar equivalent of one AVX2 step: bit `k` is set when a match could
/// start at `base + k`. Lanes whose match would run past `text` stay clear.
fn portable_mask(text: &[u8], pattern: &[u8], base: usize) -> u32 {
    let m = pattern.len();
    let first = pattern[0];
    let last = pattern[m - 1];
    let mut mask = 0u32;

    for lane in 0..LANES {
        let start = base + lane;
        if start + m > text.len() {
            break;
        }
        if text[start] == first && text[start + m - 1] == last {
            mask |= 1 << lane;
        }
    }

    mask
}

/// Verifies each candidate lane, lowest bit first, so offsets come out ascending.
#[inline]
fn drain_mask(text: &[u8], pattern: &[u8], base: usize, mut mask: u32, out: &mut VectorScan) {
    while mask != 0 {
        let start = base + mask.trailing_zeros() as usize;
        out.candidates += 1;
        if interior_matches(text, pattern, start) {
            out.offsets.push(start);
        }
        mask &= mask - 1;
    }
}

/// Endpoints are already known to match; patterns of one or two bytes have no interior.
#[inline]
fn interior_matches(text: &[u8], pattern: &[u8], start: usize) -> bool {
    let m = pattern.len();
    m <= 2 || text[start + 1..start + m - 1] == pattern[1..m - 1]
}

#[cfg(target_arch = "x86_64")]
mod avx2 {
    use super::{drain_mask, VectorScan, LANES};
    use std::arch::x86_64::*;

    /// Scans every full window pair and returns the offset where the
    /// portable tail has to continue.
    ///
    /// # Safety
    ///
    /// The CPU must support AVX2.
    #[target_feature(enable = "avx2")]
    pub(super) unsafe fn scan_blocks(text: &[u8], pattern: &[u8], out: &mut VectorScan) -> usize {
        let m = pattern.len();
        let first = _mm256_set1_epi8(pattern[0] as i8);
        let last = _mm256_set1_epi8(pattern[m - 1] as i8);
        let ptr = text.as_ptr();

        let mut i = 0;
        // Both loads must stay in bounds: the shifted one ends at i + m - 1 + LANES.
        while i + m - 1 + LANES <= text.len() {
            let block_first = _mm256_loadu_si256(ptr.add(i) as *const __m256i);
            let block_last = _mm256_loadu_si256(ptr.add(i + m - 1) as *const __m256i);

            let eq_first = _mm256_cmpeq_epi8(first, block_first);
            let eq_last = _mm256_cmpeq_epi8(last, block_last);
            let mask = _mm256_movemask_epi8(_mm256_and_si256(eq_first, eq_last)) as u32;

            drain_mask(text, pattern, i, mask, out);
            i += LANES;
        }

        i
    }
}
