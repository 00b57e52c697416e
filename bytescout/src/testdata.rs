use rand::Rng;
use tracing::{debug, trace};

use crate::errors::{SearchError, SearchResult};
use crate::verify::verify_matches;

/// A synthetic buffer with known pattern positions
#[derive(Debug, Clone)]
pub struct PlantedBuffer {
    pub data: Vec<u8>,
    /// Planted offsets, ascending
    pub offsets: Vec<usize>,
}

/// Builds a zero-filled buffer of `size` bytes holding `count` copies of `pattern`.
///
/// The buffer is cut into `count` equal blocks and one copy lands at a random
/// position inside each block, so copies never overlap each other. The
/// planted offsets are the complete match set as long as the pattern has no
/// zero bytes and no border (a prefix that is also a suffix); otherwise
/// adjacent copies or the zero fill can form extra matches.
pub fn generate_test_data<R: Rng + ?Sized>(
    size: usize,
    pattern: &[u8],
    count: usize,
    rng: &mut R,
) -> SearchResult<PlantedBuffer> {
    if pattern.is_empty() {
        return Err(SearchError::invalid_input("pattern must not be empty"));
    }
    if count == 0 {
        return Err(SearchError::invalid_input("at least one pattern copy is required"));
    }
    let needed = pattern
        .len()
        .checked_mul(count)
        .ok_or_else(|| SearchError::invalid_input("pattern copies overflow usize"))?;
    if size < needed {
        return Err(SearchError::invalid_input(format!(
            "{} bytes cannot hold {} copies of a {}-byte pattern",
            size,
            count,
            pattern.len()
        )));
    }

    let mut data = vec![0u8; size];
    let block_size = size / count;
    let offsets: Vec<usize> = (0..count)
        .map(|i| i * block_size + rng.gen_range(0..=block_size - pattern.len()))
        .collect();

    for (i, &offset) in offsets.iter().enumerate() {
        if i < 4 {
            trace!("Planting pattern at offset {:#x}", offset);
        }
        data[offset..offset + pattern.len()].copy_from_slice(pattern);
    }

    verify_matches(&data, pattern, &offsets)?;
    debug!(
        "Generated {} bytes with {} planted copies of a {}-byte pattern",
        size,
        count,
        pattern.len()
    );

    Ok(PlantedBuffer { data, offsets })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_plants_every_copy() {
        let mut rng = StdRng::seed_from_u64(7);
        let planted = generate_test_data(10_000, b"NEEDLE", 50, &mut rng).unwrap();

        assert_eq!(planted.data.len(), 10_000);
        assert_eq!(planted.offsets.len(), 50);
        assert!(planted.offsets.windows(2).all(|w| w[0] + 6 <= w[1]));
        for &offset in &planted.offsets {
            assert_eq!(&planted.data[offset..offset + 6], b"NEEDLE");
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = generate_test_data(4096, b"xyz", 8, &mut StdRng::seed_from_u64(1)).unwrap();
        let b = generate_test_data(4096, b"xyz", 8, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(a.offsets, b.offsets);
    }

    #[test]
    fn test_exactly_full_buffer() {
        let mut rng = StdRng::seed_from_u64(3);
        let planted = generate_test_data(12, b"abc", 4, &mut rng).unwrap();
        assert_eq!(planted.offsets, vec![0, 3, 6, 9]);
        assert_eq!(planted.data, b"abcabcabcabc");
    }

    #[test]
    fn test_rejects_impossible_requests() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            generate_test_data(10, b"abcdef", 2, &mut rng),
            Err(SearchError::InvalidInput(_))
        ));
        assert!(matches!(
            generate_test_data(10, b"", 1, &mut rng),
            Err(SearchError::InvalidInput(_))
        ));
        assert!(matches!(
            generate_test_data(10, b"a", 0, &mut rng),
            Err(SearchError::InvalidInput(_))
        ));
    }
}
