use std::ops::Index;

/// Failure function for a pattern.
///
/// Entry `k` holds the length of the longest proper prefix of
/// `pattern[..=k]` that is also a suffix of it. The automaton scanner uses it
/// to resume after a mismatch without re-reading text bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixTable {
    table: Vec<usize>,
}

impl PrefixTable {
    /// Builds the table in O(pattern.len()).
    pub fn build(pattern: &[u8]) -> Self {
        let mut table = vec![0; pattern.len()];
        let mut len = 0;
        let mut i = 1;

        while i < pattern.len() {
            if pattern[i] == pattern[len] {
                len += 1;
                table[i] = len;
                i += 1;
            } else if len != 0 {
                len = table[len - 1];
            } else {
                table[i] = 0;
                i += 1;
            }
        }

        Self { table }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.table
    }
}

impl Index<usize> for PrefixTable {
    type Output = usize;

    fn index(&self, index: usize) -> &usize {
        &self.table[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_byte_pattern() {
        assert_eq!(PrefixTable::build(b"A").as_slice(), &[0]);
    }

    #[test]
    fn test_repeated_bytes() {
        assert_eq!(PrefixTable::build(b"AAAA").as_slice(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_known_tables() {
        assert_eq!(
            PrefixTable::build(b"ABABCABAB").as_slice(),
            &[0, 0, 1, 2, 0, 1, 2, 3, 4]
        );
        assert_eq!(
            PrefixTable::build(b"AABAACAABAA").as_slice(),
            &[0, 1, 0, 1, 2, 0, 1, 2, 3, 4, 5]
        );
        assert_eq!(PrefixTable::build(b"abcd").as_slice(), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_fallback_chain() {
        // "AAACAAAA": the mismatch at index 7 falls back through 3 -> 2 before extending.
        assert_eq!(
            PrefixTable::build(b"AAACAAAA").as_slice(),
            &[0, 1, 2, 0, 1, 2, 3, 3]
        );
    }

    #[test]
    fn test_empty_pattern_yields_empty_table() {
        let table = PrefixTable::build(b"");
        assert!(table.is_empty());
    }
}
