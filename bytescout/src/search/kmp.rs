use super::prefix::PrefixTable;

/// Finds every start offset of `pattern` in `text`, including overlapping
/// occurrences. Offsets are relative to `text` and ascending.
pub fn find_all(text: &[u8], pattern: &[u8]) -> Vec<usize> {
    let table = PrefixTable::build(pattern);
    find_all_with(text, pattern, &table)
}

/// Same as [`find_all`] with a prebuilt table, so one table can serve many
/// chunks of the same search.
pub fn find_all_with(text: &[u8], pattern: &[u8], table: &PrefixTable) -> Vec<usize> {
    let mut result = Vec::new();
    let m = pattern.len();
    if m == 0 || text.len() < m {
        return result;
    }
    debug_assert_eq!(table.len(), m);

    let mut j = 0;
    for (i, &byte) in text.iter().enumerate() {
        while j > 0 && byte != pattern[j] {
            j = table[j - 1];
        }
        if byte == pattern[j] {
            j += 1;
        }
        if j == m {
            result.push(i + 1 - m);
            // Keep the longest border so overlapping matches are reported.
            j = table[j - 1];
        }
    }

    result
}
