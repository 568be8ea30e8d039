// src/core/frequency.rs
use crate::core::types::{FrequencyTable, Letter};
use std::collections::BTreeMap;

/// Counts the letters of `text`, ignoring case and every non-letter.
/// Text without letters gives an empty table.
pub fn analyze(text: &str) -> FrequencyTable {
    let mut counts: BTreeMap<Letter, u64> = BTreeMap::new();
    for letter in text.chars().filter_map(Letter::from_char) {
        *counts.entry(letter).or_insert(0) += 1;
    }
    FrequencyTable::from_counts(counts)
}
