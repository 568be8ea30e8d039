// src/core/periodicity.rs
use crate::core::types::{PatternCount, PatternEvidence};
use std::collections::HashMap;
use std::num::NonZeroUsize;

/// Repeats reported per (length, position) group.
pub const MAX_REPEATS_PER_GROUP: usize = 3;

/// Kasiski-style repeat search for a candidate key length.
///
/// For every n-gram length from `key_length` down to 2, and every residue
/// position within a key-length block, reads the n-gram starting at that
/// position of each block and keeps the ones seen more than once. An n-gram
/// may run into the following block; it is skipped only when the text ends
/// first. Groups without repeats are left out.
pub fn find_patterns(text: &str, key_length: NonZeroUsize) -> Vec<PatternEvidence> {
    let chars: Vec<char> = text.chars().collect();
    let block_len = key_length.get();
    let mut evidence = Vec::new();

    // An n-gram at `position` exists only if `position + length <= chars.len()`.
    for length in (2..=block_len.min(chars.len())).rev() {
        for position in 0..block_len.min(chars.len() - length + 1) {
            let mut tally = PatternTally::default();
            for block_start in (0..chars.len()).step_by(block_len) {
                let start = block_start + position;
                if let Some(ngram) = chars.get(start..start + length) {
                    tally.record(ngram);
                }
            }

            let repeats = tally.repeats(MAX_REPEATS_PER_GROUP);
            if !repeats.is_empty() {
                evidence.push(PatternEvidence {
                    length,
                    position,
                    repeats,
                });
            }
        }
    }

    evidence
}

/// Occurrence counts that remember first-seen order.
#[derive(Default)]
struct PatternTally {
    index: HashMap<String, usize>,
    counts: Vec<PatternCount>,
}

impl PatternTally {
    fn record(&mut self, ngram: &[char]) {
        let pattern: String = ngram.iter().collect();
        match self.index.get(&pattern) {
            Some(&slot) => self.counts[slot].count += 1,
            None => {
                self.index.insert(pattern.clone(), self.counts.len());
                self.counts.push(PatternCount { pattern, count: 1 });
            }
        }
    }

    fn repeats(self, limit: usize) -> Vec<PatternCount> {
        self.counts
            .into_iter()
            .filter(|entry| entry.count > 1)
            .take(limit)
            .collect()
    }
}
