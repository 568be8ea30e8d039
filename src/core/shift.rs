// src/core/shift.rs
//! Repeating-key shift arithmetic (Vigenere family).
//!
//! The key index for a character is its absolute index in the text, so
//! spaces and punctuation consume a key slot even though they are copied
//! through unchanged. This keeps decryption aligned with the key-length
//! blocks used by the periodicity report.

use crate::core::key::PolyKey;
use crate::core::types::{Letter, OffsetConvention, ALPHABET_LEN};

/// Undoes the key's shifts.
pub fn decrypt(text: &str, key: &PolyKey, offset: OffsetConvention) -> String {
    transform(text, key, offset, Direction::Backward)
}

/// Applies the key's shifts.
pub fn encrypt(text: &str, key: &PolyKey, offset: OffsetConvention) -> String {
    transform(text, key, offset, Direction::Forward)
}

/// Splits `text` into consecutive segments of `block_len` characters.
/// The last segment may be shorter.
pub fn blocks(text: &str, block_len: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(block_len.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// The same segments as [`blocks`], joined with `" | "`.
pub fn with_separators(text: &str, block_len: usize) -> String {
    blocks(text, block_len).join(" | ")
}

#[derive(Clone, Copy)]
enum Direction {
    Forward,
    Backward,
}

fn transform(text: &str, key: &PolyKey, offset: OffsetConvention, direction: Direction) -> String {
    text.chars()
        .enumerate()
        .map(|(index, c)| match Letter::from_char(c) {
            Some(letter) => {
                let shift = key.shift_at(index, offset) % ALPHABET_LEN;
                let amount = match direction {
                    Direction::Forward => shift,
                    Direction::Backward => (ALPHABET_LEN - shift) % ALPHABET_LEN,
                };
                letter.shifted(amount).with_case_of(c)
            }
            None => c,
        })
        .collect()
}
