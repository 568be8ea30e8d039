// src/core/types.rs
use crate::error::{CipherError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Number of letters in the working alphabet.
pub const ALPHABET_LEN: u8 = 26;

/// A Latin letter, stored as its 0-based alphabet position (A=0 .. Z=25).
/// Case is not part of the value; callers carry it separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "char")]
pub struct Letter(u8);

impl Letter {
    /// Returns the letter for an ASCII alphabetic character, in either case.
    pub fn from_char(c: char) -> Option<Self> {
        if c.is_ascii_alphabetic() {
            Some(Self(c.to_ascii_uppercase() as u8 - b'A'))
        } else {
            None
        }
    }

    /// Builds a letter from any position, reduced modulo 26.
    pub fn from_position(position: u8) -> Self {
        Self(position % ALPHABET_LEN)
    }

    pub fn position(self) -> u8 {
        self.0
    }

    pub fn upper(self) -> char {
        (b'A' + self.0) as char
    }

    pub fn lower(self) -> char {
        (b'a' + self.0) as char
    }

    /// Moves forward `amount` places around the alphabet.
    pub fn shifted(self, amount: u8) -> Self {
        Self::from_position(self.0 + amount % ALPHABET_LEN)
    }

    /// Renders this letter in the case of `like`.
    pub fn with_case_of(self, like: char) -> char {
        if like.is_lowercase() {
            self.lower()
        } else {
            self.upper()
        }
    }
}

impl TryFrom<char> for Letter {
    type Error = CipherError;

    fn try_from(c: char) -> Result<Self> {
        Self::from_char(c).ok_or(CipherError::NonAlphabetic(c))
    }
}

impl From<Letter> for char {
    fn from(letter: Letter) -> char {
        letter.upper()
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.upper())
    }
}

/// Whether key letter 'A' shifts by zero places or by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum OffsetConvention {
    /// A+A = A
    #[default]
    Zero,
    /// A+A = B
    One,
}

impl OffsetConvention {
    pub fn value(self) -> u8 {
        match self {
            OffsetConvention::Zero => 0,
            OffsetConvention::One => 1,
        }
    }
}

impl TryFrom<i64> for OffsetConvention {
    type Error = CipherError;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(OffsetConvention::Zero),
            1 => Ok(OffsetConvention::One),
            other => Err(CipherError::InvalidOffset(other)),
        }
    }
}

/// Count and share of one letter within a scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LetterFrequency {
    pub count: u64,
    /// Percentage of all alphabetic characters, in `(0, 100]`.
    pub percentage: f64,
}

/// Per-letter statistics for a text. Only letters that occur are present,
/// and iteration runs alphabetically.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrequencyTable {
    letters: BTreeMap<Letter, LetterFrequency>,
    total: u64,
}

impl FrequencyTable {
    pub(crate) fn from_counts(counts: BTreeMap<Letter, u64>) -> Self {
        let total: u64 = counts.values().sum();
        let letters = counts
            .into_iter()
            .map(|(letter, count)| {
                let percentage = count as f64 / total as f64 * 100.0;
                (letter, LetterFrequency { count, percentage })
            })
            .collect();
        Self { letters, total }
    }

    pub fn get(&self, letter: Letter) -> Option<&LetterFrequency> {
        self.letters.get(&letter)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Letter, &LetterFrequency)> {
        self.letters.iter().map(|(letter, freq)| (*letter, freq))
    }

    /// Number of distinct letters observed.
    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    /// Number of alphabetic characters scanned.
    pub fn total(&self) -> u64 {
        self.total
    }
}

/// A repeated substring and how many blocks it appeared in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternCount {
    pub pattern: String,
    pub count: usize,
}

/// Repeats of `length`-character substrings read at `position` within each
/// key-length block of the ciphertext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternEvidence {
    pub length: usize,
    /// 0-based residue within the block.
    pub position: usize,
    pub repeats: Vec<PatternCount>,
}
