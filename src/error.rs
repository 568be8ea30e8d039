// src/error.rs
//! Error types for the cipher assistant.
//!
//! Every failure the engine can report is recoverable: the command loop shows
//! the message and keeps going, and the session state is left untouched.

use crate::core::types::Letter;
use thiserror::Error;

/// Errors produced by the cryptanalysis engine and its command parser.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CipherError {
    /// Raw input did not match any command shape.
    #[error("Invalid input format. {0}")]
    InvalidCommandFormat(String),

    /// A mapping command named the same letter on both sides.
    #[error("Cannot map character '{0}' to itself.")]
    SelfMapping(Letter),

    /// The target letter already belongs to a different source letter.
    #[error("Character '{target}' is already mapped from '{owner}'. Cannot map '{letter}' to '{target}'.")]
    TargetCollision {
        letter: Letter,
        target: Letter,
        owner: Letter,
    },

    /// A removal command named a letter with no mapping.
    #[error("No existing mapping for '{0}'.")]
    NotMapped(Letter),

    /// Crib words must line up letter for letter.
    #[error("Words must be the same length ({plain} vs {cipher}). Try again.")]
    LengthMismatch { plain: usize, cipher: usize },

    /// Keys need at least one slot.
    #[error("Key length must be a positive integer, got {0}")]
    InvalidKeyLength(usize),

    /// Only the 0 (A+A=A) and 1 (A+A=B) conventions exist.
    #[error("Offset must be 0 (A+A = A) or 1 (A+A = B), got {0}")]
    InvalidOffset(i64),

    /// 0-based key slot index outside `0..len`; shown 1-based.
    #[error("Key slot {} is out of range for a key of length {len}", .index.saturating_add(1))]
    SlotOutOfRange { index: usize, len: usize },

    /// A key letter was expected but something else was given.
    #[error("'{0}' is not a letter A-Z")]
    NonAlphabetic(char),
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, CipherError>;
