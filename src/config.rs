// src/config.rs
//! Validated settings for a polyalphabetic session.

use crate::core::types::OffsetConvention;
use crate::error::{CipherError, Result};
use std::num::NonZeroUsize;

/// Key length and offset convention, fixed for the life of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolyConfig {
    pub key_length: NonZeroUsize,
    pub offset: OffsetConvention,
}

impl Default for PolyConfig {
    fn default() -> Self {
        Self {
            key_length: NonZeroUsize::MIN,
            offset: OffsetConvention::Zero,
        }
    }
}

impl PolyConfig {
    /// Validates raw values as typed at the prompt or on the command line.
    pub fn new(key_length: usize, offset: i64) -> Result<Self> {
        Ok(Self::default()
            .with_key_length(key_length)?
            .with_offset(offset)?)
    }

    /// Set the key length
    pub fn with_key_length(mut self, key_length: usize) -> Result<Self> {
        self.key_length =
            NonZeroUsize::new(key_length).ok_or(CipherError::InvalidKeyLength(key_length))?;
        Ok(self)
    }

    /// Set the offset convention
    pub fn with_offset(mut self, offset: i64) -> Result<Self> {
        self.offset = OffsetConvention::try_from(offset)?;
        Ok(self)
    }
}
