// src/core/key.rs
use crate::core::types::{Letter, OffsetConvention};
use crate::error::{CipherError, Result};
use std::fmt;
use std::num::NonZeroUsize;

const UNSET: char = '_';

/// One step of the key cursor; both directions wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorStep {
    Left,
    Right,
}

/// A fixed-length polyalphabetic key under construction.
///
/// Each slot is either unset or a letter. The length never changes after
/// creation; the cursor wraps around both ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolyKey {
    slots: Vec<Option<Letter>>,
    cursor: usize,
}

impl PolyKey {
    /// A key of `len` unset slots with the cursor on the first one.
    pub fn new(len: NonZeroUsize) -> Self {
        Self {
            slots: vec![None; len.get()],
            cursor: 0,
        }
    }

    /// Parses a key such as `"lemon"` or `"le_on"`; `_` marks an unset slot.
    pub fn from_letters(key: &str) -> Result<Self> {
        let slots = key
            .chars()
            .map(|c| match c {
                UNSET => Ok(None),
                c => Letter::try_from(c).map(Some),
            })
            .collect::<Result<Vec<_>>>()?;
        if slots.is_empty() {
            return Err(CipherError::InvalidKeyLength(0));
        }
        Ok(Self { slots, cursor: 0 })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    // Always false: keys have at least one slot.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Option<Letter>] {
        &self.slots
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Sets the slot at 0-based `index`.
    pub fn set_slot(&mut self, index: usize, letter: Option<Letter>) -> Result<()> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(CipherError::SlotOutOfRange { index, len })?;
        *slot = letter;
        Ok(())
    }

    pub fn step_cursor(&mut self, step: CursorStep) {
        let len = self.slots.len();
        self.cursor = match step {
            CursorStep::Right => (self.cursor + 1) % len,
            CursorStep::Left => (self.cursor + len - 1) % len,
        };
    }

    /// Forward shift used at absolute text index `index`. Unset slots do not
    /// shift at all, whatever the offset convention.
    pub fn shift_at(&self, index: usize, offset: OffsetConvention) -> u8 {
        match self.slots[index % self.slots.len()] {
            Some(letter) => letter.position() + offset.value(),
            None => 0,
        }
    }

    /// The key with the cursor slot bracketed, e.g. ` l [e] _ `.
    pub fn display_with_cursor(&self) -> String {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, slot)| {
                let c = slot.map_or(UNSET, Letter::lower);
                if i == self.cursor {
                    format!("[{c}]")
                } else {
                    format!(" {c} ")
                }
            })
            .collect()
    }
}

impl fmt::Display for PolyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for slot in &self.slots {
            write!(f, "{}", slot.map_or(UNSET, Letter::lower))?;
        }
        Ok(())
    }
}
