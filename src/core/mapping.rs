// src/core/mapping.rs
use crate::core::types::Letter;
use crate::error::{CipherError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Where a source letter currently points, and how sure the solver is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MappingTarget {
    pub target: Letter,
    pub certain: bool,
}

/// One row of the mapping view, e.g. `E -> T` or `X -> Q?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MappingEntry {
    pub source: Letter,
    pub target: Letter,
    pub certain: bool,
}

impl fmt::Display for MappingEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)?;
        if !self.certain {
            write!(f, "?")?;
        }
        Ok(())
    }
}

/// Whether `set` created a new entry or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    Added,
    Updated,
}

/// The evolving monoalphabetic hypothesis.
///
/// The mapping is kept injective: a target letter belongs to at most one
/// source letter, and no letter maps to itself. Every mutation either fully
/// applies or leaves the store unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionMappingStore {
    entries: BTreeMap<Letter, MappingTarget>,
}

impl SubstitutionMappingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `source` to `target`, replacing any previous target of `source`.
    pub fn set(&mut self, source: Letter, target: Letter, certain: bool) -> Result<SetOutcome> {
        if source == target {
            return Err(CipherError::SelfMapping(source));
        }
        if let Some(owner) = self.owner_of(target).filter(|&owner| owner != source) {
            return Err(CipherError::TargetCollision {
                letter: source,
                target,
                owner,
            });
        }

        let previous = self
            .entries
            .insert(source, MappingTarget { target, certain });
        Ok(match previous {
            Some(_) => SetOutcome::Updated,
            None => SetOutcome::Added,
        })
    }

    /// Drops the mapping for `source`, returning what it was.
    pub fn remove(&mut self, source: Letter) -> Result<MappingEntry> {
        let removed = self
            .entries
            .remove(&source)
            .ok_or(CipherError::NotMapped(source))?;
        Ok(MappingEntry {
            source,
            target: removed.target,
            certain: removed.certain,
        })
    }

    pub fn get(&self, source: Letter) -> Option<MappingTarget> {
        self.entries.get(&source).copied()
    }

    /// The source letter currently mapped onto `target`, if any.
    pub fn owner_of(&self, target: Letter) -> Option<Letter> {
        self.entries
            .iter()
            .find(|(_, mapped)| mapped.target == target)
            .map(|(source, _)| *source)
    }

    /// Entries sorted by source letter.
    pub fn entries(&self) -> Vec<MappingEntry> {
        self.entries
            .iter()
            .map(|(source, mapped)| MappingEntry {
                source: *source,
                target: mapped.target,
                certain: mapped.certain,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Substitutes every mapped letter in `text`, keeping the case of the
    /// original character. Unmapped letters and non-letters pass through.
    pub fn apply(&self, text: &str) -> String {
        text.chars()
            .map(|c| {
                Letter::from_char(c)
                    .and_then(|letter| self.entries.get(&letter))
                    .map_or(c, |mapped| mapped.target.with_case_of(c))
            })
            .collect()
    }
}
