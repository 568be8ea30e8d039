// src/lib.rs
//! Cryptanalysis aid for monoalphabetic substitution and Vigenere-family
//! ciphers. The engine in [`core`] holds the solver's hypothesis and derives
//! statistics from it; [`tui`] puts it on a terminal.

pub mod command;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod tui;

pub use crate::core::engine::{Feedback, PolySession, SubstitutionSession};
pub use crate::error::{CipherError, Result};
