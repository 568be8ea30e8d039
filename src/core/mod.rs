// src/core/mod.rs
pub mod crib;
pub mod engine;
pub mod frequency;
pub mod key;
pub mod mapping;
pub mod periodicity;
pub mod shift;
pub mod types;
