// src/tui/mod.rs
//! Terminal front-ends. They render what the sessions report and feed
//! commands back; none of the solving logic lives here.

pub mod mono;
pub mod poly;
