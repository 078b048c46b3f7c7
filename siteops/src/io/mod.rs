//! Side-effecting adapters: configuration, process spawning, article files.

pub mod articles;
pub mod config;
pub mod process;
