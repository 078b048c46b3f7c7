//! Deterministic, pure logic shared by the actions.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data and return deterministic outputs suitable for tests.

pub mod commit;
pub mod frontmatter;
pub mod path;
pub mod search;
pub mod transcript;
pub mod types;
