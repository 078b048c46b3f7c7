//! Process-automation shim for an Astro blog checkout.
//!
//! Exposes a handful of remotely callable actions (deploy, commit-and-push,
//! article helpers) that run external tools inside one configured working
//! directory and relay their output verbatim. The crate keeps a strict split:
//!
//! - **[`core`]**: Pure, deterministic helpers (transcripts, the empty-commit
//!   predicate, frontmatter, path containment). No I/O.
//! - **[`io`]**: Side-effecting adapters (configuration, process spawning,
//!   article files). Isolated so actions can run against scripted runners.
//!
//! [`actions`] binds tool names to command sequences; [`server`] exposes them
//! over MCP on stdio.

pub mod actions;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod server;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
