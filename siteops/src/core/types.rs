//! Shared deterministic types for command execution results.
//!
//! These types are produced by the `io` layer and consumed by core predicates
//! and the action handlers. They carry no handles to live processes.

use super::transcript::format_transcript;

/// Captured result of one external command.
///
/// Created per invocation and consumed immediately by the calling action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Argument vector that was run (program first).
    pub argv: Vec<String>,
    pub stdout: String,
    pub stderr: String,
    /// Exit code, or `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    /// True if the process exited with status 0.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Human-readable transcript: echo line, then stdout, then stderr.
    pub fn transcript(&self) -> String {
        format_transcript(&self.argv, &self.stdout, &self.stderr)
    }
}
