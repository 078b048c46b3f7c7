//! Stable exit codes for `siteops` CLI commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// An action failed hard (e.g. an external command could not be spawned).
pub const FAILURE: i32 = 1;
/// Startup failed: invalid configuration or missing working directory.
pub const INVALID_CONFIG: i32 = 2;
