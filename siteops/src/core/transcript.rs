//! Transcript rendering for captured command output.

/// Prefix of the echo line that opens every transcript.
pub const ECHO_MARKER: &str = "$ ";

/// Render `argv` and its captured streams as a transcript.
///
/// The first line echoes the command (tokens joined by a single space). Stdout
/// and stderr follow verbatim with no separators of their own.
pub fn format_transcript(argv: &[String], stdout: &str, stderr: &str) -> String {
    let echo = argv.join(" ");
    let mut out = String::with_capacity(ECHO_MARKER.len() + echo.len() + 1 + stdout.len() + stderr.len());
    out.push_str(ECHO_MARKER);
    out.push_str(&echo);
    out.push('\n');
    out.push_str(stdout);
    out.push_str(stderr);
    out
}
