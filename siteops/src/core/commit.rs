//! Commit-sequence constants and the empty-commit predicate.

use super::types::CommandOutput;

/// Message used by `commit_code` when the caller gives none.
pub const DEFAULT_COMMIT_MESSAGE: &str = "chore: automated commit";

/// Appended in place of the push transcript when the commit was a no-op.
pub const NO_CHANGES_NOTICE: &str = "No changes to push.\n";

/// Substring `git commit` prints when there is nothing staged.
const EMPTY_COMMIT_MARKER: &str = "nothing to commit";

/// True if the commit step's transcript contains the empty-commit marker.
///
/// The whole transcript is matched, echo line included, so a commit message
/// containing the marker also suppresses the push.
pub fn was_commit_empty(output: &CommandOutput) -> bool {
    output.transcript().contains(EMPTY_COMMIT_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit_output(stdout: &str, stderr: &str, exit_code: i32) -> CommandOutput {
        CommandOutput {
            argv: vec![
                "git".to_string(),
                "commit".to_string(),
                "-m".to_string(),
                DEFAULT_COMMIT_MESSAGE.to_string(),
            ],
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            exit_code: Some(exit_code),
        }
    }

    #[test]
    fn clean_tree_is_empty_commit() {
        let out = commit_output("On branch main\nnothing to commit, working tree clean\n", "", 1);
        assert!(was_commit_empty(&out));
    }

    #[test]
    fn real_commit_is_not_empty() {
        let out = commit_output("[main 1a2b3c4] feat: x\n 1 file changed\n", "", 0);
        assert!(!was_commit_empty(&out));
    }

    #[test]
    fn marker_in_stderr_counts() {
        let out = commit_output("", "nothing to commit (create/copy files)\n", 1);
        assert!(was_commit_empty(&out));
    }

    #[test]
    fn marker_in_echoed_message_counts() {
        let mut out = commit_output("", "Author identity unknown\n", 128);
        out.argv[3] = "fix: nothing to commit bug".to_string();
        assert!(was_commit_empty(&out));
    }

    #[test]
    fn other_failures_are_not_empty_commits() {
        let out = commit_output("", "fatal: not a git repository\n", 128);
        assert!(!was_commit_empty(&out));
    }
}
