//! `commit_code`: stage, commit, and push unless the commit was empty.

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::ActionRegistry;
use crate::core::commit::{DEFAULT_COMMIT_MESSAGE, NO_CHANGES_NOTICE, was_commit_empty};
use crate::io::process::CommandRunner;

pub const STAGE_COMMAND: [&str; 3] = ["git", "add", "-A"];
pub const PUSH_COMMAND: [&str; 2] = ["git", "push"];

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommitArgs {
    #[serde(default)]
    pub message: Option<String>,
}

impl<R: CommandRunner> ActionRegistry<R> {
    /// Stage everything, commit with `message` (or the default), then push
    /// or append the no-changes notice. Pieces are joined by `\n`.
    #[instrument(skip_all)]
    pub fn commit_code(&self, message: Option<&str>) -> Result<String> {
        let message = message.unwrap_or(DEFAULT_COMMIT_MESSAGE);
        let mut parts = Vec::new();
        self.commit_and_push(message, &mut parts)?;
        Ok(parts.join("\n"))
    }

    /// Stage + commit, then push, or record [`NO_CHANGES_NOTICE`] if the
    /// commit was empty.
    pub(super) fn commit_and_push(&self, message: &str, parts: &mut Vec<String>) -> Result<()> {
        if self.stage_and_commit(message, parts)? {
            info!("nothing to commit, skipping push");
            parts.push(NO_CHANGES_NOTICE.to_string());
        } else {
            self.push(parts)?;
        }
        Ok(())
    }

    /// Run stage then commit, appending both transcripts.
    ///
    /// Returns true when the commit transcript mentions nothing to commit.
    /// A failing stage step does not stop the commit step.
    pub(super) fn stage_and_commit(&self, message: &str, parts: &mut Vec<String>) -> Result<bool> {
        let staged = self.runner.run(&STAGE_COMMAND).context("stage changes")?;
        if !staged.success() {
            warn!(exit_code = ?staged.exit_code, "stage step failed, committing anyway");
        }
        parts.push(staged.transcript());

        let committed = self
            .runner
            .run(&["git", "commit", "-m", message])
            .context("commit staged changes")?;
        let empty = was_commit_empty(&committed);
        debug!(exit_code = ?committed.exit_code, empty, "commit step finished");
        parts.push(committed.transcript());
        Ok(empty)
    }

    pub(super) fn push(&self, parts: &mut Vec<String>) -> Result<()> {
        let pushed = self.runner.run(&PUSH_COMMAND).context("push to remote")?;
        debug!(exit_code = ?pushed.exit_code, "push step finished");
        parts.push(pushed.transcript());
        Ok(())
    }
}
