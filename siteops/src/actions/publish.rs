//! `publish_article`: run the site deploy command.

use anyhow::Result;
use serde::Deserialize;
use tracing::{info, instrument};

use super::ActionRegistry;
use crate::io::process::CommandRunner;

/// The deploy command, run in the working directory.
pub const DEPLOY_COMMAND: [&str; 3] = ["npm", "run", "deploy"];

/// Arguments of a tool that takes none.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoArgs {}

impl<R: CommandRunner> ActionRegistry<R> {
    /// Run the deploy command once and return its transcript unchanged.
    ///
    /// A failing deploy is not detected here; the caller reads the transcript.
    #[instrument(skip_all)]
    pub fn publish_article(&self) -> Result<String> {
        let output = self.runner.run(&DEPLOY_COMMAND)?;
        info!(exit_code = ?output.exit_code, "deploy finished");
        Ok(output.transcript())
    }
}
