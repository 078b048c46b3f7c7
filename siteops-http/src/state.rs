//! Shared application state for the HTTP server.

use std::sync::Arc;

use siteops::actions::ActionRegistry;
use siteops::io::process::CommandRunner;

/// Runner type erased so tests can swap in a scripted runner.
pub type SharedRunner = Box<dyn CommandRunner + Send + Sync>;

/// Shared state accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ActionRegistry<SharedRunner>>,
}

impl AppState {
    pub fn new(registry: ActionRegistry<SharedRunner>) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }
}
