use std::sync::Arc;

use crate::config::Config;
use crate::prompts::PromptRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Constructed once in `main`; reloads swap its contents, never the registry itself.
    pub registry: Arc<PromptRegistry>,
    pub config: Config,
}
