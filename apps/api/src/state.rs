use std::sync::Arc;

use crate::config::Config;
use crate::evaluation::engine::EvaluationSettings;
use crate::llm_client::ReasoningService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Read-only after startup; shared by every concurrent group evaluation.
    pub llm: Arc<dyn ReasoningService>,
    pub settings: EvaluationSettings,
    pub config: Config,
}

impl AppState {
    pub fn new(llm: Arc<dyn ReasoningService>, config: Config) -> Self {
        Self {
            llm,
            settings: EvaluationSettings::from_config(&config),
            config,
        }
    }
}
