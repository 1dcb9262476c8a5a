use std::sync::Arc;

use crate::analysis::analyzer::JobAnalyzer;
use crate::config::Config;
use crate::jobs::repository::JobRepository;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<JobRepository>,
    /// Pluggable analyzer. Default: LlmJobAnalyzer.
    pub analyzer: Arc<dyn JobAnalyzer>,
    pub config: Config,
}
