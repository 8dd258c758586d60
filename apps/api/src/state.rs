use std::sync::Arc;

use crate::config::Config;
use crate::extraction::ExtractorSet;
use crate::screening::ranker::Ranker;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Upload → text boundary. PDF and plain text by default.
    pub extractors: ExtractorSet,
    pub ranker: Arc<Ranker>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let ranker = Arc::new(Ranker::new(config.ranking_options()));
        Self {
            config,
            extractors: ExtractorSet::default(),
            ranker,
        }
    }
}
