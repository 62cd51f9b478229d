use std::sync::Arc;

use crate::directory::{CatalogProvider, ProfileProvider};
use crate::ranking::ranker::ResumeRanker;
use crate::recommendation::recommender::JobRecommender;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<JobRecommender>,
    pub ranker: Arc<ResumeRanker>,
    /// Open jobs for student-scoped recommendations.
    pub catalog: Arc<dyn CatalogProvider>,
    pub profiles: Arc<dyn ProfileProvider>,
}
