pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::ranking::handlers as ranking;
use crate::recommendation::handlers as recommendation;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Recommendation API (student portal)
        .route(
            "/api/v1/recommendations",
            post(recommendation::handle_recommend),
        )
        .route(
            "/api/v1/students/:student_id/recommendations",
            get(recommendation::handle_student_recommendations),
        )
        // Resume Ranking API (admin portal)
        .route("/api/v1/resumes/rank", post(ranking::handle_rank))
        .route(
            "/api/v1/resumes/rank/upload",
            post(ranking::handle_rank_upload),
        )
        .with_state(state)
}
