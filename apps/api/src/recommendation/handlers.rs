//! Axum route handlers for the Recommendation API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::scoring::model::ensure_gpa;
use crate::scoring::{CandidateProfile, JobRequirement, ScoreResult};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub profile: CandidateProfile,
    pub catalog: Vec<JobRequirement>,
}

#[derive(Debug, Serialize)]
pub struct RecommendedJob {
    pub job_id: String,
    pub relevance_score: f64,
    pub reason: String,
}

impl From<ScoreResult<String>> for RecommendedJob {
    fn from(result: ScoreResult<String>) -> Self {
        Self {
            job_id: result.target_id,
            relevance_score: result.score,
            reason: result.justification,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<RecommendedJob>,
    pub scorer_backend: &'static str,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/recommendations
///
/// Ranks a caller-supplied catalog for a caller-supplied profile.
pub async fn handle_recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    recommend(&state, &request.profile, &request.catalog).await
}

/// GET /api/v1/students/:student_id/recommendations
///
/// Loads the student's profile and the open job catalog, then ranks.
/// Malformed catalog rows are skipped; no open jobs means an empty feed.
pub async fn handle_student_recommendations(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let profile = state
        .profiles
        .profile(&student_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Student {student_id} not found")))?;

    let catalog = scorable_jobs(state.catalog.open_jobs().await?);
    if catalog.is_empty() {
        info!("No open jobs to recommend for student {student_id}");
        return Ok(Json(RecommendationsResponse {
            recommendations: Vec::new(),
            scorer_backend: state.recommender.backend(),
        }));
    }

    recommend(&state, &profile, &catalog).await
}

/// Drops catalog rows the recommender would reject as invalid input.
fn scorable_jobs(jobs: Vec<JobRequirement>) -> Vec<JobRequirement> {
    jobs.into_iter()
        .filter(|job| {
            if job.id.trim().is_empty() {
                warn!("Skipping open job '{}' with no id", job.title);
                return false;
            }
            match ensure_gpa(job.required_gpa, &format!("Job {} required", job.id)) {
                Ok(()) => true,
                Err(e) => {
                    warn!("Skipping open job {}: {e}", job.id);
                    false
                }
            }
        })
        .collect()
}

async fn recommend(
    state: &AppState,
    profile: &CandidateProfile,
    catalog: &[JobRequirement],
) -> Result<Json<RecommendationsResponse>, AppError> {
    let recommender = &state.recommender;
    let results = recommender
        .recommend_with_cancel(profile, catalog, recommender.settings().request_token())
        .await?;

    Ok(Json(RecommendationsResponse {
        recommendations: results.into_iter().map(RecommendedJob::from).collect(),
        scorer_backend: recommender.backend(),
    }))
}
