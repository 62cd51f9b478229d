//! Axum route handlers for the Resume Ranking API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::ranking::upload::read_rank_upload;
use crate::scoring::{ResumeDocument, ScoreResult};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub job_description: String,
    /// Raw resume texts; a resume's index in this list is its `resume_index`.
    pub resumes: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RankedResume {
    pub resume_index: usize,
    /// 1-based position in the ranking.
    pub rank: usize,
    pub score: f64,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct RankingsResponse {
    pub rankings: Vec<RankedResume>,
    pub scorer_backend: &'static str,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/rank
pub async fn handle_rank(
    State(state): State<AppState>,
    Json(request): Json<RankRequest>,
) -> Result<Json<RankingsResponse>, AppError> {
    let resumes = ResumeDocument::batch(request.resumes);
    rank(&state, &request.job_description, &resumes).await
}

/// POST /api/v1/resumes/rank/upload
///
/// Multipart variant: one `job_description` field plus PDF or text `resume` files.
pub async fn handle_rank_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<RankingsResponse>, AppError> {
    let upload = read_rank_upload(multipart).await?;
    rank(&state, &upload.job_description, &upload.resumes).await
}

async fn rank(
    state: &AppState,
    job_description: &str,
    resumes: &[ResumeDocument],
) -> Result<Json<RankingsResponse>, AppError> {
    let ranker = &state.ranker;
    let results = ranker
        .rank_with_cancel(job_description, resumes, ranker.settings().request_token())
        .await?;

    Ok(Json(RankingsResponse {
        rankings: ranked_resumes(results),
        scorer_backend: ranker.backend(),
    }))
}

fn ranked_resumes(results: Vec<ScoreResult<usize>>) -> Vec<RankedResume> {
    results
        .into_iter()
        .enumerate()
        .map(|(i, result)| RankedResume {
            resume_index: result.target_id,
            rank: i + 1,
            score: result.score,
            reason: result.justification,
        })
        .collect()
}
