// Relevance scoring shared by job recommendation and resume ranking.
// Backends implement `ScoringModel`; `batch` fans calls out and ranks what settles.

pub mod batch;
pub mod cancel;
pub mod facts;
pub mod heuristic;
pub mod llm;
pub mod model;

#[cfg(test)]
pub mod testing;

pub use cancel::CancelToken;
pub use model::{
    CandidateProfile, JobRequirement, ResumeDocument, ScoreResult, ScoringError, ScoringModel,
    Verdict,
};

use std::time::Duration;

/// Whether jobs the student already applied to show up in recommendations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AppliedJobPolicy {
    #[default]
    Exclude,
    Include,
}

/// Batch knobs shared by the recommender and the ranker.
#[derive(Debug, Clone, Default)]
pub struct ScoringSettings {
    /// Max scoring calls in flight per batch. `None` = unbounded.
    pub concurrency: Option<usize>,
    /// Per-batch deadline applied by HTTP handlers. `None` = wait for every call.
    pub timeout: Option<Duration>,
    pub applied_jobs: AppliedJobPolicy,
}

impl ScoringSettings {
    /// Token for one request: fires at the configured deadline, if any.
    pub fn request_token(&self) -> CancelToken {
        match self.timeout {
            Some(timeout) => CancelToken::after(timeout),
            None => CancelToken::never(),
        }
    }
}
