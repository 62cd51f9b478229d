//! Scoring contract: the swappable component that turns `(context, target)` into a
//! relevance score plus justification.
//!
//! Backends: `LlmScorer` (Claude via `llm_client`) and `HeuristicScorer` (local).
//! Orchestrators hold an `Arc<dyn ScoringModel>` and never see which one is behind it.

use std::collections::{BTreeSet, HashSet};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound of the GPA scale used by profiles and job requirements.
pub const GPA_SCALE_MAX: f64 = 10.0;

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The backend answered, but not in the documented shape. `raw` keeps the
    /// offending response for the logs.
    #[error("Scoring model contract violation: {reason}")]
    ModelContractViolation { reason: String, raw: String },

    #[error("Scoring backend error: {0}")]
    Backend(String),

    #[error("Could not generate recommendations, try again ({failed} of {attempted} jobs failed to score)")]
    RecommendationUnavailable { failed: usize, attempted: usize },

    #[error("Could not generate rankings, try again ({failed} of {attempted} resumes failed to score)")]
    RankingUnavailable { failed: usize, attempted: usize },

    #[error("Scoring batch cancelled before any result settled")]
    Cancelled,
}

// ────────────────────────────────────────────────────────────────────────────
// Inputs
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub skills: BTreeSet<String>,
    pub gpa: f64,
    #[serde(default)]
    pub applied_ids: HashSet<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRequirement {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub required_gpa: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub raw_text: String,
    /// Position in the caller's batch. Carried through ranking so duplicate texts
    /// still map back to the right slot.
    pub source_index: usize,
}

impl ResumeDocument {
    /// Wraps raw resume texts, numbering them by input position.
    pub fn batch<I, S>(texts: I) -> Vec<ResumeDocument>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        texts
            .into_iter()
            .enumerate()
            .map(|(source_index, text)| ResumeDocument {
                raw_text: text.into(),
                source_index,
            })
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Outputs
// ────────────────────────────────────────────────────────────────────────────

/// What a scoring backend hands back for one `(context, target)` pair.
///
/// Only constructible through [`Verdict::new`], so a live `Verdict` always has a
/// score in `[0, 1]` and a non-empty justification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    score: f64,
    justification: String,
}

impl Verdict {
    pub fn new(score: f64, justification: impl Into<String>) -> Result<Self, ScoringError> {
        let justification = justification.into();
        if !score.is_finite() || !(0.0..=1.0).contains(&score) {
            return Err(ScoringError::ModelContractViolation {
                reason: format!("score {score} is outside [0, 1]"),
                raw: justification,
            });
        }
        if justification.trim().is_empty() {
            return Err(ScoringError::ModelContractViolation {
                reason: "justification is missing".to_string(),
                raw: format!("score={score}"),
            });
        }
        Ok(Self {
            // -0.0 + 0.0 == +0.0, so equal scores compare equal under total_cmp
            score: score + 0.0,
            justification: justification.trim().to_string(),
        })
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn justification(&self) -> &str {
        &self.justification
    }
}

/// A scored batch item. `I` is the job id for recommendations and the resume
/// `source_index` for rankings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult<I> {
    pub target_id: I,
    pub score: f64,
    pub justification: String,
}

impl<I> ScoreResult<I> {
    pub fn from_verdict(target_id: I, verdict: Verdict) -> Self {
        Self {
            target_id,
            score: verdict.score,
            justification: verdict.justification,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to plug in a scoring backend. Each call makes at most one
/// backend request; retries belong to the transport underneath.
#[async_trait]
pub trait ScoringModel: Send + Sync {
    async fn score(&self, context: &str, target: &str) -> Result<Verdict, ScoringError>;

    /// Short label for logs and API responses ("llm", "heuristic", ...).
    fn backend(&self) -> &'static str;
}

/// Rejects blank context/target before any backend work happens.
pub fn ensure_scorable(context: &str, target: &str) -> Result<(), ScoringError> {
    if context.trim().is_empty() {
        return Err(ScoringError::InvalidInput(
            "scoring context cannot be empty".to_string(),
        ));
    }
    if target.trim().is_empty() {
        return Err(ScoringError::InvalidInput(
            "scoring target cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Checks a GPA value against the 0–10 scale.
pub fn ensure_gpa(value: f64, what: &str) -> Result<(), ScoringError> {
    if value.is_finite() && (0.0..=GPA_SCALE_MAX).contains(&value) {
        Ok(())
    } else {
        Err(ScoringError::InvalidInput(format!(
            "{what} GPA {value} is outside 0–{GPA_SCALE_MAX}"
        )))
    }
}
