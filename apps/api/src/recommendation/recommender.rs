//! Job Recommender: ranks a job catalog for one student.
//!
//! Flow: validate → drop applied jobs (per policy) → one scoring call per job →
//! wait for every call → rank by score, ties by catalog order.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::scoring::batch::{score_batch, ScoringTask};
use crate::scoring::facts::{candidate_context, job_summary};
use crate::scoring::model::ensure_gpa;
use crate::scoring::{
    AppliedJobPolicy, CancelToken, CandidateProfile, JobRequirement, ScoreResult, ScoringError,
    ScoringModel, ScoringSettings,
};

pub struct JobRecommender {
    model: Arc<dyn ScoringModel>,
    settings: ScoringSettings,
}

impl JobRecommender {
    pub fn new(model: Arc<dyn ScoringModel>, settings: ScoringSettings) -> Self {
        Self { model, settings }
    }

    pub fn backend(&self) -> &'static str {
        self.model.backend()
    }

    pub fn settings(&self) -> &ScoringSettings {
        &self.settings
    }

    /// Ranks `catalog` for `profile`, waiting for every scoring call.
    #[allow(dead_code)]
    pub async fn recommend(
        &self,
        profile: &CandidateProfile,
        catalog: &[JobRequirement],
    ) -> Result<Vec<ScoreResult<String>>, ScoringError> {
        self.recommend_with_cancel(profile, catalog, CancelToken::never())
            .await
    }

    /// Like [`recommend`](Self::recommend), but stops waiting when `cancel` fires and
    /// returns whatever had already been scored.
    pub async fn recommend_with_cancel(
        &self,
        profile: &CandidateProfile,
        catalog: &[JobRequirement],
        cancel: CancelToken,
    ) -> Result<Vec<ScoreResult<String>>, ScoringError> {
        validate(profile, catalog)?;

        let candidates: Vec<(usize, &JobRequirement)> = catalog
            .iter()
            .enumerate()
            .filter(|(_, job)| match self.settings.applied_jobs {
                AppliedJobPolicy::Exclude => !profile.applied_ids.contains(&job.id),
                AppliedJobPolicy::Include => true,
            })
            .collect();

        let batch_id = Uuid::new_v4();
        info!(
            "Recommendation batch {batch_id}: scoring {} of {} jobs with {} backend",
            candidates.len(),
            catalog.len(),
            self.model.backend()
        );

        if candidates.is_empty() {
            info!("Recommendation batch {batch_id}: every job was already applied to");
            return Ok(Vec::new());
        }

        let tasks = candidates
            .iter()
            .map(|(position, job)| ScoringTask {
                position: *position,
                label: job.id.clone(),
                context: Arc::from(candidate_context(profile, job)),
                target: job_summary(job),
            })
            .collect();

        let outcome = score_batch(
            Arc::clone(&self.model),
            tasks,
            self.settings.concurrency,
            cancel,
        )
        .await;

        let results = outcome.settle(
            |position| catalog[position].id.clone(),
            |failed, attempted| ScoringError::RecommendationUnavailable { failed, attempted },
        )?;

        info!(
            "Recommendation batch {batch_id}: returning {} ranked jobs",
            results.len()
        );
        Ok(results)
    }
}

fn validate(profile: &CandidateProfile, catalog: &[JobRequirement]) -> Result<(), ScoringError> {
    if catalog.is_empty() {
        return Err(ScoringError::InvalidInput(
            "job catalog is empty".to_string(),
        ));
    }
    ensure_gpa(profile.gpa, "Profile")?;
    for job in catalog {
        if job.id.trim().is_empty() {
            return Err(ScoringError::InvalidInput(format!(
                "job '{}' has no id",
                job.title
            )));
        }
        ensure_gpa(job.required_gpa, &format!("Job {} required", job.id))?;
    }
    Ok(())
}
