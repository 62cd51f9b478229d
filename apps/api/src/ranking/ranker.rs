//! Resume Ranker: scores each resume against one job description.
//!
//! Results are keyed by `source_index`, never by resume text, so duplicate
//! resumes in a batch still map back to their own slot.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::scoring::batch::{score_batch, ScoringTask};
use crate::scoring::{
    CancelToken, ResumeDocument, ScoreResult, ScoringError, ScoringModel, ScoringSettings,
};

pub struct ResumeRanker {
    model: Arc<dyn ScoringModel>,
    settings: ScoringSettings,
}

impl ResumeRanker {
    pub fn new(model: Arc<dyn ScoringModel>, settings: ScoringSettings) -> Self {
        Self { model, settings }
    }

    pub fn backend(&self) -> &'static str {
        self.model.backend()
    }

    pub fn settings(&self) -> &ScoringSettings {
        &self.settings
    }

    /// Ranks `resumes` against `job_description`, waiting for every scoring call.
    #[allow(dead_code)]
    pub async fn rank(
        &self,
        job_description: &str,
        resumes: &[ResumeDocument],
    ) -> Result<Vec<ScoreResult<usize>>, ScoringError> {
        self.rank_with_cancel(job_description, resumes, CancelToken::never())
            .await
    }

    pub async fn rank_with_cancel(
        &self,
        job_description: &str,
        resumes: &[ResumeDocument],
        cancel: CancelToken,
    ) -> Result<Vec<ScoreResult<usize>>, ScoringError> {
        let job_description = job_description.trim();
        if job_description.is_empty() {
            return Err(ScoringError::InvalidInput(
                "job description cannot be empty".to_string(),
            ));
        }

        let batch: Vec<&ResumeDocument> = resumes
            .iter()
            .filter(|r| !r.raw_text.trim().is_empty())
            .collect();
        if batch.is_empty() {
            return Err(ScoringError::InvalidInput(
                "at least one non-empty resume is required".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(batch.len());
        if let Some(dup) = batch.iter().find(|r| !seen.insert(r.source_index)) {
            return Err(ScoringError::InvalidInput(format!(
                "resume source_index {} appears more than once",
                dup.source_index
            )));
        }

        let batch_id = Uuid::new_v4();
        info!(
            "Ranking batch {batch_id}: scoring {} resumes ({} blank skipped) with {} backend",
            batch.len(),
            resumes.len() - batch.len(),
            self.model.backend()
        );

        let context: Arc<str> = Arc::from(job_description);
        let tasks = batch
            .iter()
            .map(|resume| ScoringTask {
                position: resume.source_index,
                label: format!("resume #{}", resume.source_index),
                context: Arc::clone(&context),
                target: resume.raw_text.trim().to_string(),
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
            |source_index| source_index,
            |failed, attempted| ScoringError::RankingUnavailable { failed, attempted },
        )?;

        info!(
            "Ranking batch {batch_id}: returning {} ranked resumes",
            results.len()
        );
        Ok(results)
    }
}
