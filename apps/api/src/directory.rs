//! Catalog and profile providers: where the recommender's inputs come from.
//!
//! `PgDirectory` reads the portal's PostgreSQL tables. Handlers only see the
//! traits, so tests swap in `StaticDirectory`.

use std::collections::HashSet;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::campus::{JobRow, StudentRow};
use crate::scoring::{CandidateProfile, JobRequirement};

#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Currently open jobs, newest posting first. This order is the tie-break
    /// order for recommendations.
    async fn open_jobs(&self) -> Result<Vec<JobRequirement>>;
}

#[async_trait]
pub trait ProfileProvider: Send + Sync {
    /// `None` when the student does not exist.
    async fn profile(&self, student_id: &str) -> Result<Option<CandidateProfile>>;
}

#[derive(Clone)]
pub struct PgDirectory {
    pool: PgPool,
}

impl PgDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogProvider for PgDirectory {
    async fn open_jobs(&self) -> Result<Vec<JobRequirement>> {
        let rows = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT id, title, description, required_skills, required_gpa
            FROM jobs
            WHERE is_open
            ORDER BY posted_at DESC, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to load open jobs")?;

        Ok(rows.into_iter().map(JobRequirement::from).collect())
    }
}

#[async_trait]
impl ProfileProvider for PgDirectory {
    async fn profile(&self, student_id: &str) -> Result<Option<CandidateProfile>> {
        let student = sqlx::query_as::<_, StudentRow>(
            "SELECT id, skills, gpa FROM students WHERE id = $1",
        )
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Failed to load student {student_id}"))?;

        let Some(student) = student else {
            return Ok(None);
        };

        let applied: Vec<String> =
            sqlx::query_scalar("SELECT job_id FROM applications WHERE student_id = $1")
                .bind(student_id)
                .fetch_all(&self.pool)
                .await
                .with_context(|| format!("Failed to load applications for {student_id}"))?;

        Ok(Some(student.into_profile(applied.into_iter().collect::<HashSet<_>>())))
    }
}

/// Fixed in-memory directory for handler tests.
#[cfg(test)]
#[derive(Default)]
pub struct StaticDirectory {
    pub jobs: Vec<JobRequirement>,
    pub students: std::collections::HashMap<String, CandidateProfile>,
}

#[cfg(test)]
#[async_trait]
impl CatalogProvider for StaticDirectory {
    async fn open_jobs(&self) -> Result<Vec<JobRequirement>> {
        Ok(self.jobs.clone())
    }
}

#[cfg(test)]
#[async_trait]
impl ProfileProvider for StaticDirectory {
    async fn profile(&self, student_id: &str) -> Result<Option<CandidateProfile>> {
        Ok(self.students.get(student_id).cloned())
    }
}
