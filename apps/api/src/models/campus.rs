use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::scoring::{CandidateProfile, JobRequirement};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub required_skills: Vec<String>,
    pub required_gpa: Option<f64>,
}

impl From<JobRow> for JobRequirement {
    fn from(row: JobRow) -> Self {
        JobRequirement {
            id: row.id,
            title: row.title,
            description: row.description.unwrap_or_default(),
            required_skills: row.required_skills,
            required_gpa: row.required_gpa.unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudentRow {
    pub id: String,
    pub skills: Vec<String>,
    pub gpa: Option<f64>,
}

impl StudentRow {
    /// Skills are trimmed and de-duplicated; blank entries from the portal form are dropped.
    pub fn into_profile(self, applied_ids: HashSet<String>) -> CandidateProfile {
        CandidateProfile {
            skills: self
                .skills
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            gpa: self.gpa.unwrap_or(0.0),
            applied_ids,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_row_defaults_missing_fields() {
        let job: JobRequirement = JobRow {
            id: "J7".to_string(),
            title: "Intern".to_string(),
            description: None,
            required_skills: vec![],
            required_gpa: None,
        }
        .into();
        assert_eq!(job.description, "");
        assert_eq!(job.required_gpa, 0.0);
    }

    #[test]
    fn test_student_row_cleans_skills() {
        let profile = StudentRow {
            id: "S1".to_string(),
            skills: vec![" Python".to_string(), "".to_string(), "Python ".to_string(), "SQL".to_string()],
            gpa: Some(8.2),
        }
        .into_profile(["J1".to_string()].into_iter().collect());
        assert_eq!(profile.skills.len(), 2);
        assert!(profile.skills.contains("Python"));
        assert!(profile.applied_ids.contains("J1"));
        assert_eq!(profile.gpa, 8.2);
    }
}
