//! Fact sheets: the `Label: value` text the orchestrators hand to a scorer.
//!
//! An LLM reads them as plain prose; `HeuristicScorer` parses them back.

use std::collections::HashMap;
use std::fmt;

use crate::scoring::model::{CandidateProfile, JobRequirement};

pub const SKILLS: &str = "Skills";
pub const GPA: &str = "GPA";
pub const EVALUATING: &str = "Evaluating job";
pub const TITLE: &str = "Title";
pub const DESCRIPTION: &str = "Description";
pub const REQUIRED_SKILLS: &str = "Required skills";
pub const REQUIRED_GPA: &str = "Required GPA";

#[derive(Debug, Default, Clone)]
pub struct FactSheet {
    lines: Vec<(&'static str, String)>,
}

impl FactSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fact(mut self, label: &'static str, value: impl Into<String>) -> Self {
        // Newlines would break the one-fact-per-line layout
        let value = value.into().split_whitespace().collect::<Vec<_>>().join(" ");
        if !value.is_empty() {
            self.lines.push((label, value));
        }
        self
    }
}

impl fmt::Display for FactSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (label, value)) in self.lines.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{label}: {value}")?;
        }
        Ok(())
    }
}

/// Student facts plus the title of the job under evaluation.
pub fn candidate_context(profile: &CandidateProfile, job: &JobRequirement) -> String {
    FactSheet::new()
        .fact(
            SKILLS,
            profile.skills.iter().cloned().collect::<Vec<_>>().join(", "),
        )
        .fact(GPA, profile.gpa.to_string())
        .fact(EVALUATING, job.title.as_str())
        .to_string()
}

pub fn job_summary(job: &JobRequirement) -> String {
    FactSheet::new()
        .fact(TITLE, job.title.as_str())
        .fact(DESCRIPTION, job.description.as_str())
        .fact(REQUIRED_SKILLS, job.required_skills.join(", "))
        .fact(REQUIRED_GPA, job.required_gpa.to_string())
        .to_string()
}

/// Parses `Label: value` lines into a map keyed by lower-cased label.
/// Lines without a colon are ignored.
pub fn parse_facts(text: &str) -> HashMap<String, String> {
    text.lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(label, value)| (label.trim().to_lowercase(), value.trim().to_string()))
        .filter(|(label, _)| !label.is_empty())
        .collect()
}

/// Splits a comma-separated fact value into trimmed, non-empty items.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
