//! Local scorer with no network calls. The default when no LLM key is set.
//!
//! Two modes, picked from the input:
//! - **Skill fit**: context carries `Skills`/`GPA` facts and target carries
//!   `Required skills`/`Required GPA` (job recommendations).
//!   `score = 0.7 × skill coverage + 0.3 × GPA factor`.
//! - **Term overlap**: anything else (resume vs job description).
//!   `score = matched significant context terms / all significant context terms`.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;

use crate::scoring::facts::{self, parse_facts, split_list};
use crate::scoring::model::{ensure_scorable, ScoringError, ScoringModel, Verdict};

const SKILL_WEIGHT: f64 = 0.7;
const GPA_WEIGHT: f64 = 0.3;
/// Exact skill match.
const EXACT_STRENGTH: f64 = 1.0;
/// One skill name contains the other ("SQL" vs "PostgreSQL").
const PARTIAL_STRENGTH: f64 = 0.6;
const MIN_PARTIAL_LEN: usize = 3;

const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "have", "in", "is",
    "it", "its", "looking", "of", "on", "or", "our", "the", "to", "we", "will", "with", "you",
    "your", "who", "can", "must", "should", "role", "job", "candidate", "experience", "work",
    "team", "strong", "good", "ability",
];

pub struct HeuristicScorer;

#[async_trait]
impl ScoringModel for HeuristicScorer {
    async fn score(&self, context: &str, target: &str) -> Result<Verdict, ScoringError> {
        ensure_scorable(context, target)?;
        score_locally(context, target)
    }

    fn backend(&self) -> &'static str {
        "heuristic"
    }
}

fn score_locally(context: &str, target: &str) -> Result<Verdict, ScoringError> {
    let context_facts = parse_facts(context);
    let target_facts = parse_facts(target);
    let fact = |facts: &HashMap<String, String>, label: &str| facts.get(&label.to_lowercase()).cloned();

    let skills = fact(&context_facts, facts::SKILLS);
    let gpa = fact(&context_facts, facts::GPA).and_then(|v| v.parse::<f64>().ok());
    let required = fact(&target_facts, facts::REQUIRED_SKILLS);
    let required_gpa = fact(&target_facts, facts::REQUIRED_GPA).and_then(|v| v.parse::<f64>().ok());

    let candidate_side = skills.is_some() || gpa.is_some();
    let job_side = required.is_some() || required_gpa.is_some();
    if !(candidate_side && job_side) {
        return term_overlap(context, target);
    }

    skill_fit(
        &skills.as_deref().map(split_list).unwrap_or_default(),
        &required.as_deref().map(split_list).unwrap_or_default(),
        gpa,
        required_gpa,
    )
}

fn skill_fit(
    skills: &[String],
    required: &[String],
    gpa: Option<f64>,
    required_gpa: Option<f64>,
) -> Result<Verdict, ScoringError> {
    let have: Vec<String> = skills.iter().map(|s| s.to_lowercase()).collect();

    let mut matched = Vec::new();
    let mut missing = Vec::new();
    let mut total_strength = 0.0;

    for requirement in required {
        let want = requirement.to_lowercase();
        let strength = have
            .iter()
            .map(|h| skill_strength(h, &want))
            .fold(0.0_f64, f64::max);
        total_strength += strength;
        if strength > 0.0 {
            matched.push(requirement.as_str());
        } else {
            missing.push(requirement.as_str());
        }
    }

    let coverage = if required.is_empty() {
        1.0
    } else {
        total_strength / required.len() as f64
    };

    let gpa_factor = match (gpa, required_gpa) {
        (Some(gpa), Some(req)) if req > 0.0 && gpa < req => (gpa / req).max(0.0),
        _ => 1.0,
    };

    let score = (SKILL_WEIGHT * coverage + GPA_WEIGHT * gpa_factor).clamp(0.0, 1.0);

    let mut justification = if required.is_empty() {
        "No specific skills required".to_string()
    } else {
        format!(
            "Covers {} of {} required skills",
            matched.len(),
            required.len()
        )
    };
    if !matched.is_empty() {
        justification.push_str(&format!(" (matched: {})", matched.join(", ")));
    }
    if !missing.is_empty() {
        justification.push_str(&format!("; missing: {}", missing.join(", ")));
    }
    match (gpa, required_gpa) {
        (Some(g), Some(r)) if g >= r => justification.push_str(&format!(". GPA {g} meets {r}.")),
        (Some(g), Some(r)) => justification.push_str(&format!(". GPA {g} below {r}.")),
        _ => justification.push('.'),
    }

    Verdict::new(score, justification)
}

fn skill_strength(have: &str, want: &str) -> f64 {
    if have == want {
        EXACT_STRENGTH
    } else if have.len() >= MIN_PARTIAL_LEN
        && want.len() >= MIN_PARTIAL_LEN
        && (have.contains(want) || want.contains(have))
    {
        PARTIAL_STRENGTH
    } else {
        0.0
    }
}

fn term_overlap(context: &str, target: &str) -> Result<Verdict, ScoringError> {
    let wanted = significant_terms(context);
    if wanted.is_empty() {
        return Verdict::new(0.0, "Context has no significant terms to match.");
    }
    let offered = significant_terms(target);

    let matched: Vec<&str> = wanted
        .iter()
        .filter(|t| offered.contains(*t))
        .map(String::as_str)
        .collect();
    let missing: Vec<&str> = wanted
        .iter()
        .filter(|t| !offered.contains(*t))
        .map(String::as_str)
        .collect();

    let score = (matched.len() as f64 / wanted.len() as f64).clamp(0.0, 1.0);
    Verdict::new(score, build_justification(score, &matched, &missing))
}

/// Lower-cased tokens minus stop words. Keeps `+`/`#` so C++ and C# survive.
fn significant_terms(text: &str) -> BTreeSet<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .filter(|t| t.len() >= 2 || t.contains('+') || t.contains('#'))
        .filter(|t| !STOP_WORDS.contains(t))
        .map(str::to_string)
        .collect()
}

fn build_justification(score: f64, matched: &[&str], missing: &[&str]) -> String {
    let top_matched = matched.iter().take(5).copied().collect::<Vec<_>>().join(", ");
    let top_missing = missing.iter().take(3).copied().collect::<Vec<_>>().join(", ");
    let pct = (score * 100.0).round() as u32;

    if score >= 0.8 {
        format!("Strong match ({pct}%): mentions {top_matched}.")
    } else if matched.is_empty() {
        format!("No overlap with the requirements ({pct}%). Missing: {top_missing}.")
    } else if missing.is_empty() {
        format!("Partial match ({pct}%): mentions {top_matched}.")
    } else {
        format!("Partial match ({pct}%): mentions {top_matched}; missing {top_missing}.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::facts::{candidate_context, job_summary};
    use crate::scoring::model::{CandidateProfile, JobRequirement};

    fn profile(skills: &[&str], gpa: f64) -> CandidateProfile {
        CandidateProfile {
            skills: skills.iter().map(|s| s.to_string()).collect(),
            gpa,
            applied_ids: Default::default(),
        }
    }

    fn job(skills: &[&str], gpa: f64) -> JobRequirement {
        JobRequirement {
            id: "J".to_string(),
            title: "Engineer".to_string(),
            description: String::new(),
            required_skills: skills.iter().map(|s| s.to_string()).collect(),
            required_gpa: gpa,
        }
    }

    async fn fit(p: &CandidateProfile, j: &JobRequirement) -> Verdict {
        HeuristicScorer
            .score(&candidate_context(p, j), &job_summary(j))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_full_skill_and_gpa_match_scores_one() {
        let v = fit(&profile(&["Python", "SQL"], 8.0), &job(&["python"], 7.0)).await;
        assert!((v.score() - 1.0).abs() < 1e-9, "score was {}", v.score());
        assert!(v.justification().contains("1 of 1"));
    }

    #[tokio::test]
    async fn test_no_overlap_and_low_gpa() {
        let v = fit(&profile(&["Python", "SQL"], 8.0), &job(&["Java"], 9.0)).await;
        // 0.7 × 0 + 0.3 × 8/9
        assert!((v.score() - 0.3 * 8.0 / 9.0).abs() < 1e-6, "score was {}", v.score());
        assert!(v.justification().contains("missing: Java"));
        assert!(v.justification().contains("below"));
    }

    #[tokio::test]
    async fn test_gpa_just_below_requirement_is_not_met() {
        let v = fit(&profile(&["Python"], 7.996), &job(&["Python"], 8.0)).await;
        assert!(v.score() < 1.0, "score was {}", v.score());
        assert!((v.score() - (0.7 + 0.3 * 7.996 / 8.0)).abs() < 1e-9);
        assert!(v.justification().contains("GPA 7.996 below 8"));
    }

    #[tokio::test]
    async fn test_partial_skill_name_counts_less() {
        let v = fit(&profile(&["PostgreSQL"], 9.0), &job(&["SQL"], 6.0)).await;
        assert!((v.score() - (0.7 * 0.6 + 0.3)).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_no_required_skills_is_full_coverage() {
        let v = fit(&profile(&["Go"], 5.0), &job(&[], 0.0)).await;
        assert!((v.score() - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_resume_mentioning_requirements_beats_unrelated_resume() {
        let jd = "Looking for a Python backend engineer";
        let a = HeuristicScorer
            .score(jd, "Backend developer. Built REST services in Python and Django.")
            .await
            .unwrap();
        let b = HeuristicScorer
            .score(jd, "Designed landing pages with HTML and CSS.")
            .await
            .unwrap();
        assert!(a.score() > b.score());
        assert_eq!(b.score(), 0.0);
        assert!(a.justification().contains("python"));
    }

    #[tokio::test]
    async fn test_stop_word_only_context_scores_zero() {
        let v = HeuristicScorer.score("for the and", "anything").await.unwrap();
        assert_eq!(v.score(), 0.0);
    }

    #[tokio::test]
    async fn test_blank_input_is_invalid() {
        let err = HeuristicScorer.score("", "resume").await.unwrap_err();
        assert!(matches!(err, ScoringError::InvalidInput(_)));
    }

    #[test]
    fn test_significant_terms_keep_language_symbols() {
        let terms = significant_terms("C++ and C# with the Rust");
        assert!(terms.contains("c++"));
        assert!(terms.contains("c#"));
        assert!(terms.contains("rust"));
        assert!(!terms.contains("the"));
    }

    #[test]
    fn test_backend_label() {
        assert_eq!(HeuristicScorer.backend(), "heuristic");
    }
}
