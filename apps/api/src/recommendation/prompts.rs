// Prompt constants for job recommendation scoring.
// The JSON reply contract is appended by `LlmScorer` from llm_client::prompts.

use crate::scoring::llm::ScoringPrompt;

pub const RECOMMENDATION_SYSTEM: &str = "You are a campus placement advisor. \
    You rate how well one job suits one student so the student's job feed can be \
    ordered by relevance. Higher skill overlap with the job's required skills and \
    meeting the job's GPA requirement both raise the score; missing required skills \
    or a GPA below the requirement lower it.";

/// Replace `{context}` (student facts) and `{target}` (job facts) before sending.
pub const RECOMMENDATION_TEMPLATE: &str = r#"Rate how relevant this job is for this student.

STUDENT:
{context}

JOB:
{target}

Scoring guide:
- 0.9 – 1.0: meets the GPA requirement and has nearly all required skills
- 0.6 – 0.89: meets most requirements, one or two skill gaps
- 0.3 – 0.59: partial fit, several gaps or GPA slightly below requirement
- 0.0 – 0.29: little overlap or clearly unqualified

In the justification, name the matching skills and the most important gap."#;

pub const RECOMMENDATION_PROMPT: ScoringPrompt = ScoringPrompt {
    system: RECOMMENDATION_SYSTEM,
    template: RECOMMENDATION_TEMPLATE,
};
