// Prompt constants for resume ranking.
// The JSON reply contract is appended by `LlmScorer` from llm_client::prompts.

use crate::scoring::llm::ScoringPrompt;

pub const RESUME_RANKING_SYSTEM: &str = "You are an experienced campus recruiter \
    screening resumes for a placement drive. You rate how well one resume fits one \
    job description. Reward concrete evidence of the skills, tools and experience \
    the job asks for; do not reward length, formatting or buzzwords on their own.";

/// Replace `{context}` (job description) and `{target}` (resume text) before sending.
pub const RESUME_RANKING_TEMPLATE: &str = r#"Rate how well this resume fits the job description.

JOB DESCRIPTION:
{context}

RESUME:
{target}

Scoring guide:
- 0.9 – 1.0: covers the core requirements with direct evidence
- 0.6 – 0.89: covers most requirements, minor gaps
- 0.3 – 0.59: some relevant background, major gaps
- 0.0 – 0.29: unrelated to the role

In the justification, give the main reason for the score in one or two sentences."#;

pub const RESUME_RANKING_PROMPT: ScoringPrompt = ScoringPrompt {
    system: RESUME_RANKING_SYSTEM,
    template: RESUME_RANKING_TEMPLATE,
};
