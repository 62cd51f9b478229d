//! LLM-backed scorer. One Claude call per `score()`; the reply must be
//! `{"score": number in [0, 1], "justification": string}`.
//!
//! Anything else is a `ModelContractViolation` carrying the raw reply. Scores are
//! never clamped here: an out-of-range number means the model ignored the
//! contract and the caller should see that.

use async_trait::async_trait;
use serde_json::Value;

use crate::llm_client::prompts::{EVIDENCE_INSTRUCTION, SCORE_JSON_CONTRACT};
use crate::llm_client::{extract_json_object, LlmClient, LlmError};
use crate::scoring::model::{ensure_scorable, ScoringError, ScoringModel, Verdict};

const CONTEXT_SLOT: &str = "{context}";
const TARGET_SLOT: &str = "{target}";

/// System prompt plus a user template with `{context}` and `{target}` slots.
#[derive(Debug, Clone, Copy)]
pub struct ScoringPrompt {
    pub system: &'static str,
    pub template: &'static str,
}

pub struct LlmScorer {
    llm: LlmClient,
    system: String,
    template: &'static str,
}

impl LlmScorer {
    pub fn new(llm: LlmClient, prompt: ScoringPrompt) -> Self {
        Self {
            llm,
            system: format!("{} {EVIDENCE_INSTRUCTION} {SCORE_JSON_CONTRACT}", prompt.system),
            template: prompt.template,
        }
    }

    /// Fills both slots in one pass over the template, so placeholder text inside
    /// `context` or `target` is never substituted.
    fn build_prompt(&self, context: &str, target: &str) -> String {
        let slots = [(CONTEXT_SLOT, context), (TARGET_SLOT, target)];
        let mut prompt = String::with_capacity(self.template.len() + context.len() + target.len());
        let mut rest = self.template;

        loop {
            let next = slots
                .iter()
                .filter_map(|&(slot, value)| rest.find(slot).map(|at| (at, slot, value)))
                .min_by_key(|&(at, _, _)| at);
            let Some((at, slot, value)) = next else {
                prompt.push_str(rest);
                return prompt;
            };
            prompt.push_str(&rest[..at]);
            prompt.push_str(value);
            rest = &rest[at + slot.len()..];
        }
    }
}

#[async_trait]
impl ScoringModel for LlmScorer {
    async fn score(&self, context: &str, target: &str) -> Result<Verdict, ScoringError> {
        ensure_scorable(context, target)?;

        let prompt = self.build_prompt(context, target);
        let reply = self
            .llm
            .call_text(&prompt, &self.system)
            .await
            .map_err(|e| match e {
                LlmError::EmptyContent => ScoringError::ModelContractViolation {
                    reason: "model returned no text".to_string(),
                    raw: String::new(),
                },
                other => ScoringError::Backend(format!("LLM call failed: {other}")),
            })?;

        parse_verdict(&reply)
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}

/// Validates a raw model reply against the scoring contract.
pub fn parse_verdict(raw: &str) -> Result<Verdict, ScoringError> {
    let violation = |reason: String| ScoringError::ModelContractViolation {
        reason,
        raw: raw.to_string(),
    };

    let value: Value = serde_json::from_str(extract_json_object(raw))
        .map_err(|e| violation(format!("reply is not a JSON object: {e}")))?;

    let score = match value.get("score") {
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| violation(format!("score {n} is not representable")))?,
        Some(other) => return Err(violation(format!("score is not numeric: {other}"))),
        None => return Err(violation("score is missing".to_string())),
    };

    let justification = value
        .get("justification")
        .and_then(Value::as_str)
        .unwrap_or_default();

    Verdict::new(score, justification).map_err(|e| match e {
        ScoringError::ModelContractViolation { reason, .. } => violation(reason),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::prompts::RESUME_RANKING_PROMPT;
    use crate::recommendation::prompts::RECOMMENDATION_PROMPT;

    #[test]
    fn test_parse_valid_reply() {
        let v = parse_verdict(r#"{"score": 0.82, "justification": "Knows Python and SQL."}"#)
            .unwrap();
        assert!((v.score() - 0.82).abs() < f64::EPSILON);
        assert_eq!(v.justification(), "Knows Python and SQL.");
    }

    #[test]
    fn test_parse_fenced_reply() {
        let v = parse_verdict("```json\n{\"score\": 1, \"justification\": \"Exact fit\"}\n```")
            .unwrap();
        assert_eq!(v.score(), 1.0);
    }

    #[test]
    fn test_out_of_range_score_is_violation_with_raw() {
        let raw = r#"{"score": 85, "justification": "Good fit"}"#;
        match parse_verdict(raw).unwrap_err() {
            ScoringError::ModelContractViolation { reason, raw: kept } => {
                assert!(reason.contains("outside"));
                assert_eq!(kept, raw);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_string_score_is_violation() {
        let err = parse_verdict(r#"{"score": "0.9", "justification": "x"}"#).unwrap_err();
        assert!(matches!(err, ScoringError::ModelContractViolation { reason, .. } if reason.contains("not numeric")));
    }

    #[test]
    fn test_missing_score_is_violation() {
        let err = parse_verdict(r#"{"justification": "x"}"#).unwrap_err();
        assert!(matches!(err, ScoringError::ModelContractViolation { .. }));
    }

    #[test]
    fn test_missing_justification_is_violation() {
        let err = parse_verdict(r#"{"score": 0.4}"#).unwrap_err();
        assert!(matches!(err, ScoringError::ModelContractViolation { reason, .. } if reason.contains("justification")));
    }

    #[test]
    fn test_prose_reply_is_violation() {
        let err = parse_verdict("I think this candidate is a great fit!").unwrap_err();
        assert!(matches!(err, ScoringError::ModelContractViolation { .. }));
    }

    #[test]
    fn test_prompt_fills_both_slots() {
        let llm = LlmClient::new("test-key".to_string(), "test-model".to_string()).unwrap();
        let scorer = LlmScorer::new(llm, RECOMMENDATION_PROMPT);
        let prompt = scorer.build_prompt("Skills: Rust", "Title: Systems Engineer");
        assert!(prompt.contains("Skills: Rust"));
        assert!(prompt.contains("Title: Systems Engineer"));
        assert!(!prompt.contains("{context}"));
        assert!(!prompt.contains("{target}"));
        assert!(scorer.system.contains("\"score\""));
        assert_eq!(scorer.backend(), "llm");
    }

    #[test]
    fn test_placeholder_text_in_inputs_is_left_alone() {
        let llm = LlmClient::new("test-key".to_string(), "test-model".to_string()).unwrap();
        let scorer = LlmScorer::new(llm, RESUME_RANKING_PROMPT);
        let prompt = scorer.build_prompt(
            "Template engines: write {target} and {context} tags",
            "Built Jinja templates",
        );
        assert!(prompt.contains("Template engines: write {target} and {context} tags"));
        assert_eq!(prompt.matches("Built Jinja templates").count(), 1);
    }
}
