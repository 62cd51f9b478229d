// Shared prompt fragments. Each feature that scores through the LLM keeps its own
// prompts.rs alongside it and builds on these.

/// Appended to every scoring system prompt. Pins the reply to one JSON object.
pub const SCORE_JSON_CONTRACT: &str = "\
    You MUST respond with a single JSON object and nothing else: \
    {\"score\": <number between 0 and 1>, \"justification\": \"<one or two sentences>\"}. \
    The score must be a JSON number, not a string or percentage. \
    Do NOT use markdown code fences. \
    Do NOT include explanations outside the JSON object.";

/// Keeps the model from rewarding things the input does not say.
pub const EVIDENCE_INSTRUCTION: &str = "\
    Judge only from the facts given. Do NOT assume skills, grades or experience \
    that are not stated. If the input is too thin to judge, give a low score \
    and say why in the justification.";
