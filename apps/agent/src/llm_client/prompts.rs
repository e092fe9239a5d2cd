// Shared prompt constants. Each module that calls the LLM defines its own
// prompts.rs alongside it; this file holds cross-cutting fragments only.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction appended to every generation prompt that consumes resume text.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Every claim about the candidate must be supported by the resume \
    text provided. Do NOT invent employers, job titles, projects, or metrics \
    that the resume does not mention. If the resume does not support a claim, \
    omit it entirely.";
