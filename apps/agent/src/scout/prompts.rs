// Prompt constants for the generative founder-name fallback.

/// System prompt for founder extraction. Composes the cross-cutting
/// JSON-only fragment with the task framing.
pub const FOUNDER_EXTRACT_SYSTEM: &str = "You are given text scraped from web pages about \
    Unravel.tech, a Pune-based AI engineering company. \
    You identify real person names in noisy scraped text. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Founder extraction prompt template. Replace `{raw_text}` before sending.
pub const FOUNDER_EXTRACT_PROMPT_TEMPLATE: &str = r#"From the scraped text below, find the person whose name contains the consecutive letters 'pr' (case-insensitive) within the first name OR last name.

Check each name character by character:
- 'Kedar'  -> 'k','e','d'... no 'pr' substring, reject
- 'Sovani' -> 's','o','v'... no 'pr' substring, reject

Return a JSON object with this EXACT schema (no extra fields):
{
  "founder_name": "founder name containing the letters pr"
}

Output only the FIRST NAME of the matching person in "founder_name".

SCRAPED TEXT:
{raw_text}"#;
