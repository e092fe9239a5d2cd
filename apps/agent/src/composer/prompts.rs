// Prompt constants for cover letter composition.

/// System prompt for cover letter drafting. Enforces JSON-only output with
/// the exact two-field schema the composer validates against.
pub const COMPOSE_SYSTEM: &str = "You are an expert cover letter writer. \
    You write concise, genuine, professional application emails grounded \
    strictly in the candidate's resume. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Composition prompt template. Replace: {founder_name},
/// {company_description}, {resume_text}, {required_phrase},
/// {grounding_instruction}, {sender_name}.
pub const COMPOSE_PROMPT_TEMPLATE: &str = r#"Write an application email for a backend engineering role at Unravel.tech.

Return a JSON object with this EXACT schema (no extra fields):
{
  "subject": "the email subject line",
  "body": "the complete email body, ready to send"
}

The body MUST:
- Open with exactly "Hi {founder_name}" as the first words, followed by a short conversational greeting.
- Frame the sender as a backend engineer with roughly two years of experience, synthesized from the resume below.
- Highlight high-level themes from the resume (reliability, real traffic at scale, end-to-end performance work) rather than listing bullet points.
- Contain the exact phrase "{required_phrase}" verbatim, including capitalization and punctuation.
- Convey a passionate, fast-learning tone and excitement about joining the backend team at Unravel.tech.
- Mention that the resume is attached for review.
- Sign off as "{sender_name}".
- Contain no email headers and no placeholder brackets.

{grounding_instruction}

COMPANY:
{company_description}

RESUME:
{resume_text}"#;

/// Amendment prepended on the single retry, naming the missed constraints.
/// Replace {violations}.
pub const COMPOSE_RETRY_AMENDMENT: &str = "\
    Your previous draft was rejected for violating mandatory constraints: \
    {violations}. \
    Produce a new draft that satisfies every constraint exactly as stated.";
