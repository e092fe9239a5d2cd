//! Cover letter composition — drafts the application email and enforces the
//! mandatory literal constraints before anything is allowed downstream.
//!
//! Per attempt the flow is Drafting -> Validating -> Accepted, with a single
//! Retrying pass carrying an amended instruction. A second non-conforming
//! draft is a `Composition` error; a non-conforming artifact never ships.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

pub mod prompts;

use crate::errors::AppError;
use crate::llm_client::prompts::GROUNDING_INSTRUCTION;
use crate::llm_client::LlmClient;
use crate::scout::ResolvedFounder;
use self::prompts::{COMPOSE_PROMPT_TEMPLATE, COMPOSE_RETRY_AMENDMENT, COMPOSE_SYSTEM};

/// Fixed three-word rhyming phrase that must appear verbatim in every
/// accepted body. Checked case-sensitively.
pub const REQUIRED_PHRASE: &str = "Apply, DSPy, Simplify";

/// What Unravel.tech builds, fed to the drafting prompt.
pub const COMPANY_DESCRIPTION: &str = "\
Unravel.tech is a company building production-grade agentic AI systems. They believe
the old way of building software is dying and are at the forefront of this change.
They care deeply about: rapid experimentation, technical depth, honesty about what
works, and adaptive planning. They heavily use DSPy for structured AI systems,
and are looking for hands-on engineers who are great communicators and take their
craft seriously.";

/// The finished artifact. Immutable after creation; body always starts with
/// the salutation and contains `REQUIRED_PHRASE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedEmail {
    pub subject: String,
    pub body: String,
    pub recipient: String,
}

/// Inputs for one drafting call.
#[derive(Debug, Clone)]
pub struct DraftRequest {
    pub founder_name: String,
    pub company_description: String,
    pub resume_text: String,
    /// Candidate name for the sign-off.
    pub sender_name: String,
    /// Set on the retry pass only: names the constraints the previous draft
    /// missed.
    pub amendment: Option<String>,
}

/// Typed output schema for the drafting call. Missing fields fail
/// deserialization at the LLM boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailDraft {
    pub subject: String,
    pub body: String,
}

/// Produces an email draft from a request. Fronted by a trait so the
/// validate-and-retry logic is testable without the network.
#[async_trait]
pub trait DraftGenerator: Send + Sync {
    async fn draft(&self, request: &DraftRequest) -> Result<EmailDraft, AppError>;
}

#[async_trait]
impl DraftGenerator for LlmClient {
    async fn draft(&self, request: &DraftRequest) -> Result<EmailDraft, AppError> {
        let mut prompt = COMPOSE_PROMPT_TEMPLATE
            .replace("{founder_name}", &request.founder_name)
            .replace("{company_description}", &request.company_description)
            .replace("{required_phrase}", REQUIRED_PHRASE)
            .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
            .replace("{sender_name}", &request.sender_name)
            .replace("{resume_text}", &request.resume_text);
        if let Some(amendment) = &request.amendment {
            prompt = format!("{amendment}\n\n{prompt}");
        }
        self.call_json(&prompt, COMPOSE_SYSTEM)
            .await
            .map_err(|e| AppError::Generation(format!("Cover letter drafting failed: {e}")))
    }
}

/// Salutation the body must open with.
fn salutation(founder_name: &str) -> String {
    format!("Hi {founder_name}")
}

/// Checks the two mechanically verifiable constraints, returning the names
/// of the violated ones. Tone and framing are prompt-time instructions only.
fn validate_draft(draft: &EmailDraft, founder_name: &str) -> Vec<String> {
    let mut violations = Vec::new();
    if !draft.body.starts_with(&salutation(founder_name)) {
        violations.push(format!(
            "the body must start with the exact salutation \"{}\"",
            salutation(founder_name)
        ));
    }
    if !draft.body.contains(REQUIRED_PHRASE) {
        violations.push(format!(
            "the body must contain the exact phrase \"{REQUIRED_PHRASE}\""
        ));
    }
    violations
}

/// Drafts the application email and validates it against the mandatory
/// constraints, re-issuing the request once with an amended instruction
/// before giving up with `Composition`.
pub async fn compose(
    generator: &dyn DraftGenerator,
    founder: &ResolvedFounder,
    company_description: &str,
    resume_text: &str,
    sender_name: &str,
    recipient: &str,
) -> Result<ComposedEmail, AppError> {
    info!("Composing cover letter for {}", founder.name);

    let mut request = DraftRequest {
        founder_name: founder.name.clone(),
        company_description: company_description.to_string(),
        resume_text: resume_text.to_string(),
        sender_name: sender_name.to_string(),
        amendment: None,
    };

    // First attempt plus exactly one retry.
    for attempt in 0..2 {
        let draft = generator.draft(&request).await?;
        let violations = validate_draft(&draft, &founder.name);

        if violations.is_empty() {
            info!(
                "Cover letter accepted on attempt {}: subject={:?}, {} chars",
                attempt + 1,
                draft.subject,
                draft.body.len()
            );
            return Ok(ComposedEmail {
                subject: draft.subject,
                body: draft.body,
                recipient: recipient.to_string(),
            });
        }

        warn!(
            "Draft attempt {} rejected: {}",
            attempt + 1,
            violations.join("; ")
        );
        request.amendment = Some(
            COMPOSE_RETRY_AMENDMENT.replace("{violations}", &violations.join("; ")),
        );
    }

    Err(AppError::Composition(
        "Draft still violates mandatory constraints after one retry".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scout::SourceTier;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn founder() -> ResolvedFounder {
        ResolvedFounder {
            name: "Prajwalit".to_string(),
            source_tier: SourceTier::Deterministic,
        }
    }

    fn conforming_body() -> String {
        format!(
            "Hi Prajwalit, hope you're doing well.\n\n\
             I am a backend engineer with about two years of experience.\n\
             {REQUIRED_PHRASE}\n\nThanks,\nPraveen"
        )
    }

    /// Returns scripted drafts in order, recording every request.
    struct ScriptedGenerator {
        drafts: Mutex<Vec<EmailDraft>>,
        calls: AtomicUsize,
        last_request: Mutex<Option<DraftRequest>>,
    }

    impl ScriptedGenerator {
        fn new(drafts: Vec<EmailDraft>) -> Self {
            Self {
                drafts: Mutex::new(drafts),
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            }
        }

        fn last_request(&self) -> DraftRequest {
            self.last_request.lock().unwrap().clone().unwrap()
        }
    }

    #[async_trait]
    impl DraftGenerator for ScriptedGenerator {
        async fn draft(&self, request: &DraftRequest) -> Result<EmailDraft, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request.clone());
            let mut drafts = self.drafts.lock().unwrap();
            if drafts.is_empty() {
                return Err(AppError::Generation("script exhausted".to_string()));
            }
            Ok(drafts.remove(0))
        }
    }

    fn draft(subject: &str, body: &str) -> EmailDraft {
        EmailDraft {
            subject: subject.to_string(),
            body: body.to_string(),
        }
    }

    #[tokio::test]
    async fn accepts_conforming_first_draft() {
        let generator = ScriptedGenerator::new(vec![draft("Backend role", &conforming_body())]);

        let email = compose(&generator, &founder(), COMPANY_DESCRIPTION, "resume text", "Praveen", "prajwalit@unravel.tech")
            .await
            .unwrap();

        assert!(email.body.starts_with("Hi Prajwalit"));
        assert!(email.body.contains(REQUIRED_PHRASE));
        assert_eq!(email.recipient, "prajwalit@unravel.tech");
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_once_with_amended_instruction() {
        let generator = ScriptedGenerator::new(vec![
            draft("Backend role", "Dear Prajwalit, no phrase here."),
            draft("Backend role", &conforming_body()),
        ]);

        let email = compose(&generator, &founder(), COMPANY_DESCRIPTION, "resume text", "Praveen", "prajwalit@unravel.tech")
            .await
            .unwrap();

        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
        let amendment = generator.last_request().amendment.unwrap();
        assert!(amendment.contains("Hi Prajwalit"));
        assert!(amendment.contains(REQUIRED_PHRASE));
        assert!(email.body.starts_with("Hi Prajwalit"));
    }

    #[tokio::test]
    async fn draft_request_carries_sender_name_for_sign_off() {
        let generator = ScriptedGenerator::new(vec![draft("Backend role", &conforming_body())]);

        compose(&generator, &founder(), COMPANY_DESCRIPTION, "resume text", "Praveen", "prajwalit@unravel.tech")
            .await
            .unwrap();

        assert_eq!(generator.last_request().sender_name, "Praveen");
        // The template actually consumes the field.
        assert!(COMPOSE_PROMPT_TEMPLATE.contains("{sender_name}"));
    }

    #[tokio::test]
    async fn fails_after_retry_budget_exhausted() {
        let generator = ScriptedGenerator::new(vec![
            draft("s", "Dear Prajwalit, still no phrase."),
            draft("s", "Dear Prajwalit, still no phrase."),
        ]);

        let err = compose(&generator, &founder(), COMPANY_DESCRIPTION, "resume text", "Praveen", "prajwalit@unravel.tech")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Composition(_)));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn missing_phrase_alone_is_rejected() {
        let body = "Hi Prajwalit, greeting is fine but the phrase is missing.";
        let generator =
            ScriptedGenerator::new(vec![draft("s", body), draft("s", body)]);

        let err = compose(&generator, &founder(), COMPANY_DESCRIPTION, "resume", "Praveen", "prajwalit@unravel.tech")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Composition(_)));
    }

    #[test]
    fn required_phrase_check_is_case_sensitive() {
        let d = draft("s", "Hi Prajwalit, apply, dspy, simplify");
        let violations = validate_draft(&d, "Prajwalit");
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains(REQUIRED_PHRASE));
    }

    #[test]
    fn generator_error_propagates_unchanged() {
        // An exhausted script surfaces the Generation error, not Composition.
        let generator = ScriptedGenerator::new(vec![]);
        let err = tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(compose(&generator, &founder(), COMPANY_DESCRIPTION, "r", "Praveen", "a@unravel.tech"))
            .unwrap_err();
        assert!(matches!(err, AppError::Generation(_)));
    }
}
