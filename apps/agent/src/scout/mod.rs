//! Founder resolution — finds the Unravel.tech founder whose name contains
//! the consecutive letters "pr".
//!
//! Two strategies run in fixed priority order over the same search results:
//! a deterministic substring filter (cheap, auditable, exact for the
//! expected case) and a generative fallback for noisy or reordered results.
//! The order is load-bearing: it decides which `SourceTier` gets reported.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

pub mod names;
pub mod prompts;
pub mod search;

use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::LlmClient;
use crate::scout::names::{contains_pr, extract_candidate_names, first_name};
use crate::scout::prompts::{FOUNDER_EXTRACT_PROMPT_TEMPLATE, FOUNDER_EXTRACT_SYSTEM};
use crate::scout::search::{SearchProvider, SearchSnippet};

/// Search query used for founder discovery.
pub const FOUNDER_QUERY: &str =
    "founder names of unravel tech company, location Pune maharashtra";

/// Company mail domain for the derived contact address.
pub const COMPANY_DOMAIN: &str = "unravel.tech";

/// Which tier produced the resolved name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceTier {
    Deterministic,
    Generative,
}

/// The resolved recipient. Immutable after creation; `name` is non-empty,
/// and under `Deterministic` it always contains "pr" case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFounder {
    pub name: String,
    pub source_tier: SourceTier,
}

/// Contact address derived from the founder's first name.
pub fn contact_address(name: &str) -> String {
    format!("{}@{}", first_name(name).to_lowercase(), COMPANY_DOMAIN)
}

// ────────────────────────────────────────────────────────────────────────────
// Generative extraction seam
// ────────────────────────────────────────────────────────────────────────────

/// Pulls a best-guess founder name out of raw scraped text. Fronted by a
/// trait so the resolver is testable without the network.
#[async_trait]
pub trait NameExtractor: Send + Sync {
    async fn extract_founder_name(&self, raw_text: &str) -> Result<String, AppError>;
}

/// Typed output schema for the extraction call. A response missing the
/// field fails deserialization and surfaces as a `Generation` error.
#[derive(Debug, Deserialize)]
struct FounderNameOutput {
    founder_name: String,
}

#[async_trait]
impl NameExtractor for LlmClient {
    async fn extract_founder_name(&self, raw_text: &str) -> Result<String, AppError> {
        let prompt = FOUNDER_EXTRACT_PROMPT_TEMPLATE.replace("{raw_text}", raw_text);
        let system = format!("{FOUNDER_EXTRACT_SYSTEM} {JSON_ONLY_SYSTEM}");
        let output: FounderNameOutput = self
            .call_json(&prompt, &system)
            .await
            .map_err(|e| AppError::Generation(format!("Founder extraction failed: {e}")))?;
        Ok(output.founder_name)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Resolution strategies
// ────────────────────────────────────────────────────────────────────────────

/// One resolution tier. Returns `Ok(None)` when the tier has no candidate,
/// leaving the next tier to try.
#[async_trait]
pub trait ResolveStrategy: Send + Sync {
    async fn resolve(&self, snippets: &[SearchSnippet])
        -> Result<Option<ResolvedFounder>, AppError>;
}

/// Rule-based tier: scan snippets in order and return the first candidate
/// name containing "pr". Pure function of the snippet sequence.
pub struct DeterministicStrategy;

#[async_trait]
impl ResolveStrategy for DeterministicStrategy {
    async fn resolve(
        &self,
        snippets: &[SearchSnippet],
    ) -> Result<Option<ResolvedFounder>, AppError> {
        for snippet in snippets {
            let candidates = extract_candidate_names(&snippet.text());
            // The matched token itself becomes the name, so the invariant
            // "a Deterministic name contains 'pr'" holds even when only the
            // surname carries the letters.
            if let Some(matched) = candidates.into_iter().find(|n| contains_pr(n)) {
                info!("Deterministic match: {matched}");
                return Ok(Some(ResolvedFounder {
                    name: matched,
                    source_tier: SourceTier::Deterministic,
                }));
            }
        }
        Ok(None)
    }
}

/// Generative fallback: one extraction call over all snippet text combined.
pub struct GenerativeStrategy<'a> {
    pub extractor: &'a dyn NameExtractor,
}

#[async_trait]
impl ResolveStrategy for GenerativeStrategy<'_> {
    async fn resolve(
        &self,
        snippets: &[SearchSnippet],
    ) -> Result<Option<ResolvedFounder>, AppError> {
        let combined = snippets
            .iter()
            .map(|s| s.text())
            .collect::<Vec<_>>()
            .join("\n");

        let answer = self.extractor.extract_founder_name(&combined).await?;
        let name = first_name(answer.trim()).to_string();
        if name.is_empty() {
            return Ok(None);
        }
        if !contains_pr(&name) {
            warn!("Generative tier picked {name:?} which does NOT contain 'pr'");
        }
        info!("Generative match: {name}");
        Ok(Some(ResolvedFounder {
            name,
            source_tier: SourceTier::Generative,
        }))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Resolver entry point
// ────────────────────────────────────────────────────────────────────────────

/// Resolves the target founder: one search round-trip, then each strategy in
/// priority order over the same snippet set. Fails with `Resolution` when
/// every tier comes up empty.
pub async fn resolve_founder(
    provider: &dyn SearchProvider,
    extractor: &dyn NameExtractor,
    query: &str,
) -> Result<ResolvedFounder, AppError> {
    let snippets = provider.search(query).await?;
    info!("Search returned {} snippets", snippets.len());

    let generative = GenerativeStrategy { extractor };
    let strategies: [&dyn ResolveStrategy; 2] = [&DeterministicStrategy, &generative];

    for strategy in strategies {
        if let Some(founder) = strategy.resolve(&snippets).await? {
            return Ok(founder);
        }
    }

    Err(AppError::Resolution(
        "No founder candidate found in search results".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn snippet(title: &str, summary: &str) -> SearchSnippet {
        SearchSnippet {
            title: title.to_string(),
            summary: summary.to_string(),
        }
    }

    struct FixedSearch(Vec<SearchSnippet>);

    #[async_trait]
    impl SearchProvider for FixedSearch {
        async fn search(&self, _query: &str) -> Result<Vec<SearchSnippet>, AppError> {
            Ok(self.0.clone())
        }
    }

    struct CountingExtractor {
        calls: AtomicUsize,
        answer: String,
    }

    impl CountingExtractor {
        fn new(answer: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                answer: answer.to_string(),
            }
        }
    }

    #[async_trait]
    impl NameExtractor for CountingExtractor {
        async fn extract_founder_name(&self, _raw_text: &str) -> Result<String, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.answer.clone())
        }
    }

    #[tokio::test]
    async fn deterministic_tier_wins_without_extractor_call() {
        let search = FixedSearch(vec![snippet(
            "Founder bio",
            "Prajwalit leads Unravel.tech in Pune",
        )]);
        let extractor = CountingExtractor::new("never used");

        let founder = resolve_founder(&search, &extractor, FOUNDER_QUERY)
            .await
            .unwrap();

        assert_eq!(founder.name, "Prajwalit");
        assert_eq!(founder.source_tier, SourceTier::Deterministic);
        assert_eq!(extractor.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn deterministic_tier_returns_first_match_in_scan_order() {
        let search = FixedSearch(vec![
            snippet("Team page", "Kedar Sovani joined early"),
            snippet("Founders", "Prajwalit Bhopale and Supriya Zinjurde built it"),
        ]);
        let extractor = CountingExtractor::new("unused");

        let founder = resolve_founder(&search, &extractor, FOUNDER_QUERY)
            .await
            .unwrap();

        // Both "Prajwalit Bhopale" and "Supriya Zinjurde" match; source order,
        // not alphabetical order, decides.
        assert_eq!(founder.name, "Prajwalit Bhopale");
    }

    #[tokio::test]
    async fn deterministic_name_keeps_pr_when_only_surname_matches() {
        let search = FixedSearch(vec![snippet("Company leadership", "Anand Prakash leads the company")]);
        let extractor = CountingExtractor::new("unused");

        let founder = resolve_founder(&search, &extractor, FOUNDER_QUERY)
            .await
            .unwrap();

        assert_eq!(founder.name, "Anand Prakash");
        assert_eq!(founder.source_tier, SourceTier::Deterministic);
        assert!(names::contains_pr(&founder.name));
        assert_eq!(contact_address(&founder.name), "anand@unravel.tech");
    }

    #[tokio::test]
    async fn deterministic_tier_is_idempotent() {
        let snippets = vec![snippet("Founder bio", "Prajwalit leads Unravel.tech in Pune")];
        let a = DeterministicStrategy.resolve(&snippets).await.unwrap();
        let b = DeterministicStrategy.resolve(&snippets).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn generative_fallback_called_exactly_once() {
        let search = FixedSearch(vec![snippet("Team page", "Kedar Sovani joined early")]);
        let extractor = CountingExtractor::new("Prajwalit Bhopale");

        let founder = resolve_founder(&search, &extractor, FOUNDER_QUERY)
            .await
            .unwrap();

        assert_eq!(founder.name, "Prajwalit");
        assert_eq!(founder.source_tier, SourceTier::Generative);
        assert_eq!(extractor.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_generative_answer_is_resolution_error() {
        let search = FixedSearch(vec![snippet("Team page", "Kedar Sovani joined early")]);
        let extractor = CountingExtractor::new("   ");

        let err = resolve_founder(&search, &extractor, FOUNDER_QUERY)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Resolution(_)));
        assert_eq!(extractor.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn contact_address_uses_lowercased_first_name() {
        assert_eq!(contact_address("Prajwalit Bhopale"), "prajwalit@unravel.tech");
        assert_eq!(contact_address("Prajwalit"), "prajwalit@unravel.tech");
    }
}
