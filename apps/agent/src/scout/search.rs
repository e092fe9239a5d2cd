//! Web search — DuckDuckGo HTML endpoint, scraper-friendly (no JS, no
//! CAPTCHA). Only result titles and snippets are extracted, never the page
//! chrome (which carries a country selector with 60+ country names).

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use tracing::info;

use crate::errors::AppError;

const DDG_HTML_URL: &str = "https://html.duckduckgo.com/html/";

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// One search result: title plus summary text, in result order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSnippet {
    pub title: String,
    pub summary: String,
}

impl SearchSnippet {
    /// Combined text the resolver tokenizes.
    pub fn text(&self) -> String {
        format!("{} {}", self.title, self.summary)
    }
}

/// A search backend. One network round-trip per call; an empty result set is
/// not an error.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchSnippet>, AppError>;
}

/// DuckDuckGo HTML search.
pub struct DuckDuckGo {
    client: reqwest::Client,
}

impl DuckDuckGo {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(15))
                .user_agent(USER_AGENT)
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

impl Default for DuckDuckGo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGo {
    async fn search(&self, query: &str) -> Result<Vec<SearchSnippet>, AppError> {
        info!("DuckDuckGo search: {query:?}");
        let html = self
            .client
            .get(DDG_HTML_URL)
            .query(&[("q", query)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let snippets = parse_result_page(&html);
        info!("DuckDuckGo returned {} result snippets", snippets.len());
        Ok(snippets)
    }
}

/// Extracts result titles + snippets from a DDG HTML result page, pairing
/// them in result order. Returns empty when the page has no results.
pub fn parse_result_page(html: &str) -> Vec<SearchSnippet> {
    static TITLE: OnceLock<Regex> = OnceLock::new();
    static SNIPPET: OnceLock<Regex> = OnceLock::new();
    let title_re = TITLE.get_or_init(|| {
        Regex::new(r#"class="result__a"[^>]*>(?s)(.*?)</a>"#).expect("static regex")
    });
    let snippet_re = SNIPPET.get_or_init(|| {
        Regex::new(r#"class="result__snippet"[^>]*>(?s)(.*?)</(?:a|span)>"#).expect("static regex")
    });

    let titles: Vec<String> = title_re
        .captures_iter(html)
        .map(|c| strip_html(&c[1]))
        .collect();
    let summaries: Vec<String> = snippet_re
        .captures_iter(html)
        .map(|c| strip_html(&c[1]))
        .collect();

    titles
        .into_iter()
        .enumerate()
        .map(|(i, title)| SearchSnippet {
            title,
            summary: summaries.get(i).cloned().unwrap_or_default(),
        })
        .collect()
}

/// Removes HTML tags and entities, collapsing whitespace.
fn strip_html(fragment: &str) -> String {
    static TAGS: OnceLock<Regex> = OnceLock::new();
    static ENTITIES: OnceLock<Regex> = OnceLock::new();
    static SPACES: OnceLock<Regex> = OnceLock::new();
    let tags = TAGS.get_or_init(|| Regex::new(r"<[^>]+>").expect("static regex"));
    let entities = ENTITIES.get_or_init(|| Regex::new(r"&[a-z#0-9]+;").expect("static regex"));
    let spaces = SPACES.get_or_init(|| Regex::new(r"\s+").expect("static regex"));

    let text = tags.replace_all(fragment, " ");
    let text = entities.replace_all(&text, " ");
    spaces.replace_all(&text, " ").trim().to_string()
}
