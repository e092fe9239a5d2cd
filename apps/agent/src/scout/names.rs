//! Candidate-name extraction from scraped search text.
//!
//! A candidate is a maximal run of contiguous Title-Case words. Words on a
//! blocklist of page chrome, job titles, and marketing vocabulary (things
//! that are Title-Cased in the wild but are not person names) are dropped
//! and break the run they appear in.

use std::sync::OnceLock;

use regex::Regex;

/// Non-name words filtered out of the Title-Case matches.
const NON_NAME_WORDS: &[&str] = &[
    "Privacy", "Policy", "Terms", "Agreement", "Service", "Cookie",
    "Technical", "Depth", "Production", "Engineering", "Product", "Rapid",
    "Prototyping", "Planning", "Assessment", "Architecture", "Systems",
    "Approach", "Mindset", "Results", "Resources", "Context", "Protocol",
    "Espressif", "Model", "User", "About", "Contact", "Login", "Sign",
    "Join", "Learn", "More", "View", "Profile", "People", "Company",
    "Google", "DuckDuckGo", "Twitter", "Youtube", "Github", "Apple",
    "Open", "Source", "Agent", "Build", "Ship", "Scale", "Team",
    "Artificial", "Intelligence", "Machine", "Learning", "Language",
    "Distributed", "Autonomous", "Sales", "Multi", "Modern", "Loop",
    "Senior", "Software", "Engineer", "Developer", "Director", "Manager",
    "Head", "Vice", "President", "Chief", "Officer", "Executive",
    "Home", "Blog", "Talks", "Events", "Talk", "Without", "Ceremony",
    "The", "That", "Kill", "Ideas", "Work", "Unlike", "Prioritize",
    "Evaluate", "Risk", "Assess", "Optimize", "Deploy", "Minutes",
    "Memory", "Long", "Expensive", "Mistakes", "Prevents",
    "Founder", "Founders", "Pune",
    // LinkedIn / DDG page chrome that slips through the shape check
    "Professional", "Overview", "Express", "Scripts", "Private", "Limited",
    "Privately", "Held", "Promise", "Provides", "Promoted",
];

fn is_blocked(word: &str) -> bool {
    NON_NAME_WORDS.contains(&word)
}

/// Extracts candidate name tokens: maximal runs of contiguous Title-Case
/// words, blocklist filtered and deduplicated, preserving first-seen order.
pub fn extract_candidate_names(text: &str) -> Vec<String> {
    static WORD: OnceLock<Regex> = OnceLock::new();
    let word = WORD.get_or_init(|| Regex::new(r"\b[A-Z][a-z]{2,14}\b").expect("static regex"));

    let mut candidates: Vec<String> = Vec::new();
    let mut seen = std::collections::HashSet::new();
    let mut current: Vec<&str> = Vec::new();
    let mut last_end = 0usize;

    let mut flush = |run: &mut Vec<&str>, out: &mut Vec<String>| {
        if !run.is_empty() {
            let name = run.join(" ");
            if seen.insert(name.clone()) {
                out.push(name);
            }
            run.clear();
        }
    };

    for m in word.find_iter(text) {
        if is_blocked(m.as_str()) {
            flush(&mut current, &mut candidates);
            last_end = m.end();
            continue;
        }
        let contiguous = !current.is_empty()
            && text[last_end..m.start()]
                .chars()
                .all(|c| c.is_whitespace());
        if !contiguous {
            flush(&mut current, &mut candidates);
        }
        current.push(m.as_str());
        last_end = m.end();
    }
    flush(&mut current, &mut candidates);

    candidates
}

/// True if "pr" appears as consecutive letters in `name`, case-insensitive.
pub fn contains_pr(name: &str) -> bool {
    name.to_lowercase().contains("pr")
}

/// First word of a (possibly multi-word) name.
pub fn first_name(name: &str) -> &str {
    name.split_whitespace().next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_capitalized_word_runs() {
        let names =
            extract_candidate_names("Prajwalit Bhopale leads Unravel alongside Kedar Sovani.");
        assert_eq!(names, vec!["Prajwalit Bhopale", "Unravel", "Kedar Sovani"]);
    }

    #[test]
    fn single_capitalized_word_forms_its_own_run() {
        let names = extract_candidate_names("Prajwalit leads the team in Pune");
        assert_eq!(names, vec!["Prajwalit"]);
    }

    #[test]
    fn blocked_words_break_runs() {
        let names = extract_candidate_names("Senior Software Engineer Prajwalit Bhopale");
        assert_eq!(names, vec!["Prajwalit Bhopale"]);
    }

    #[test]
    fn blocklist_filters_page_chrome() {
        let names = extract_candidate_names("Privacy Policy Professional Overview Express Scripts");
        assert!(names.is_empty());
    }

    #[test]
    fn dedup_preserves_first_seen_order() {
        let names = extract_candidate_names(
            "Kedar Sovani spoke. Prajwalit Bhopale wrote. Kedar Sovani left.",
        );
        assert_eq!(names, vec!["Kedar Sovani", "Prajwalit Bhopale"]);
    }

    #[test]
    fn punctuation_breaks_a_run() {
        let names = extract_candidate_names("Unravel.tech in Prajwalit");
        assert_eq!(names, vec!["Unravel", "Prajwalit"]);
    }

    #[test]
    fn contains_pr_is_case_insensitive() {
        assert!(contains_pr("Prajwalit"));
        assert!(contains_pr("SUPRIYA"));
        assert!(!contains_pr("Kedar Sovani"));
    }

    #[test]
    fn first_name_takes_leading_word() {
        assert_eq!(first_name("Prajwalit Bhopale"), "Prajwalit");
        assert_eq!(first_name("Prajwalit"), "Prajwalit");
    }
}
