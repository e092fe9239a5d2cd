//! Resume parsing — extracts plain text from the resume PDF for use as
//! grounding context in cover letter generation.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::info;

use crate::errors::AppError;

/// Parses the resume PDF and returns its cleaned text content.
///
/// Fails with `NotFound` if the file is missing and `Extraction` if the PDF
/// yields no text (scanned images extract to nothing).
pub fn extract_resume_text(path: &Path) -> Result<String, AppError> {
    if !path.exists() {
        return Err(AppError::NotFound(format!(
            "Resume not found at: {}",
            path.display()
        )));
    }

    let raw = pdf_extract::extract_text(path).map_err(|e| {
        AppError::Extraction(format!("Could not read {}: {e}", path.display()))
    })?;

    let text = clean_text(&raw);
    if text.is_empty() {
        return Err(AppError::Extraction(format!(
            "Could not extract any text from {}. \
             Make sure the PDF is text-based and not a scanned image.",
            path.display()
        )));
    }

    info!("Extracted {} chars from resume", text.len());
    Ok(text)
}

/// Async wrapper so the orchestrator can overlap the (blocking) PDF parse
/// with the founder search.
pub async fn read_resume(path: PathBuf) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || extract_resume_text(&path))
        .await
        .map_err(|e| AppError::Extraction(format!("Resume parse task failed: {e}")))?
}

/// Reads the resume file verbatim for attaching to the outgoing email.
pub fn read_attachment_bytes(path: &Path) -> Result<Vec<u8>, AppError> {
    if !path.exists() {
        return Err(AppError::NotFound(format!(
            "Resume not found at: {}",
            path.display()
        )));
    }
    std::fs::read(path)
        .map_err(|e| AppError::Extraction(format!("Could not read {}: {e}", path.display())))
}

/// Collapses excessive whitespace left behind by PDF text extraction.
fn clean_text(raw: &str) -> String {
    static NEWLINES: OnceLock<Regex> = OnceLock::new();
    static SPACES: OnceLock<Regex> = OnceLock::new();
    let newlines = NEWLINES.get_or_init(|| Regex::new(r"\n{3,}").expect("static regex"));
    let spaces = SPACES.get_or_init(|| Regex::new(r" {2,}").expect("static regex"));

    let text = newlines.replace_all(raw.trim(), "\n\n");
    spaces.replace_all(&text, " ").into_owned()
}
