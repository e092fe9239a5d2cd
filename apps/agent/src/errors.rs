use thiserror::Error;

/// Application-level error type.
///
/// Every pipeline stage maps its failures into exactly one of these variants,
/// so the orchestrator can report the originating stage and abort. All
/// variants are terminal for the run — the only retries anywhere are the
/// composer's single re-generation and the LLM client's transport-level
/// backoff, both internal to their stage.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Resolution error: {0}")]
    Resolution(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Composition error: {0}")]
    Composition(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl AppError {
    /// Stage label used in the orchestrator's abort message.
    pub fn stage(&self) -> &'static str {
        match self {
            AppError::NotFound(_) | AppError::Extraction(_) => "resume",
            AppError::Network(_) | AppError::Resolution(_) => "scout",
            AppError::Generation(_) => "llm",
            AppError::Composition(_) => "composer",
            AppError::Transport(_) => "mailer",
            AppError::Config(_) => "config",
        }
    }
}
