use std::path::PathBuf;

use crate::errors::AppError;

/// Run configuration loaded once from environment variables at startup.
///
/// Core logic never reads the process environment directly — everything it
/// needs is validated here, before any pipeline stage runs, and passed down
/// by reference. A missing required variable is a startup failure
/// (`AppError::Config`), never a mid-pipeline one.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub sender_email: String,
    pub sender_app_password: String,
    pub resume_path: PathBuf,
    pub sender_name: String,
    pub smtp_host: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            sender_email: require_env("SENDER_EMAIL")?,
            sender_app_password: require_env("SENDER_APP_PASSWORD")?,
            resume_path: PathBuf::from(require_env("RESUME_PATH")?),
            sender_name: std::env::var("SENDER_NAME").unwrap_or_else(|_| "Praveen".to_string()),
            smtp_host: std::env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String, AppError> {
    match std::env::var(key) {
        Ok(val) if !val.trim().is_empty() => Ok(val),
        _ => Err(AppError::Config(format!(
            "Required environment variable '{key}' is not set"
        ))),
    }
}
