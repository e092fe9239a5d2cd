//! Job application agent — one-shot pipeline.
//!
//! Flow: parse resume + resolve founder (independent, overlapped) →
//! compose constraint-checked cover letter → confirm → send or render.
//! Any stage failure aborts the run; the dispatcher is never invoked
//! unless composition accepted the draft.

mod cli;
mod composer;
mod config;
mod errors;
mod llm_client;
mod mailer;
mod resume;
mod scout;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::Cli;
use crate::config::Config;
use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::mailer::DispatchOutcome;
use crate::scout::search::DuckDuckGo;

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    // Config is validated before any stage runs; a missing value never
    // becomes a mid-pipeline failure.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Unravel.tech job application agent v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&config, &args).await {
        error!("Run aborted at stage '{}': {e}", e.stage());
        std::process::exit(1);
    }
}

async fn run(config: &Config, args: &Cli) -> Result<(), AppError> {
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let search = DuckDuckGo::new();

    // Resume parsing and founder resolution are independent; overlap them.
    // Both must complete before composition starts.
    let (resume_text, founder) = tokio::try_join!(
        resume::read_resume(config.resume_path.clone()),
        scout::resolve_founder(&search, &llm, scout::FOUNDER_QUERY),
    )?;
    info!(
        "Resolved founder: {} (tier: {:?})",
        founder.name, founder.source_tier
    );

    let derived = scout::contact_address(&founder.name);
    let recipient = mailer::delivery_address(args.mock_recipient.as_deref(), &derived);

    let email = composer::compose(
        &llm,
        &founder,
        composer::COMPANY_DESCRIPTION,
        &resume_text,
        &config.sender_name,
        &recipient,
    )
    .await?;

    match mailer::dispatch(config, &email, args.dry_run, args.auto_confirm).await? {
        DispatchOutcome::Sent { recipient } => {
            info!("Done. Application sent to {recipient} (subject: {:?})", email.subject);
        }
        DispatchOutcome::Preview(_) => {
            info!("Dry run complete. Nothing was sent.");
        }
        DispatchOutcome::Aborted => {
            info!("Confirmation declined. Nothing was sent.");
        }
    }

    Ok(())
}
