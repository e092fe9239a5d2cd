//! CLI definitions using clap derive API

use clap::Parser;

/// Job application agent for Unravel.tech
///
/// Parses the resume, scouts the web for the right founder, composes a
/// cover-letter email grounded in the resume, and sends it with the resume
/// attached.
#[derive(Parser, Debug)]
#[command(
    name = "agent",
    author,
    version,
    about = "Unravel.tech job application agent",
    after_help = "Examples:\n    \
                  agent --dry-run\n    \
                  agent --mock-recipient you@example.com\n    \
                  agent --auto-confirm"
)]
pub struct Cli {
    /// Render the email instead of sending it
    #[arg(long)]
    pub dry_run: bool,

    /// Override the recipient address (for testing against your own inbox)
    #[arg(long, value_name = "EMAIL")]
    pub mock_recipient: Option<String>,

    /// Skip the y/n confirmation prompt before sending
    #[arg(long)]
    pub auto_confirm: bool,
}
