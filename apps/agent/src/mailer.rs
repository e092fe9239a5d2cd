//! Mail dispatch — sends the composed application email over SMTP with the
//! resume attached, or renders it without transmission in dry-run mode.

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{info, warn};

use crate::composer::ComposedEmail;
use crate::config::Config;
use crate::errors::AppError;
use crate::resume;

/// Result of a dispatch attempt. `Aborted` is a clean outcome (the user
/// declined the confirmation prompt), not a failure.
#[derive(Debug)]
pub enum DispatchOutcome {
    Sent { recipient: String },
    Preview(String),
    Aborted,
}

/// Final delivery address: the mock recipient when supplied, otherwise the
/// founder-derived address. Nothing else about the send changes.
pub fn delivery_address(mock_recipient: Option<&str>, derived: &str) -> String {
    match mock_recipient {
        Some(mock) => {
            warn!("Recipient overridden: {derived} -> {mock}");
            mock.to_string()
        }
        None => derived.to_string(),
    }
}

/// Textual preview of the artifact: subject, body, recipient.
pub fn render_preview(email: &ComposedEmail) -> String {
    format!("{}\n{}\n{}", email.subject, email.body, email.recipient)
}

/// Sends the email, or renders it when `dry_run` is set.
///
/// Unless `auto_confirm` is set, a real send blocks on a y/n prompt first;
/// declining (or having no terminal to ask on) aborts with nothing sent.
/// Transmission and the prompt both run on the blocking pool.
pub async fn dispatch(
    config: &Config,
    email: &ComposedEmail,
    dry_run: bool,
    auto_confirm: bool,
) -> Result<DispatchOutcome, AppError> {
    log_preview(config, email, dry_run);

    if dry_run {
        return Ok(DispatchOutcome::Preview(render_preview(email)));
    }

    if !auto_confirm && !confirm_send(&email.recipient).await {
        info!("Sending aborted by user");
        return Ok(DispatchOutcome::Aborted);
    }

    let attachment_bytes = resume::read_attachment_bytes(&config.resume_path)?;
    let message = build_message(config, email, attachment_bytes)?;

    let transport = SmtpTransport::relay(&config.smtp_host)
        .map_err(|e| AppError::Transport(format!("SMTP relay setup failed: {e}")))?
        .credentials(Credentials::new(
            config.sender_email.clone(),
            config.sender_app_password.clone(),
        ))
        .build();

    let recipient = email.recipient.clone();
    info!("Sending email to {recipient}");
    tokio::task::spawn_blocking(move || transport.send(&message))
        .await
        .map_err(|e| AppError::Transport(format!("Send task failed: {e}")))?
        .map_err(|e| AppError::Transport(format!("SMTP send failed: {e}")))?;

    info!("Email successfully sent to {recipient}");
    Ok(DispatchOutcome::Sent { recipient })
}

/// Builds the MIME message: plain-text cover letter plus the resume PDF.
fn build_message(
    config: &Config,
    email: &ComposedEmail,
    attachment_bytes: Vec<u8>,
) -> Result<Message, AppError> {
    let from: Mailbox = format!("{} <{}>", config.sender_name, config.sender_email)
        .parse()
        .map_err(|e| AppError::Transport(format!("Invalid sender address: {e}")))?;
    let to: Mailbox = email
        .recipient
        .parse()
        .map_err(|e| AppError::Transport(format!("Invalid recipient address: {e}")))?;

    let filename = config
        .resume_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("resume.pdf")
        .to_string();

    Message::builder()
        .from(from)
        .to(to)
        .subject(email.subject.as_str())
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(email.body.clone()))
                .singlepart(
                    Attachment::new(filename)
                        .body(attachment_bytes, ContentType::parse("application/pdf").expect("static content type")),
                ),
        )
        .map_err(|e| AppError::Transport(format!("Message assembly failed: {e}")))
}

/// Blocks on a y/n prompt. No terminal counts as a decline.
async fn confirm_send(recipient: &str) -> bool {
    let prompt = format!("Send this email to {recipient}?");
    tokio::task::spawn_blocking(move || {
        inquire::Confirm::new(&prompt)
            .with_default(false)
            .prompt()
            .unwrap_or(false)
    })
    .await
    .unwrap_or(false)
}

fn log_preview(config: &Config, email: &ComposedEmail, dry_run: bool) {
    let mode = if dry_run {
        "DRY RUN, email NOT sent"
    } else {
        "PREVIEW, email ready to send"
    };
    info!(
        "\n{line}\n[{mode}]\nTo:      {to}\nFrom:    {from}\nSubject: {subject}\nResume:  {resume}\n{sep}\n{body}\n{line}",
        line = "=".repeat(60),
        sep = "-".repeat(60),
        mode = mode,
        to = email.recipient,
        from = config.sender_email,
        subject = email.subject,
        resume = config.resume_path.display(),
        body = email.body,
    );
}
