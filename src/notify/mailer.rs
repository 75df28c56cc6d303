/**
 * Mail Transport Boundary
 *
 * This module defines the outbound-mail boundary consumed by the
 * notification worker, and its backends:
 *
 * - `SmtpMailer` - real delivery over SMTP via lettre
 * - `LoggingMailer` - logs the message instead of sending it; used when
 *   SMTP is not configured so the rest of the pipeline keeps working
 * - `RecordingMailer` - captures jobs in memory for assertions in tests
 */

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Mutex;
use thiserror::Error;

/// One unit of outbound-mail work.
///
/// Ephemeral and in-memory only; produced exactly once per successful
/// event creation and consumed exactly once by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationJob {
    /// Destination address
    pub recipient: String,
    /// Subject line
    pub subject: String,
    /// Plain-text body
    pub body: String,
}

/// Errors from the mail transport.
///
/// These never cross the HTTP boundary; the notification worker logs and
/// swallows them.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The recipient or sender address could not be parsed.
    #[error("invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The message could not be assembled.
    #[error("could not build message: {0}")]
    Message(#[from] lettre::error::Error),

    /// The SMTP relay rejected or failed the send.
    #[error("smtp error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Send-message capability consumed by the notification worker.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Dispatch one job. Completion is fire-and-forget from the caller's
    /// point of view.
    async fn send(&self, job: &NotificationJob) -> Result<(), TransportError>;
}

/// SMTP transport backed by lettre.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Create a mailer that relays through the given SMTP host.
    ///
    /// # Arguments
    ///
    /// * `host` - SMTP relay hostname
    /// * `credentials` - Optional (username, password) pair for the relay
    /// * `from` - Sender mailbox, e.g. `Gatherly <no-reply@example.com>`
    pub fn new(
        host: &str,
        credentials: Option<(String, String)>,
        from: &str,
    ) -> Result<Self, TransportError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(host)?;
        if let Some((username, password)) = credentials {
            builder = builder.credentials(Credentials::new(username, password));
        }

        Ok(Self {
            transport: builder.build(),
            from: from.parse()?,
        })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, job: &NotificationJob) -> Result<(), TransportError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(job.recipient.parse()?)
            .subject(job.subject.clone())
            .body(job.body.clone())?;

        self.transport.send(message).await?;
        Ok(())
    }
}

/// Transport used when SMTP is not configured.
///
/// Logs the job so local development still shows what would have been
/// sent.
pub struct LoggingMailer;

#[async_trait]
impl MailTransport for LoggingMailer {
    async fn send(&self, job: &NotificationJob) -> Result<(), TransportError> {
        tracing::info!(
            "mail transport not configured; would send to {}: {}",
            job.recipient,
            job.subject
        );
        Ok(())
    }
}

/// Transport that records every job it is asked to send.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<NotificationJob>>,
}

impl RecordingMailer {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything sent so far, in dispatch order.
    pub fn sent(&self) -> Vec<NotificationJob> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for RecordingMailer {
    async fn send(&self, job: &NotificationJob) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push(job.clone());
        Ok(())
    }
}
