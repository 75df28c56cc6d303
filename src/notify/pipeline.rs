/**
 * Notification Pipeline
 *
 * An in-process channel between the event-creation handler and a single
 * background worker. The handler publishes an `EventCreated` occurrence
 * after the durable write is acknowledged; the worker turns each
 * occurrence into a `NotificationJob` and hands it to the mail transport.
 *
 * Publishing never blocks and never fails the originating request. The
 * HTTP response may be sent before, during, or after the mail dispatch
 * completes; no ordering is guaranteed between the two.
 */

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::notify::mailer::{MailTransport, NotificationJob};

/// An "event was created" occurrence, published once per successful
/// creation.
#[derive(Debug, Clone)]
pub struct EventCreated {
    /// Email address of the event creator
    pub creator_email: String,
    /// Username of the event creator
    pub creator_username: String,
    /// Name of the created event
    pub event_name: String,
    /// When the event takes place
    pub event_date_time: DateTime<Utc>,
    /// Where the event takes place
    pub event_location: String,
}

impl From<&EventCreated> for NotificationJob {
    fn from(occurrence: &EventCreated) -> Self {
        NotificationJob {
            recipient: occurrence.creator_email.clone(),
            subject: format!("Your event \"{}\" is confirmed", occurrence.event_name),
            body: format!(
                "Hi {},\n\nYour event \"{}\" on {} at {} has been created.\n\n- Gatherly",
                occurrence.creator_username,
                occurrence.event_name,
                occurrence.event_date_time.to_rfc3339(),
                occurrence.event_location,
            ),
        }
    }
}

/// Sending half of the pipeline, held by the application state.
#[derive(Clone)]
pub struct NotificationPublisher {
    tx: mpsc::UnboundedSender<EventCreated>,
}

impl NotificationPublisher {
    /// Publish an occurrence to the worker.
    ///
    /// Non-blocking. If the worker is gone the occurrence is dropped and
    /// logged; the caller's request is unaffected either way.
    pub fn publish(&self, occurrence: EventCreated) {
        if self.tx.send(occurrence).is_err() {
            tracing::error!("notification worker is gone; dropping occurrence");
        }
    }
}

/// Start the pipeline: spawn the worker and return the publishing half.
///
/// The worker runs until every publisher has been dropped and the channel
/// drains. Transport failures are logged and swallowed; there is no retry
/// and no persistence.
///
/// # Arguments
///
/// * `transport` - The mail transport the worker dispatches through
///
/// # Returns
///
/// The publisher plus the worker's join handle (detached in production,
/// awaited by tests that need dispatch to finish)
pub fn start(transport: Arc<dyn MailTransport>) -> (NotificationPublisher, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<EventCreated>();

    let worker = tokio::spawn(async move {
        while let Some(occurrence) = rx.recv().await {
            let job = NotificationJob::from(&occurrence);
            tracing::debug!("dispatching confirmation email to {}", job.recipient);

            if let Err(e) = transport.send(&job).await {
                // Best-effort delivery: log and move on.
                tracing::error!(
                    "failed to deliver confirmation email to {}: {}",
                    job.recipient,
                    e
                );
            }
        }
        tracing::debug!("notification worker shutting down");
    });

    (NotificationPublisher { tx }, worker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::mailer::{RecordingMailer, TransportError};
    use async_trait::async_trait;

    fn occurrence(name: &str) -> EventCreated {
        EventCreated {
            creator_email: "a@example.com".to_string(),
            creator_username: "alice1".to_string(),
            event_name: name.to_string(),
            event_date_time: "2025-01-01T10:00:00Z".parse().unwrap(),
            event_location: "HQ".to_string(),
        }
    }

    #[tokio::test]
    async fn test_one_job_per_occurrence() {
        let mailer = Arc::new(RecordingMailer::new());
        let (publisher, worker) = start(mailer.clone());

        publisher.publish(occurrence("Launch"));
        publisher.publish(occurrence("Retro"));

        // Closing the channel lets the worker drain and exit.
        drop(publisher);
        worker.await.unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].recipient, "a@example.com");
        assert_eq!(sent[0].subject, "Your event \"Launch\" is confirmed");
        assert!(sent[0].body.contains("alice1"));
        assert!(sent[0].body.contains("HQ"));
    }

    #[tokio::test]
    async fn test_transport_failure_is_swallowed() {
        struct FailingMailer;

        #[async_trait]
        impl MailTransport for FailingMailer {
            async fn send(&self, job: &NotificationJob) -> Result<(), TransportError> {
                Err(TransportError::Address(
                    job.recipient.parse::<lettre::Address>().unwrap_err(),
                ))
            }
        }

        let (publisher, worker) = start(Arc::new(FailingMailer));
        publisher.publish(EventCreated {
            creator_email: "not an address".to_string(),
            ..occurrence("Launch")
        });
        drop(publisher);

        // The worker survives the failure and exits cleanly.
        worker.await.unwrap();
    }

    #[test]
    fn test_job_derivation() {
        let job = NotificationJob::from(&occurrence("Launch"));
        assert_eq!(job.recipient, "a@example.com");
        assert!(job.subject.contains("Launch"));
        assert!(job.body.contains("2025-01-01"));
    }
}
