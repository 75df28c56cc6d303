//! Notification Module
//!
//! This module delivers confirmation emails for newly created events,
//! decoupled from the request/response cycle.
//!
//! # Architecture
//!
//! - **`mailer`** - The mail transport boundary and its backends (SMTP via
//!   lettre, a logging fallback, and a recording transport for tests)
//! - **`pipeline`** - The `EventCreated` occurrence, the channel between
//!   handlers and the worker, and the worker itself
//!
//! # Delivery Guarantee
//!
//! Best-effort only. A transport failure is logged and dropped: no retry,
//! no persistence, no signal back to the HTTP caller. Jobs queued but not
//! yet dispatched are lost on process exit.

pub mod mailer;
pub mod pipeline;

pub use mailer::{LoggingMailer, MailTransport, NotificationJob, RecordingMailer, SmtpMailer};
pub use pipeline::{EventCreated, NotificationPublisher};
