/**
 * Application State
 *
 * The central state container cloned into every handler. Each dependency
 * is owned and injected here at construction; nothing in the application
 * reaches for global state.
 *
 * # Thread Safety
 *
 * - The stores are `Arc`-shared trait objects supporting concurrent
 *   reads and independently-failing writes
 * - The session manager guards its own token table internally
 * - The notification publisher is a cheap channel handle
 */

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::authenticator::Authenticator;
use crate::auth::sessions::SessionManager;
use crate::auth::users::CredentialStore;
use crate::events::repository::EventRepository;
use crate::notify::pipeline::NotificationPublisher;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Credential store backend
    pub users: Arc<dyn CredentialStore>,
    /// Event repository backend
    pub events: Arc<dyn EventRepository>,
    /// Stateless credential verification
    pub authenticator: Authenticator,
    /// Server-side session table
    pub sessions: SessionManager,
    /// Sending half of the notification pipeline
    pub notifications: NotificationPublisher,
    /// Where uploaded event images are written
    pub uploads_dir: PathBuf,
}

impl AppState {
    /// Assemble state from its injected parts.
    ///
    /// # Arguments
    ///
    /// * `users` - Credential store backend
    /// * `events` - Event repository backend
    /// * `notifications` - Publisher returned by [`crate::notify::pipeline::start`]
    /// * `session_ttl` - Optional session lifetime
    /// * `uploads_dir` - Image upload directory
    pub fn new(
        users: Arc<dyn CredentialStore>,
        events: Arc<dyn EventRepository>,
        notifications: NotificationPublisher,
        session_ttl: Option<Duration>,
        uploads_dir: PathBuf,
    ) -> Self {
        let authenticator = Authenticator::new(users.clone());
        let sessions = SessionManager::new(users.clone(), session_ttl);

        Self {
            users,
            events,
            authenticator,
            sessions,
            notifications,
            uploads_dir,
        }
    }
}
