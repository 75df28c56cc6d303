/**
 * Server Initialization
 *
 * Assembles the application: storage adapters, mail transport,
 * notification worker, session manager, background maintenance, and the
 * router.
 *
 * # Initialization Process
 *
 * 1. Connect to PostgreSQL if configured, otherwise fall back to the
 *    in-memory stores
 * 2. Pick the mail transport (SMTP if configured, logging otherwise)
 * 3. Start the notification worker
 * 4. Build the shared state and router
 * 5. Spawn the periodic session sweeper
 */

use axum::Router;
use std::sync::Arc;

use crate::auth::users::{CredentialStore, MemoryCredentialStore, PgCredentialStore};
use crate::events::repository::{EventRepository, MemoryEventRepository, PgEventRepository};
use crate::notify::mailer::{LoggingMailer, MailTransport, SmtpMailer};
use crate::notify::pipeline;
use crate::routes::router::create_router;
use crate::server::config::{load_database, Config};
use crate::server::state::AppState;

/// How often expired sessions are swept from the table.
const SESSION_SWEEP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(300);

/// Create and configure the application router.
///
/// # Arguments
///
/// * `config` - Loaded server configuration
///
/// # Returns
///
/// Configured axum Router ready to serve requests
pub async fn create_app(config: &Config) -> Router {
    tracing::info!("initializing gatherly server");

    // Step 1: storage adapters
    let (users, events): (Arc<dyn CredentialStore>, Arc<dyn EventRepository>) =
        match load_database(config.database_url.as_deref()).await {
            Some(pool) => (
                Arc::new(PgCredentialStore::new(pool.clone())),
                Arc::new(PgEventRepository::new(pool)),
            ),
            None => (
                Arc::new(MemoryCredentialStore::new()),
                Arc::new(MemoryEventRepository::new()),
            ),
        };

    // Step 2: mail transport
    let transport: Arc<dyn MailTransport> = match &config.smtp {
        Some(smtp) => match SmtpMailer::new(&smtp.host, smtp.credentials.clone(), &smtp.from) {
            Ok(mailer) => {
                tracing::info!("smtp transport configured for {}", smtp.host);
                Arc::new(mailer)
            }
            Err(e) => {
                tracing::error!("failed to configure smtp transport: {}", e);
                tracing::warn!("confirmation emails will be logged, not sent");
                Arc::new(LoggingMailer)
            }
        },
        None => Arc::new(LoggingMailer),
    };

    // Step 3: notification worker; the handle is detached, the worker
    // lives as long as the state holds a publisher
    let (notifications, _worker) = pipeline::start(transport);

    // Step 4: shared state and router
    let state = AppState::new(
        users,
        events,
        notifications,
        config.session_ttl,
        config.uploads_dir.clone(),
    );
    let app = create_router(state.clone());

    // Step 5: periodic session sweep
    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let removed = sessions.prune_expired();
            if removed > 0 {
                tracing::debug!("pruned {} expired sessions", removed);
            }
        }
    });

    tracing::info!("router configured");
    app
}
