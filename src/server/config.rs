/**
 * Server Configuration
 *
 * Loads configuration from environment variables with sensible defaults
 * for local development.
 *
 * # Error Handling
 *
 * Missing optional services never prevent startup. Without DATABASE_URL
 * the server runs on in-memory stores; without SMTP_HOST outbound mail is
 * logged instead of sent. Both degradations are logged at startup.
 */

use sqlx::PgPool;
use std::path::PathBuf;
use std::time::Duration;

/// SMTP relay settings.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// Relay hostname
    pub host: String,
    /// Optional relay credentials
    pub credentials: Option<(String, String)>,
    /// Sender mailbox for outbound mail
    pub from: String,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the HTTP server listens on
    pub port: u16,
    /// PostgreSQL connection string; `None` selects the in-memory stores
    pub database_url: Option<String>,
    /// SMTP settings; `None` selects the logging mail transport
    pub smtp: Option<SmtpConfig>,
    /// Session lifetime; `None` means sessions live until logout
    pub session_ttl: Option<Duration>,
    /// Directory uploaded event images are written to
    pub uploads_dir: PathBuf,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Reads `SERVER_PORT`, `DATABASE_URL`, `SMTP_HOST`, `SMTP_USER`,
    /// `SMTP_PASS`, `MAIL_FROM`, `SESSION_TTL_SECS` and `UPLOADS_DIR`.
    /// Every value has a fallback; fallbacks for absent services are
    /// logged.
    pub fn from_env() -> Self {
        let port = std::env::var("SERVER_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);

        let database_url = std::env::var("DATABASE_URL").ok();
        if database_url.is_none() {
            tracing::warn!("DATABASE_URL not set; running with in-memory stores");
        }

        let smtp = match std::env::var("SMTP_HOST") {
            Ok(host) => {
                let credentials = match (std::env::var("SMTP_USER"), std::env::var("SMTP_PASS")) {
                    (Ok(user), Ok(pass)) => Some((user, pass)),
                    _ => None,
                };
                let from = std::env::var("MAIL_FROM")
                    .unwrap_or_else(|_| "Gatherly <no-reply@gatherly.local>".to_string());
                Some(SmtpConfig {
                    host,
                    credentials,
                    from,
                })
            }
            Err(_) => {
                tracing::warn!("SMTP_HOST not set; confirmation emails will be logged, not sent");
                None
            }
        };

        let session_ttl = std::env::var("SESSION_TTL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs);

        let uploads_dir = std::env::var("UPLOADS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("uploads"));

        Self {
            port,
            database_url,
            smtp,
            session_ttl,
            uploads_dir,
        }
    }
}

/// Connect to PostgreSQL and run migrations.
///
/// # Returns
///
/// - `Some(PgPool)` on success
/// - `None` if no URL is configured or the connection fails; the caller
///   falls back to the in-memory stores
pub async fn load_database(database_url: Option<&str>) -> Option<PgPool> {
    let database_url = database_url?;

    tracing::info!("connecting to database...");
    let pool = match PgPool::connect(database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("failed to create database connection pool: {:?}", e);
            tracing::warn!("falling back to in-memory stores");
            return None;
        }
    };

    tracing::info!("running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(()) => tracing::info!("database migrations completed"),
        Err(e) => {
            // Migrations may already be applied by an operator.
            tracing::error!("failed to run database migrations: {:?}", e);
            tracing::warn!("continuing; database might not be up to date");
        }
    }

    Some(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Config::from_env reads process-global state, so these tests run
    // serially.
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_defaults() {
        for var in [
            "SERVER_PORT",
            "DATABASE_URL",
            "SMTP_HOST",
            "SESSION_TTL_SECS",
            "UPLOADS_DIR",
        ] {
            std::env::remove_var(var);
        }

        let config = Config::from_env();
        assert_eq!(config.port, 8080);
        assert!(config.database_url.is_none());
        assert!(config.smtp.is_none());
        assert!(config.session_ttl.is_none());
        assert_eq!(config.uploads_dir, PathBuf::from("uploads"));
    }

    #[test]
    #[serial]
    fn test_session_ttl_parsing() {
        std::env::set_var("SESSION_TTL_SECS", "3600");
        let config = Config::from_env();
        assert_eq!(config.session_ttl, Some(Duration::from_secs(3600)));
        std::env::remove_var("SESSION_TTL_SECS");
    }
}
