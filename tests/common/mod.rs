//! Common test utilities and helpers
//!
//! Spins up the real router on the in-memory storage adapters and the
//! recording mail transport, so the whole HTTP surface is exercised
//! without PostgreSQL or an SMTP relay.

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::HeaderValue;
use axum_test::{TestResponse, TestServer};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use gatherly::auth::users::{CredentialStore, MemoryCredentialStore};
use gatherly::events::repository::{EventRepository, MemoryEventRepository};
use gatherly::notify::mailer::RecordingMailer;
use gatherly::notify::pipeline;
use gatherly::routes::router::create_router;
use gatherly::server::state::AppState;

/// A booted application under test.
pub struct TestApp {
    pub server: TestServer,
    pub mailer: Arc<RecordingMailer>,
    // Holds the uploads directory alive for the duration of the test
    _uploads: TempDir,
}

impl TestApp {
    /// Boot the application on in-memory adapters.
    pub fn new() -> Self {
        let users: Arc<dyn CredentialStore> = Arc::new(MemoryCredentialStore::new());
        let events: Arc<dyn EventRepository> = Arc::new(MemoryEventRepository::new());

        let mailer = Arc::new(RecordingMailer::new());
        let (notifications, _worker) = pipeline::start(mailer.clone());

        let uploads = TempDir::new().expect("failed to create uploads dir");
        let state = AppState::new(
            users,
            events,
            notifications,
            None,
            uploads.path().to_path_buf(),
        );

        let server = TestServer::new(create_router(state)).expect("failed to start test server");
        Self {
            server,
            mailer,
            _uploads: uploads,
        }
    }

    /// POST /signup with the given credentials.
    pub async fn signup(&self, username: &str, password: &str, email: &str) -> TestResponse {
        self.server
            .post("/signup")
            .json(&serde_json::json!({
                "username": username,
                "password": password,
                "email": email,
            }))
            .await
    }

    /// POST /login with the given credentials.
    pub async fn login(&self, username: &str, password: &str) -> TestResponse {
        self.server
            .post("/login")
            .json(&serde_json::json!({
                "username": username,
                "password": password,
            }))
            .await
    }

    /// Sign up, log in, and return the session cookie pair
    /// (`gatherly_session=<token>`) ready for a `Cookie` header.
    pub async fn signup_and_login(&self, username: &str, password: &str, email: &str) -> String {
        let response = self.signup(username, password, email).await;
        assert_eq!(response.status_code().as_u16(), 201, "signup should succeed");

        let response = self.login(username, password).await;
        assert_eq!(response.status_code().as_u16(), 200, "login should succeed");
        session_cookie_from(&response).expect("login should set the session cookie")
    }

    /// Wait until the recording mailer has captured `count` jobs.
    ///
    /// Dispatch is asynchronous relative to the HTTP response, so tests
    /// poll briefly instead of asserting immediately.
    pub async fn wait_for_mail(&self, count: usize) {
        for _ in 0..200 {
            if self.mailer.sent().len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!(
            "expected {} mail jobs, saw {}",
            count,
            self.mailer.sent().len()
        );
    }
}

/// Extract the `name=value` session cookie pair from a response.
pub fn session_cookie_from(response: &TestResponse) -> Option<String> {
    let header = response.maybe_header(SET_COOKIE)?;
    let raw = header.to_str().ok()?;
    let pair = raw.split(';').next()?.trim();
    if pair.starts_with("gatherly_session=") && !pair.ends_with('=') {
        Some(pair.to_string())
    } else {
        None
    }
}

/// Build a `Cookie` header value from a stored cookie pair.
pub fn cookie_header(pair: &str) -> HeaderValue {
    HeaderValue::from_str(pair).expect("cookie pair should be a valid header value")
}

/// The `Cookie` header name, re-exported for call sites.
pub fn cookie_name() -> axum::http::HeaderName {
    COOKIE
}
