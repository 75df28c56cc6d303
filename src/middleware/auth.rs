/**
 * Session Gate Middleware
 *
 * This middleware protects routes that require an authenticated session.
 * It reads the session cookie, resolves it through the session manager,
 * and attaches the resolved account to the request for handlers to
 * extract.
 *
 * Resolution is total: a missing, unknown, expired or ended token all
 * look the same from here, and all answer 401 before the handler body
 * runs. The gate is layered onto the protected routes themselves, so it
 * cannot be bypassed by route ordering.
 */

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::auth::users::UserAccount;
use crate::error::AppError;
use crate::server::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "gatherly_session";

/// The account resolved from the request's session cookie.
///
/// Inserted into request extensions by [`require_session`] and extracted
/// by handlers as a parameter.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub UserAccount);

/// Pull the session token out of the `Cookie` header, if present.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(COOKIE)?.to_str().ok()?;

    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE {
            Some(value.to_string())
        } else {
            None
        }
    })
}

/// Session gate.
///
/// 1. Extracts the session token from the cookie header
/// 2. Resolves it to an account (re-read from the credential store)
/// 3. Attaches the account to request extensions
///
/// Answers 401 when no resolvable session is presented.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = session_token(request.headers()).ok_or_else(|| {
        tracing::warn!("no session cookie on protected route {}", request.uri().path());
        AppError::Authorization
    })?;

    let account = state.sessions.resolve(&token).await.ok_or_else(|| {
        tracing::warn!("unresolvable session on protected route {}", request.uri().path());
        AppError::Authorization
    })?;

    request.extensions_mut().insert(CurrentUser(account));
    Ok(next.run(request).await)
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("CurrentUser missing from request extensions");
                AppError::Authorization
            })
    }
}
