/**
 * Logout Handler
 *
 * Implements session teardown for GET /logout.
 *
 * Logout is not behind the session gate: an anonymous request is a
 * no-op and still answers 200, since there is nothing to destroy. The
 * cookie is cleared either way.
 */

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};

use crate::error::AppError;
use crate::middleware::auth::{session_token, SESSION_COOKIE};
use crate::server::state::AppState;

/// Set-Cookie value that expires the session cookie immediately.
fn clear_cookie() -> String {
    format!("{}=; HttpOnly; Path=/; Max-Age=0", SESSION_COOKIE)
}

/// Logout handler.
///
/// Destroys the session named by the request's cookie, if any, and
/// clears the cookie. Always answers `200 OK`.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if let Some(token) = session_token(&headers) {
        if state.sessions.end(&token) {
            tracing::info!("session ended");
        } else {
            tracing::debug!("logout for unknown session token");
        }
    }

    let cookie = HeaderValue::from_str(&clear_cookie())
        .map_err(|e| AppError::Internal(format!("could not encode cookie: {}", e)))?;

    let mut response = (
        StatusCode::OK,
        Json(serde_json::json!({ "message": "logged out" })),
    )
        .into_response();
    response.headers_mut().insert(SET_COOKIE, cookie);
    Ok(response)
}
