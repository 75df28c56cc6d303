/**
 * Login Handler
 *
 * Implements credential verification for POST /login.
 *
 * # Authentication Process
 *
 * 1. The authenticator checks the pair against the credential store
 * 2. On acceptance, a session is started and its token set as an
 *    HttpOnly cookie
 * 3. Either rejection answers 401 with the same message, so a client
 *    cannot tell a missing user from a wrong password
 *
 * A check that could not run (store or hash failure) is a 500, not a
 * rejection.
 */

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};

use crate::auth::authenticator::AuthResult;
use crate::auth::handlers::types::{LoginRequest, UserResponse};
use crate::error::AppError;
use crate::middleware::auth::SESSION_COOKIE;
use crate::server::state::AppState;

/// Build the Set-Cookie value for a freshly started session.
fn session_cookie(token: &str) -> String {
    format!("{}={}; HttpOnly; SameSite=Lax; Path=/", SESSION_COOKIE, token)
}

/// Login handler.
///
/// # Arguments
///
/// * `State(state)` - Application state
/// * `Json(request)` - Login request with username and password
///
/// # Returns
///
/// `200 OK` with the account (minus sensitive fields) and the session
/// cookie in `Set-Cookie`
///
/// # Errors
///
/// * `401 Unauthorized` - If the username is unknown or the password does
///   not match; no session is started and no cookie is set
/// * `500 Internal Server Error` - If the credentials could not be
///   checked at all
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, AppError> {
    tracing::info!("login request for: {}", request.username);

    let account = match state.authenticator.verify(&request.username, &request.password).await {
        AuthResult::Accepted(account) => account,
        AuthResult::RejectedUserNotFound => {
            tracing::warn!("login rejected, unknown user: {}", request.username);
            return Err(AppError::Authentication("invalid username or password".to_string()));
        }
        AuthResult::RejectedBadPassword => {
            tracing::warn!("login rejected, bad password for: {}", request.username);
            return Err(AppError::Authentication("invalid username or password".to_string()));
        }
        AuthResult::Error(e) => {
            tracing::error!("credential check failed for {}: {}", request.username, e);
            return Err(e.into());
        }
    };

    // Authentication completed; only now does a session exist.
    let token = state.sessions.start(&account);

    let cookie = HeaderValue::from_str(&session_cookie(&token))
        .map_err(|e| AppError::Internal(format!("could not encode session cookie: {}", e)))?;

    tracing::info!("user logged in: {}", account.username);

    let mut response =
        (StatusCode::OK, Json(UserResponse::from(account))).into_response();
    response.headers_mut().insert(SET_COOKIE, cookie);
    Ok(response)
}
