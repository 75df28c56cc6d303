/**
 * Signup Handler
 *
 * Implements account registration for POST /signup.
 *
 * # Registration Process
 *
 * 1. Validate username, password and email
 * 2. Hash the password
 * 3. Create the account (the store rejects duplicate usernames)
 * 4. Return the new account without sensitive fields
 *
 * # Validation
 *
 * - Username and password must each be at least 5 characters
 * - Username must start with a letter and contain only letters, digits
 *   and underscores
 * - Email must pass a basic syntax check
 *
 * A duplicate username is a store failure, not a validation failure, and
 * surfaces as a generic 500.
 */

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;

use crate::auth::handlers::types::{SignupRequest, UserResponse};
use crate::auth::password::hash_password;
use crate::error::AppError;
use crate::server::state::AppState;

/// Minimum username length. Policy constant, tunable.
pub const MIN_USERNAME_LEN: usize = 5;
/// Minimum password length. Policy constant, tunable.
pub const MIN_PASSWORD_LEN: usize = 5;
/// Maximum username length.
pub const MAX_USERNAME_LEN: usize = 30;

/// Validate username format.
///
/// Usernames must be 5-30 characters, start with a letter, and contain
/// only letters, digits and underscores.
fn is_valid_username(username: &str) -> bool {
    if username.len() < MIN_USERNAME_LEN || username.len() > MAX_USERNAME_LEN {
        return false;
    }

    let mut chars = username.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validate email syntax.
///
/// One '@', a non-empty local part, and a domain with an interior dot.
fn is_valid_email(email: &str) -> bool {
    if email.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// Sign up handler.
///
/// # Arguments
///
/// * `State(state)` - Application state
/// * `Json(request)` - Signup request with username, password and email
///
/// # Returns
///
/// `201 Created` with the new account, minus sensitive fields
///
/// # Errors
///
/// * `400 Bad Request` - If username, password or email fail validation
/// * `500 Internal Server Error` - If hashing fails or the store rejects
///   the account (including a duplicate username)
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    tracing::info!("signup request for username: {}", request.username);

    if !is_valid_username(&request.username) {
        return Err(AppError::validation(
            "username",
            format!(
                "must be {}-{} characters, start with a letter, and contain only letters, digits and underscores",
                MIN_USERNAME_LEN, MAX_USERNAME_LEN
            ),
        ));
    }

    if request.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(
            "password",
            format!("must be at least {} characters", MIN_PASSWORD_LEN),
        ));
    }

    if !is_valid_email(&request.email) {
        return Err(AppError::validation("email", "invalid email address"));
    }

    let password_hash = hash_password(&request.password)?;

    let account = state
        .users
        .create(&request.username, &password_hash, &request.email)
        .await?;

    tracing::info!("user created: {} ({})", account.username, account.email);

    Ok((StatusCode::CREATED, Json(account.into())))
}
