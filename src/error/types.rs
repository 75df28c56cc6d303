/**
 * Backend Error Types
 *
 * This module defines the error taxonomy for the backend server.
 *
 * # Error Categories
 *
 * - `Validation` - malformed or too-short input, user-correctable
 * - `Authentication` - bad credentials on login
 * - `Authorization` - no resolvable session on a protected route
 * - `NotFound` - a requested resource does not exist
 * - `Store` - the data store failed or rejected a constraint
 * - `Internal` - anything else that should surface as a generic 500
 *
 * Mail-transport failures are deliberately absent here: they are contained
 * inside the notification worker and never become HTTP responses.
 */

use axum::http::StatusCode;
use thiserror::Error;

/// Errors produced at the storage boundary.
///
/// Both the credential store and the event repository report failures
/// through this type, so callers can react to constraint violations
/// without depending on a concrete backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The username is already taken by a live account.
    ///
    /// The store is the arbiter of uniqueness. Concurrent signups racing
    /// on the same username are resolved here, not by the caller.
    #[error("username already taken: {0}")]
    DuplicateUsername(String),

    /// The addressed record does not exist.
    #[error("record not found")]
    NotFound,

    /// The underlying database failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Application-level error type returned by HTTP handlers.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request input failed validation.
    #[error("validation error in field '{field}': {message}")]
    Validation {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// Credentials were checked and rejected.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The request reached a protected route without a valid session.
    #[error("authentication required")]
    Authorization,

    /// The requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The data store failed or rejected a constraint.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Unexpected server-side failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new validation error.
    ///
    /// # Arguments
    ///
    /// * `field` - The offending request field
    /// * `message` - What was wrong with it
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error.
    ///
    /// # Status Code Mapping
    ///
    /// - `Validation` - 400 Bad Request
    /// - `Authentication` - 401 Unauthorized
    /// - `Authorization` - 401 Unauthorized
    /// - `NotFound` - 400 Bad Request
    /// - `Store` / `Internal` - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Authentication(_) => StatusCode::UNAUTHORIZED,
            Self::Authorization => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the client-visible error message.
    ///
    /// Store and internal failures are collapsed into a generic message so
    /// that no database detail leaks into the response payload.
    pub fn client_message(&self) -> String {
        match self {
            Self::Validation { field, message } => format!("{}: {}", field, message),
            Self::Authentication(message) => message.clone(),
            Self::Authorization => "authentication required".to_string(),
            Self::NotFound(message) => message.clone(),
            Self::Store(_) | Self::Internal(_) => "internal server error".to_string(),
        }
    }
}
