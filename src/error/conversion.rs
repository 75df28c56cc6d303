/**
 * Error Conversions
 *
 * This module converts `AppError` values into HTTP responses and maps
 * lower-level errors into the application taxonomy.
 *
 * The response body is a single-field JSON object so clients always see
 * the same error shape regardless of which layer failed.
 */

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

use crate::auth::authenticator::CredentialCheckError;
use crate::error::types::{AppError, StoreError};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Full detail stays in the log, not in the payload.
            tracing::error!("request failed: {}", self);
        } else {
            tracing::warn!("request rejected: {}", self);
        }

        let body = Json(serde_json::json!({ "error": self.client_message() }));
        (status, body).into_response()
    }
}

impl From<CredentialCheckError> for AppError {
    fn from(err: CredentialCheckError) -> Self {
        match err {
            CredentialCheckError::Store(e) => Self::Store(e),
            CredentialCheckError::Hash(e) => Self::Internal(e.to_string()),
        }
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::Internal(format!("password hashing failed: {}", err))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Store(StoreError::Database(err))
    }
}
