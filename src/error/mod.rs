//! Error Module
//!
//! This module defines the error types used across the backend and their
//! conversion into HTTP responses.
//!
//! # Architecture
//!
//! - **`types`** - The `AppError` taxonomy and the storage-boundary `StoreError`
//! - **`conversion`** - `IntoResponse` and `From` conversions
//!
//! Every handler returns `Result<_, AppError>`, so each request is answered
//! exactly once with a structured JSON error body. Storage internals are
//! never forwarded to clients.

pub mod conversion;
pub mod types;

pub use types::{AppError, StoreError};
