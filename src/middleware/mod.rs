//! Middleware Module
//!
//! HTTP middleware for the backend server. Currently this is the session
//! gate that protects the event routes.

pub mod auth;

pub use auth::{require_session, session_token, CurrentUser, SESSION_COOKIE};
