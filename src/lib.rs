//! Gatherly - Main Library
//!
//! Gatherly is an event-board backend built on axum. Users sign up and
//! log in with server-side cookie sessions, manage event records behind
//! an authorization gate, and receive an asynchronous confirmation email
//! when they create an event.
//!
//! # Module Structure
//!
//! - **`auth`** - Password hashing, credential store, authenticator,
//!   sessions, and the authentication endpoints
//! - **`middleware`** - The session gate protecting the event routes
//! - **`events`** - Event repository and the protected event endpoints
//! - **`notify`** - Channel-decoupled confirmation-email pipeline
//! - **`error`** - The application error taxonomy and HTTP conversions
//! - **`routes`** - Router assembly
//! - **`server`** - Configuration, shared state, and startup wiring
//!
//! # Storage
//!
//! Both stores are trait boundaries with PostgreSQL adapters (sqlx) and
//! in-memory adapters. The server runs on the in-memory adapters when no
//! `DATABASE_URL` is configured; the test suite runs on them directly.

pub mod auth;
pub mod error;
pub mod events;
pub mod middleware;
pub mod notify;
pub mod routes;
pub mod server;
