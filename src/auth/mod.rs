//! Authentication Module
//!
//! This module handles user authentication, registration, and session
//! management. It provides HTTP handlers for the authentication endpoints
//! and owns user records and session state.
//!
//! # Architecture
//!
//! The auth module is organized into focused submodules:
//!
//! - **`password`** - Salted one-way password hashing and verification
//! - **`users`** - User data model and credential store backends
//! - **`authenticator`** - Credential verification with explicit outcomes
//! - **`sessions`** - Server-side session table keyed by opaque tokens
//! - **`handlers`** - HTTP handlers for authentication endpoints
//!
//! # Authentication Flow
//!
//! 1. **Signup**: username, email and password are validated, the password
//!    is hashed, and the account is created. The store rejects duplicate
//!    usernames.
//! 2. **Login**: the authenticator verifies the credentials; on success a
//!    session is started and its token is set as an HttpOnly cookie.
//! 3. **Requests**: the session cookie is resolved back to the account on
//!    every request. An unknown, expired or ended token simply resolves to
//!    anonymous.
//! 4. **Logout**: the session is destroyed and the cookie cleared.
//!
//! # Security
//!
//! - Passwords are hashed with bcrypt before storage and never logged
//! - Session tokens are opaque and carry no identity information
//! - Invalid credentials answer 401 without revealing which part failed

pub mod authenticator;
pub mod handlers;
pub mod password;
pub mod sessions;
pub mod users;

pub use authenticator::{AuthResult, Authenticator};
pub use sessions::SessionManager;
pub use users::{CredentialStore, MemoryCredentialStore, PgCredentialStore, UserAccount};
