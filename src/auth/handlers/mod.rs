//! Authentication Handlers Module
//!
//! HTTP handlers for the authentication endpoints.
//!
//! # Handlers
//!
//! - **`signup`** - POST /signup - account registration
//! - **`login`** - POST /login - credential check, session start, cookie
//! - **`logout`** - GET /logout - session teardown (no-op when anonymous)
//!
//! The GET pages for /login and /signup are static files served from the
//! router, not handlers here.

pub mod login;
pub mod logout;
pub mod signup;
pub mod types;

pub use login::login;
pub use logout::logout;
pub use signup::signup;
pub use types::{LoginRequest, SignupRequest, UserResponse};
