//! Server Module
//!
//! Configuration, shared application state, and server assembly.
//!
//! - **`config`** - Environment-driven configuration with logged fallbacks
//! - **`state`** - The `AppState` container holding injected dependencies
//! - **`init`** - Wires adapters, state, background tasks and the router

pub mod config;
pub mod init;
pub mod state;

pub use config::Config;
pub use init::create_app;
pub use state::AppState;
