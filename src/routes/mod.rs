//! Routes Module
//!
//! Route table assembly for the HTTP server.

pub mod router;

pub use router::create_router;
