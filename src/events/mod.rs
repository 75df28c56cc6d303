//! Events Module
//!
//! Event records and the protected HTTP surface around them.
//!
//! # Architecture
//!
//! - **`repository`** - The `EventRepository` boundary with PostgreSQL and
//!   in-memory backends
//! - **`handlers`** - List, fetch, create (multipart with image upload),
//!   update and delete handlers
//!
//! All routes in this module sit behind the session gate. Creating an
//! event additionally publishes an occurrence to the notification
//! pipeline once the write is acknowledged.

pub mod handlers;
pub mod repository;

pub use repository::{EventChanges, EventRecord, EventRepository, MemoryEventRepository, NewEvent, PgEventRepository};
