//! SQLite backend for the landlord ledger.
//!
//! Wraps a single [`rusqlite::Connection`]. Atomic units map onto SQLite
//! savepoints, so they nest.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use schema::SCHEMA_VERSION;
pub use store::SqliteStore;
