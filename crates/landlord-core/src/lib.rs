//! Core types and bookkeeping rules for the landlord ledger.
//!
//! This crate is deliberately free of SQL and file I/O. Storage backends
//! implement [`store::RentalStore`]; the [`bookkeeper::Bookkeeper`] service
//! drives every operation through that trait.

pub mod bookkeeper;
pub mod building;
pub mod cascade;
pub mod clock;
pub mod contract;
pub mod error;
pub mod furniture;
pub mod ledger;
pub mod lifecycle;
pub mod linkage;
pub mod period;
pub mod report;
pub mod rollup;
pub mod room;
pub mod store;
pub mod tenant;

mod validate;

pub use bookkeeper::Bookkeeper;
pub use clock::Clock;
pub use error::{Error, RecordKind, Result, ValidationError};
pub use validate::MAX_AMOUNT;
