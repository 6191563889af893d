//! Error type for `landlord-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("decimal parse error: {0}")]
  Decimal(#[from] rust_decimal::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored enum column holds a value no variant matches.
  #[error("unknown {field}: {value:?}")]
  UnknownVariant { field: &'static str, value: String },
}

impl From<Error> for landlord_core::Error {
  fn from(err: Error) -> Self { landlord_core::Error::store(err) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
