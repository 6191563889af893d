//! Error types for `landlord-core`.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

/// The kind of record an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum RecordKind {
  Building,
  Room,
  Furniture,
  Tenant,
  Contract,
}

/// Input rejected before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("{0} is required")]
  MissingField(&'static str),

  #[error("{0} must not be negative")]
  NegativeAmount(&'static str),

  #[error("{0} is too large")]
  AmountTooLarge(&'static str),

  #[error("quantity must be at least 1")]
  ZeroQuantity,

  #[error("end date {end} is before start date {start}")]
  EndBeforeStart { start: NaiveDate, end: NaiveDate },

  #[error("room {room} already has active contract {contract}")]
  RoomOccupied { room: Uuid, contract: Uuid },

  #[error("tenant {tenant} already has active contract {contract}")]
  TenantOccupied { tenant: Uuid, contract: Uuid },

  #[error("a tenant cannot be linked to itself")]
  SelfLink,

  #[error("tenant {sub} is already linked to main tenant {main}")]
  AlreadyLinked { sub: Uuid, main: Uuid },

  #[error("tenant {0} has sub-tenants and cannot become a sub-tenant")]
  SubIsMain(Uuid),

  #[error("tenant {0} is a sub-tenant and cannot become a main tenant")]
  MainIsSub(Uuid),

  #[error("tenant {0} is not linked to a main tenant")]
  NotLinked(Uuid),
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("validation failed: {0}")]
  Validation(#[from] ValidationError),

  #[error("{kind} not found: {id}")]
  NotFound { kind: RecordKind, id: Uuid },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn not_found(kind: RecordKind, id: Uuid) -> Self {
    Self::NotFound { kind, id }
  }

  /// Wrap a backend failure. Storage errors are surfaced once, never retried.
  pub fn store(err: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(err))
  }

  pub fn is_validation(&self) -> bool { matches!(self, Self::Validation(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
