//! Contract status derivation and its effect on tenants.
//!
//! Status is a stored field. It is derived from the dates when a contract is
//! created and whenever a recompute is explicitly requested; an operator may
//! override it in between and the override stands until the next recompute.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};
use uuid::Uuid;

use crate::contract::Contract;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContractStatus {
  Pending,
  Active,
  /// Closed by mutual agreement. Only ever set by the operator.
  Ended,
  /// The end date has passed.
  Terminated,
}

impl ContractStatus {
  pub fn is_active(self) -> bool { matches!(self, Self::Active) }

  /// Whether collected rent counts toward the cumulative-income figure.
  pub fn counts_as_received(self) -> bool { matches!(self, Self::Active | Self::Ended) }
}

/// The date-derived status. Never yields [`ContractStatus::Ended`].
pub fn derive_status(
  start: NaiveDate,
  end: Option<NaiveDate>,
  today: NaiveDate,
) -> ContractStatus {
  match end {
    Some(end) if today > end => ContractStatus::Terminated,
    _ if start > today => ContractStatus::Pending,
    _ => ContractStatus::Active,
  }
}

/// A status change applied by a recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
  pub contract_id: Uuid,
  pub from:        ContractStatus,
  pub to:          ContractStatus,
}

impl Transition {
  pub fn is_change(&self) -> bool { self.from != self.to }
}

/// Re-derive `contract.status` from its dates, returning the transition.
pub fn recompute(contract: &mut Contract, today: NaiveDate) -> Transition {
  let from = contract.status;
  contract.status = derive_status(contract.start_date, contract.end_date, today);
  Transition { contract_id: contract.contract_id, from, to: contract.status }
}

/// How a contract's status reaches the tenants' contract references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantEffect {
  /// Point the primary tenant (and its sub-tenants) at the contract.
  Attach { contract_id: Uuid, tenant_id: Uuid },
  /// Clear every tenant reference to the contract.
  Detach { contract_id: Uuid },
}

pub fn tenant_effect(contract: &Contract) -> TenantEffect {
  match (contract.status, contract.tenant_id) {
    (ContractStatus::Active, Some(tenant_id)) => {
      TenantEffect::Attach { contract_id: contract.contract_id, tenant_id }
    }
    _ => TenantEffect::Detach { contract_id: contract.contract_id },
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
  }

  #[test]
  fn derives_from_dates() {
    let start = d(2024, 1, 15);
    let end = Some(d(2024, 6, 30));

    assert_eq!(derive_status(start, end, d(2024, 1, 14)), ContractStatus::Pending);
    assert_eq!(derive_status(start, end, start), ContractStatus::Active);
    assert_eq!(derive_status(start, end, d(2024, 6, 30)), ContractStatus::Active);
    assert_eq!(derive_status(start, end, d(2024, 7, 1)), ContractStatus::Terminated);
    assert_eq!(derive_status(start, None, d(2099, 1, 1)), ContractStatus::Active);
  }

  #[test]
  fn passed_end_date_wins_over_future_start() {
    // Only reachable through bad data, but the order of the rules matters.
    let status = derive_status(d(2024, 5, 1), Some(d(2024, 2, 1)), d(2024, 3, 1));
    assert_eq!(status, ContractStatus::Terminated);
  }

  #[test]
  fn recompute_discards_an_override() {
    use rust_decimal::Decimal;

    use crate::{contract::NewContract, period::Cadence};

    let mut contract = NewContract {
      room_id:    Uuid::new_v4(),
      tenant_id:  Uuid::new_v4(),
      start_date: d(2024, 1, 1),
      end_date:   Some(d(2024, 12, 31)),
      rent:       Decimal::from(1500),
      deposit:    Decimal::ZERO,
      cadence:    Cadence::Monthly,
      note:       None,
    }
    .into_contract(d(2024, 2, 1));
    contract.status = ContractStatus::Ended;

    let transition = recompute(&mut contract, d(2025, 1, 1));
    assert!(transition.is_change());
    assert_eq!(transition.from, ContractStatus::Ended);
    assert_eq!(contract.status, ContractStatus::Terminated);
    assert_eq!(tenant_effect(&contract), TenantEffect::Detach {
      contract_id: contract.contract_id,
    });
  }
}
