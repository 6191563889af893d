//! Lease contracts.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  ValidationError,
  ledger::initial_paid_through,
  lifecycle::{ContractStatus, derive_status},
  period::{Cadence, initial_last_payment},
  validate,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
  pub contract_id:       Uuid,
  /// `None` once the room has been deleted.
  pub room_id:           Option<Uuid>,
  /// Primary tenant; `None` once the tenant has been deleted.
  pub tenant_id:         Option<Uuid>,
  pub start_date:        NaiveDate,
  pub end_date:          Option<NaiveDate>,
  /// Monthly rent.
  pub rent:              Decimal,
  pub deposit:           Decimal,
  pub cadence:           Cadence,
  /// Stored status. Derived at creation and on explicit recompute; an
  /// operator override persists verbatim in between.
  pub status:            ContractStatus,
  /// Cumulative rent collected.
  pub total_rent:        Decimal,
  /// Cumulative cash collected: rent plus deposit.
  pub total_cash:        Decimal,
  /// Last day for which rent is settled. Only explicit ledger edits move it.
  pub paid_through:      Option<NaiveDate>,
  /// Due date of the most recently collected period.
  pub last_payment_date: Option<NaiveDate>,
  pub note:              Option<String>,
}

impl Contract {
  /// The paid-through date used for reminders; rows written before the
  /// column existed fall back to the start date.
  pub fn effective_paid_through(&self) -> NaiveDate {
    self.paid_through.unwrap_or(self.start_date)
  }

  pub fn recompute_total_cash(&mut self) -> Result<(), ValidationError> {
    self.total_cash = validate::checked_add("total cash", self.total_rent, self.deposit)?;
    Ok(())
  }
}

fn check_terms(
  start: NaiveDate,
  end: Option<NaiveDate>,
  rent: Decimal,
  deposit: Decimal,
) -> Result<(), ValidationError> {
  if let Some(end) = end
    && end < start
  {
    return Err(ValidationError::EndBeforeStart { start, end });
  }
  validate::amount("rent", rent)?;
  validate::amount("deposit", deposit)?;
  Ok(())
}

/// Input to [`crate::Bookkeeper::add_contract`].
#[derive(Debug, Clone)]
pub struct NewContract {
  pub room_id:    Uuid,
  pub tenant_id:  Uuid,
  pub start_date: NaiveDate,
  pub end_date:   Option<NaiveDate>,
  pub rent:       Decimal,
  pub deposit:    Decimal,
  pub cadence:    Cadence,
  pub note:       Option<String>,
}

impl NewContract {
  pub fn validate(&self) -> Result<(), ValidationError> {
    check_terms(self.start_date, self.end_date, self.rent, self.deposit)
  }

  /// Build the stored record: status derived from `today`, nothing
  /// collected yet, and the first period left unpaid.
  pub fn into_contract(self, today: NaiveDate) -> Contract {
    Contract {
      contract_id:       Uuid::new_v4(),
      room_id:           Some(self.room_id),
      tenant_id:         Some(self.tenant_id),
      start_date:        self.start_date,
      end_date:          self.end_date,
      rent:              self.rent,
      deposit:           self.deposit,
      cadence:           self.cadence,
      status:            derive_status(self.start_date, self.end_date, today),
      total_rent:        Decimal::ZERO,
      total_cash:        self.deposit,
      paid_through:      Some(initial_paid_through(self.start_date)),
      last_payment_date: Some(initial_last_payment(self.start_date, self.cadence)),
      note:              validate::optional_text(self.note),
    }
  }
}

/// Input to [`crate::Bookkeeper::edit_contract`]. `status` is accepted as
/// given, overriding whatever the dates would derive.
#[derive(Debug, Clone)]
pub struct ContractEdit {
  pub room_id:    Uuid,
  pub tenant_id:  Uuid,
  pub start_date: NaiveDate,
  pub end_date:   Option<NaiveDate>,
  pub rent:       Decimal,
  pub deposit:    Decimal,
  pub cadence:    Cadence,
  pub status:     ContractStatus,
  pub total_rent: Decimal,
  pub note:       Option<String>,
}

impl ContractEdit {
  pub fn validate(&self) -> Result<(), ValidationError> {
    check_terms(self.start_date, self.end_date, self.rent, self.deposit)?;
    validate::amount("total rent", self.total_rent)
  }

  pub fn apply(self, contract: &mut Contract) -> Result<(), ValidationError> {
    contract.room_id = Some(self.room_id);
    contract.tenant_id = Some(self.tenant_id);
    contract.start_date = self.start_date;
    contract.end_date = self.end_date;
    contract.rent = self.rent;
    contract.deposit = self.deposit;
    contract.cadence = self.cadence;
    contract.status = self.status;
    contract.total_rent = self.total_rent;
    contract.note = validate::optional_text(self.note);
    contract.recompute_total_cash()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
  }

  fn input(start: NaiveDate, end: Option<NaiveDate>) -> NewContract {
    NewContract {
      room_id:    Uuid::new_v4(),
      tenant_id:  Uuid::new_v4(),
      start_date: start,
      end_date:   end,
      rent:       Decimal::from(2000),
      deposit:    Decimal::from(500),
      cadence:    Cadence::Monthly,
      note:       None,
    }
  }

  #[test]
  fn new_contract_starts_unpaid() {
    let contract = input(d(2024, 1, 15), Some(d(2025, 1, 14))).into_contract(d(2024, 1, 15));
    assert_eq!(contract.status, ContractStatus::Active);
    assert_eq!(contract.paid_through, Some(d(2024, 1, 14)));
    assert_eq!(contract.last_payment_date, Some(d(2023, 12, 15)));
    assert_eq!(contract.total_rent, Decimal::ZERO);
    assert_eq!(contract.total_cash, Decimal::from(500));
  }

  #[test]
  fn future_start_is_pending() {
    let contract = input(d(2024, 3, 1), None).into_contract(d(2024, 1, 15));
    assert_eq!(contract.status, ContractStatus::Pending);
  }

  #[test]
  fn end_before_start_is_rejected() {
    let err = input(d(2024, 3, 1), Some(d(2024, 2, 1))).validate().unwrap_err();
    assert_eq!(
      err,
      ValidationError::EndBeforeStart { start: d(2024, 3, 1), end: d(2024, 2, 1) }
    );
  }

  #[test]
  fn negative_rent_is_rejected() {
    let mut bad = input(d(2024, 3, 1), None);
    bad.rent = Decimal::from(-1);
    assert_eq!(bad.validate(), Err(ValidationError::NegativeAmount("rent")));
  }

  #[test]
  fn oversized_deposit_is_rejected() {
    let mut bad = input(d(2024, 3, 1), None);
    bad.deposit = Decimal::MAX;
    assert_eq!(bad.validate(), Err(ValidationError::AmountTooLarge("deposit")));
  }

  #[test]
  fn edit_keeps_status_override_and_recomputes_cash() {
    let mut contract = input(d(2024, 1, 15), None).into_contract(d(2024, 1, 15));
    ContractEdit {
      room_id:    contract.room_id.unwrap(),
      tenant_id:  contract.tenant_id.unwrap(),
      start_date: contract.start_date,
      end_date:   None,
      rent:       contract.rent,
      deposit:    Decimal::from(800),
      cadence:    Cadence::Quarterly,
      status:     ContractStatus::Ended,
      total_rent: Decimal::from(6000),
      note:       Some("moved out early".into()),
    }
    .apply(&mut contract)
    .unwrap();

    assert_eq!(contract.status, ContractStatus::Ended);
    assert_eq!(contract.total_cash, Decimal::from(6800));
    assert_eq!(contract.paid_through, Some(d(2024, 1, 14)));
  }
}
