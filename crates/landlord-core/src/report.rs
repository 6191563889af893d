//! Dashboard figures, computed fresh from current records on every view.

use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  ValidationError,
  building::Building,
  contract::Contract,
  ledger::{self, RentReminder},
  room::Room,
  tenant::Tenant,
  validate,
};

/// Active leases ending within this many days are listed as expiring.
pub const EXPIRY_WINDOW_DAYS: u64 = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpiringLease {
  pub contract_id: Uuid,
  pub room_name:   Option<String>,
  pub tenant_name: Option<String>,
  pub end_date:    NaiveDate,
  /// Negative when an active lease has already run past its end date.
  pub days_left:   i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
  pub as_of:               NaiveDate,
  pub total_rooms:         usize,
  /// `total_rooms − active_contracts`. A count-based approximation: rooms
  /// under repair or otherwise unavailable still count as vacant.
  pub vacant_rooms:        usize,
  pub active_contracts:    usize,
  pub building_cost:       Decimal,
  /// Sum of the monthly rent of active contracts.
  pub monthly_income:      Decimal,
  /// Cumulative rent collected on active and ended contracts.
  pub total_rent_received: Decimal,
  pub expiring:            Vec<ExpiringLease>,
  pub reminders:           Vec<RentReminder>,
}

/// All records the dashboard reads.
#[derive(Debug, Clone, Copy)]
pub struct Inputs<'a> {
  pub buildings: &'a [Building],
  pub rooms:     &'a [Room],
  pub tenants:   &'a [Tenant],
  pub contracts: &'a [Contract],
}

impl Dashboard {
  pub fn build(inputs: Inputs<'_>, today: NaiveDate) -> Result<Self, ValidationError> {
    let active: Vec<&Contract> =
      inputs.contracts.iter().filter(|c| c.status.is_active()).collect();

    let total_rooms = inputs.rooms.len();
    let active_contracts = active.len();

    Ok(Self {
      as_of: today,
      total_rooms,
      vacant_rooms: total_rooms.saturating_sub(active_contracts),
      active_contracts,
      building_cost: validate::checked_sum(
        "building cost",
        inputs.buildings.iter().map(|b| b.cost),
      )?,
      monthly_income: validate::checked_sum("monthly income", active.iter().map(|c| c.rent))?,
      total_rent_received: validate::checked_sum(
        "total rent received",
        inputs
          .contracts
          .iter()
          .filter(|c| c.status.counts_as_received())
          .map(|c| c.total_rent),
      )?,
      expiring: expiring_leases(inputs, today),
      reminders: ledger::reminders(inputs.contracts, inputs.rooms, inputs.tenants, today),
    })
  }
}

/// Active contracts whose end date is on or before `today + 7`, soonest
/// first.
pub fn expiring_leases(inputs: Inputs<'_>, today: NaiveDate) -> Vec<ExpiringLease> {
  let limit = today
    .checked_add_days(Days::new(EXPIRY_WINDOW_DAYS))
    .unwrap_or(NaiveDate::MAX);
  let room_names: HashMap<Uuid, &str> =
    inputs.rooms.iter().map(|r| (r.room_id, r.name.as_str())).collect();
  let tenant_names: HashMap<Uuid, &str> = inputs
    .tenants
    .iter()
    .map(|t| (t.tenant_id, t.profile.name.as_str()))
    .collect();

  let mut out: Vec<ExpiringLease> = inputs
    .contracts
    .iter()
    .filter(|c| c.status.is_active())
    .filter_map(|c| {
      let end_date = c.end_date.filter(|end| *end <= limit)?;
      Some(ExpiringLease {
        contract_id: c.contract_id,
        room_name: c.room_id.and_then(|id| room_names.get(&id)).map(|n| (*n).to_owned()),
        tenant_name: c.tenant_id.and_then(|id| tenant_names.get(&id)).map(|n| (*n).to_owned()),
        end_date,
        days_left: (end_date - today).num_days(),
      })
    })
    .collect();

  out.sort_by_key(|e| e.end_date);
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    building::NewBuilding,
    contract::NewContract,
    lifecycle::ContractStatus,
    period::Cadence,
  };

  fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
  }

  fn contract(room: &Room, end: Option<NaiveDate>, rent: i64) -> Contract {
    NewContract {
      room_id:    room.room_id,
      tenant_id:  Uuid::new_v4(),
      start_date: d(2024, 1, 1),
      end_date:   end,
      rent:       Decimal::from(rent),
      deposit:    Decimal::ZERO,
      cadence:    Cadence::Monthly,
      note:       None,
    }
    .into_contract(d(2024, 1, 1))
  }

  #[test]
  fn figures_follow_contract_status() {
    let mut building = NewBuilding {
      name:       "A".into(),
      address:    "x".into(),
      floors:     1,
      room_count: 0,
    }
    .into_building();
    building.cost = Decimal::from(4200);

    let rooms: Vec<Room> =
      (1..=4).map(|i| Room::vacant(building.building_id, format!("A-{i}"))).collect();

    let mut active = contract(&rooms[0], None, 2000);
    active.total_rent = Decimal::from(6000);
    let mut ended = contract(&rooms[1], None, 1800);
    ended.status = ContractStatus::Ended;
    ended.total_rent = Decimal::from(3600);
    let mut terminated = contract(&rooms[2], Some(d(2024, 2, 1)), 1500);
    terminated.status = ContractStatus::Terminated;
    terminated.total_rent = Decimal::from(1500);

    let contracts = [active, ended, terminated];
    let buildings = [building];
    let dash = Dashboard::build(
      Inputs { buildings: &buildings, rooms: &rooms, tenants: &[], contracts: &contracts },
      d(2024, 3, 1),
    )
    .unwrap();

    assert_eq!(dash.total_rooms, 4);
    assert_eq!(dash.active_contracts, 1);
    assert_eq!(dash.vacant_rooms, 3);
    assert_eq!(dash.building_cost, Decimal::from(4200));
    assert_eq!(dash.monthly_income, Decimal::from(2000));
    assert_eq!(dash.total_rent_received, Decimal::from(9600));
  }

  #[test]
  fn vacancy_is_a_count_not_a_room_check() {
    use crate::room::RoomStatus;

    let building = Uuid::new_v4();
    let mut rooms: Vec<Room> =
      (1..=3).map(|i| Room::vacant(building, format!("B-{i}"))).collect();
    rooms[1].status = RoomStatus::UnderRepair;
    let contracts = [contract(&rooms[0], None, 1000)];

    let dash = Dashboard::build(
      Inputs { buildings: &[], rooms: &rooms, tenants: &[], contracts: &contracts },
      d(2024, 1, 1),
    )
    .unwrap();
    // The room under repair still counts toward "vacant".
    assert_eq!(dash.vacant_rooms, 2);
  }

  #[test]
  fn income_that_overflows_is_an_error() {
    let building = Uuid::new_v4();
    let rooms: Vec<Room> =
      (1..=2).map(|i| Room::vacant(building, format!("D-{i}"))).collect();
    let mut first = contract(&rooms[0], None, 1000);
    first.rent = Decimal::MAX;
    let mut second = contract(&rooms[1], None, 1000);
    second.rent = Decimal::MAX;
    let contracts = [first, second];

    let result = Dashboard::build(
      Inputs { buildings: &[], rooms: &rooms, tenants: &[], contracts: &contracts },
      d(2024, 1, 1),
    );
    assert_eq!(result, Err(ValidationError::AmountTooLarge("monthly income")));
  }

  #[test]
  fn expiring_window_is_inclusive_and_sorted() {
    let building = Uuid::new_v4();
    let rooms: Vec<Room> =
      (1..=4).map(|i| Room::vacant(building, format!("C-{i}"))).collect();
    let today = d(2024, 6, 1);
    let contracts = [
      contract(&rooms[0], Some(d(2024, 6, 8)), 1000),
      contract(&rooms[1], Some(d(2024, 6, 9)), 1000),
      contract(&rooms[2], Some(d(2024, 6, 3)), 1000),
      contract(&rooms[3], Some(d(2024, 5, 30)), 1000),
    ];

    let expiring = expiring_leases(
      Inputs { buildings: &[], rooms: &rooms, tenants: &[], contracts: &contracts },
      today,
    );
    let ends: Vec<(NaiveDate, i64)> =
      expiring.iter().map(|e| (e.end_date, e.days_left)).collect();
    assert_eq!(ends, vec![(d(2024, 5, 30), -2), (d(2024, 6, 3), 2), (d(2024, 6, 8), 7)]);
    assert_eq!(expiring[1].room_name.as_deref(), Some("C-3"));
  }
}
