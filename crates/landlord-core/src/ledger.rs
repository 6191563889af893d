//! Rent arrears tracking.
//!
//! The ledger's only state is each contract's paid-through date. It is never
//! advanced by the passage of time: every collection is an explicit edit.

use std::{collections::HashMap, fmt};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{contract::Contract, room::Room, tenant::Tenant};

/// Contracts due within this many days are listed alongside overdue ones.
pub const REMINDER_WINDOW_DAYS: i64 = 10;

/// A new contract is paid through the day before it starts, so the first
/// period shows up as due immediately.
pub fn initial_paid_through(start: NaiveDate) -> NaiveDate {
  start.pred_opt().unwrap_or(start)
}

/// Days until `paid_through` runs out; negative when overdue.
pub fn days_outstanding(paid_through: NaiveDate, today: NaiveDate) -> i64 {
  (paid_through - today).num_days()
}

// ─── Urgency ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Urgency {
  Overdue { days: u64 },
  DueSoon { days: u64 },
}

impl Urgency {
  /// `None` when the contract is paid far enough ahead to need no reminder.
  pub fn classify(days_outstanding: i64) -> Option<Self> {
    match days_outstanding {
      d if d < 0 => Some(Self::Overdue { days: d.unsigned_abs() }),
      d if d <= REMINDER_WINDOW_DAYS => Some(Self::DueSoon { days: d.unsigned_abs() }),
      _ => None,
    }
  }
}

impl fmt::Display for Urgency {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let plural = |n: u64| if n == 1 { "" } else { "s" };
    match *self {
      Self::Overdue { days } => write!(f, "overdue by {days} day{}", plural(days)),
      Self::DueSoon { days } => write!(f, "{days} day{} remaining", plural(days)),
    }
  }
}

// ─── Reminders ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentReminder {
  pub contract_id:      Uuid,
  pub room_name:        Option<String>,
  pub tenant_name:      Option<String>,
  pub paid_through:     NaiveDate,
  pub days_outstanding: i64,
  pub urgency:          Urgency,
  /// Rendered [`Urgency`], e.g. "overdue by 3 days".
  pub label:            String,
  pub rent:             Decimal,
}

/// Reminder for a single contract, ignoring its status.
pub fn reminder_for(contract: &Contract, today: NaiveDate) -> Option<(i64, Urgency)> {
  let days = days_outstanding(contract.effective_paid_through(), today);
  Urgency::classify(days).map(|urgency| (days, urgency))
}

/// The reminder set: active contracts that are overdue or due within
/// [`REMINDER_WINDOW_DAYS`], most overdue first.
pub fn reminders(
  contracts: &[Contract],
  rooms: &[Room],
  tenants: &[Tenant],
  today: NaiveDate,
) -> Vec<RentReminder> {
  let room_names: HashMap<Uuid, &str> =
    rooms.iter().map(|r| (r.room_id, r.name.as_str())).collect();
  let tenant_names: HashMap<Uuid, &str> =
    tenants.iter().map(|t| (t.tenant_id, t.profile.name.as_str())).collect();

  let mut out: Vec<RentReminder> = contracts
    .iter()
    .filter(|c| c.status.is_active())
    .filter_map(|c| {
      let (days, urgency) = reminder_for(c, today)?;
      Some(RentReminder {
        contract_id: c.contract_id,
        room_name: c.room_id.and_then(|id| room_names.get(&id)).map(|n| (*n).to_owned()),
        tenant_name: c.tenant_id.and_then(|id| tenant_names.get(&id)).map(|n| (*n).to_owned()),
        paid_through: c.effective_paid_through(),
        days_outstanding: days,
        label: urgency.to_string(),
        urgency,
        rent: c.rent,
      })
    })
    .collect();

  out.sort_by_key(|r| r.days_outstanding);
  out
}
