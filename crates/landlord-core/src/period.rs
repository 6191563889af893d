//! Rent cadences and calendar-month arithmetic.
//!
//! Month shifts clamp the day to the last valid day of the target month
//! (Jan 31 + 1 month = Feb 28, or Feb 29 in a leap year). Rent periods are
//! anchored to the contract start date so that clamping never accumulates
//! drift from one period to the next.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

// ─── Cadence ─────────────────────────────────────────────────────────────────

/// How often rent is paid.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  AsRefStr,
  EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Cadence {
  #[default]
  Monthly,
  Quarterly,
  SemiAnnual,
  Annual,
}

impl Cadence {
  /// Number of calendar months covered by one payment.
  pub const fn months(self) -> u32 {
    match self {
      Self::Monthly => 1,
      Self::Quarterly => 3,
      Self::SemiAnnual => 6,
      Self::Annual => 12,
    }
  }
}

pub fn cadence_to_months(cadence: Cadence) -> u32 { cadence.months() }

// ─── Month arithmetic ────────────────────────────────────────────────────────

/// Shift `date` by `n` calendar months (negative moves backwards), clamping
/// the day of month. Saturates at the ends of the representable range.
pub fn add_months(date: NaiveDate, n: i32) -> NaiveDate {
  let months = Months::new(n.unsigned_abs());
  if n >= 0 {
    date.checked_add_months(months).unwrap_or(NaiveDate::MAX)
  } else {
    date.checked_sub_months(months).unwrap_or(NaiveDate::MIN)
  }
}

/// The legacy "last payment date" recorded at contract creation: one full
/// cadence before the start date.
pub fn initial_last_payment(start: NaiveDate, cadence: Cadence) -> NaiveDate {
  add_months(start, -(cadence.months() as i32))
}

// ─── Rent periods ────────────────────────────────────────────────────────────

/// An inclusive span of days covered by one rent payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentPeriod {
  pub start: NaiveDate,
  pub end:   NaiveDate,
}

/// Start of the `index`-th period of a lease beginning on `anchor`.
pub fn period_boundary(anchor: NaiveDate, cadence: Cadence, index: i32) -> NaiveDate {
  add_months(anchor, index.saturating_mul(cadence.months() as i32))
}

/// The unpaid span that follows `paid_through`: from the next day up to the
/// end of the lease period containing that day.
///
/// When `paid_through` was set mid-period by hand, the returned span is
/// shorter than a full cadence and simply closes the gap to the next
/// boundary.
pub fn next_period(
  anchor: NaiveDate,
  paid_through: NaiveDate,
  cadence: Cadence,
) -> RentPeriod {
  let start = paid_through.succ_opt().unwrap_or(paid_through);
  let step = cadence.months() as i32;

  let elapsed = (start.year() - anchor.year()) * 12 + start.month() as i32
    - anchor.month() as i32;
  let mut index = elapsed.div_euclid(step).max(0);
  if index > 0 && period_boundary(anchor, cadence, index) > start {
    index -= 1;
  }

  let next = period_boundary(anchor, cadence, index + 1);
  RentPeriod { start, end: next.pred_opt().unwrap_or(next) }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
  }

  #[test]
  fn cadence_months() {
    assert_eq!(cadence_to_months(Cadence::Monthly), 1);
    assert_eq!(cadence_to_months(Cadence::Quarterly), 3);
    assert_eq!(cadence_to_months(Cadence::SemiAnnual), 6);
    assert_eq!(cadence_to_months(Cadence::Annual), 12);
  }

  #[test]
  fn clamps_to_end_of_month() {
    assert_eq!(add_months(d(2023, 1, 31), 1), d(2023, 2, 28));
    assert_eq!(add_months(d(2024, 1, 31), 1), d(2024, 2, 29));
    assert_eq!(add_months(d(2024, 3, 31), -1), d(2024, 2, 29));
    assert_eq!(add_months(d(2024, 5, 31), 1), d(2024, 6, 30));
  }

  #[test]
  fn carries_across_years() {
    assert_eq!(add_months(d(2023, 11, 15), 3), d(2024, 2, 15));
    assert_eq!(add_months(d(2024, 2, 15), -3), d(2023, 11, 15));
    assert_eq!(add_months(d(2024, 1, 10), -13), d(2022, 12, 10));
    assert_eq!(add_months(d(2024, 2, 29), 12), d(2025, 2, 28));
  }

  #[test]
  fn round_trip_stays_in_the_same_month() {
    let dates = [d(2024, 1, 31), d(2023, 8, 31), d(2024, 2, 29), d(2021, 6, 15)];
    for date in dates {
      for n in [-25, -12, -6, -3, -1, 1, 3, 6, 12, 25] {
        let back = add_months(add_months(date, n), -n);
        assert_eq!((back.year(), back.month()), (date.year(), date.month()));
        assert!(back.day() <= date.day());
      }
    }
    assert_eq!(add_months(add_months(d(2023, 1, 31), 1), -1), d(2023, 1, 28));
  }

  #[test]
  fn initial_last_payment_is_one_cadence_back() {
    assert_eq!(initial_last_payment(d(2024, 1, 15), Cadence::Monthly), d(2023, 12, 15));
    assert_eq!(initial_last_payment(d(2024, 5, 31), Cadence::Quarterly), d(2024, 2, 29));
    assert_eq!(initial_last_payment(d(2024, 1, 15), Cadence::Annual), d(2023, 1, 15));
  }

  #[test]
  fn first_period_after_inception() {
    let period = next_period(d(2024, 1, 15), d(2024, 1, 14), Cadence::Monthly);
    assert_eq!(period, RentPeriod { start: d(2024, 1, 15), end: d(2024, 2, 14) });

    let period = next_period(d(2024, 1, 15), d(2024, 1, 14), Cadence::Quarterly);
    assert_eq!(period.end, d(2024, 4, 14));
  }

  #[test]
  fn periods_stay_anchored_to_start_day() {
    let anchor = d(2024, 1, 31);
    let first = next_period(anchor, d(2024, 1, 30), Cadence::Monthly);
    assert_eq!(first, RentPeriod { start: d(2024, 1, 31), end: d(2024, 2, 28) });

    let second = next_period(anchor, first.end, Cadence::Monthly);
    assert_eq!(second, RentPeriod { start: d(2024, 2, 29), end: d(2024, 3, 30) });

    let third = next_period(anchor, second.end, Cadence::Monthly);
    assert_eq!(third.start, d(2024, 3, 31));
    assert_eq!(third.end, d(2024, 4, 29));
  }

  #[test]
  fn mid_period_paid_through_closes_the_gap() {
    let period = next_period(d(2024, 1, 15), d(2024, 1, 20), Cadence::Monthly);
    assert_eq!(period, RentPeriod { start: d(2024, 1, 21), end: d(2024, 2, 14) });
  }
}
