//! The "current application date".
//!
//! Every status and reminder computation reads today's date from a [`Clock`]
//! owned by the caller, never from the wall clock directly. The operator may
//! move it freely to preview past or future dashboards.

use chrono::{Local, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
  today: NaiveDate,
}

impl Clock {
  pub fn new(today: NaiveDate) -> Self { Self { today } }

  /// A clock set to the local calendar date.
  pub fn system() -> Self { Self::new(Local::now().date_naive()) }

  pub fn get(&self) -> NaiveDate { self.today }

  /// Overwrite the current date. No caching depends on it, so the next read
  /// of any derived figure sees the new value.
  pub fn set(&mut self, today: NaiveDate) { self.today = today; }
}

impl Default for Clock {
  fn default() -> Self { Self::system() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn set_overwrites_unconditionally() {
    let mut clock = Clock::new(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    let earlier = NaiveDate::from_ymd_opt(1999, 12, 31).unwrap();
    clock.set(earlier);
    assert_eq!(clock.get(), earlier);
  }
}
