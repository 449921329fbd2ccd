//! The "expiring soon" window.
//!
//! A document is expiring soon when its validity date falls between today
//! and today + 30 days, both inclusive. Documents that already lapsed are not
//! "expiring"; they are expired and never match.

use chrono::{DateTime, Days, NaiveDate, Utc};

/// Forward horizon, in days, of the expiry alerts.
pub const EXPIRY_HORIZON_DAYS: u64 = 30;

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryWindow {
  pub from:  NaiveDate,
  pub until: NaiveDate,
}

impl ExpiryWindow {
  /// The window starting on the UTC calendar day of `now`.
  pub fn starting_at(now: DateTime<Utc>) -> Self {
    let from = now.date_naive();
    let until = from
      .checked_add_days(Days::new(EXPIRY_HORIZON_DAYS))
      .unwrap_or(NaiveDate::MAX);
    Self { from, until }
  }

  /// The window starting today.
  pub fn current() -> Self { Self::starting_at(Utc::now()) }

  pub fn contains(&self, validity: Option<NaiveDate>) -> bool {
    validity.is_some_and(|date| self.from <= date && date <= self.until)
  }
}

/// A record carrying an optional validity (expiry) date.
pub trait Expiring {
  fn fecha_validez(&self) -> Option<NaiveDate>;
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone as _;

  use super::*;

  fn window() -> ExpiryWindow {
    ExpiryWindow::starting_at(Utc.with_ymd_and_hms(2026, 3, 10, 18, 30, 0).unwrap())
  }

  fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
  }

  #[test]
  fn bounds_are_inclusive() {
    let w = window();
    assert_eq!(w.from, date(2026, 3, 10).unwrap());
    assert_eq!(w.until, date(2026, 4, 9).unwrap());
    assert!(w.contains(date(2026, 3, 10)));
    assert!(w.contains(date(2026, 4, 9)));
  }

  #[test]
  fn lapsed_and_distant_dates_are_excluded() {
    let w = window();
    assert!(!w.contains(date(2026, 3, 9)));
    assert!(!w.contains(date(2026, 4, 10)));
  }

  #[test]
  fn missing_validity_never_expires() {
    assert!(!window().contains(None));
  }
}
