// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Time source abstraction and home-local date helpers.

use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::error::HearthError;

/// Source of the current instant.
///
/// The engine never calls `Utc::now()` directly so tests can pin the day
/// boundary and the 48-hour bounty window.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: ArcSwap<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: ArcSwap::from_pointee(start),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.store(Arc::new(now));
    }

    pub fn advance(&self, by: chrono::Duration) {
        let next = **self.now.load() + by;
        self.set(next);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        **self.now.load()
    }
}

/// Parse an IANA timezone name.
pub fn parse_timezone(name: &str) -> Result<Tz, HearthError> {
    name.parse::<Tz>()
        .map_err(|_| HearthError::Validation(format!("unknown timezone `{name}`")))
}

/// The calendar date of `now` as seen in `tz`.
pub fn local_date(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn manual_clock_moves_only_when_told() {
        let start = Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);
        clock.advance(chrono::Duration::hours(49));
        assert_eq!(clock.now(), Utc.with_ymd_and_hms(2026, 2, 3, 10, 0, 0).unwrap());
        clock.set(start);
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn local_date_crosses_midnight_by_timezone() {
        // 23:30 UTC on 1 March is already 2 March in Tokyo and still 1 March in New York.
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 23, 30, 0).unwrap();
        let tokyo = parse_timezone("Asia/Tokyo").unwrap();
        let new_york = parse_timezone("America/New_York").unwrap();
        assert_eq!(local_date(now, tokyo), NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
        assert_eq!(local_date(now, new_york), NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
    }

    #[test]
    fn rejects_unknown_timezone() {
        let err = parse_timezone("Mars/Olympus_Mons").unwrap_err();
        assert!(matches!(err, HearthError::Validation(_)));
    }
}
