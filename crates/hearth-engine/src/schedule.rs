// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fire-time arithmetic for subscription schedules.
//!
//! Slots are wall-clock times in the home's timezone. A slot that falls in
//! a DST gap moves forward by an hour; an ambiguous slot takes the earlier
//! instant.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use hearth_core::{Recurrence, Schedule, ScheduleTime, Subscription};

/// How many candidate days/weeks/months to scan before giving up.
const MAX_CANDIDATES: usize = 64;

/// The first scheduled slot strictly after `after`.
pub fn next_fire(schedule: &Schedule, after: DateTime<Utc>, tz: Tz) -> Option<DateTime<Utc>> {
    let start = after.with_timezone(&tz).date_naive();
    let time = schedule.time();
    candidate_dates(schedule, start)
        .take(MAX_CANDIDATES)
        .filter_map(|date| slot_instant(date, time, tz))
        .find(|slot| *slot > after)
}

/// Whether a subscription should produce a quest at `now`.
///
/// A recurring subscription that never generated is due immediately.
pub fn is_due(subscription: &Subscription, now: DateTime<Utc>, tz: Tz) -> bool {
    if !subscription.is_active || subscription.recurrence == Recurrence::OneOff {
        return false;
    }
    let Some(schedule) = subscription.schedule.as_ref() else {
        return false;
    };
    match subscription.last_generated_at {
        None => true,
        Some(last) => next_fire(schedule, last, tz).is_some_and(|slot| slot <= now),
    }
}

fn candidate_dates(schedule: &Schedule, start: NaiveDate) -> Box<dyn Iterator<Item = NaiveDate>> {
    match *schedule {
        Schedule::Daily { .. } => Box::new(start.iter_days()),
        Schedule::Weekly { day, .. } => {
            let target = day.to_chrono().num_days_from_monday();
            let current = start.weekday().num_days_from_monday();
            let offset = (7 + target - current) % 7;
            let first = start + Duration::days(i64::from(offset));
            Box::new(first.iter_weeks())
        }
        Schedule::Monthly { day, .. } => {
            let (mut year, mut month) = (start.year(), start.month());
            Box::new(std::iter::from_fn(move || {
                let date = clamp_day(year, month, u32::from(day));
                (year, month) = next_month(year, month);
                date
            }))
        }
    }
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

/// `day` in the given month, or the month's last day if it is shorter.
pub fn clamp_day(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let (ny, nm) = next_month(year, month);
    let last = NaiveDate::from_ymd_opt(ny, nm, 1)?.pred_opt()?.day();
    NaiveDate::from_ymd_opt(year, month, day.clamp(1, last))
}

fn slot_instant(date: NaiveDate, time: ScheduleTime, tz: Tz) -> Option<DateTime<Utc>> {
    let local: NaiveDateTime = date.and_hms_opt(time.hour(), time.minute(), 0)?;
    tz.from_local_datetime(&local)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(local + Duration::hours(1))).earliest())
        .map(|t| t.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::Weekday;
    use proptest::prelude::*;

    fn at(h: u32, m: u32) -> ScheduleTime {
        ScheduleTime::new(h, m).unwrap()
    }

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn daily_fires_later_today_or_tomorrow() {
        let s = Schedule::Daily { time: at(8, 0) };
        assert_eq!(next_fire(&s, utc(2026, 4, 1, 7, 0), Tz::UTC), Some(utc(2026, 4, 1, 8, 0)));
        assert_eq!(next_fire(&s, utc(2026, 4, 1, 8, 0), Tz::UTC), Some(utc(2026, 4, 2, 8, 0)));
    }

    #[test]
    fn weekly_finds_next_matching_weekday() {
        // 1 April 2026 is a Wednesday.
        let s = Schedule::Weekly {
            day: Weekday::Monday,
            time: at(18, 30),
        };
        assert_eq!(next_fire(&s, utc(2026, 4, 1, 12, 0), Tz::UTC), Some(utc(2026, 4, 6, 18, 30)));
        let same_day = Schedule::Weekly {
            day: Weekday::Wednesday,
            time: at(9, 0),
        };
        assert_eq!(
            next_fire(&same_day, utc(2026, 4, 1, 12, 0), Tz::UTC),
            Some(utc(2026, 4, 8, 9, 0))
        );
    }

    #[test]
    fn monthly_clamps_to_short_months() {
        let s = Schedule::Monthly {
            day: 31,
            time: at(9, 0),
        };
        assert_eq!(next_fire(&s, utc(2026, 2, 1, 0, 0), Tz::UTC), Some(utc(2026, 2, 28, 9, 0)));
        assert_eq!(next_fire(&s, utc(2026, 2, 28, 9, 0), Tz::UTC), Some(utc(2026, 3, 31, 9, 0)));
        assert_eq!(next_fire(&s, utc(2028, 2, 1, 0, 0), Tz::UTC), Some(utc(2028, 2, 29, 9, 0)));
        assert_eq!(clamp_day(2026, 4, 31), NaiveDate::from_ymd_opt(2026, 4, 30));
    }

    #[test]
    fn slots_follow_home_timezone() {
        let tokyo: Tz = "Asia/Tokyo".parse().unwrap();
        let s = Schedule::Daily { time: at(8, 0) };
        // 08:00 in Tokyo is 23:00 UTC the previous day.
        assert_eq!(next_fire(&s, utc(2026, 4, 1, 0, 0), tokyo), Some(utc(2026, 4, 1, 23, 0)));
    }

    #[test]
    fn dst_gap_slot_moves_forward() {
        let berlin: Tz = "Europe/Berlin".parse().unwrap();
        // 02:30 does not exist in Berlin on 29 March 2026; it becomes 03:30 CEST.
        let s = Schedule::Daily { time: at(2, 30) };
        assert_eq!(next_fire(&s, utc(2026, 3, 28, 12, 0), berlin), Some(utc(2026, 3, 29, 1, 30)));
    }

    #[test]
    fn never_generated_subscription_is_due() {
        let sub = Subscription {
            id: 1,
            user_id: 1,
            quest_template_id: 1,
            recurrence: Recurrence::Daily,
            schedule: Some(Schedule::Daily { time: at(8, 0) }),
            due_in_hours: None,
            last_generated_at: None,
            is_active: true,
            created_at: utc(2026, 4, 1, 0, 0),
        };
        assert!(is_due(&sub, utc(2026, 4, 1, 0, 0), Tz::UTC));

        let generated = Subscription {
            last_generated_at: Some(utc(2026, 4, 1, 9, 0)),
            ..sub.clone()
        };
        assert!(!is_due(&generated, utc(2026, 4, 2, 7, 59), Tz::UTC));
        assert!(is_due(&generated, utc(2026, 4, 2, 8, 0), Tz::UTC));

        let paused = Subscription {
            is_active: false,
            ..sub.clone()
        };
        assert!(!is_due(&paused, utc(2026, 5, 1, 0, 0), Tz::UTC));

        let one_off = Subscription {
            recurrence: Recurrence::OneOff,
            schedule: None,
            ..sub
        };
        assert!(!is_due(&one_off, utc(2026, 5, 1, 0, 0), Tz::UTC));
    }

    proptest! {
        #[test]
        fn next_fire_is_strictly_after_and_within_a_month(
            secs in 1_700_000_000i64..1_900_000_000,
            day in 1u8..=31,
            hour in 0u32..24,
            minute in 0u32..60,
        ) {
            let after = DateTime::<Utc>::from_timestamp(secs, 0).unwrap();
            let time = at(hour, minute);
            for schedule in [
                Schedule::Daily { time },
                Schedule::Weekly { day: Weekday::Friday, time },
                Schedule::Monthly { day, time },
            ] {
                let next = next_fire(&schedule, after, Tz::UTC).unwrap();
                prop_assert!(next > after);
                prop_assert!(next - after <= Duration::days(32));
            }
        }
    }
}
