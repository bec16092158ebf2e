// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recurrence and schedule types for template subscriptions.
//!
//! Schedules arrive as JSON objects tagged by `type`:
//!
//! ```json
//! {"type": "daily", "time": "08:00"}
//! {"type": "weekly", "day": "monday", "time": "18:30"}
//! {"type": "monthly", "day": 31, "time": "09:00"}
//! ```
//!
//! Parsing rejects unknown types, malformed times, and unknown weekdays.
//! Range checks that serde cannot express live in [`Schedule::validate`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::HearthError;

/// How often a subscription produces quest instances.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    #[strum(to_string = "one_off", serialize = "one-off")]
    #[serde(alias = "one-off")]
    OneOff,
    #[strum(to_string = "daily")]
    Daily,
    #[strum(to_string = "weekly")]
    Weekly,
    #[strum(to_string = "monthly")]
    Monthly,
}

/// Day of the week for weekly schedules, spelled out in lowercase on the wire.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub fn to_chrono(self) -> chrono::Weekday {
        match self {
            Self::Monday => chrono::Weekday::Mon,
            Self::Tuesday => chrono::Weekday::Tue,
            Self::Wednesday => chrono::Weekday::Wed,
            Self::Thursday => chrono::Weekday::Thu,
            Self::Friday => chrono::Weekday::Fri,
            Self::Saturday => chrono::Weekday::Sat,
            Self::Sunday => chrono::Weekday::Sun,
        }
    }
}

/// Wall-clock time of day in `HH:MM` form, interpreted in the home's timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScheduleTime {
    hour: u32,
    minute: u32,
}

impl ScheduleTime {
    pub fn new(hour: u32, minute: u32) -> Result<Self, HearthError> {
        if hour > 23 || minute > 59 {
            return Err(HearthError::Validation(format!(
                "invalid time {hour:02}:{minute:02}, expected 00:00 to 23:59"
            )));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }
}

impl FromStr for ScheduleTime {
    type Err = HearthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid =
            || HearthError::Validation(format!("invalid time format `{s}`, expected HH:MM"));
        let (h, m) = s.split_once(':').ok_or_else(invalid)?;
        if h.is_empty() || m.len() != 2 {
            return Err(invalid());
        }
        let hour = h.parse::<u32>().map_err(|_| invalid())?;
        let minute = m.parse::<u32>().map_err(|_| invalid())?;
        Self::new(hour, minute)
    }
}

impl TryFrom<String> for ScheduleTime {
    type Error = HearthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ScheduleTime> for String {
    fn from(value: ScheduleTime) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ScheduleTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// When a recurring subscription fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Schedule {
    Daily {
        #[serde(default)]
        time: ScheduleTime,
    },
    Weekly {
        day: Weekday,
        #[serde(default)]
        time: ScheduleTime,
    },
    /// Days past the end of a short month clamp to its last day.
    Monthly {
        day: u8,
        #[serde(default)]
        time: ScheduleTime,
    },
}

impl Schedule {
    /// The recurrence this schedule shape belongs to.
    pub fn recurrence(&self) -> Recurrence {
        match self {
            Self::Daily { .. } => Recurrence::Daily,
            Self::Weekly { .. } => Recurrence::Weekly,
            Self::Monthly { .. } => Recurrence::Monthly,
        }
    }

    pub fn time(&self) -> ScheduleTime {
        match *self {
            Self::Daily { time } | Self::Weekly { time, .. } | Self::Monthly { time, .. } => time,
        }
    }

    /// Parse a schedule from its JSON wire form.
    pub fn from_json(raw: &str) -> Result<Self, HearthError> {
        serde_json::from_str(raw)
            .map_err(|e| HearthError::Validation(format!("malformed schedule: {e}")))
    }

    pub fn to_json(&self) -> String {
        // Serializing a plain enum of strings and integers cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Check that the schedule agrees with the subscription's recurrence and
    /// that its fields are in range.
    pub fn validate(schedule: Option<&Self>, recurrence: Recurrence) -> Result<(), HearthError> {
        match (recurrence, schedule) {
            (Recurrence::OneOff, None) => Ok(()),
            (Recurrence::OneOff, Some(_)) => Err(HearthError::Validation(
                "one_off subscriptions do not take a schedule".to_string(),
            )),
            (recurrence, None) => Err(HearthError::Validation(format!(
                "schedule is required for {recurrence} recurrence"
            ))),
            (recurrence, Some(schedule)) => {
                if schedule.recurrence() != recurrence {
                    return Err(HearthError::Validation(format!(
                        "schedule type `{}` must match recurrence `{recurrence}`",
                        schedule.recurrence()
                    )));
                }
                if let Self::Monthly { day, .. } = schedule
                    && !(1..=31).contains(day)
                {
                    return Err(HearthError::Validation(format!(
                        "monthly schedule day must be between 1 and 31, got {day}"
                    )));
                }
                Ok(())
            }
        }
    }
}
