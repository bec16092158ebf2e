// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Hearth quest engine.
//!
//! This crate provides the domain records, schedule types, error type, and
//! clock abstraction shared by every other crate in the workspace.

pub mod clock;
pub mod error;
pub mod level;
pub mod schedule;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use clock::{Clock, ManualClock, SystemClock, local_date, parse_timezone};
pub use error::HearthError;
pub use level::level_for_xp;
pub use schedule::{Recurrence, Schedule, ScheduleTime, Weekday};
pub use types::*;
