// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Quest reward and daily bounty resolution engine.
//!
//! [`QuestEngine`] ties together the pieces that decide what a completed
//! chore is worth:
//!
//! - [`generation`] materializes quests from subscriptions on their schedule,
//! - [`bounty`] picks one quest per user per home-local day for double rewards,
//! - [`corruption`] turns the household's overdue quests into a reward debuff,
//! - [`rewards`] composes the multipliers in a fixed order,
//! - [`completion`] applies all of it and commits atomically,
//! - [`shop`] lets members spend gold on treats and consumables.
//!
//! Nothing runs in the background. Generation and the corruption sweep run
//! when a board is loaded; bounty resolution runs on first use each day.

pub mod bounty;
pub mod catalog;
pub mod completion;
pub mod corruption;
pub mod generation;
pub mod rewards;
pub mod schedule;
pub mod shop;
mod txn;

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use hearth_config::{BountySelection, HearthConfig};
use hearth_core::{Clock, HearthError, Home, HomeId, User, UserId, parse_timezone};
use hearth_storage::Database;
use hearth_storage::queries::{homes, users};
use tracing::warn;

pub use bounty::BountyView;
pub use completion::{CompletionResult, RewardBreakdown};
pub use corruption::{CorruptionCurve, CorruptionReading, LinearCurve};
pub use rewards::{Multiplier, RewardModifiers, RewardOutcome};
pub use shop::ClaimResult;

/// Engine tunables, resolved once from [`HearthConfig`].
#[derive(Debug, Clone)]
#[deny(missing_docs)]
pub struct EngineSettings {
    /// Minimum age before a quest may become a bounty.
    pub bounty_min_age: Duration,
    /// How the bounty is picked among eligible quests.
    pub bounty_selection: BountySelection,
    /// Upper bound on a quest's listed XP and gold.
    pub max_base_reward: i64,
    /// Furthest a due date may be set from creation.
    pub max_due_in_hours: i64,
    /// Used for homes whose stored timezone no longer parses.
    pub default_timezone: Tz,
    /// Extra attempts for a write that keeps hitting a busy database.
    pub max_retries: u32,
}

impl EngineSettings {
    pub fn from_config(config: &HearthConfig) -> Result<Self, HearthError> {
        Ok(Self {
            bounty_min_age: Duration::try_hours(config.bounty.min_age_hours).ok_or_else(|| {
                HearthError::Config(format!(
                    "bounty.min_age_hours {} is out of range",
                    config.bounty.min_age_hours
                ))
            })?,
            bounty_selection: config.bounty.selection,
            max_base_reward: config.rewards.max_base_reward,
            max_due_in_hours: config.rewards.max_due_in_hours,
            default_timezone: parse_timezone(&config.home.default_timezone)?,
            max_retries: config.storage.max_retries,
        })
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            bounty_min_age: Duration::hours(48),
            bounty_selection: BountySelection::Oldest,
            max_base_reward: 10_000,
            max_due_in_hours: 24 * 365,
            default_timezone: Tz::UTC,
            max_retries: 3,
        }
    }
}

/// Cloneable handle to the quest engine.
#[derive(Clone)]
pub struct QuestEngine {
    db: Database,
    clock: Arc<dyn Clock>,
    curve: Arc<dyn CorruptionCurve>,
    settings: Arc<EngineSettings>,
}

impl QuestEngine {
    /// Build an engine with the linear corruption curve from `config`.
    pub fn from_config(
        db: Database,
        config: &HearthConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, HearthError> {
        let settings = EngineSettings::from_config(config)?;
        let curve = LinearCurve::from_config(&config.corruption);
        Ok(Self::new(db, settings, clock, Arc::new(curve)))
    }

    pub fn new(
        db: Database,
        settings: EngineSettings,
        clock: Arc<dyn Clock>,
        curve: Arc<dyn CorruptionCurve>,
    ) -> Self {
        Self {
            db,
            clock,
            curve,
            settings: Arc::new(settings),
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

/// Resolve a home's timezone, falling back to the configured default.
pub(crate) fn home_timezone(home: &Home, default: Tz) -> Tz {
    match parse_timezone(&home.timezone) {
        Ok(tz) => tz,
        Err(_) => {
            warn!(home_id = home.id, timezone = %home.timezone, "unknown home timezone, using default");
            default
        }
    }
}

/// Load a home or fail with `NotFound`.
pub(crate) fn require_home(
    conn: &rusqlite::Connection,
    home_id: HomeId,
) -> Result<Home, txn::TxError> {
    homes::get_home(conn, home_id)?
        .ok_or_else(|| HearthError::not_found("home", home_id).into())
}

/// Load a user or fail with `NotFound`.
pub(crate) fn require_user(
    conn: &rusqlite::Connection,
    user_id: UserId,
) -> Result<User, txn::TxError> {
    users::get_user(conn, user_id)?
        .ok_or_else(|| HearthError::not_found("user", user_id).into())
}
