// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Hearth quest engine.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// The primary error type used across storage, engine, and gateway.
#[derive(Debug, Error)]
pub enum HearthError {
    /// Configuration errors (invalid TOML, out-of-range values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (connection, query failure, migration).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A quest, template, subscription, user, or home does not exist
    /// (or is not visible to the caller's household).
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// A completion was attempted on a quest that is already completed.
    #[error("quest {quest_id} is already completed")]
    AlreadyCompleted {
        quest_id: i64,
        completed_at: Option<DateTime<Utc>>,
    },

    /// A reward costs more gold than the user holds.
    #[error("reward costs {required} gold but only {balance} is available")]
    InsufficientGold { required: i64, balance: i64 },

    /// A non-stacking consumable was claimed while still in effect.
    #[error("{0}")]
    ConsumableActive(String),

    /// Malformed input: schedule, reward range, timezone, missing fields.
    #[error("validation error: {0}")]
    Validation(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HearthError {
    /// Shorthand for [`HearthError::NotFound`].
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}
