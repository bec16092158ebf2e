// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde cannot express: address shape, path
//! presence, numeric ranges, and timezone names.

use crate::diagnostic::ConfigError;
use crate::model::HearthConfig;

/// Longest bounty waiting period: one year.
pub const MAX_MIN_AGE_HOURS: i64 = 24 * 365;

/// Longest due window a quest may be given: ten years.
pub const MAX_DUE_IN_HOURS: i64 = 24 * 365 * 10;

/// Validate a deserialized configuration.
///
/// Collects every failure instead of stopping at the first.
pub fn validate_config(config: &HearthConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let host = config.server.host.trim();
    if host.is_empty() {
        fail("server.host must not be empty".to_string());
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            fail(format!(
                "server.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    if config.server.log_level.parse::<tracing::Level>().is_err() {
        fail(format!(
            "server.log_level `{}` must be one of trace, debug, info, warn, error",
            config.server.log_level
        ));
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if !(0..=MAX_MIN_AGE_HOURS).contains(&config.bounty.min_age_hours) {
        fail(format!(
            "bounty.min_age_hours must be between 0 and {MAX_MIN_AGE_HOURS}, got {}",
            config.bounty.min_age_hours
        ));
    }

    if config.corruption.max_penalty_percent >= 100 {
        fail(format!(
            "corruption.max_penalty_percent must be below 100, got {}",
            config.corruption.max_penalty_percent
        ));
    }

    if config.corruption.penalty_per_quest_percent > config.corruption.max_penalty_percent {
        fail(format!(
            "corruption.penalty_per_quest_percent ({}) must not exceed max_penalty_percent ({})",
            config.corruption.penalty_per_quest_percent, config.corruption.max_penalty_percent
        ));
    }

    if config.rewards.max_base_reward < 1 {
        fail(format!(
            "rewards.max_base_reward must be at least 1, got {}",
            config.rewards.max_base_reward
        ));
    }

    if !(1..=MAX_DUE_IN_HOURS).contains(&config.rewards.max_due_in_hours) {
        fail(format!(
            "rewards.max_due_in_hours must be between 1 and {MAX_DUE_IN_HOURS}, got {}",
            config.rewards.max_due_in_hours
        ));
    }

    if let Err(e) = hearth_core::parse_timezone(&config.home.default_timezone) {
        fail(format!("home.default_timezone: {e}"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
