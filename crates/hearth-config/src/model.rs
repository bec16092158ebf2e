// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Hearth quest engine.
//!
//! Every section denies unknown fields, so a misspelled key in `hearth.toml`
//! fails startup with a diagnostic instead of being ignored.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Top-level Hearth configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HearthConfig {
    /// HTTP listener and logging.
    #[serde(default)]
    pub server: ServerConfig,

    /// SQLite database settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Daily bounty selection.
    #[serde(default)]
    pub bounty: BountyConfig,

    /// Overdue-quest debuff curve.
    #[serde(default)]
    pub corruption: CorruptionConfig,

    /// Limits on quest rewards and due windows.
    #[serde(default)]
    pub rewards: RewardsConfig,

    /// Household defaults.
    #[serde(default)]
    pub home: HomeConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port for the HTTP listener.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Default `tracing` filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// SQLite file holding homes, users, quests, and bounties.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Open the database in WAL journal mode.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,

    /// How long SQLite waits on a locked database before reporting busy.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Retries for a write transaction that still hits a busy database.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
            busy_timeout_ms: default_busy_timeout_ms(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_database_path() -> String {
    let path = match dirs::data_dir() {
        Some(dir) => dir.join("hearth/hearth.db"),
        None => std::path::PathBuf::from("hearth.db"),
    };
    path.display().to_string()
}

fn default_wal_mode() -> bool {
    true
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

fn default_max_retries() -> u32 {
    3
}

/// How the bounty is picked from the eligible pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BountySelection {
    /// Earliest-created quest, ties broken by lowest id.
    #[default]
    Oldest,
    /// Uniformly random quest.
    Random,
}

/// Daily bounty configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BountyConfig {
    /// Minimum quest age before it can become a bounty.
    #[serde(default = "default_min_age_hours")]
    pub min_age_hours: i64,

    #[serde(default)]
    pub selection: BountySelection,
}

impl Default for BountyConfig {
    fn default() -> Self {
        Self {
            min_age_hours: default_min_age_hours(),
            selection: BountySelection::default(),
        }
    }
}

fn default_min_age_hours() -> i64 {
    48
}

/// Corruption debuff configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CorruptionConfig {
    /// Reward reduction per overdue quest in the household.
    #[serde(default = "default_penalty_per_quest_percent")]
    pub penalty_per_quest_percent: u32,

    /// Upper bound on the total reduction.
    #[serde(default = "default_max_penalty_percent")]
    pub max_penalty_percent: u32,
}

impl Default for CorruptionConfig {
    fn default() -> Self {
        Self {
            penalty_per_quest_percent: default_penalty_per_quest_percent(),
            max_penalty_percent: default_max_penalty_percent(),
        }
    }
}

fn default_penalty_per_quest_percent() -> u32 {
    5
}

fn default_max_penalty_percent() -> u32 {
    50
}

/// Reward limits applied when templates and quests are created.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RewardsConfig {
    /// Largest base XP or gold a template or quest may carry.
    #[serde(default = "default_max_base_reward")]
    pub max_base_reward: i64,

    /// Longest due window a subscription or standalone quest may request.
    #[serde(default = "default_max_due_in_hours")]
    pub max_due_in_hours: i64,
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            max_base_reward: default_max_base_reward(),
            max_due_in_hours: default_max_due_in_hours(),
        }
    }
}

fn default_max_base_reward() -> i64 {
    10_000
}

fn default_max_due_in_hours() -> i64 {
    24 * 365
}

/// Household defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HomeConfig {
    /// IANA timezone for homes created without one.
    #[serde(default = "default_timezone")]
    pub default_timezone: String,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self {
            default_timezone: default_timezone(),
        }
    }
}

fn default_timezone() -> String {
    "UTC".to_string()
}
