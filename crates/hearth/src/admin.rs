// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot administrative commands: `migrate`, `check-config`, `bootstrap`.

use std::fmt;
use std::sync::Arc;

use hearth_config::HearthConfig;
use hearth_core::{HearthError, Home, SystemClock, User};
use hearth_engine::QuestEngine;
use hearth_storage::Database;

/// Open the database (which applies pending migrations) and close it again.
pub async fn run_migrate(config: &HearthConfig) -> Result<(), HearthError> {
    let db = Database::open_with(&config.storage).await?;
    db.close().await?;
    println!("hearth: database at {} is up to date", config.storage.database_path);
    Ok(())
}

pub fn print_config_summary(config: &HearthConfig) {
    println!("hearth: configuration OK");
    println!("  server      {}:{} (log level {})", config.server.host, config.server.port, config.server.log_level);
    println!("  database    {}", config.storage.database_path);
    println!(
        "  bounty      min age {}h, {} selection",
        config.bounty.min_age_hours, config.bounty.selection
    );
    println!(
        "  corruption  {}% per overdue quest, capped at {}%",
        config.corruption.penalty_per_quest_percent, config.corruption.max_penalty_percent
    );
    println!("  timezone    {}", config.home.default_timezone);
}

/// What `bootstrap` created.
#[derive(Debug)]
pub struct Bootstrapped {
    pub home: Home,
    pub users: Vec<User>,
}

impl fmt::Display for Bootstrapped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "home {} \"{}\" ({})",
            self.home.id, self.home.name, self.home.timezone
        )?;
        for user in &self.users {
            writeln!(f, "  user {} {}", user.id, user.username)?;
        }
        write!(f, "send requests with the x-hearth-user header set to a user id")
    }
}

/// Create a home and its members.
pub async fn run_bootstrap(
    config: &HearthConfig,
    home_name: &str,
    timezone: Option<&str>,
    usernames: &[String],
) -> Result<Bootstrapped, HearthError> {
    let db = Database::open_with(&config.storage).await?;
    let engine = QuestEngine::from_config(db.clone(), config, Arc::new(SystemClock))?;

    let home = engine.create_home(home_name, timezone).await?;
    let mut users = Vec::with_capacity(usernames.len());
    for username in usernames {
        users.push(engine.create_user(home.id, username).await?);
    }
    db.close().await?;
    Ok(Bootstrapped { home, users })
}
