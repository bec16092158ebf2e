// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The household reward shop and its claim ledger.

use chrono::{DateTime, Utc};
use hearth_core::{HomeId, NewReward, Reward, RewardClaim, RewardId, UserId};
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::sqltime::{encode_ts, get_enum, get_ts};

const REWARD_COLUMNS: &str = "id, home_id, name, description, cost, effect, created_at";

fn map_reward(row: &Row<'_>) -> rusqlite::Result<Reward> {
    Ok(Reward {
        id: row.get(0)?,
        home_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        cost: row.get(4)?,
        effect: get_enum(row, 5)?,
        created_at: get_ts(row, 6)?,
    })
}

fn map_claim(row: &Row<'_>) -> rusqlite::Result<RewardClaim> {
    Ok(RewardClaim {
        id: row.get(0)?,
        user_id: row.get(1)?,
        reward_id: row.get(2)?,
        reward_name: row.get(3)?,
        cost: row.get(4)?,
        claimed_at: get_ts(row, 5)?,
    })
}

pub fn insert_reward(
    conn: &Connection,
    home_id: HomeId,
    new: &NewReward,
    now: DateTime<Utc>,
) -> rusqlite::Result<Reward> {
    conn.execute(
        "INSERT INTO reward (home_id, name, description, cost, effect, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            home_id,
            new.name,
            new.description,
            new.cost,
            new.effect.to_string(),
            encode_ts(now),
        ],
    )?;
    Ok(Reward {
        id: conn.last_insert_rowid(),
        home_id,
        name: new.name.clone(),
        description: new.description.clone(),
        cost: new.cost,
        effect: new.effect,
        created_at: now,
    })
}

pub fn get_reward(conn: &Connection, id: RewardId) -> rusqlite::Result<Option<Reward>> {
    conn.query_row(
        &format!("SELECT {REWARD_COLUMNS} FROM reward WHERE id = ?1"),
        params![id],
        map_reward,
    )
    .optional()
}

/// Rewards on offer in a home, cheapest first.
pub fn list_for_home(conn: &Connection, home_id: HomeId) -> rusqlite::Result<Vec<Reward>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {REWARD_COLUMNS} FROM reward WHERE home_id = ?1 ORDER BY cost, id"
    ))?;
    let rows = stmt.query_map(params![home_id], map_reward)?;
    rows.collect()
}

/// Remove a reward from the shop. Past claims keep their copied name and cost.
pub fn delete_reward(conn: &Connection, id: RewardId) -> rusqlite::Result<bool> {
    let changed = conn.execute("DELETE FROM reward WHERE id = ?1", params![id])?;
    Ok(changed == 1)
}

pub fn insert_claim(
    conn: &Connection,
    user_id: UserId,
    reward: &Reward,
    now: DateTime<Utc>,
) -> rusqlite::Result<RewardClaim> {
    conn.execute(
        "INSERT INTO user_reward_claim (user_id, reward_id, reward_name, cost, claimed_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![user_id, reward.id, reward.name, reward.cost, encode_ts(now)],
    )?;
    Ok(RewardClaim {
        id: conn.last_insert_rowid(),
        user_id,
        reward_id: Some(reward.id),
        reward_name: reward.name.clone(),
        cost: reward.cost,
        claimed_at: now,
    })
}

/// A user's claims, most recent first.
pub fn claims_for_user(conn: &Connection, user_id: UserId) -> rusqlite::Result<Vec<RewardClaim>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, reward_id, reward_name, cost, claimed_at
         FROM user_reward_claim WHERE user_id = ?1
         ORDER BY claimed_at DESC, id DESC",
    )?;
    let rows = stmt.query_map(params![user_id], map_claim)?;
    rows.collect()
}
