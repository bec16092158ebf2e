// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Household member accounts and their reward balances.

use chrono::{DateTime, Utc};
use hearth_core::{HomeId, User, UserId};
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::sqltime::{encode_opt_ts, encode_ts, get_opt_ts, get_ts};

const USER_COLUMNS: &str = "id, home_id, username, xp, gold_balance, active_xp_boost_count,
     active_shield_expiry, created_at";

fn map_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        home_id: row.get(1)?,
        username: row.get(2)?,
        xp: row.get(3)?,
        gold_balance: row.get(4)?,
        active_xp_boost_count: row.get(5)?,
        active_shield_expiry: get_opt_ts(row, 6)?,
        created_at: get_ts(row, 7)?,
    })
}

pub fn insert_user(
    conn: &Connection,
    home_id: HomeId,
    username: &str,
    now: DateTime<Utc>,
) -> rusqlite::Result<User> {
    conn.execute(
        "INSERT INTO user (home_id, username, created_at) VALUES (?1, ?2, ?3)",
        params![home_id, username, encode_ts(now)],
    )?;
    Ok(User {
        id: conn.last_insert_rowid(),
        home_id,
        username: username.to_string(),
        xp: 0,
        gold_balance: 0,
        active_xp_boost_count: 0,
        active_shield_expiry: None,
        created_at: now,
    })
}

pub fn get_user(conn: &Connection, id: UserId) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM user WHERE id = ?1"),
        params![id],
        map_user,
    )
    .optional()
}

pub fn list_for_home(conn: &Connection, home_id: HomeId) -> rusqlite::Result<Vec<User>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {USER_COLUMNS} FROM user WHERE home_id = ?1 ORDER BY id"
    ))?;
    let rows = stmt.query_map(params![home_id], map_user)?;
    rows.collect()
}

/// Add earned XP and gold to a user, consuming one boost use if requested.
///
/// Returns `false` when the user row does not exist.
pub fn credit_rewards(
    conn: &Connection,
    user_id: UserId,
    xp: i64,
    gold: i64,
    consume_boost: bool,
) -> rusqlite::Result<bool> {
    let changed = conn.execute(
        "UPDATE user SET
            xp = xp + ?2,
            gold_balance = gold_balance + ?3,
            active_xp_boost_count = CASE
                WHEN ?4 AND active_xp_boost_count > 0 THEN active_xp_boost_count - 1
                ELSE active_xp_boost_count
            END
         WHERE id = ?1",
        params![user_id, xp, gold, consume_boost],
    )?;
    Ok(changed == 1)
}

/// Spend `amount` gold if the user holds at least that much.
///
/// Returns `false` and changes nothing when the balance is short or the
/// user does not exist.
pub fn debit_gold(conn: &Connection, user_id: UserId, amount: i64) -> rusqlite::Result<bool> {
    let changed = conn.execute(
        "UPDATE user SET gold_balance = gold_balance - ?2
         WHERE id = ?1 AND gold_balance >= ?2",
        params![user_id, amount],
    )?;
    Ok(changed == 1)
}

/// Add `uses` double-XP completions to a user's boost counter.
pub fn grant_xp_boost(conn: &Connection, user_id: UserId, uses: i64) -> rusqlite::Result<bool> {
    let changed = conn.execute(
        "UPDATE user SET active_xp_boost_count = active_xp_boost_count + ?2 WHERE id = ?1",
        params![user_id, uses],
    )?;
    Ok(changed == 1)
}

/// Set or clear the user's corruption shield.
pub fn set_shield_expiry(
    conn: &Connection,
    user_id: UserId,
    expiry: Option<DateTime<Utc>>,
) -> rusqlite::Result<bool> {
    let changed = conn.execute(
        "UPDATE user SET active_shield_expiry = ?2 WHERE id = ?1",
        params![user_id, encode_opt_ts(expiry)],
    )?;
    Ok(changed == 1)
}
