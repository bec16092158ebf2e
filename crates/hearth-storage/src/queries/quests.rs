// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Quest instance store.
//!
//! Quests are created from a [`QuestSnapshot`] and never deleted. After
//! completion their reward columns hold the earned amounts and are not
//! written again.

use chrono::{DateTime, Utc};
use hearth_core::{HomeId, Quest, QuestId, QuestSnapshot, QuestType, TemplateId, UserId};
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::sqltime::{encode_opt_ts, encode_ts, get_enum, get_opt_ts, get_ts};

const QUEST_COLUMNS: &str = "id, home_id, user_id, quest_template_id, title, display_name,
     description, tags, xp_reward, gold_reward, completed, created_at, completed_at,
     due_date, quest_type, corrupted_at";

fn map_quest(row: &Row<'_>) -> rusqlite::Result<Quest> {
    Ok(Quest {
        id: row.get(0)?,
        home_id: row.get(1)?,
        user_id: row.get(2)?,
        quest_template_id: row.get(3)?,
        title: row.get(4)?,
        display_name: row.get(5)?,
        description: row.get(6)?,
        tags: row.get(7)?,
        xp_reward: row.get(8)?,
        gold_reward: row.get(9)?,
        completed: row.get(10)?,
        created_at: get_ts(row, 11)?,
        completed_at: get_opt_ts(row, 12)?,
        due_date: get_opt_ts(row, 13)?,
        quest_type: get_enum(row, 14)?,
        corrupted_at: get_opt_ts(row, 15)?,
    })
}

fn query_quests(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> rusqlite::Result<Vec<Quest>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, map_quest)?;
    rows.collect()
}

pub fn insert_quest(
    conn: &Connection,
    snapshot: &QuestSnapshot,
    now: DateTime<Utc>,
) -> rusqlite::Result<Quest> {
    conn.execute(
        "INSERT INTO quest (home_id, user_id, quest_template_id, title, display_name,
             description, tags, xp_reward, gold_reward, completed, created_at, due_date,
             quest_type)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 0, ?10, ?11, ?12)",
        params![
            snapshot.home_id,
            snapshot.user_id,
            snapshot.quest_template_id,
            snapshot.title,
            snapshot.display_name,
            snapshot.description,
            snapshot.tags,
            snapshot.xp_reward,
            snapshot.gold_reward,
            encode_ts(now),
            encode_opt_ts(snapshot.due_date),
            snapshot.quest_type.to_string(),
        ],
    )?;
    Ok(Quest {
        id: conn.last_insert_rowid(),
        home_id: snapshot.home_id,
        user_id: snapshot.user_id,
        quest_template_id: snapshot.quest_template_id,
        title: snapshot.title.clone(),
        display_name: snapshot.display_name.clone(),
        description: snapshot.description.clone(),
        tags: snapshot.tags.clone(),
        xp_reward: snapshot.xp_reward,
        gold_reward: snapshot.gold_reward,
        completed: false,
        created_at: now,
        completed_at: None,
        due_date: snapshot.due_date,
        quest_type: snapshot.quest_type,
        corrupted_at: None,
    })
}

pub fn get_quest(conn: &Connection, id: QuestId) -> rusqlite::Result<Option<Quest>> {
    conn.query_row(
        &format!("SELECT {QUEST_COLUMNS} FROM quest WHERE id = ?1"),
        params![id],
        map_quest,
    )
    .optional()
}

/// Incomplete quests in a home, optionally only those owned by `user_id`.
pub fn list_active(
    conn: &Connection,
    home_id: HomeId,
    user_id: Option<UserId>,
) -> rusqlite::Result<Vec<Quest>> {
    match user_id {
        Some(user_id) => query_quests(
            conn,
            &format!(
                "SELECT {QUEST_COLUMNS} FROM quest
                 WHERE home_id = ?1 AND user_id = ?2 AND completed = 0
                 ORDER BY created_at, id"
            ),
            params![home_id, user_id],
        ),
        None => query_quests(
            conn,
            &format!(
                "SELECT {QUEST_COLUMNS} FROM quest
                 WHERE home_id = ?1 AND completed = 0
                 ORDER BY created_at, id"
            ),
            params![home_id],
        ),
    }
}

/// Every quest in a home, newest first.
pub fn list_for_home(conn: &Connection, home_id: HomeId) -> rusqlite::Result<Vec<Quest>> {
    query_quests(
        conn,
        &format!(
            "SELECT {QUEST_COLUMNS} FROM quest WHERE home_id = ?1
             ORDER BY created_at DESC, id DESC"
        ),
        params![home_id],
    )
}

/// Record completion with the earned rewards.
///
/// The update only matches an incomplete quest, so `false` means the quest
/// is missing or someone else completed it first.
pub fn mark_completed(
    conn: &Connection,
    id: QuestId,
    final_xp: i64,
    final_gold: i64,
    completed_at: DateTime<Utc>,
) -> rusqlite::Result<bool> {
    let changed = conn.execute(
        "UPDATE quest SET completed = 1, xp_reward = ?2, gold_reward = ?3, completed_at = ?4
         WHERE id = ?1 AND completed = 0",
        params![id, final_xp, final_gold, encode_ts(completed_at)],
    )?;
    Ok(changed == 1)
}

pub fn has_incomplete_for_template(
    conn: &Connection,
    user_id: UserId,
    template_id: TemplateId,
) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM quest
             WHERE user_id = ?1 AND quest_template_id = ?2 AND completed = 0)",
        params![user_id, template_id],
        |row| row.get(0),
    )
}

/// Number of incomplete quests in a home whose due date has passed.
pub fn count_overdue(
    conn: &Connection,
    home_id: HomeId,
    now: DateTime<Utc>,
) -> rusqlite::Result<u32> {
    conn.query_row(
        "SELECT COUNT(*) FROM quest
         WHERE home_id = ?1 AND completed = 0 AND due_date IS NOT NULL AND due_date < ?2",
        params![home_id, encode_ts(now)],
        |row| row.get(0),
    )
}

/// A user's incomplete quests created at or before `cutoff`, oldest first
/// (ties by lowest id).
pub fn eligible_for_bounty(
    conn: &Connection,
    home_id: HomeId,
    user_id: UserId,
    cutoff: DateTime<Utc>,
) -> rusqlite::Result<Vec<Quest>> {
    query_quests(
        conn,
        &format!(
            "SELECT {QUEST_COLUMNS} FROM quest
             WHERE home_id = ?1 AND user_id = ?2 AND completed = 0 AND created_at <= ?3
             ORDER BY created_at, id"
        ),
        params![home_id, user_id, encode_ts(cutoff)],
    )
}

/// Flip overdue, incomplete quests to `corrupted`. Returns how many changed.
pub fn corrupt_overdue(
    conn: &Connection,
    home_id: HomeId,
    now: DateTime<Utc>,
) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE quest SET quest_type = ?3, corrupted_at = ?2
         WHERE home_id = ?1 AND completed = 0 AND corrupted_at IS NULL
           AND due_date IS NOT NULL AND due_date < ?2",
        params![home_id, encode_ts(now), QuestType::Corrupted.to_string()],
    )
}
