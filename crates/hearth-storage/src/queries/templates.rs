// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Quest template CRUD.

use chrono::{DateTime, Utc};
use hearth_core::{HomeId, NewTemplate, QuestTemplate, TemplateId, TemplatePatch, UserId};
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::sqltime::{encode_ts, get_enum, get_ts};

const TEMPLATE_COLUMNS: &str = "id, home_id, title, display_name, description, tags,
     base_xp_reward, base_gold_reward, quest_type, visibility, created_by, created_at, updated_at";

fn map_template(row: &Row<'_>) -> rusqlite::Result<QuestTemplate> {
    Ok(QuestTemplate {
        id: row.get(0)?,
        home_id: row.get(1)?,
        title: row.get(2)?,
        display_name: row.get(3)?,
        description: row.get(4)?,
        tags: row.get(5)?,
        base_xp_reward: row.get(6)?,
        base_gold_reward: row.get(7)?,
        quest_type: get_enum(row, 8)?,
        visibility: get_enum(row, 9)?,
        created_by: row.get(10)?,
        created_at: get_ts(row, 11)?,
        updated_at: get_ts(row, 12)?,
    })
}

pub fn insert_template(
    conn: &Connection,
    home_id: HomeId,
    created_by: UserId,
    new: &NewTemplate,
    now: DateTime<Utc>,
) -> rusqlite::Result<QuestTemplate> {
    let ts = encode_ts(now);
    conn.execute(
        "INSERT INTO quest_template (home_id, title, display_name, description, tags,
             base_xp_reward, base_gold_reward, quest_type, visibility, created_by,
             created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
        params![
            home_id,
            new.title,
            new.display_name,
            new.description,
            new.tags,
            new.base_xp_reward,
            new.base_gold_reward,
            new.quest_type.to_string(),
            new.visibility.to_string(),
            created_by,
            ts,
        ],
    )?;
    Ok(QuestTemplate {
        id: conn.last_insert_rowid(),
        home_id,
        title: new.title.clone(),
        display_name: new.display_name.clone(),
        description: new.description.clone(),
        tags: new.tags.clone(),
        base_xp_reward: new.base_xp_reward,
        base_gold_reward: new.base_gold_reward,
        quest_type: new.quest_type,
        visibility: new.visibility,
        created_by,
        created_at: now,
        updated_at: now,
    })
}

pub fn get_template(conn: &Connection, id: TemplateId) -> rusqlite::Result<Option<QuestTemplate>> {
    conn.query_row(
        &format!("SELECT {TEMPLATE_COLUMNS} FROM quest_template WHERE id = ?1"),
        params![id],
        map_template,
    )
    .optional()
}

pub fn list_for_home(conn: &Connection, home_id: HomeId) -> rusqlite::Result<Vec<QuestTemplate>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TEMPLATE_COLUMNS} FROM quest_template WHERE home_id = ?1 ORDER BY id"
    ))?;
    let rows = stmt.query_map(params![home_id], map_template)?;
    rows.collect()
}

/// Apply a partial edit. Fields left `None` in the patch keep their value.
///
/// Only the template row changes; quests already created from it keep
/// their own copies.
pub fn update_template(
    conn: &Connection,
    id: TemplateId,
    patch: &TemplatePatch,
    now: DateTime<Utc>,
) -> rusqlite::Result<Option<QuestTemplate>> {
    let changed = conn.execute(
        "UPDATE quest_template SET
            title = COALESCE(?2, title),
            display_name = COALESCE(?3, display_name),
            description = COALESCE(?4, description),
            tags = COALESCE(?5, tags),
            base_xp_reward = COALESCE(?6, base_xp_reward),
            base_gold_reward = COALESCE(?7, base_gold_reward),
            quest_type = COALESCE(?8, quest_type),
            visibility = COALESCE(?9, visibility),
            updated_at = ?10
         WHERE id = ?1",
        params![
            id,
            patch.title,
            patch.display_name,
            patch.description,
            patch.tags,
            patch.base_xp_reward,
            patch.base_gold_reward,
            patch.quest_type.map(|t| t.to_string()),
            patch.visibility.map(|v| v.to_string()),
            encode_ts(now),
        ],
    )?;
    if changed == 0 {
        return Ok(None);
    }
    get_template(conn, id)
}

/// Delete a template. Its quests keep their snapshots with the template
/// reference cleared; its subscriptions are removed.
pub fn delete_template(conn: &Connection, id: TemplateId) -> rusqlite::Result<bool> {
    let changed = conn.execute("DELETE FROM quest_template WHERE id = ?1", params![id])?;
    Ok(changed == 1)
}
