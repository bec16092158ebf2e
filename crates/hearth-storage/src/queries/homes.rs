// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Household records.

use chrono::{DateTime, Utc};
use hearth_core::{Home, HomeId};
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::sqltime::{encode_ts, get_ts};

fn map_home(row: &Row<'_>) -> rusqlite::Result<Home> {
    Ok(Home {
        id: row.get(0)?,
        name: row.get(1)?,
        timezone: row.get(2)?,
        created_at: get_ts(row, 3)?,
    })
}

pub fn insert_home(
    conn: &Connection,
    name: &str,
    timezone: &str,
    now: DateTime<Utc>,
) -> rusqlite::Result<Home> {
    conn.execute(
        "INSERT INTO home (name, timezone, created_at) VALUES (?1, ?2, ?3)",
        params![name, timezone, encode_ts(now)],
    )?;
    Ok(Home {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        timezone: timezone.to_string(),
        created_at: now,
    })
}

pub fn get_home(conn: &Connection, id: HomeId) -> rusqlite::Result<Option<Home>> {
    conn.query_row(
        "SELECT id, name, timezone, created_at FROM home WHERE id = ?1",
        params![id],
        map_home,
    )
    .optional()
}
