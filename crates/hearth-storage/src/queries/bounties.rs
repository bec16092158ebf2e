// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Daily bounty decisions.
//!
//! The table is insert-only. The `(home_id, user_id, bounty_date)` UNIQUE
//! constraint is the day lock: the first insert wins and every later one is
//! reported as [`BountyInsert::Conflict`].

use chrono::{DateTime, NaiveDate, Utc};
use hearth_core::{BountyStatus, DailyBounty, HomeId, QuestId, UserId};
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::sqltime::{encode_date, encode_ts, get_date, get_enum, get_ts};

/// Outcome of trying to record a bounty decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BountyInsert {
    Inserted(DailyBounty),
    /// Another caller already decided this day.
    Conflict,
}

fn map_bounty(row: &Row<'_>) -> rusqlite::Result<DailyBounty> {
    Ok(DailyBounty {
        id: row.get(0)?,
        home_id: row.get(1)?,
        user_id: row.get(2)?,
        bounty_date: get_date(row, 3)?,
        quest_id: row.get(4)?,
        status: get_enum(row, 5)?,
        created_at: get_ts(row, 6)?,
    })
}

pub fn get_bounty(
    conn: &Connection,
    home_id: HomeId,
    user_id: UserId,
    date: NaiveDate,
) -> rusqlite::Result<Option<DailyBounty>> {
    conn.query_row(
        "SELECT id, home_id, user_id, bounty_date, quest_id, status, created_at
         FROM daily_user_bounty
         WHERE home_id = ?1 AND user_id = ?2 AND bounty_date = ?3",
        params![home_id, user_id, encode_date(date)],
        map_bounty,
    )
    .optional()
}

/// Insert a decision unless one already exists for the day.
pub fn insert_bounty(
    conn: &Connection,
    home_id: HomeId,
    user_id: UserId,
    date: NaiveDate,
    quest_id: Option<QuestId>,
    now: DateTime<Utc>,
) -> rusqlite::Result<BountyInsert> {
    let status = match quest_id {
        Some(_) => BountyStatus::Assigned,
        None => BountyStatus::NoneEligible,
    };
    let changed = conn.execute(
        "INSERT INTO daily_user_bounty (home_id, user_id, bounty_date, quest_id, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT (home_id, user_id, bounty_date) DO NOTHING",
        params![
            home_id,
            user_id,
            encode_date(date),
            quest_id,
            status.to_string(),
            encode_ts(now),
        ],
    )?;
    if changed == 0 {
        return Ok(BountyInsert::Conflict);
    }
    Ok(BountyInsert::Inserted(DailyBounty {
        id: conn.last_insert_rowid(),
        home_id,
        user_id,
        bounty_date: date,
        quest_id,
        status,
        created_at: now,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::quests;
    use crate::test_support::{memory_conn, seed_home, standalone, t0};

    #[test]
    fn second_insert_for_same_day_conflicts() {
        let conn = memory_conn();
        let (home, user) = seed_home(&conn);
        let quest = quests::insert_quest(&conn, &standalone(&home, &user, "Mop"), t0()).unwrap();
        let day = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();

        let first = insert_bounty(&conn, home.id, user.id, day, Some(quest.id), t0()).unwrap();
        let BountyInsert::Inserted(row) = first else {
            panic!("first insert should win");
        };
        assert_eq!(row.status, BountyStatus::Assigned);

        let second = insert_bounty(&conn, home.id, user.id, day, None, t0()).unwrap();
        assert_eq!(second, BountyInsert::Conflict);

        let stored = get_bounty(&conn, home.id, user.id, day).unwrap().unwrap();
        assert_eq!(stored, row);
    }

    #[test]
    fn none_eligible_has_no_quest() {
        let conn = memory_conn();
        let (home, user) = seed_home(&conn);
        let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        insert_bounty(&conn, home.id, user.id, day, None, t0()).unwrap();
        let stored = get_bounty(&conn, home.id, user.id, day).unwrap().unwrap();
        assert_eq!(stored.status, BountyStatus::NoneEligible);
        assert_eq!(stored.quest_id, None);
        assert!(get_bounty(&conn, home.id, user.id, day.succ_opt().unwrap()).unwrap().is_none());
    }
}
