// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User template subscriptions.

use chrono::{DateTime, Utc};
use hearth_core::{
    HomeId, NewSubscription, Schedule, Subscription, SubscriptionId, TemplateId, UserId,
};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::sqltime::{encode_opt_ts, encode_ts, get_enum, get_opt_ts, get_ts};

const SUBSCRIPTION_COLUMNS: &str = "s.id, s.user_id, s.quest_template_id, s.recurrence,
     s.schedule, s.due_in_hours, s.last_generated_at, s.is_active, s.created_at";

fn map_subscription(row: &Row<'_>) -> rusqlite::Result<Subscription> {
    let schedule: Option<String> = row.get(4)?;
    let schedule = schedule
        .map(|raw| {
            Schedule::from_json(&raw)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))
        })
        .transpose()?;
    Ok(Subscription {
        id: row.get(0)?,
        user_id: row.get(1)?,
        quest_template_id: row.get(2)?,
        recurrence: get_enum(row, 3)?,
        schedule,
        due_in_hours: row.get(5)?,
        last_generated_at: get_opt_ts(row, 6)?,
        is_active: row.get(7)?,
        created_at: get_ts(row, 8)?,
    })
}

fn query_subscriptions(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> rusqlite::Result<Vec<Subscription>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, map_subscription)?;
    rows.collect()
}

/// Insert a subscription. A second subscription for the same
/// `(user, template)` fails with a constraint violation.
pub fn insert_subscription(
    conn: &Connection,
    user_id: UserId,
    new: &NewSubscription,
    now: DateTime<Utc>,
) -> rusqlite::Result<Subscription> {
    conn.execute(
        "INSERT INTO user_template_subscription
             (user_id, quest_template_id, recurrence, schedule, due_in_hours, is_active, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6)",
        params![
            user_id,
            new.quest_template_id,
            new.recurrence.to_string(),
            new.schedule.as_ref().map(Schedule::to_json),
            new.due_in_hours,
            encode_ts(now),
        ],
    )?;
    Ok(Subscription {
        id: conn.last_insert_rowid(),
        user_id,
        quest_template_id: new.quest_template_id,
        recurrence: new.recurrence,
        schedule: new.schedule,
        due_in_hours: new.due_in_hours,
        last_generated_at: None,
        is_active: true,
        created_at: now,
    })
}

pub fn get_subscription(
    conn: &Connection,
    id: SubscriptionId,
) -> rusqlite::Result<Option<Subscription>> {
    conn.query_row(
        &format!("SELECT {SUBSCRIPTION_COLUMNS} FROM user_template_subscription s WHERE s.id = ?1"),
        params![id],
        map_subscription,
    )
    .optional()
}

pub fn find_for_user_template(
    conn: &Connection,
    user_id: UserId,
    template_id: TemplateId,
) -> rusqlite::Result<Option<Subscription>> {
    conn.query_row(
        &format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM user_template_subscription s
             WHERE s.user_id = ?1 AND s.quest_template_id = ?2"
        ),
        params![user_id, template_id],
        map_subscription,
    )
    .optional()
}

pub fn list_for_user(conn: &Connection, user_id: UserId) -> rusqlite::Result<Vec<Subscription>> {
    query_subscriptions(
        conn,
        &format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM user_template_subscription s
             WHERE s.user_id = ?1 ORDER BY s.id"
        ),
        params![user_id],
    )
}

/// Active recurring subscriptions of every user in a home. Whether each
/// one is actually due is decided by the caller from its schedule.
pub fn generation_candidates(
    conn: &Connection,
    home_id: HomeId,
) -> rusqlite::Result<Vec<Subscription>> {
    query_subscriptions(
        conn,
        &format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM user_template_subscription s
             JOIN user u ON u.id = s.user_id
             WHERE u.home_id = ?1 AND s.is_active = 1 AND s.recurrence != 'one_off'
             ORDER BY s.id"
        ),
        params![home_id],
    )
}

pub fn mark_generated(
    conn: &Connection,
    id: SubscriptionId,
    at: DateTime<Utc>,
) -> rusqlite::Result<bool> {
    let changed = conn.execute(
        "UPDATE user_template_subscription SET last_generated_at = ?2 WHERE id = ?1",
        params![id, encode_opt_ts(Some(at))],
    )?;
    Ok(changed == 1)
}

pub fn set_active(conn: &Connection, id: SubscriptionId, active: bool) -> rusqlite::Result<bool> {
    let changed = conn.execute(
        "UPDATE user_template_subscription SET is_active = ?2 WHERE id = ?1",
        params![id, active],
    )?;
    Ok(changed == 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::is_constraint_violation;
    use crate::test_support::{memory_conn, seed_home, seed_template, t0};
    use hearth_core::{Recurrence, ScheduleTime};

    fn daily(template_id: TemplateId) -> NewSubscription {
        NewSubscription {
            quest_template_id: template_id,
            recurrence: Recurrence::Daily,
            schedule: Some(Schedule::Daily {
                time: ScheduleTime::new(8, 0).unwrap(),
            }),
            due_in_hours: Some(24),
        }
    }

    #[test]
    fn schedule_is_stored_as_json_and_read_back() {
        let conn = memory_conn();
        let (home, user) = seed_home(&conn);
        let template = seed_template(&conn, &home, &user);
        let sub = insert_subscription(&conn, user.id, &daily(template.id), t0()).unwrap();

        let raw: String = conn
            .query_row(
                "SELECT schedule FROM user_template_subscription WHERE id = ?1",
                params![sub.id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(raw, r#"{"type":"daily","time":"08:00"}"#);
        assert_eq!(get_subscription(&conn, sub.id).unwrap().unwrap(), sub);
    }

    #[test]
    fn duplicate_subscription_violates_constraint() {
        let conn = memory_conn();
        let (home, user) = seed_home(&conn);
        let template = seed_template(&conn, &home, &user);
        insert_subscription(&conn, user.id, &daily(template.id), t0()).unwrap();
        let err = insert_subscription(&conn, user.id, &daily(template.id), t0()).unwrap_err();
        assert!(is_constraint_violation(&err));
    }

    #[test]
    fn candidates_skip_one_off_and_inactive() {
        let conn = memory_conn();
        let (home, user) = seed_home(&conn);
        let a = seed_template(&conn, &home, &user);
        let b = seed_template(&conn, &home, &user);
        let c = seed_template(&conn, &home, &user);
        let recurring = insert_subscription(&conn, user.id, &daily(a.id), t0()).unwrap();
        let paused = insert_subscription(&conn, user.id, &daily(b.id), t0()).unwrap();
        insert_subscription(
            &conn,
            user.id,
            &NewSubscription {
                quest_template_id: c.id,
                recurrence: Recurrence::OneOff,
                schedule: None,
                due_in_hours: None,
            },
            t0(),
        )
        .unwrap();
        assert!(set_active(&conn, paused.id, false).unwrap());

        let ids: Vec<_> = generation_candidates(&conn, home.id)
            .unwrap()
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![recurring.id]);
        assert_eq!(list_for_user(&conn, user.id).unwrap().len(), 3);

        assert!(mark_generated(&conn, recurring.id, t0()).unwrap());
        let found = find_for_user_template(&conn, user.id, a.id).unwrap().unwrap();
        assert_eq!(found.last_generated_at, Some(t0()));
    }
}
