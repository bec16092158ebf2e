// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Quest generation from subscriptions.
//!
//! Generation is lazy: it runs when a board is loaded or a subscription is
//! created, never on a timer. Each due subscription is handled in its own
//! transaction that re-checks the subscription before writing, so two
//! concurrent board loads cannot both generate the same slot.

use chrono::{DateTime, Duration, Utc};
use hearth_core::{
    HearthError, HomeId, Quest, QuestSnapshot, QuestType, StandaloneQuest, Subscription,
    TemplateId, UserId,
};
use hearth_storage::queries::{quests, subscriptions, templates};
use rusqlite::Connection;
use tracing::{debug, info, warn};

use crate::txn::{Access, TxError};
use crate::{QuestEngine, home_timezone, require_home, require_user, schedule};

/// What happened to one due subscription.
#[derive(Debug)]
enum Generated {
    Created(Quest),
    /// The user still has an open quest from this template.
    Skipped,
    /// The subscription or its template disappeared, or it is no longer due.
    Gone,
}

/// `now` plus the due window, refusing windows chrono cannot represent.
fn due_date(
    now: DateTime<Utc>,
    due_in_hours: Option<i64>,
) -> Result<Option<DateTime<Utc>>, HearthError> {
    due_in_hours
        .map(|hours| {
            Duration::try_hours(hours)
                .and_then(|window| now.checked_add_signed(window))
                .ok_or_else(|| {
                    HearthError::Validation(format!("due_in_hours {hours} is out of range"))
                })
        })
        .transpose()
}

fn generate_one(
    conn: &Connection,
    subscription_id: i64,
    now: DateTime<Utc>,
    tz: chrono_tz::Tz,
) -> Result<Generated, TxError> {
    let Some(sub) = subscriptions::get_subscription(conn, subscription_id)? else {
        return Ok(Generated::Gone);
    };
    if !schedule::is_due(&sub, now, tz) {
        return Ok(Generated::Gone);
    }
    let Some(template) = templates::get_template(conn, sub.quest_template_id)? else {
        warn!(
            subscription_id,
            template_id = sub.quest_template_id,
            "subscription template missing, skipping"
        );
        return Ok(Generated::Gone);
    };
    if quests::has_incomplete_for_template(conn, sub.user_id, template.id)? {
        return Ok(Generated::Skipped);
    }

    let due = due_date(now, sub.due_in_hours)?;
    let snapshot = QuestSnapshot::from_template(&template, sub.user_id, due);
    let quest = quests::insert_quest(conn, &snapshot, now)?;
    subscriptions::mark_generated(conn, sub.id, now)?;
    Ok(Generated::Created(quest))
}

impl QuestEngine {
    /// Create quests for every due subscription in the home.
    pub async fn generate_due(&self, home_id: HomeId) -> Result<Vec<Quest>, HearthError> {
        let now = self.now();
        let default_tz = self.settings.default_timezone;

        let (tz, due): (chrono_tz::Tz, Vec<Subscription>) = self
            .run("list_due_subscriptions", Access::Autocommit, move |conn| {
                let home = require_home(conn, home_id)?;
                let tz = home_timezone(&home, default_tz);
                let due = subscriptions::generation_candidates(conn, home_id)?
                    .into_iter()
                    .filter(|s| schedule::is_due(s, now, tz))
                    .collect();
                Ok((tz, due))
            })
            .await?;

        let mut created = Vec::new();
        for sub in due {
            let subscription_id = sub.id;
            let outcome = self
                .run("generate_quest", Access::Immediate, move |conn| {
                    generate_one(conn, subscription_id, now, tz)
                })
                .await?;
            match outcome {
                Generated::Created(quest) => {
                    info!(
                        home_id,
                        subscription_id,
                        quest_id = quest.id,
                        user_id = quest.user_id,
                        "quest generated"
                    );
                    created.push(quest);
                }
                Generated::Skipped => {
                    debug!(subscription_id, "open quest exists, generation skipped");
                }
                Generated::Gone => {}
            }
        }
        Ok(created)
    }

    /// Create a quest from a template right now for `actor`.
    ///
    /// Ignores any open quest from the same template. If the actor has a
    /// subscription to it, that subscription's due window applies and its
    /// `last_generated_at` advances.
    pub async fn generate_now(
        &self,
        actor: UserId,
        template_id: TemplateId,
    ) -> Result<Quest, HearthError> {
        let now = self.now();
        let quest = self
            .run("generate_now", Access::Immediate, move |conn| {
                let user = require_user(conn, actor)?;
                let template = templates::get_template(conn, template_id)?
                    .filter(|t| t.home_id == user.home_id)
                    .ok_or_else(|| HearthError::not_found("template", template_id))?;
                let sub = subscriptions::find_for_user_template(conn, user.id, template.id)?;
                let due = due_date(now, sub.as_ref().and_then(|s| s.due_in_hours))?;
                let quest = quests::insert_quest(
                    conn,
                    &QuestSnapshot::from_template(&template, user.id, due),
                    now,
                )?;
                if let Some(sub) = sub {
                    subscriptions::mark_generated(conn, sub.id, now)?;
                }
                Ok(quest)
            })
            .await?;
        info!(quest_id = quest.id, template_id, user_id = actor, "quest generated on demand");
        Ok(quest)
    }

    /// Create a quest with no template for `actor`.
    pub async fn create_standalone(
        &self,
        actor: UserId,
        fields: StandaloneQuest,
    ) -> Result<Quest, HearthError> {
        let title = fields.title.trim().to_string();
        if title.is_empty() {
            return Err(HearthError::Validation("title must not be empty".to_string()));
        }
        self.check_reward("xp_reward", fields.xp_reward)?;
        self.check_reward("gold_reward", fields.gold_reward)?;
        if let Some(hours) = fields.due_in_hours {
            self.check_due_in_hours(hours)?;
        }

        let now = self.now();
        let quest = self
            .run("create_standalone", Access::Autocommit, move |conn| {
                let user = require_user(conn, actor)?;
                let snapshot = QuestSnapshot {
                    home_id: user.home_id,
                    user_id: user.id,
                    quest_template_id: None,
                    title: title.clone(),
                    display_name: fields.display_name.clone(),
                    description: fields.description.clone(),
                    tags: fields.tags.clone(),
                    xp_reward: fields.xp_reward,
                    gold_reward: fields.gold_reward,
                    quest_type: QuestType::Standard,
                    due_date: due_date(now, fields.due_in_hours)?,
                };
                Ok(quests::insert_quest(conn, &snapshot, now)?)
            })
            .await?;
        info!(quest_id = quest.id, user_id = actor, "standalone quest created");
        Ok(quest)
    }

    pub(crate) fn check_reward(&self, field: &str, value: i64) -> Result<(), HearthError> {
        let max = self.settings.max_base_reward;
        if !(0..=max).contains(&value) {
            return Err(HearthError::Validation(format!(
                "{field} must be between 0 and {max}, got {value}"
            )));
        }
        Ok(())
    }

    pub(crate) fn check_due_in_hours(&self, hours: i64) -> Result<(), HearthError> {
        let max = self.settings.max_due_in_hours;
        if !(1..=max).contains(&hours) {
            return Err(HearthError::Validation(format!(
                "due_in_hours must be between 1 and {max}, got {hours}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn due_date_adds_window() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(due_date(now, None).unwrap(), None);
        assert_eq!(
            due_date(now, Some(36)).unwrap(),
            Some(Utc.with_ymd_and_hms(2026, 3, 3, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn unrepresentable_due_date_is_an_error() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        for hours in [i64::MAX, 1_000_000_000_000] {
            assert!(matches!(
                due_date(now, Some(hours)),
                Err(HearthError::Validation(_))
            ));
        }
    }
}
