// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Daily bounty resolution.
//!
//! Each user gets at most one bounty decision per home-local day. The first
//! caller of the day computes a decision and tries to insert it; if another
//! caller got there first the local decision is dropped and the stored one
//! is returned. Once stored, a decision never changes.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use hearth_config::BountySelection;
use hearth_core::{
    BountyStatus, DailyBounty, HearthError, HomeId, Quest, QuestId, UserId, local_date,
};
use hearth_storage::BountyInsert;
use hearth_storage::queries::{bounties, quests};
use rand::seq::SliceRandom;
use rusqlite::Connection;
use serde::Serialize;
use tracing::{debug, info};

use crate::rewards::BOUNTY_MULTIPLIER;
use crate::txn::{Access, TxError};
use crate::{QuestEngine, home_timezone, require_home, require_user};

/// Today's decision together with the quest it points at.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BountyView {
    pub bounty_date: NaiveDate,
    pub status: BountyStatus,
    /// 2 when a quest is assigned, 1 otherwise.
    pub bonus_multiplier: i64,
    pub quest: Option<Quest>,
}

/// Choose the bounty from the eligible pool.
///
/// `pool` must be ordered oldest first. Yesterday's quest is excluded only
/// when there is something else to pick.
pub fn pick(
    pool: &[Quest],
    yesterday: Option<QuestId>,
    selection: BountySelection,
) -> Option<QuestId> {
    let candidates: Vec<&Quest> = if pool.len() > 1 {
        pool.iter().filter(|q| Some(q.id) != yesterday).collect()
    } else {
        pool.iter().collect()
    };
    match selection {
        BountySelection::Oldest => candidates.first().map(|q| q.id),
        BountySelection::Random => candidates
            .choose(&mut rand::thread_rng())
            .map(|q| q.id),
    }
}

/// Return the stored decision for `today`, creating it if absent.
pub(crate) fn resolve_on(
    conn: &Connection,
    home_id: HomeId,
    user_id: UserId,
    today: NaiveDate,
    now: DateTime<Utc>,
    min_age: Duration,
    selection: BountySelection,
) -> Result<DailyBounty, TxError> {
    if let Some(existing) = bounties::get_bounty(conn, home_id, user_id, today)? {
        return Ok(existing);
    }

    let yesterday = match today.pred_opt() {
        Some(day) => bounties::get_bounty(conn, home_id, user_id, day)?
            .filter(|b| b.status == BountyStatus::Assigned)
            .and_then(|b| b.quest_id),
        None => None,
    };
    let cutoff = now.checked_sub_signed(min_age).ok_or_else(|| {
        HearthError::Config(format!(
            "bounty minimum age of {}h reaches before the earliest representable time",
            min_age.num_hours()
        ))
    })?;
    let pool = quests::eligible_for_bounty(conn, home_id, user_id, cutoff)?;
    let choice = pick(&pool, yesterday, selection);

    match bounties::insert_bounty(conn, home_id, user_id, today, choice, now)? {
        BountyInsert::Inserted(row) => {
            info!(
                home_id,
                user_id,
                date = %today,
                quest_id = ?row.quest_id,
                pool = pool.len(),
                "daily bounty resolved"
            );
            Ok(row)
        }
        BountyInsert::Conflict => {
            debug!(home_id, user_id, date = %today, "bounty already decided, re-reading");
            bounties::get_bounty(conn, home_id, user_id, today)?.ok_or_else(|| {
                HearthError::Internal(format!(
                    "bounty for user {user_id} on {today} vanished after conflict"
                ))
                .into()
            })
        }
    }
}

impl QuestEngine {
    /// The user's bounty decision for the current home-local day.
    pub async fn resolve_today(
        &self,
        home_id: HomeId,
        user_id: UserId,
    ) -> Result<DailyBounty, HearthError> {
        self.resolve_at(home_id, user_id, self.now()).await
    }

    /// The user's bounty decision for the home-local day containing `now`.
    pub(crate) async fn resolve_at(
        &self,
        home_id: HomeId,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<DailyBounty, HearthError> {
        let default_tz = self.settings.default_timezone;
        let min_age = self.settings.bounty_min_age;
        let selection = self.settings.bounty_selection;
        self.run("resolve_bounty", Access::Autocommit, move |conn| {
            let home = require_home(conn, home_id)?;
            let today = local_date(now, home_timezone(&home, default_tz));
            resolve_on(conn, home_id, user_id, today, now, min_age, selection)
        })
        .await
    }

    /// Resolve today's bounty and load the assigned quest.
    pub async fn today_bounty(
        &self,
        home_id: HomeId,
        user_id: UserId,
    ) -> Result<BountyView, HearthError> {
        let bounty = self.resolve_today(home_id, user_id).await?;
        let quest = match bounty.quest_id {
            Some(quest_id) => {
                self.db
                    .call(move |conn| quests::get_quest(conn, quest_id))
                    .await?
            }
            None => None,
        };
        Ok(BountyView {
            bounty_date: bounty.bounty_date,
            status: bounty.status,
            bonus_multiplier: bonus_multiplier(&bounty),
            quest,
        })
    }

    /// Whether `quest_id` is its owner's bounty today, as seen by `actor`.
    ///
    /// The quest must be in the actor's home. Completion pays the owner, so
    /// the owner's decision is the one consulted. Never creates a decision.
    pub async fn is_bounty(&self, actor: UserId, quest_id: QuestId) -> Result<bool, HearthError> {
        let now = self.now();
        let default_tz = self.settings.default_timezone;
        self.run("check_bounty", Access::Autocommit, move |conn| {
            let viewer = require_user(conn, actor)?;
            let quest = quests::get_quest(conn, quest_id)?
                .filter(|q| q.home_id == viewer.home_id)
                .ok_or_else(|| HearthError::not_found("quest", quest_id))?;
            let home = require_home(conn, quest.home_id)?;
            let today = local_date(now, home_timezone(&home, default_tz));
            Ok(bounties::get_bounty(conn, quest.home_id, quest.user_id, today)?
                .is_some_and(|b| b.covers(quest.id)))
        })
        .await
    }
}

pub fn bonus_multiplier(bounty: &DailyBounty) -> i64 {
    match bounty.status {
        BountyStatus::Assigned => BOUNTY_MULTIPLIER,
        BountyStatus::NoneEligible => 1,
    }
}
