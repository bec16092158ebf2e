// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Quest completion.
//!
//! The bounty decision is settled first (it is day-locked on its own).
//! Corruption evaluation, reward composition, the quest update, and the
//! owner's credit then happen in one `BEGIN IMMEDIATE` transaction: either
//! the quest is completed and paid, or nothing changes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use hearth_core::{HearthError, Quest, QuestId, QuestType, UserId};
use hearth_storage::queries::{quests, users};
use serde::Serialize;
use tracing::info;

use crate::corruption::{self, CorruptionCurve};
use crate::rewards::{self, RewardModifiers};
use crate::txn::{Access, TxError};
use crate::{QuestEngine, require_user};

/// How a completion's payout was reached.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[deny(missing_docs)]
pub struct RewardBreakdown {
    /// XP credited to the owner.
    pub xp: i64,
    /// Gold credited to the owner.
    pub gold: i64,
    /// The quest's listed XP before any multiplier.
    pub base_xp: i64,
    /// The quest's listed gold before any multiplier.
    pub base_gold: i64,
    /// The quest was the owner's bounty for the completion day.
    pub is_daily_bounty: bool,
    /// The quest was overdue or already marked corrupted.
    pub is_corrupted: bool,
    /// Multiplier applied for household corruption, `1.0` for none.
    pub corruption_debuff: f64,
    /// Overdue quests in the home when the debuff was measured.
    pub overdue_quests: u32,
    /// The owner's shield suppressed the debuff.
    pub shielded: bool,
    /// `2` for a bounty, otherwise `1`.
    pub bounty_multiplier: i64,
    /// An elixir use doubled the XP.
    pub xp_boost_active: bool,
    /// Elixir uses left after this completion.
    pub xp_boost_remaining: i64,
    /// Owner's level after the credit.
    pub level: u32,
}

/// The completed quest and what its owner was paid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[deny(missing_docs)]
pub struct CompletionResult {
    /// The quest as stored after completion.
    pub quest: Quest,
    /// The payout and each factor that shaped it.
    pub rewards: RewardBreakdown,
}

fn already_completed(quest: &Quest) -> TxError {
    HearthError::AlreadyCompleted {
        quest_id: quest.id,
        completed_at: quest.completed_at,
    }
    .into()
}

fn complete_in_tx(
    conn: &rusqlite::Connection,
    curve: &dyn CorruptionCurve,
    quest_id: QuestId,
    is_bounty: bool,
    now: DateTime<Utc>,
) -> Result<CompletionResult, TxError> {
    let quest = quests::get_quest(conn, quest_id)?
        .ok_or_else(|| HearthError::not_found("quest", quest_id))?;
    if quest.completed {
        return Err(already_completed(&quest));
    }
    let owner = require_user(conn, quest.user_id)?;

    let reading = corruption::evaluate(conn, curve, quest.home_id, &owner, now)?;
    let modifiers = RewardModifiers {
        is_bounty,
        corruption: reading.multiplier,
        xp_boost_active: owner.xp_boost_active(),
    };
    let outcome = rewards::compose(quest.xp_reward, quest.gold_reward, &modifiers);

    if !quests::mark_completed(conn, quest.id, outcome.xp, outcome.gold, now)? {
        return Err(already_completed(&quest));
    }
    if !users::credit_rewards(
        conn,
        owner.id,
        outcome.xp,
        outcome.gold,
        modifiers.xp_boost_active,
    )? {
        return Err(HearthError::not_found("user", owner.id).into());
    }

    let owner = require_user(conn, owner.id)?;
    let completed = quests::get_quest(conn, quest.id)?.ok_or_else(|| {
        HearthError::Internal(format!("quest {} vanished during completion", quest.id))
    })?;

    Ok(CompletionResult {
        rewards: RewardBreakdown {
            xp: outcome.xp,
            gold: outcome.gold,
            base_xp: quest.xp_reward,
            base_gold: quest.gold_reward,
            is_daily_bounty: is_bounty,
            is_corrupted: quest.quest_type == QuestType::Corrupted || quest.is_overdue(now),
            corruption_debuff: reading.multiplier.as_f64(),
            overdue_quests: reading.overdue_count,
            shielded: reading.shielded,
            bounty_multiplier: modifiers.bounty_multiplier(),
            xp_boost_active: modifiers.xp_boost_active,
            xp_boost_remaining: owner.active_xp_boost_count,
            level: owner.level(),
        },
        quest: completed,
    })
}

impl QuestEngine {
    /// Complete `quest_id` on behalf of `actor` and pay its owner.
    ///
    /// The actor must belong to the quest's home. A quest that is already
    /// completed (including by a concurrent caller) yields
    /// [`HearthError::AlreadyCompleted`] and pays nothing.
    pub async fn complete_quest(
        &self,
        quest_id: QuestId,
        actor: UserId,
    ) -> Result<CompletionResult, HearthError> {
        let quest = self
            .run("load_quest_for_completion", Access::Autocommit, move |conn| {
                let actor = require_user(conn, actor)?;
                let quest = quests::get_quest(conn, quest_id)?
                    .filter(|q| q.home_id == actor.home_id)
                    .ok_or_else(|| HearthError::not_found("quest", quest_id))?;
                if quest.completed {
                    return Err(already_completed(&quest));
                }
                Ok(quest)
            })
            .await?;

        // The bounty day and `completed_at` come from the same instant.
        let now = self.now();
        let bounty = self.resolve_at(quest.home_id, quest.user_id, now).await?;
        let is_bounty = bounty.covers(quest.id);

        let curve: Arc<dyn CorruptionCurve> = Arc::clone(&self.curve);
        let result = self
            .run("complete_quest", Access::Immediate, move |conn| {
                complete_in_tx(conn, curve.as_ref(), quest_id, is_bounty, now)
            })
            .await?;

        info!(
            quest_id,
            actor,
            owner = result.quest.user_id,
            xp = result.rewards.xp,
            gold = result.rewards.gold,
            bounty = result.rewards.is_daily_bounty,
            debuff = result.rewards.corruption_debuff,
            boost = result.rewards.xp_boost_active,
            "quest completed"
        );
        Ok(result)
    }
}
