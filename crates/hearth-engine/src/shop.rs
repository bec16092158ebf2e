// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The household reward shop.
//!
//! Gold earned from quests is spent here. Two rewards have game effects:
//! the Heroic Elixir grants double-XP completions and the Purification
//! Shield suppresses the corruption debuff. Neither stacks, so a claim is
//! refused while the previous one is still in effect.

use chrono::Duration;
use hearth_core::{
    HearthError, NewReward, Reward, RewardClaim, RewardEffect, RewardId, User, UserId,
};
use hearth_storage::queries::{rewards, users};
use serde::Serialize;
use tracing::info;

use crate::catalog::non_empty;
use crate::txn::{Access, TxError};
use crate::{QuestEngine, require_user};

/// Double-XP completions granted by one Heroic Elixir.
pub const ELIXIR_USES: i64 = 3;

/// How long one Purification Shield lasts.
pub const SHIELD_HOURS: i64 = 24;

/// A successful claim and the claimant's balances afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClaimResult {
    /// The new ledger entry.
    pub claim: RewardClaim,
    pub reward: Reward,
    /// The claimant after the debit and the effect.
    pub user: User,
}

fn reward_in_home(
    conn: &rusqlite::Connection,
    actor: UserId,
    reward_id: RewardId,
) -> Result<(User, Reward), TxError> {
    let user = require_user(conn, actor)?;
    let reward = rewards::get_reward(conn, reward_id)?
        .filter(|r| r.home_id == user.home_id)
        .ok_or_else(|| HearthError::not_found("reward", reward_id))?;
    Ok((user, reward))
}

/// Refuse a consumable whose previous dose is still working.
fn ensure_not_active(
    user: &User,
    effect: RewardEffect,
    now: chrono::DateTime<chrono::Utc>,
) -> Result<(), HearthError> {
    match effect {
        RewardEffect::XpBoost if user.xp_boost_active() => Err(HearthError::ConsumableActive(
            format!(
                "Heroic Elixir is active ({} quests remaining)",
                user.active_xp_boost_count
            ),
        )),
        RewardEffect::Shield if user.shield_active(now) => {
            let hours_left = user
                .active_shield_expiry
                .map(|expiry| (expiry - now).num_hours())
                .unwrap_or_default();
            Err(HearthError::ConsumableActive(format!(
                "Purification Shield is active ({hours_left}h remaining)"
            )))
        }
        _ => Ok(()),
    }
}

impl QuestEngine {
    pub async fn create_reward(
        &self,
        actor: UserId,
        mut new: NewReward,
    ) -> Result<Reward, HearthError> {
        new.name = non_empty("name", &new.name)?;
        if new.cost < 0 {
            return Err(HearthError::Validation(format!(
                "cost must not be negative, got {}",
                new.cost
            )));
        }
        let now = self.now();
        let reward = self
            .run("create_reward", Access::Autocommit, move |conn| {
                let user = require_user(conn, actor)?;
                Ok(rewards::insert_reward(conn, user.home_id, &new, now)?)
            })
            .await?;
        info!(
            reward_id = reward.id,
            home_id = reward.home_id,
            effect = %reward.effect,
            "reward created"
        );
        Ok(reward)
    }

    pub async fn list_rewards(&self, actor: UserId) -> Result<Vec<Reward>, HearthError> {
        self.run("list_rewards", Access::Autocommit, move |conn| {
            let user = require_user(conn, actor)?;
            Ok(rewards::list_for_home(conn, user.home_id)?)
        })
        .await
    }

    pub async fn get_reward(
        &self,
        actor: UserId,
        reward_id: RewardId,
    ) -> Result<Reward, HearthError> {
        self.run("get_reward", Access::Autocommit, move |conn| {
            Ok(reward_in_home(conn, actor, reward_id)?.1)
        })
        .await
    }

    /// Remove a reward from the shop. Earlier claims stay in the ledger.
    pub async fn delete_reward(
        &self,
        actor: UserId,
        reward_id: RewardId,
    ) -> Result<(), HearthError> {
        self.run("delete_reward", Access::Immediate, move |conn| {
            reward_in_home(conn, actor, reward_id)?;
            rewards::delete_reward(conn, reward_id)?;
            Ok(())
        })
        .await?;
        info!(reward_id, "reward deleted");
        Ok(())
    }

    /// Spend the actor's gold on a reward and apply its effect.
    ///
    /// The debit, the effect, and the ledger entry commit together. A short
    /// balance yields [`HearthError::InsufficientGold`]; a consumable still
    /// in effect yields [`HearthError::ConsumableActive`].
    pub async fn claim_reward(
        &self,
        actor: UserId,
        reward_id: RewardId,
    ) -> Result<ClaimResult, HearthError> {
        let now = self.now();
        let result = self
            .run("claim_reward", Access::Immediate, move |conn| {
                let (user, reward) = reward_in_home(conn, actor, reward_id)?;
                if user.gold_balance < reward.cost {
                    return Err(HearthError::InsufficientGold {
                        required: reward.cost,
                        balance: user.gold_balance,
                    }
                    .into());
                }
                ensure_not_active(&user, reward.effect, now)?;

                if !users::debit_gold(conn, user.id, reward.cost)? {
                    return Err(HearthError::InsufficientGold {
                        required: reward.cost,
                        balance: user.gold_balance,
                    }
                    .into());
                }
                match reward.effect {
                    RewardEffect::Treat => {}
                    RewardEffect::XpBoost => {
                        users::grant_xp_boost(conn, user.id, ELIXIR_USES)?;
                    }
                    RewardEffect::Shield => {
                        let until = now + Duration::hours(SHIELD_HOURS);
                        users::set_shield_expiry(conn, user.id, Some(until))?;
                    }
                }
                let claim = rewards::insert_claim(conn, user.id, &reward, now)?;
                let user = require_user(conn, user.id)?;
                Ok(ClaimResult {
                    claim,
                    reward,
                    user,
                })
            })
            .await?;

        info!(
            reward_id,
            user_id = actor,
            cost = result.claim.cost,
            effect = %result.reward.effect,
            gold_left = result.user.gold_balance,
            "reward claimed"
        );
        Ok(result)
    }

    /// The actor's own claims, most recent first.
    pub async fn list_claims(&self, actor: UserId) -> Result<Vec<RewardClaim>, HearthError> {
        self.run("list_claims", Access::Autocommit, move |conn| {
            let user = require_user(conn, actor)?;
            Ok(rewards::claims_for_user(conn, user.id)?)
        })
        .await
    }
}
