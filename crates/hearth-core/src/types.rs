// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain records shared by storage, engine, and gateway.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::schedule::{Recurrence, Schedule};

pub type HomeId = i64;
pub type UserId = i64;
pub type QuestId = i64;
pub type TemplateId = i64;
pub type SubscriptionId = i64;
pub type RewardId = i64;

/// Quest flavour, copied from the template at creation time.
///
/// Overdue quests are flipped to `Corrupted` by the corruption sweep.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum QuestType {
    #[default]
    Standard,
    Bounty,
    Corrupted,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Visibility {
    #[default]
    Private,
    Shared,
}

/// Outcome of the once-per-day bounty decision.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BountyStatus {
    Assigned,
    NoneEligible,
}

/// A household. The timezone decides where "today" begins for bounties
/// and where schedule times land.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Home {
    pub id: HomeId,
    pub name: String,
    /// IANA timezone name, e.g. `Europe/Berlin`.
    pub timezone: String,
    pub created_at: DateTime<Utc>,
}

/// A household member's account and consumable state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub home_id: HomeId,
    pub username: String,
    pub xp: i64,
    pub gold_balance: i64,
    /// Remaining quest completions that receive double XP.
    pub active_xp_boost_count: i64,
    /// While in the future, the corruption debuff is suppressed.
    pub active_shield_expiry: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn level(&self) -> u32 {
        crate::level::level_for_xp(self.xp)
    }

    pub fn xp_boost_active(&self) -> bool {
        self.active_xp_boost_count > 0
    }

    pub fn shield_active(&self, now: DateTime<Utc>) -> bool {
        self.active_shield_expiry.is_some_and(|expiry| expiry > now)
    }
}

/// A reusable quest blueprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestTemplate {
    pub id: TemplateId,
    pub home_id: HomeId,
    pub title: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub tags: Option<String>,
    pub base_xp_reward: i64,
    pub base_gold_reward: i64,
    pub quest_type: QuestType,
    pub visibility: Visibility,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for a new template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewTemplate {
    pub title: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    pub base_xp_reward: i64,
    pub base_gold_reward: i64,
    #[serde(default)]
    pub quest_type: QuestType,
    #[serde(default)]
    pub visibility: Visibility,
}

/// Partial template edit. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplatePatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub base_xp_reward: Option<i64>,
    #[serde(default)]
    pub base_gold_reward: Option<i64>,
    #[serde(default)]
    pub quest_type: Option<QuestType>,
    #[serde(default)]
    pub visibility: Option<Visibility>,
}

/// Self-contained data copied into a quest at creation time.
///
/// Once a quest exists it never looks at its template again, so later
/// template edits cannot reach it.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestSnapshot {
    pub home_id: HomeId,
    pub user_id: UserId,
    pub quest_template_id: Option<TemplateId>,
    pub title: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub tags: Option<String>,
    pub xp_reward: i64,
    pub gold_reward: i64,
    pub quest_type: QuestType,
    pub due_date: Option<DateTime<Utc>>,
}

impl QuestSnapshot {
    /// Copy a template's current fields into a snapshot for `user_id`.
    ///
    /// Rewards are the template's base values; bounty, corruption, and
    /// boost multipliers are applied only at completion.
    pub fn from_template(
        template: &QuestTemplate,
        user_id: UserId,
        due_date: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            home_id: template.home_id,
            user_id,
            quest_template_id: Some(template.id),
            title: template.title.clone(),
            display_name: template.display_name.clone(),
            description: template.description.clone(),
            tags: template.tags.clone(),
            xp_reward: template.base_xp_reward,
            gold_reward: template.base_gold_reward,
            quest_type: template.quest_type,
            due_date,
        }
    }
}

/// Fields for a quest created without a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StandaloneQuest {
    pub title: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    pub xp_reward: i64,
    pub gold_reward: i64,
    #[serde(default)]
    pub due_in_hours: Option<i64>,
}

/// A quest instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub id: QuestId,
    pub home_id: HomeId,
    pub user_id: UserId,
    pub quest_template_id: Option<TemplateId>,
    pub title: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub tags: Option<String>,
    /// Base reward until completion; the earned amount afterwards.
    pub xp_reward: i64,
    /// Base reward until completion; the earned amount afterwards.
    pub gold_reward: i64,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub quest_type: QuestType,
    pub corrupted_at: Option<DateTime<Utc>>,
}

impl Quest {
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < now)
    }
}

/// A user's schedule binding to a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub user_id: UserId,
    pub quest_template_id: TemplateId,
    pub recurrence: Recurrence,
    pub schedule: Option<Schedule>,
    pub due_in_hours: Option<i64>,
    pub last_generated_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields for a new subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewSubscription {
    pub quest_template_id: TemplateId,
    pub recurrence: Recurrence,
    #[serde(default)]
    pub schedule: Option<Schedule>,
    #[serde(default)]
    pub due_in_hours: Option<i64>,
}

/// The day-lock row: one bounty decision per `(home, user, day)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyBounty {
    pub id: i64,
    pub home_id: HomeId,
    pub user_id: UserId,
    /// Home-local calendar date.
    pub bounty_date: NaiveDate,
    pub quest_id: Option<QuestId>,
    pub status: BountyStatus,
    pub created_at: DateTime<Utc>,
}

impl DailyBounty {
    /// Whether `quest_id` is the quest this decision assigned.
    pub fn covers(&self, quest_id: QuestId) -> bool {
        self.status == BountyStatus::Assigned && self.quest_id == Some(quest_id)
    }
}

/// What claiming a reward does besides spending gold.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RewardEffect {
    /// A household treat with no in-game effect.
    #[default]
    Treat,
    /// Heroic Elixir: the next few completions earn double XP.
    XpBoost,
    /// Purification Shield: the corruption debuff is suppressed for a while.
    Shield,
}

/// Something household members can spend gold on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    pub id: RewardId,
    pub home_id: HomeId,
    pub name: String,
    pub description: Option<String>,
    /// Gold debited on each claim.
    pub cost: i64,
    pub effect: RewardEffect,
    pub created_at: DateTime<Utc>,
}

/// Fields for a new reward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewReward {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub cost: i64,
    #[serde(default)]
    pub effect: RewardEffect,
}

/// A record of one user spending gold on one reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardClaim {
    pub id: i64,
    pub user_id: UserId,
    /// Cleared when the reward is deleted.
    pub reward_id: Option<RewardId>,
    /// The reward's name at claim time.
    pub reward_name: String,
    /// Gold actually paid.
    pub cost: i64,
    pub claimed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn template() -> QuestTemplate {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        QuestTemplate {
            id: 7,
            home_id: 1,
            title: "Clean Kitchen".to_string(),
            display_name: Some("Scour the Galley".to_string()),
            description: None,
            tags: Some("kitchen,daily".to_string()),
            base_xp_reward: 25,
            base_gold_reward: 10,
            quest_type: QuestType::Standard,
            visibility: Visibility::Shared,
            created_by: 3,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn snapshot_copies_template_fields_and_base_rewards() {
        let snap = QuestSnapshot::from_template(&template(), 4, None);
        assert_eq!(snap.home_id, 1);
        assert_eq!(snap.user_id, 4);
        assert_eq!(snap.quest_template_id, Some(7));
        assert_eq!(snap.title, "Clean Kitchen");
        assert_eq!(snap.display_name.as_deref(), Some("Scour the Galley"));
        assert_eq!(snap.xp_reward, 25);
        assert_eq!(snap.gold_reward, 10);
    }

    #[test]
    fn snapshot_is_detached_from_later_template_edits() {
        let mut template = template();
        let snap = QuestSnapshot::from_template(&template, 4, None);
        template.title = "Clean Kitchen (deep)".to_string();
        template.base_xp_reward = 500;
        assert_eq!(snap.title, "Clean Kitchen");
        assert_eq!(snap.xp_reward, 25);
    }

    #[test]
    fn bounty_covers_only_assigned_quest() {
        let bounty = DailyBounty {
            id: 1,
            home_id: 1,
            user_id: 1,
            bounty_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            quest_id: Some(9),
            status: BountyStatus::Assigned,
            created_at: Utc::now(),
        };
        assert!(bounty.covers(9));
        assert!(!bounty.covers(10));

        let none = DailyBounty {
            quest_id: None,
            status: BountyStatus::NoneEligible,
            ..bounty
        };
        assert!(!none.covers(9));
    }

    #[test]
    fn enum_wire_names_are_snake_case() {
        assert_eq!(BountyStatus::NoneEligible.to_string(), "none_eligible");
        assert_eq!("corrupted".parse::<QuestType>().unwrap(), QuestType::Corrupted);
        assert_eq!(
            serde_json::to_string(&Visibility::Shared).unwrap(),
            r#""shared""#
        );
    }

    #[test]
    fn shield_is_active_only_before_expiry() {
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();
        let mut user = User {
            id: 1,
            home_id: 1,
            username: "sam".to_string(),
            xp: 0,
            gold_balance: 0,
            active_xp_boost_count: 0,
            active_shield_expiry: Some(now + chrono::Duration::hours(1)),
            created_at: now,
        };
        assert!(user.shield_active(now));
        user.active_shield_expiry = Some(now);
        assert!(!user.shield_active(now));
        user.active_shield_expiry = None;
        assert!(!user.shield_active(now));
    }
}
