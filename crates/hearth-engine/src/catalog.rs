// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Homes, users, templates, subscriptions, and the quest board.
//!
//! Every lookup is scoped to the acting user's home; records from another
//! home are reported as not found.

use hearth_core::{
    HearthError, Home, HomeId, NewSubscription, NewTemplate, Quest, QuestId, QuestTemplate,
    Schedule, Subscription, TemplateId, TemplatePatch, User, UserId, parse_timezone,
};
use hearth_storage::is_constraint_violation;
use hearth_storage::queries::{homes, quests, subscriptions, templates, users};
use tracing::info;

use crate::txn::{Access, TxError};
use crate::{QuestEngine, require_home, require_user};

pub(crate) fn non_empty(field: &str, value: &str) -> Result<String, HearthError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(HearthError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

impl QuestEngine {
    /// Create a household. Without a timezone the configured default is used.
    pub async fn create_home(&self, name: &str, timezone: Option<&str>) -> Result<Home, HearthError> {
        let name = non_empty("name", name)?;
        let timezone = match timezone {
            Some(tz) => parse_timezone(tz)?.name().to_string(),
            None => self.settings.default_timezone.name().to_string(),
        };
        let now = self.now();
        let home = self
            .run("create_home", Access::Autocommit, move |conn| {
                Ok(homes::insert_home(conn, &name, &timezone, now)?)
            })
            .await?;
        info!(home_id = home.id, timezone = %home.timezone, "home created");
        Ok(home)
    }

    pub async fn get_home(&self, home_id: HomeId) -> Result<Home, HearthError> {
        self.run("get_home", Access::Autocommit, move |conn| require_home(conn, home_id))
            .await
    }

    /// Add a member to a home. Usernames are unique within a home.
    pub async fn create_user(&self, home_id: HomeId, username: &str) -> Result<User, HearthError> {
        let username = non_empty("username", username)?;
        let now = self.now();
        let user = self
            .run("create_user", Access::Autocommit, move |conn| {
                require_home(conn, home_id)?;
                match users::insert_user(conn, home_id, &username, now) {
                    Ok(user) => Ok(user),
                    Err(e) if is_constraint_violation(&e) => Err(HearthError::Validation(
                        format!("username `{username}` is already taken in this home"),
                    )
                    .into()),
                    Err(e) => Err(e.into()),
                }
            })
            .await?;
        info!(user_id = user.id, home_id, "user created");
        Ok(user)
    }

    pub async fn get_user(&self, user_id: UserId) -> Result<User, HearthError> {
        self.run("get_user", Access::Autocommit, move |conn| require_user(conn, user_id))
            .await
    }

    fn validate_template(&self, new: &NewTemplate) -> Result<(), HearthError> {
        non_empty("title", &new.title)?;
        self.check_reward("base_xp_reward", new.base_xp_reward)?;
        self.check_reward("base_gold_reward", new.base_gold_reward)
    }

    pub async fn create_template(
        &self,
        actor: UserId,
        mut new: NewTemplate,
    ) -> Result<QuestTemplate, HearthError> {
        self.validate_template(&new)?;
        new.title = new.title.trim().to_string();
        let now = self.now();
        let template = self
            .run("create_template", Access::Autocommit, move |conn| {
                let user = require_user(conn, actor)?;
                Ok(templates::insert_template(conn, user.home_id, user.id, &new, now)?)
            })
            .await?;
        info!(template_id = template.id, home_id = template.home_id, "template created");
        Ok(template)
    }

    pub async fn get_template(
        &self,
        actor: UserId,
        template_id: TemplateId,
    ) -> Result<QuestTemplate, HearthError> {
        self.run("get_template", Access::Autocommit, move |conn| {
            template_in_home(conn, actor, template_id)
        })
        .await
    }

    pub async fn list_templates(&self, actor: UserId) -> Result<Vec<QuestTemplate>, HearthError> {
        self.run("list_templates", Access::Autocommit, move |conn| {
            let user = require_user(conn, actor)?;
            Ok(templates::list_for_home(conn, user.home_id)?)
        })
        .await
    }

    /// Edit a template. Quests already created from it are unaffected.
    pub async fn update_template(
        &self,
        actor: UserId,
        template_id: TemplateId,
        mut patch: TemplatePatch,
    ) -> Result<QuestTemplate, HearthError> {
        if let Some(title) = patch.title.as_deref() {
            patch.title = Some(non_empty("title", title)?);
        }
        if let Some(xp) = patch.base_xp_reward {
            self.check_reward("base_xp_reward", xp)?;
        }
        if let Some(gold) = patch.base_gold_reward {
            self.check_reward("base_gold_reward", gold)?;
        }
        let now = self.now();
        let template = self
            .run("update_template", Access::Immediate, move |conn| {
                template_in_home(conn, actor, template_id)?;
                templates::update_template(conn, template_id, &patch, now)?
                    .ok_or_else(|| HearthError::not_found("template", template_id).into())
            })
            .await?;
        info!(template_id, "template updated");
        Ok(template)
    }

    /// Delete a template. Its quests keep their snapshots; its
    /// subscriptions go with it.
    pub async fn delete_template(
        &self,
        actor: UserId,
        template_id: TemplateId,
    ) -> Result<(), HearthError> {
        self.run("delete_template", Access::Immediate, move |conn| {
            template_in_home(conn, actor, template_id)?;
            templates::delete_template(conn, template_id)?;
            Ok(())
        })
        .await?;
        info!(template_id, "template deleted");
        Ok(())
    }

    /// Subscribe `actor` to a template, then run generation so a recurring
    /// subscription produces its first quest straight away.
    pub async fn subscribe(
        &self,
        actor: UserId,
        new: NewSubscription,
    ) -> Result<Subscription, HearthError> {
        Schedule::validate(new.schedule.as_ref(), new.recurrence)?;
        if let Some(hours) = new.due_in_hours {
            self.check_due_in_hours(hours)?;
        }
        let now = self.now();
        let (home_id, subscription) = self
            .run("subscribe", Access::Immediate, move |conn| {
                let user = require_user(conn, actor)?;
                template_in_home(conn, actor, new.quest_template_id)?;
                match subscriptions::insert_subscription(conn, user.id, &new, now) {
                    Ok(sub) => Ok((user.home_id, sub)),
                    Err(e) if is_constraint_violation(&e) => Err(HearthError::Validation(
                        format!(
                            "already subscribed to template {}",
                            new.quest_template_id
                        ),
                    )
                    .into()),
                    Err(e) => Err(e.into()),
                }
            })
            .await?;
        info!(
            subscription_id = subscription.id,
            user_id = actor,
            recurrence = %subscription.recurrence,
            "subscription created"
        );

        self.generate_due(home_id).await?;
        let id = subscription.id;
        self.run("reload_subscription", Access::Autocommit, move |conn| {
            subscriptions::get_subscription(conn, id)?
                .ok_or_else(|| HearthError::not_found("subscription", id).into())
        })
        .await
    }

    pub async fn list_subscriptions(&self, actor: UserId) -> Result<Vec<Subscription>, HearthError> {
        self.run("list_subscriptions", Access::Autocommit, move |conn| {
            let user = require_user(conn, actor)?;
            Ok(subscriptions::list_for_user(conn, user.id)?)
        })
        .await
    }

    pub async fn get_quest(&self, actor: UserId, quest_id: QuestId) -> Result<Quest, HearthError> {
        self.run("get_quest", Access::Autocommit, move |conn| {
            let user = require_user(conn, actor)?;
            quests::get_quest(conn, quest_id)?
                .filter(|q| q.home_id == user.home_id)
                .ok_or_else(|| HearthError::not_found("quest", quest_id).into())
        })
        .await
    }

    /// Load the home's quest board, newest first.
    ///
    /// Runs generation for due subscriptions and the corruption sweep first.
    pub async fn board(&self, actor: UserId) -> Result<Vec<Quest>, HearthError> {
        let user = self.get_user(actor).await?;
        self.generate_due(user.home_id).await?;
        self.sweep_corruption(user.home_id).await?;
        let home_id = user.home_id;
        self.run("list_board", Access::Autocommit, move |conn| {
            Ok(quests::list_for_home(conn, home_id)?)
        })
        .await
    }

    /// Incomplete quests in the actor's home, oldest first. With `mine` set
    /// only the actor's own quests are returned. No generation or sweep runs.
    pub async fn active_quests(
        &self,
        actor: UserId,
        mine: bool,
    ) -> Result<Vec<Quest>, HearthError> {
        self.run("list_active", Access::Autocommit, move |conn| {
            let user = require_user(conn, actor)?;
            let owner = mine.then_some(user.id);
            Ok(quests::list_active(conn, user.home_id, owner)?)
        })
        .await
    }
}

fn template_in_home(
    conn: &rusqlite::Connection,
    actor: UserId,
    template_id: TemplateId,
) -> Result<QuestTemplate, TxError> {
    let user = require_user(conn, actor)?;
    templates::get_template(conn, template_id)?
        .filter(|t| t.home_id == user.home_id)
        .ok_or_else(|| HearthError::not_found("template", template_id).into())
}
