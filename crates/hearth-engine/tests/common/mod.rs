// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures for engine integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use hearth_core::{
    Home, ManualClock, NewReward, NewTemplate, Quest, QuestType, Reward, RewardEffect,
    StandaloneQuest, User, Visibility,
};
use hearth_engine::{EngineSettings, LinearCurve, QuestEngine};
use hearth_storage::Database;
use hearth_storage::queries::users;
use tempfile::TempDir;

pub struct Harness {
    pub engine: QuestEngine,
    pub clock: Arc<ManualClock>,
    pub path: String,
    _dir: TempDir,
}

/// 1 March 2026, 12:00 UTC.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

pub async fn harness() -> Harness {
    harness_with(EngineSettings::default()).await
}

pub async fn harness_with(settings: EngineSettings) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hearth.db").to_str().unwrap().to_string();
    let db = Database::open(&path).await.unwrap();
    let clock = Arc::new(ManualClock::new(t0()));
    let engine = QuestEngine::new(db, settings, clock.clone(), Arc::new(LinearCurve::default()));
    Harness {
        engine,
        clock,
        path,
        _dir: dir,
    }
}

impl Harness {
    /// A second engine over its own connection to the same database file.
    pub async fn sibling(&self) -> QuestEngine {
        let db = Database::open(&self.path).await.unwrap();
        QuestEngine::new(
            db,
            self.engine.settings().clone(),
            self.clock.clone(),
            Arc::new(LinearCurve::default()),
        )
    }

    pub fn advance_hours(&self, hours: i64) {
        self.clock.advance(Duration::hours(hours));
    }

    pub async fn home_with_user(&self, username: &str) -> (Home, User) {
        let home = self.engine.create_home("Burrow", Some("UTC")).await.unwrap();
        let user = self.engine.create_user(home.id, username).await.unwrap();
        (home, user)
    }

    pub async fn quest(&self, user: &User, title: &str, xp: i64, gold: i64) -> Quest {
        self.engine
            .create_standalone(
                user.id,
                StandaloneQuest {
                    title: title.to_string(),
                    display_name: None,
                    description: None,
                    tags: None,
                    xp_reward: xp,
                    gold_reward: gold,
                    due_in_hours: None,
                },
            )
            .await
            .unwrap()
    }

    pub async fn due_quest(&self, user: &User, title: &str, due_in_hours: i64) -> Quest {
        self.engine
            .create_standalone(
                user.id,
                StandaloneQuest {
                    title: title.to_string(),
                    display_name: None,
                    description: None,
                    tags: None,
                    xp_reward: 10,
                    gold_reward: 10,
                    due_in_hours: Some(due_in_hours),
                },
            )
            .await
            .unwrap()
    }

    pub async fn grant_boost(&self, user: &User, uses: i64) {
        let user_id = user.id;
        self.engine
            .database()
            .call(move |conn| users::grant_xp_boost(conn, user_id, uses))
            .await
            .unwrap();
    }

    pub async fn grant_shield(&self, user: &User, until: DateTime<Utc>) {
        let user_id = user.id;
        self.engine
            .database()
            .call(move |conn| users::set_shield_expiry(conn, user_id, Some(until)))
            .await
            .unwrap();
    }

    pub async fn give_gold(&self, user: &User, gold: i64) {
        let user_id = user.id;
        self.engine
            .database()
            .call(move |conn| users::credit_rewards(conn, user_id, 0, gold, false))
            .await
            .unwrap();
    }

    pub async fn reward(&self, user: &User, name: &str, cost: i64, effect: RewardEffect) -> Reward {
        self.engine
            .create_reward(
                user.id,
                NewReward {
                    name: name.to_string(),
                    description: None,
                    cost,
                    effect,
                },
            )
            .await
            .unwrap()
    }

    pub async fn bounty_rows(&self) -> i64 {
        self.engine
            .database()
            .call(|conn| {
                conn.query_row("SELECT COUNT(*) FROM daily_user_bounty", [], |row| row.get(0))
            })
            .await
            .unwrap()
    }
}

pub fn template(title: &str, xp: i64, gold: i64) -> NewTemplate {
    NewTemplate {
        title: title.to_string(),
        display_name: None,
        description: Some("keep it tidy".to_string()),
        tags: Some("chores".to_string()),
        base_xp_reward: xp,
        base_gold_reward: gold,
        quest_type: QuestType::Standard,
        visibility: Visibility::Shared,
    }
}
