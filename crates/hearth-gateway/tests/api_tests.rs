// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end HTTP tests against a temp database.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use chrono::{Duration, TimeZone, Utc};
use hearth_core::{ManualClock, User};
use hearth_engine::{EngineSettings, LinearCurve, QuestEngine};
use hearth_gateway::{AppState, USER_HEADER, router};
use hearth_storage::Database;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    app: Router,
    engine: QuestEngine,
    clock: Arc<ManualClock>,
    _dir: TempDir,
}

async fn app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(dir.path().join("hearth.db").to_str().unwrap())
        .await
        .unwrap();
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
    ));
    let engine = QuestEngine::new(
        db,
        EngineSettings::default(),
        clock.clone(),
        Arc::new(LinearCurve::default()),
    );
    TestApp {
        app: router(AppState::new(engine.clone())),
        engine,
        clock,
        _dir: dir,
    }
}

impl TestApp {
    async fn member(&self) -> User {
        let home = self.engine.create_home("Burrow", None).await.unwrap();
        self.engine.create_user(home.id, "pip").await.unwrap()
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        user: Option<&User>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(USER_HEADER, user.id.to_string());
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}

#[tokio::test]
async fn health_needs_no_identity() {
    let t = app().await;
    let (status, body) = t.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn missing_or_unknown_user_is_unauthorized() {
    let t = app().await;
    let (status, body) = t.send(Method::GET, "/quests", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let request = Request::builder()
        .uri("/users/me")
        .header(USER_HEADER, "not-a-number")
        .body(Body::empty())
        .unwrap();
    let response = t.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/users/me")
        .header(USER_HEADER, "777")
        .body(Body::empty())
        .unwrap();
    let response = t.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn users_me_reports_level() {
    let t = app().await;
    let user = t.member().await;
    let (status, body) = t.send(Method::GET, "/users/me", Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "pip");
    assert_eq!(body["level"], 1);
    assert_eq!(body["xp_boost_active"], false);
}

#[tokio::test]
async fn complete_flow_and_double_completion() {
    let t = app().await;
    let user = t.member().await;

    let (status, quest) = t
        .send(
            Method::POST,
            "/quests",
            Some(&user),
            Some(json!({"title": "Sweep porch", "xp_reward": 40, "gold_reward": 8})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = quest["id"].as_i64().unwrap();

    let uri = format!("/quests/{id}/complete");
    let (status, body) = t.send(Method::POST, &uri, Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quest"]["completed"], true);
    assert_eq!(body["rewards"]["xp"], 40);
    assert_eq!(body["rewards"]["gold"], 8);
    assert_eq!(body["rewards"]["is_daily_bounty"], false);
    assert_eq!(body["rewards"]["corruption_debuff"], 1.0);

    let (status, body) = t.send(Method::POST, &uri, Some(&user), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "ALREADY_COMPLETED");

    let (_, me) = t.send(Method::GET, "/users/me", Some(&user), None).await;
    assert_eq!(me["xp"], 40);
    assert_eq!(me["gold_balance"], 8);
}

#[tokio::test]
async fn bounty_today_and_check() {
    let t = app().await;
    let user = t.member().await;
    let (_, quest) = t
        .send(
            Method::POST,
            "/quests",
            Some(&user),
            Some(json!({"title": "Clean gutters", "xp_reward": 100, "gold_reward": 50})),
        )
        .await;
    let id = quest["id"].as_i64().unwrap();

    let (status, body) = t.send(Method::GET, "/bounty/today", Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "none_eligible");
    assert_eq!(body["bonus_multiplier"], 1);
    assert!(body["quest"].is_null());

    t.clock.advance(Duration::hours(49));
    let (_, body) = t.send(Method::GET, "/bounty/today", Some(&user), None).await;
    assert_eq!(body["status"], "assigned");
    assert_eq!(body["bonus_multiplier"], 2);
    assert_eq!(body["quest"]["id"], id);
    assert_eq!(body["bounty_date"], "2026-03-03");

    let (_, check) = t
        .send(Method::GET, &format!("/bounty/check/{id}"), Some(&user), None)
        .await;
    assert_eq!(check, json!({"is_daily_bounty": true, "bonus_multiplier": 2}));
    let (status, body) = t
        .send(Method::GET, "/bounty/check/9999", Some(&user), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (_, body) = t
        .send(Method::POST, &format!("/quests/{id}/complete"), Some(&user), None)
        .await;
    assert_eq!(body["rewards"]["xp"], 200);
    assert_eq!(body["rewards"]["bounty_multiplier"], 2);
}

#[tokio::test]
async fn template_subscription_and_board() {
    let t = app().await;
    let user = t.member().await;

    let (status, template) = t
        .send(
            Method::POST,
            "/templates",
            Some(&user),
            Some(json!({"title": "Water Plants", "base_xp_reward": 20, "base_gold_reward": 5})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let template_id = template["id"].as_i64().unwrap();

    let (status, sub) = t
        .send(
            Method::POST,
            "/subscriptions",
            Some(&user),
            Some(json!({
                "quest_template_id": template_id,
                "recurrence": "daily",
                "schedule": {"type": "daily", "time": "08:00"},
                "due_in_hours": 12
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(sub["last_generated_at"].is_string());

    let (status, board) = t.send(Method::GET, "/quests", Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    let board = board.as_array().unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!(board[0]["title"], "Water Plants");

    let (status, patched) = t
        .send(
            Method::PATCH,
            &format!("/templates/{template_id}"),
            Some(&user),
            Some(json!({"title": "Water Every Plant"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["title"], "Water Every Plant");

    let quest_id = board[0]["id"].as_i64().unwrap();
    let (_, quest) = t
        .send(Method::GET, &format!("/quests/{quest_id}"), Some(&user), None)
        .await;
    assert_eq!(quest["title"], "Water Plants");

    let (status, extra) = t
        .send(
            Method::POST,
            &format!("/templates/{template_id}/generate"),
            Some(&user),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(extra["title"], "Water Every Plant");

    let (_, subs) = t.send(Method::GET, "/subscriptions", Some(&user), None).await;
    assert_eq!(subs.as_array().unwrap().len(), 1);

    let (status, _) = t
        .send(
            Method::DELETE,
            &format!("/templates/{template_id}"),
            Some(&user),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = t
        .send(Method::GET, &format!("/templates/{template_id}"), Some(&user), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn malformed_input_is_a_validation_error() {
    let t = app().await;
    let user = t.member().await;

    let (status, body) = t
        .send(
            Method::POST,
            "/templates",
            Some(&user),
            Some(json!({"title": "Greedy", "base_xp_reward": 50_000, "base_gold_reward": 1})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION");

    let (status, body) = t
        .send(
            Method::POST,
            "/templates",
            Some(&user),
            Some(json!({"title": "Sneaky", "base_xp_reward": 1, "base_gold_reward": 1, "owner": 9})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION");

    let (status, body) = t
        .send(
            Method::POST,
            "/subscriptions",
            Some(&user),
            Some(json!({
                "quest_template_id": 1,
                "recurrence": "weekly",
                "schedule": {"type": "weekly", "day": "funday", "time": "08:00"}
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION");
}

#[tokio::test]
async fn other_home_sees_not_found() {
    let t = app().await;
    let user = t.member().await;
    let other_home = t.engine.create_home("Warren", None).await.unwrap();
    let stranger = t.engine.create_user(other_home.id, "stoat").await.unwrap();

    let (_, quest) = t
        .send(
            Method::POST,
            "/quests",
            Some(&user),
            Some(json!({"title": "Sweep", "xp_reward": 5, "gold_reward": 1})),
        )
        .await;
    let id = quest["id"].as_i64().unwrap();

    let (status, body) = t
        .send(Method::POST, &format!("/quests/{id}/complete"), Some(&stranger), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn active_filter_skips_completed_and_others_quests() {
    let t = app().await;
    let pip = t.member().await;
    let bramble = t.engine.create_user(pip.home_id, "bramble").await.unwrap();

    let mut ids = Vec::new();
    for (user, title) in [(&pip, "Dishes"), (&pip, "Laundry"), (&bramble, "Bins")] {
        let (status, quest) = t
            .send(
                Method::POST,
                "/quests",
                Some(user),
                Some(json!({"title": title, "xp_reward": 5, "gold_reward": 1})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        ids.push(quest["id"].as_i64().unwrap());
    }
    let (status, _) = t
        .send(Method::POST, &format!("/quests/{}/complete", ids[0]), Some(&pip), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, active) = t.send(Method::GET, "/quests?active=true", Some(&pip), None).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = active
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Laundry", "Bins"]);

    let (_, mine) = t
        .send(Method::GET, "/quests?active=true&mine=true", Some(&pip), None)
        .await;
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["title"], "Laundry");
}

#[tokio::test]
async fn housemate_sees_owners_bounty() {
    let t = app().await;
    let pip = t.member().await;
    let bramble = t.engine.create_user(pip.home_id, "bramble").await.unwrap();
    let (_, quest) = t
        .send(
            Method::POST,
            "/quests",
            Some(&pip),
            Some(json!({"title": "Mow lawn", "xp_reward": 10, "gold_reward": 5})),
        )
        .await;
    let id = quest["id"].as_i64().unwrap();
    t.clock.advance(Duration::hours(49));
    t.send(Method::GET, "/bounty/today", Some(&pip), None).await;

    let (_, check) = t
        .send(Method::GET, &format!("/bounty/check/{id}"), Some(&bramble), None)
        .await;
    assert_eq!(check, json!({"is_daily_bounty": true, "bonus_multiplier": 2}));

    let (_, body) = t
        .send(Method::POST, &format!("/quests/{id}/complete"), Some(&bramble), None)
        .await;
    assert_eq!(body["rewards"]["is_daily_bounty"], true);
    assert_eq!(body["rewards"]["xp"], 20);
}

#[tokio::test]
async fn reward_shop_flow() {
    let t = app().await;
    let user = t.member().await;

    let (status, elixir) = t
        .send(
            Method::POST,
            "/rewards",
            Some(&user),
            Some(json!({"name": "Heroic Elixir", "cost": 150, "effect": "xp_boost"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let claim_uri = format!("/rewards/{}/claim", elixir["id"].as_i64().unwrap());

    let (status, body) = t.send(Method::POST, &claim_uri, Some(&user), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INSUFFICIENT_GOLD");

    let (_, quest) = t
        .send(
            Method::POST,
            "/quests",
            Some(&user),
            Some(json!({"title": "Paint fence", "xp_reward": 50, "gold_reward": 200})),
        )
        .await;
    let id = quest["id"].as_i64().unwrap();
    t.send(Method::POST, &format!("/quests/{id}/complete"), Some(&user), None)
        .await;

    let (status, body) = t.send(Method::POST, &claim_uri, Some(&user), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["gold_balance"], 50);
    assert_eq!(body["user"]["active_xp_boost_count"], 3);
    assert_eq!(body["claim"]["reward_name"], "Heroic Elixir");

    let (status, body) = t.send(Method::POST, &claim_uri, Some(&user), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "CONSUMABLE_ALREADY_ACTIVE");

    let (_, me) = t.send(Method::GET, "/users/me", Some(&user), None).await;
    assert_eq!(me["xp_boost_active"], true);
    let (_, claims) = t.send(Method::GET, "/users/me/claims", Some(&user), None).await;
    assert_eq!(claims.as_array().unwrap().len(), 1);
    let (_, shop) = t.send(Method::GET, "/rewards", Some(&user), None).await;
    assert_eq!(shop[0]["effect"], "xp_boost");
}
