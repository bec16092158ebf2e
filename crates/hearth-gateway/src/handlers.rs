// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request handlers.
//!
//! Handlers stay thin: extract, call the engine, serialize. JSON bodies are
//! taken as `Result<Json<T>, JsonRejection>` so malformed input comes back
//! in the shared error envelope.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use hearth_core::{
    NewReward, NewSubscription, NewTemplate, Quest, QuestId, QuestTemplate, Reward, RewardClaim,
    RewardId, StandaloneQuest, Subscription, TemplateId, TemplatePatch, User,
};
use hearth_engine::rewards::BOUNTY_MULTIPLIER;
use hearth_engine::{BountyView, ClaimResult, CompletionResult};
use serde::{Deserialize, Serialize};

use crate::actor::Actor;
use crate::error::ApiError;
use crate::server::AppState;

type ApiResult<T> = Result<Json<T>, ApiError>;
type Created<T> = Result<(StatusCode, Json<T>), ApiError>;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    state.engine.database().health_check().await?;
    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /bounty/today
pub async fn bounty_today(
    State(state): State<AppState>,
    Actor(user): Actor,
) -> ApiResult<BountyView> {
    Ok(Json(state.engine.today_bounty(user.home_id, user.id).await?))
}

#[derive(Debug, Serialize)]
pub struct BountyCheck {
    pub is_daily_bounty: bool,
    pub bonus_multiplier: i64,
}

/// GET /bounty/check/{quest_id}
pub async fn bounty_check(
    State(state): State<AppState>,
    Actor(user): Actor,
    Path(quest_id): Path<QuestId>,
) -> ApiResult<BountyCheck> {
    let is_daily_bounty = state.engine.is_bounty(user.id, quest_id).await?;
    Ok(Json(BountyCheck {
        is_daily_bounty,
        bonus_multiplier: if is_daily_bounty { BOUNTY_MULTIPLIER } else { 1 },
    }))
}

/// POST /quests/{id}/complete
pub async fn complete_quest(
    State(state): State<AppState>,
    Actor(user): Actor,
    Path(quest_id): Path<QuestId>,
) -> ApiResult<CompletionResult> {
    Ok(Json(state.engine.complete_quest(quest_id, user.id).await?))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BoardQuery {
    /// Only incomplete quests, oldest first, without running generation.
    pub active: bool,
    /// With `active`, only the caller's own quests.
    pub mine: bool,
}

/// GET /quests
pub async fn list_quests(
    State(state): State<AppState>,
    Actor(user): Actor,
    Query(query): Query<BoardQuery>,
) -> ApiResult<Vec<Quest>> {
    let quests = if query.active {
        state.engine.active_quests(user.id, query.mine).await?
    } else {
        state.engine.board(user.id).await?
    };
    Ok(Json(quests))
}

/// GET /quests/{id}
pub async fn get_quest(
    State(state): State<AppState>,
    Actor(user): Actor,
    Path(quest_id): Path<QuestId>,
) -> ApiResult<Quest> {
    Ok(Json(state.engine.get_quest(user.id, quest_id).await?))
}

/// POST /quests
pub async fn create_quest(
    State(state): State<AppState>,
    Actor(user): Actor,
    body: Result<Json<StandaloneQuest>, JsonRejection>,
) -> Created<Quest> {
    let Json(fields) = body?;
    let quest = state.engine.create_standalone(user.id, fields).await?;
    Ok((StatusCode::CREATED, Json(quest)))
}

/// POST /templates
pub async fn create_template(
    State(state): State<AppState>,
    Actor(user): Actor,
    body: Result<Json<NewTemplate>, JsonRejection>,
) -> Created<QuestTemplate> {
    let Json(new) = body?;
    let template = state.engine.create_template(user.id, new).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

/// GET /templates
pub async fn list_templates(
    State(state): State<AppState>,
    Actor(user): Actor,
) -> ApiResult<Vec<QuestTemplate>> {
    Ok(Json(state.engine.list_templates(user.id).await?))
}

/// GET /templates/{id}
pub async fn get_template(
    State(state): State<AppState>,
    Actor(user): Actor,
    Path(template_id): Path<TemplateId>,
) -> ApiResult<QuestTemplate> {
    Ok(Json(state.engine.get_template(user.id, template_id).await?))
}

/// PATCH /templates/{id}
pub async fn update_template(
    State(state): State<AppState>,
    Actor(user): Actor,
    Path(template_id): Path<TemplateId>,
    body: Result<Json<TemplatePatch>, JsonRejection>,
) -> ApiResult<QuestTemplate> {
    let Json(patch) = body?;
    Ok(Json(
        state
            .engine
            .update_template(user.id, template_id, patch)
            .await?,
    ))
}

/// DELETE /templates/{id}
pub async fn delete_template(
    State(state): State<AppState>,
    Actor(user): Actor,
    Path(template_id): Path<TemplateId>,
) -> Result<StatusCode, ApiError> {
    state.engine.delete_template(user.id, template_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /templates/{id}/generate
pub async fn generate_from_template(
    State(state): State<AppState>,
    Actor(user): Actor,
    Path(template_id): Path<TemplateId>,
) -> Created<Quest> {
    let quest = state.engine.generate_now(user.id, template_id).await?;
    Ok((StatusCode::CREATED, Json(quest)))
}

/// POST /subscriptions
pub async fn create_subscription(
    State(state): State<AppState>,
    Actor(user): Actor,
    body: Result<Json<NewSubscription>, JsonRejection>,
) -> Created<Subscription> {
    let Json(new) = body?;
    let subscription = state.engine.subscribe(user.id, new).await?;
    Ok((StatusCode::CREATED, Json(subscription)))
}

/// GET /subscriptions
pub async fn list_subscriptions(
    State(state): State<AppState>,
    Actor(user): Actor,
) -> ApiResult<Vec<Subscription>> {
    Ok(Json(state.engine.list_subscriptions(user.id).await?))
}

/// POST /rewards
pub async fn create_reward(
    State(state): State<AppState>,
    Actor(user): Actor,
    body: Result<Json<NewReward>, JsonRejection>,
) -> Created<Reward> {
    let Json(new) = body?;
    let reward = state.engine.create_reward(user.id, new).await?;
    Ok((StatusCode::CREATED, Json(reward)))
}

/// GET /rewards
pub async fn list_rewards(
    State(state): State<AppState>,
    Actor(user): Actor,
) -> ApiResult<Vec<Reward>> {
    Ok(Json(state.engine.list_rewards(user.id).await?))
}

/// GET /rewards/{id}
pub async fn get_reward(
    State(state): State<AppState>,
    Actor(user): Actor,
    Path(reward_id): Path<RewardId>,
) -> ApiResult<Reward> {
    Ok(Json(state.engine.get_reward(user.id, reward_id).await?))
}

/// DELETE /rewards/{id}
pub async fn delete_reward(
    State(state): State<AppState>,
    Actor(user): Actor,
    Path(reward_id): Path<RewardId>,
) -> Result<StatusCode, ApiError> {
    state.engine.delete_reward(user.id, reward_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /rewards/{id}/claim
pub async fn claim_reward(
    State(state): State<AppState>,
    Actor(user): Actor,
    Path(reward_id): Path<RewardId>,
) -> Created<ClaimResult> {
    let result = state.engine.claim_reward(user.id, reward_id).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// GET /users/me/claims
pub async fn my_claims(
    State(state): State<AppState>,
    Actor(user): Actor,
) -> ApiResult<Vec<RewardClaim>> {
    Ok(Json(state.engine.list_claims(user.id).await?))
}

/// The caller's account with derived state.
#[derive(Debug, Serialize)]
pub struct Me {
    #[serde(flatten)]
    pub user: User,
    pub level: u32,
    pub xp_boost_active: bool,
    pub shield_active: bool,
}

/// GET /users/me
pub async fn me(State(state): State<AppState>, Actor(user): Actor) -> Json<Me> {
    let now = state.engine.now();
    Json(Me {
        level: user.level(),
        xp_boost_active: user.xp_boost_active(),
        shield_active: user.shield_active(now),
        user,
    })
}
