// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router, shared state, and the HTTP listener.

use std::future::Future;

use axum::Router;
use axum::routing::{get, post};
use hearth_core::HearthError;
use hearth_engine::QuestEngine;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Shared state for axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: QuestEngine,
}

impl AppState {
    pub fn new(engine: QuestEngine) -> Self {
        Self { engine }
    }
}

/// Listener settings (mirrors `server` in the config file).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Build the application router.
///
/// `/health` needs no identity; every other route requires the
/// `x-hearth-user` header.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/bounty/today", get(handlers::bounty_today))
        .route("/bounty/check/{quest_id}", get(handlers::bounty_check))
        .route(
            "/quests",
            get(handlers::list_quests).post(handlers::create_quest),
        )
        .route("/quests/{id}", get(handlers::get_quest))
        .route("/quests/{id}/complete", post(handlers::complete_quest))
        .route(
            "/templates",
            get(handlers::list_templates).post(handlers::create_template),
        )
        .route(
            "/templates/{id}",
            get(handlers::get_template)
                .patch(handlers::update_template)
                .delete(handlers::delete_template),
        )
        .route(
            "/templates/{id}/generate",
            post(handlers::generate_from_template),
        )
        .route(
            "/subscriptions",
            get(handlers::list_subscriptions).post(handlers::create_subscription),
        )
        .route(
            "/rewards",
            get(handlers::list_rewards).post(handlers::create_reward),
        )
        .route(
            "/rewards/{id}",
            get(handlers::get_reward).delete(handlers::delete_reward),
        )
        .route("/rewards/{id}/claim", post(handlers::claim_reward))
        .route("/users/me", get(handlers::me))
        .route("/users/me/claims", get(handlers::my_claims))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Bind `host:port` and serve until `shutdown` resolves.
pub async fn start_server<F>(
    config: &ServerConfig,
    state: AppState,
    shutdown: F,
) -> Result<(), HearthError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(state);
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| HearthError::Config(format!("failed to bind {addr}: {e}")))?;

    tracing::info!("listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| HearthError::Internal(format!("server error: {e}")))?;

    tracing::info!("server stopped");
    Ok(())
}
