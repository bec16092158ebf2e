// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `hearth serve` command implementation.

use std::sync::Arc;

use hearth_config::HearthConfig;
use hearth_core::{HearthError, SystemClock};
use hearth_engine::QuestEngine;
use hearth_gateway::{AppState, ServerConfig};
use hearth_storage::Database;
use tracing::{info, warn};

/// Runs the `hearth serve` command until SIGINT or SIGTERM.
pub async fn run_serve(config: HearthConfig) -> Result<(), HearthError> {
    init_tracing(&config.server.log_level);

    info!(
        database = %config.storage.database_path,
        selection = %config.bounty.selection,
        "starting hearth serve"
    );

    let db = Database::open_with(&config.storage).await?;
    let engine = QuestEngine::from_config(db.clone(), &config, Arc::new(SystemClock))?;

    let server = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    hearth_gateway::start_server(&server, AppState::new(engine), shutdown_signal()).await?;

    if let Err(e) = db.close().await {
        warn!(error = %e, "database close failed");
    }
    info!("hearth serve shutdown complete");
    Ok(())
}

/// Resolves on SIGINT (Ctrl+C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT (Ctrl+C), initiating shutdown"),
        _ = terminate => info!("received SIGTERM, initiating shutdown"),
    }
}

/// Initializes the tracing subscriber. `RUST_LOG` wins over `log_level`.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "hearth={log_level},hearth_engine={log_level},hearth_gateway={log_level},\
             hearth_storage={log_level},tower_http={log_level},warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
