//! Axum HTTP server setup and routing

use anyhow::Context;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use vault_client::VaultClient;

use super::handlers;
use crate::config::UiConfig;

/// CORS for the configured origins, or any origin when none are configured
pub fn build_cors(allowed_origins: &Option<Vec<String>>) -> anyhow::Result<CorsLayer> {
    let cors = match allowed_origins {
        Some(origins) => {
            log::info!("CORS configured for origins: {}", origins.join(","));
            let origin_list = origins
                .iter()
                .map(|origin| {
                    origin
                        .parse::<HeaderValue>()
                        .with_context(|| format!("Invalid CORS origin: {}", origin))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            CorsLayer::new()
                .allow_origin(origin_list)
                .allow_methods(Any)
                .allow_headers(Any)
        }
        None => {
            log::warn!("CORS: Allowing all origins (development mode). Set ALLOWED_ORIGINS env var for production.");
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    };
    Ok(cors)
}

pub fn create_router(client: Arc<VaultClient>, cors: CorsLayer) -> Router {
    Router::new()
        // Page
        .route("/", get(handlers::index_handler))
        .route("/health", get(handlers::health_check))
        // View state
        .route("/api/state", get(handlers::get_state_handler))
        .route("/api/amount", post(handlers::set_amount_handler))
        .route("/api/error/dismiss", post(handlers::dismiss_error_handler))
        .route("/api/notice/dismiss", post(handlers::dismiss_notice_handler))
        // Wallet and contract
        .route("/api/connect", post(handlers::connect_handler))
        .route("/api/deposit-info", post(handlers::deposit_info_handler))
        .route("/api/deposit", post(handlers::deposit_handler))
        .route("/api/withdraw", post(handlers::withdraw_handler))
        .with_state(client)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn start_server(config: &UiConfig, client: Arc<VaultClient>) -> anyhow::Result<()> {
    let cors = build_cors(&config.allowed_origins)?;
    let app = create_router(client, cors);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    log::info!("🚀 Vault UI listening on http://{}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            log::info!("Received SIGTERM signal");
        },
    }

    log::info!("Shutdown signal received, exiting gracefully...");
}
