//! HTTP surface: the Telegram webhook and a health check.

use crate::bot::Bot;
use crate::security::{verify_webhook_secret, WEBHOOK_SECRET_HEADER};
use crate::telegram::Update;
use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub fn router(bot: Arc<Bot>) -> Router {
    Router::new()
        .route("/webhook", post(webhook))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(bot)
}

/// Accept an update and handle it in the background.
///
/// Always answers 200 for authenticated requests, even when the body is
/// not a usable update, so Telegram does not redeliver it.
async fn webhook(State(bot): State<Arc<Bot>>, headers: HeaderMap, body: String) -> StatusCode {
    let provided = headers
        .get(WEBHOOK_SECRET_HEADER)
        .and_then(|value| value.to_str().ok());

    if !verify_webhook_secret(bot.config().webhook_secret.as_deref(), provided) {
        warn!("Rejected webhook request with missing or wrong secret token");
        return StatusCode::UNAUTHORIZED;
    }

    let update: Update = match serde_json::from_str(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!("Ignoring malformed update: {}", e);
            return StatusCode::OK;
        }
    };

    tokio::spawn(async move {
        bot.handle_update(update).await;
    });

    StatusCode::OK
}

async fn health() -> &'static str {
    "OK"
}

/// Serve on `0.0.0.0:{port}` until Ctrl-C or SIGTERM.
pub async fn serve(bot: Arc<Bot>, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Listening on {}", addr);

    axum::serve(listener, router(bot))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
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
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
