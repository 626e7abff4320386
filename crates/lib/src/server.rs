//! Lead intake HTTP server.
//!
//! One business endpoint: POST /leads. Business rejections are reported with
//! HTTP 200 and `status: "error"` — only malformed JSON produces a non-200,
//! from the framework. GET / returns health JSON for probes.

use crate::channels::{DeliveryChannel, EmailChannel, TelegramChannel};
use crate::config::{self, Config};
use crate::dispatch::{dispatch, ChannelSet};
use crate::intake::{intake, IntakeOutcome};
use crate::lead::LeadSubmission;
use anyhow::{Context, Result};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

/// Fixed response envelope. `data` echoes the processed lead on success and
/// is null on rejection; the generic message never names the reject reason.
#[derive(Debug, Serialize)]
pub struct LeadResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub lead_id: String,
    pub data: Option<LeadSubmission>,
}

const ACCEPTED_MESSAGE: &str = "Lead received and processed";
const REJECTED_MESSAGE: &str =
    "Lead received and processed, but wasn't sent. Check logs for further information.";

/// Shared state: immutable config snapshot and the configured channels.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub channels: ChannelSet,
}

/// Build the channel set from config. A channel missing its transport
/// settings is disabled with a warning; leads requesting it are reported as
/// failed deliveries, not HTTP errors.
pub fn build_channels(config: &Config) -> ChannelSet {
    let telegram = match config::resolve_telegram_token(config) {
        Some(token) => Some(
            Arc::new(TelegramChannel::new(&config.telegram, token)) as Arc<dyn DeliveryChannel>
        ),
        None => {
            log::warn!("telegram delivery disabled: no bot token configured");
            None
        }
    };
    let password = config::resolve_smtp_password(config).unwrap_or_default();
    let email = match EmailChannel::new(&config.smtp, password) {
        Ok(channel) => Some(Arc::new(channel) as Arc<dyn DeliveryChannel>),
        Err(e) => {
            log::warn!("email delivery disabled: {}", e);
            None
        }
    };
    ChannelSet { telegram, email }
}

/// POST /leads — run intake, dispatch accepted leads, answer with the
/// envelope. Delivery failures are absorbed here by design: `status` reflects
/// validation acceptance, not delivery outcome.
async fn create_lead(
    State(state): State<AppState>,
    Json(raw): Json<LeadSubmission>,
) -> Json<LeadResponse> {
    match intake(raw, &state.config) {
        IntakeOutcome::Accepted(lead) => {
            dispatch(&lead, &state.config, &state.channels).await;
            log::info!("lead #{} handling ended", lead.id);
            Json(LeadResponse {
                status: "success",
                message: ACCEPTED_MESSAGE,
                lead_id: lead.id.clone(),
                data: Some(lead),
            })
        }
        IntakeOutcome::Rejected { lead, .. } => {
            log::info!("lead #{} handling ended", lead.id);
            Json(LeadResponse {
                status: "error",
                message: REJECTED_MESSAGE,
                lead_id: lead.id,
                data: None,
            })
        }
    }
}

/// GET / returns a simple health JSON (for probes).
async fn health_http(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "runtime": "running",
        "sources": state.config.sources.len(),
        "port": state.config.server.port,
    }))
}

/// Build the router with the given state.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_http))
        .route("/leads", post(create_lead))
        .with_state(state)
}

/// Run the server; binds to config.server.bind:config.server.port and blocks
/// until SIGINT/SIGTERM.
pub async fn run_server(config: Config) -> Result<()> {
    let channels = build_channels(&config);
    let state = AppState {
        config: Arc::new(config),
        channels,
    };
    let bind_addr = format!("{}:{}", state.config.server.bind, state.config.server.port);
    let router = app(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("leadgate listening on {}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server exited")?;
    log::info!("leadgate stopped");
    Ok(())
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received, draining in-flight requests");
}
