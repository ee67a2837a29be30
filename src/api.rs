// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP API
//!
//! | Route | Success body |
//! |---|---|
//! | `GET /health` | `{"status":"ok"}` |
//! | `GET /blockreward/:slot` | `{"status":"vanilla"\|"mev","reward_gwei":<number>}` |
//! | `GET /syncduties/:slot` | `{"validators":[...]}` |
//!
//! Every response carries an `x-request-id` header; see [`crate::middleware`].
//!
//! Failures answer `{"error": <message>}`. Classified errors use their own
//! status code and message; anything else is logged and answered with
//! `500 {"error":"internal error"}`.

use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::{error, info, warn};

use crate::context::RequestContext;
use crate::errors::SlotscanError;
use crate::middleware::with_http_middleware;
use crate::types::duties::SyncDuties;
use crate::types::reward::BlockReward;
use crate::types::Slot;
use crate::usecase::SlotResolver;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub block_reward: Arc<dyn SlotResolver<Output = BlockReward>>,
    pub sync_duties: Arc<dyn SlotResolver<Output = SyncDuties>>,
    /// Deadline for one block reward request
    pub block_reward_timeout: Duration,
    /// Deadline for one sync duties request
    pub sync_duties_timeout: Duration,
}

/// Error response with a JSON `{"error": ...}` body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn invalid_slot() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "invalid slot".to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<SlotscanError> for ApiError {
    fn from(error: SlotscanError) -> Self {
        if error.is_classified() {
            return Self {
                status: StatusCode::from_u16(error.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                message: error.to_string(),
            };
        }
        error!(error = %error, source = ?std::error::Error::source(&error), "Internal error");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "internal error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

fn parse_slot(raw: &str) -> Result<Slot, ApiError> {
    raw.parse::<Slot>().map_err(|_| ApiError::invalid_slot())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn get_block_reward(
    State(state): State<AppState>,
    Path(raw_slot): Path<String>,
) -> Result<Json<BlockReward>, ApiError> {
    let slot = parse_slot(&raw_slot)?;
    let ctx = RequestContext::with_timeout(state.block_reward_timeout);
    let reward = state.block_reward.resolve(&ctx, slot).await?;
    Ok(Json(reward))
}

async fn get_sync_duties(
    State(state): State<AppState>,
    Path(raw_slot): Path<String>,
) -> Result<Json<SyncDuties>, ApiError> {
    let slot = parse_slot(&raw_slot)?;
    let ctx = RequestContext::with_timeout(state.sync_duties_timeout);
    let duties = state.sync_duties.resolve(&ctx, slot).await?;
    Ok(Json(duties))
}

/// Builds the API router, wrapped in the request id, access log and panic
/// recovery middleware
pub fn router(state: AppState) -> Router {
    with_http_middleware(
        Router::new()
            .route("/health", get(health))
            .route("/blockreward/:slot", get(get_block_reward))
            .route("/syncduties/:slot", get(get_sync_duties))
            .with_state(state),
    )
}

/// Starts the API server and runs it until `shutdown` resolves
///
/// In-flight requests then get `drain_timeout` to finish; requests still
/// running after that are abandoned.
pub async fn serve_api<S>(
    listener: TcpListener,
    state: AppState,
    shutdown: S,
    drain_timeout: Duration,
) -> anyhow::Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;

    info!(address = %addr, "Starting server");

    let draining = Arc::new(Notify::new());
    let signal = Arc::clone(&draining);
    let server = axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            shutdown.await;
            signal.notify_one();
        })
        .into_future();

    tokio::select! {
        result = server => result?,
        _ = async {
            draining.notified().await;
            tokio::time::sleep(drain_timeout).await;
        } => {
            warn!(
                drain_timeout_ms = drain_timeout.as_millis() as u64,
                "In-flight requests did not finish in time, stopping anyway"
            );
        }
    }

    info!("Server stopped");
    Ok(())
}
