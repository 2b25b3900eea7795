// SPDX-FileCopyrightText: 2026 Switchline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state. Every backend handle
//! is constructed once at process startup and injected here; handlers
//! never reach for globals.

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;

use switchline_broadcast::CallStatusBroadcaster;
use switchline_callflow::{CallSettingsResolver, TrainingCallLauncher};
use switchline_core::{LineStore, SwitchlineError};
use switchline_queue::QueueCoordinator;

use crate::auth::{auth_middleware, AuthConfig};
use crate::handlers;
use crate::sse;
use crate::webhook;

/// Health state for the unauthenticated health endpoint.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// FIFO waiting-list coordinator.
    pub queue: Arc<QueueCoordinator>,
    /// Call status cache + fan-out.
    pub broadcaster: Arc<CallStatusBroadcaster>,
    /// Outbound training-call launcher. `None` disables call placement.
    pub launcher: Option<Arc<TrainingCallLauncher>>,
    /// Store handle, used by the health endpoint only.
    pub store: Arc<dyn LineStore>,
    /// Per-organization call handling settings.
    pub settings: Arc<CallSettingsResolver>,
    /// Authentication configuration.
    pub auth: AuthConfig,
    /// Shared secret for webhook signature verification.
    pub webhook_secret: Option<String>,
    /// Health state for the unauthenticated endpoint.
    pub health: HealthState,
}

/// Gateway server configuration (mirrors ServerConfig from switchline-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Assemble the gateway router.
///
/// - `/health` is public.
/// - `/v1/webhooks/telephony` authenticates via its HMAC signature.
/// - Everything else under `/v1` requires the bearer token.
pub fn build_router(state: GatewayState) -> Router {
    let auth_state = state.auth.clone();

    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    let webhook_routes = Router::new()
        .route("/v1/webhooks/telephony", post(webhook::post_telephony_webhook))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route(
            "/v1/queues/{org}/{resource}/entries",
            post(handlers::post_queue_entry),
        )
        .route(
            "/v1/queues/{org}/{resource}/entries/{participant}",
            get(handlers::get_queue_position).delete(handlers::delete_queue_entry),
        )
        .route(
            "/v1/queues/{org}/{resource}/claim",
            post(handlers::post_queue_claim),
        )
        .route(
            "/v1/calls/{call_id}/status",
            get(handlers::get_call_status).post(handlers::post_call_status),
        )
        .route("/v1/calls/{call_id}/events", get(sse::get_call_events))
        .route(
            "/v1/organizations/{org}/call-plan",
            get(handlers::get_call_plan),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(webhook_routes)
        .merge(api_routes)
        .layer(CorsLayer::permissive())
}

/// Start the gateway HTTP server.
///
/// Serves until `shutdown` is cancelled, then drains in-flight
/// connections and returns.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), SwitchlineError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| SwitchlineError::Gateway {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .map_err(|e| SwitchlineError::Gateway {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}
