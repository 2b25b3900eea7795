// SPDX-FileCopyrightText: 2026 Switchline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! REST handlers for queue coordination and call status.
//!
//! Error policy: malformed input is a 400 before the store is touched.
//! A failed store on a mutation is a 503. A failed store on a pure read
//! degrades to the "unknown" rendering instead of an error, so clients
//! behind a flaky store see "not in queue" / "queued, 0s" rather than
//! a hard failure.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use switchline_callflow::{plan_call, CallDirection, TrainingCallLauncher};
use switchline_core::{CallStatus, CallStatusUpdate, QueueEntry, SwitchlineError};

use crate::server::GatewayState;

/// Request body for joining a waiting list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnqueueRequest {
    pub participant_id: String,
    /// Opaque payload carried with the entry, handed back on claim.
    #[serde(default)]
    pub scenario_id: Option<String>,
}

/// Response for a successful enqueue.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnqueueResponse {
    /// Zero-based position in the line. 0 means front.
    pub position: usize,
}

/// Response for a position query.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionResponse {
    pub in_queue: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
}

/// Request body for posting a status update.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest {
    pub status: CallStatus,
    #[serde(default)]
    pub duration_seconds: u64,
}

/// Query parameters for the call-plan endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallPlanQuery {
    pub direction: CallDirection,
}

/// Generic error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Map a component error onto an HTTP response for a mutation.
fn mutation_error(e: SwitchlineError) -> Response {
    let (status, message) = match &e {
        SwitchlineError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        SwitchlineError::Store { .. } => (
            StatusCode::SERVICE_UNAVAILABLE,
            "store unavailable".to_string(),
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal error".to_string(),
        ),
    };
    if status.is_server_error() {
        warn!(error = %e, "request failed");
    }
    (status, Json(ErrorResponse { error: message })).into_response()
}

/// `GET /health` (public).
pub async fn get_health(State(state): State<GatewayState>) -> Response {
    let store_health = state
        .store
        .health_check()
        .await
        .unwrap_or_else(|e| switchline_core::HealthStatus::Unhealthy(e.to_string()));
    let healthy = matches!(store_health, switchline_core::HealthStatus::Healthy);
    let body = serde_json::json!({
        "status": if healthy { "ok" } else { "degraded" },
        "service": "switchline",
        "version": env!("CARGO_PKG_VERSION"),
        "uptimeSeconds": state.health.start_time.elapsed().as_secs(),
        "store": format!("{store_health:?}"),
    });
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(body)).into_response()
}

/// `POST /v1/queues/{org}/{resource}/entries`
pub async fn post_queue_entry(
    State(state): State<GatewayState>,
    Path((org, resource)): Path<(String, String)>,
    Json(request): Json<EnqueueRequest>,
) -> Response {
    match state
        .queue
        .enqueue(
            &org,
            &resource,
            &request.participant_id,
            request.scenario_id.as_deref(),
        )
        .await
    {
        Ok(position) => (StatusCode::OK, Json(EnqueueResponse { position })).into_response(),
        Err(e) => mutation_error(e),
    }
}

/// `GET /v1/queues/{org}/{resource}/entries/{participant}`
///
/// Absence is not an error; an unreachable store renders the same as
/// absence so waiting-room UIs degrade instead of erroring.
pub async fn get_queue_position(
    State(state): State<GatewayState>,
    Path((org, resource, participant)): Path<(String, String, String)>,
) -> Json<PositionResponse> {
    match state.queue.position(&org, &resource, &participant).await {
        Ok(position) => Json(PositionResponse {
            in_queue: position.is_some(),
            position,
        }),
        Err(e) => {
            warn!(error = %e, "position read failed; rendering not-in-queue");
            Json(PositionResponse {
                in_queue: false,
                position: None,
            })
        }
    }
}

/// `DELETE /v1/queues/{org}/{resource}/entries/{participant}`
pub async fn delete_queue_entry(
    State(state): State<GatewayState>,
    Path((org, resource, participant)): Path<(String, String, String)>,
) -> Response {
    match state.queue.leave(&org, &resource, &participant).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => mutation_error(e),
    }
}

/// `POST /v1/queues/{org}/{resource}/claim`
///
/// Pops the front of the line. When the claimed entry carries a
/// scenario and a launcher is configured, a training call is kicked off
/// in the background; the claim response never waits on the provider.
pub async fn post_queue_claim(
    State(state): State<GatewayState>,
    Path((org, resource)): Path<(String, String)>,
) -> Response {
    match state.queue.claim_front(&org, &resource).await {
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Ok(Some(entry)) => {
            maybe_launch(&state, &org, &entry);
            (StatusCode::OK, Json(entry)).into_response()
        }
        Err(e) => mutation_error(e),
    }
}

fn maybe_launch(state: &GatewayState, org: &str, entry: &QueueEntry) {
    let (Some(launcher), Some(scenario_id)) = (&state.launcher, &entry.scenario_id) else {
        return;
    };
    TrainingCallLauncher::spawn_launch(
        Arc::clone(launcher),
        switchline_callflow::LaunchRequest {
            organization_id: org.to_string(),
            participant_id: entry.participant_id.clone(),
            scenario_id: Some(scenario_id.clone()),
        },
    );
}

/// `GET /v1/calls/{call_id}/status`
///
/// Always yields a well-formed shape; a missing record or unreachable
/// store reads as queued with zero duration.
pub async fn get_call_status(
    State(state): State<GatewayState>,
    Path(call_id): Path<String>,
) -> Json<CallStatusUpdate> {
    match state.broadcaster.get_status(&call_id).await {
        Ok(update) => Json(update),
        Err(e) => {
            warn!(call_id, error = %e, "status read failed; rendering unknown");
            Json(CallStatusUpdate::unknown())
        }
    }
}

/// `POST /v1/calls/{call_id}/status`
pub async fn post_call_status(
    State(state): State<GatewayState>,
    Path(call_id): Path<String>,
    Json(request): Json<StatusRequest>,
) -> Response {
    match state
        .broadcaster
        .set_status(&call_id, request.status, request.duration_seconds)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => mutation_error(e),
    }
}

/// `GET /v1/organizations/{org}/call-plan?direction=...`
pub async fn get_call_plan(
    State(state): State<GatewayState>,
    Path(org): Path<String>,
    Query(query): Query<CallPlanQuery>,
) -> Response {
    let settings = state.settings.settings_for(&org);
    let plan = plan_call(query.direction, settings);
    (StatusCode::OK, Json(plan)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthConfig;
    use crate::server::HealthState;
    use std::time::Duration;
    use switchline_broadcast::CallStatusBroadcaster;
    use switchline_callflow::CallSettingsResolver;
    use switchline_core::LineStore;
    use switchline_queue::QueueCoordinator;
    use switchline_store::MemoryStore;

    async fn state() -> GatewayState {
        let store: Arc<dyn LineStore> = Arc::new(MemoryStore::new());
        store.initialize().await.unwrap();
        GatewayState {
            queue: Arc::new(QueueCoordinator::new(
                store.clone(),
                Duration::from_secs(60),
            )),
            broadcaster: Arc::new(CallStatusBroadcaster::new(
                store.clone(),
                Duration::from_secs(60),
            )),
            launcher: None,
            store,
            settings: Arc::new(CallSettingsResolver::default()),
            auth: AuthConfig { bearer_token: None },
            webhook_secret: None,
            health: HealthState {
                start_time: std::time::Instant::now(),
            },
        }
    }

    #[tokio::test]
    async fn enqueue_then_position_round_trips() {
        let state = state().await;

        let response = post_queue_entry(
            State(state.clone()),
            Path(("org-1".into(), "line-1".into())),
            Json(EnqueueRequest {
                participant_id: "user-1".into(),
                scenario_id: None,
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let Json(body) = get_queue_position(
            State(state),
            Path(("org-1".into(), "line-1".into(), "user-1".into())),
        )
        .await;
        assert!(body.in_queue);
        assert_eq!(body.position, Some(0));
    }

    #[tokio::test]
    async fn position_of_absent_participant_is_not_in_queue() {
        let state = state().await;
        let Json(body) = get_queue_position(
            State(state),
            Path(("org-1".into(), "line-1".into(), "nobody".into())),
        )
        .await;
        assert!(!body.in_queue);
        assert_eq!(body.position, None);
    }

    #[tokio::test]
    async fn blank_participant_is_rejected_before_the_store() {
        let state = state().await;
        let response = post_queue_entry(
            State(state),
            Path(("org-1".into(), "line-1".into())),
            Json(EnqueueRequest {
                participant_id: "   ".into(),
                scenario_id: None,
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn leave_is_a_204_even_when_absent() {
        let state = state().await;
        let response = delete_queue_entry(
            State(state),
            Path(("org-1".into(), "line-1".into(), "ghost".into())),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn claim_on_empty_queue_is_a_204() {
        let state = state().await;
        let response = post_queue_claim(
            State(state),
            Path(("org-1".into(), "line-1".into())),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn status_of_unknown_call_is_queued_zero() {
        let state = state().await;
        let Json(update) = get_call_status(State(state), Path("CAnope".into())).await;
        assert_eq!(update.status, CallStatus::Queued);
        assert_eq!(update.duration_seconds, 0);
    }

    #[tokio::test]
    async fn post_status_then_get_reflects_it() {
        let state = state().await;

        let response = post_call_status(
            State(state.clone()),
            Path("CA1".into()),
            Json(StatusRequest {
                status: CallStatus::InProgress,
                duration_seconds: 0,
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let Json(update) = get_call_status(State(state), Path("CA1".into())).await;
        assert_eq!(update.status, CallStatus::InProgress);
    }

    #[tokio::test]
    async fn call_plan_uses_org_settings() {
        let state = state().await;
        let response = get_call_plan(
            State(state),
            Path("org-1".into()),
            Query(CallPlanQuery {
                direction: CallDirection::Training,
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn enqueue_request_accepts_camel_case() {
        let request: EnqueueRequest =
            serde_json::from_str(r#"{"participantId":"u1","scenarioId":"s1"}"#).unwrap();
        assert_eq!(request.participant_id, "u1");
        assert_eq!(request.scenario_id.as_deref(), Some("s1"));
    }

    #[test]
    fn position_response_omits_null_position() {
        let json = serde_json::to_string(&PositionResponse {
            in_queue: false,
            position: None,
        })
        .unwrap();
        assert_eq!(json, r#"{"inQueue":false}"#);
    }

    #[test]
    fn status_request_defaults_duration() {
        let request: StatusRequest = serde_json::from_str(r#"{"status":"ringing"}"#).unwrap();
        assert_eq!(request.status, CallStatus::Ringing);
        assert_eq!(request.duration_seconds, 0);
    }
}
