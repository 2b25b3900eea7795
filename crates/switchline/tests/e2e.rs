// SPDX-FileCopyrightText: 2026 Switchline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end integration tests for the HTTP gateway.
//!
//! Each test assembles an isolated gateway router over a private
//! in-memory store and drives it with tower's `oneshot`. Tests are
//! independent and order-insensitive.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tower::ServiceExt;

use switchline_gateway::{build_router, AuthConfig, GatewayState, HealthState};
use switchline_test_utils::TestHarness;

const TOKEN: &str = "test-token";
const SECRET: &str = "webhook-secret";

async fn gateway() -> Router {
    let harness = TestHarness::builder().build().await.unwrap();
    build_router(GatewayState {
        queue: harness.queue.clone(),
        broadcaster: harness.broadcaster.clone(),
        launcher: None,
        store: harness.store.clone(),
        settings: harness.settings.clone(),
        auth: AuthConfig {
            bearer_token: Some(TOKEN.to_string()),
        },
        webhook_secret: Some(SECRET.to_string()),
        health: HealthState {
            start_time: std::time::Instant::now(),
        },
    })
}

fn authed(builder: axum::http::request::Builder) -> axum::http::request::Builder {
    builder.header("authorization", format!("Bearer {TOKEN}"))
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn sign(body: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(SECRET.as_bytes()).unwrap();
    mac.update(body.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

// ---- Health and auth ----

#[tokio::test]
async fn health_is_public() {
    let app = gateway().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "switchline");
}

#[tokio::test]
async fn api_rejects_missing_and_wrong_tokens() {
    let app = gateway().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v1/calls/CA1/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/calls/CA1/status")
                .header("authorization", "Bearer wrong")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---- Queue over HTTP ----

#[tokio::test]
async fn enqueue_then_read_position() {
    let app = gateway().await;

    let response = app
        .clone()
        .oneshot(
            authed(
                Request::builder()
                    .method("POST")
                    .uri("/v1/queues/org-1/line-1/entries")
                    .header("content-type", "application/json"),
            )
            .body(Body::from(r#"{"participantId":"user-1"}"#))
            .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["position"], 0);

    let response = app
        .oneshot(
            authed(
                Request::builder().uri("/v1/queues/org-1/line-1/entries/user-1"),
            )
            .body(Body::empty())
            .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["inQueue"], true);
    assert_eq!(body["position"], 0);
}

#[tokio::test]
async fn leave_then_position_reads_not_in_queue() {
    let app = gateway().await;

    let enqueue = authed(
        Request::builder()
            .method("POST")
            .uri("/v1/queues/org-1/line-1/entries")
            .header("content-type", "application/json"),
    )
    .body(Body::from(r#"{"participantId":"user-1"}"#))
    .unwrap();
    app.clone().oneshot(enqueue).await.unwrap();

    let response = app
        .clone()
        .oneshot(
            authed(
                Request::builder()
                    .method("DELETE")
                    .uri("/v1/queues/org-1/line-1/entries/user-1"),
            )
            .body(Body::empty())
            .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(
            authed(
                Request::builder().uri("/v1/queues/org-1/line-1/entries/user-1"),
            )
            .body(Body::empty())
            .unwrap(),
        )
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["inQueue"], false);
}

#[tokio::test]
async fn claim_on_empty_queue_is_no_content() {
    let app = gateway().await;
    let response = app
        .oneshot(
            authed(
                Request::builder()
                    .method("POST")
                    .uri("/v1/queues/org-1/line-1/claim"),
            )
            .body(Body::empty())
            .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn claim_returns_the_front_entry() {
    let app = gateway().await;

    for participant in ["first", "second"] {
        let request = authed(
            Request::builder()
                .method("POST")
                .uri("/v1/queues/org-1/line-1/entries")
                .header("content-type", "application/json"),
        )
        .body(Body::from(format!(
            r#"{{"participantId":"{participant}","scenarioId":"cold-open"}}"#
        )))
        .unwrap();
        app.clone().oneshot(request).await.unwrap();
    }

    let response = app
        .oneshot(
            authed(
                Request::builder()
                    .method("POST")
                    .uri("/v1/queues/org-1/line-1/claim"),
            )
            .body(Body::empty())
            .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["participantId"], "first");
    assert_eq!(body["scenarioId"], "cold-open");
}

// ---- Call status over HTTP ----

#[tokio::test]
async fn status_round_trips_and_defaults_to_queued() {
    let app = gateway().await;

    // Unknown call reads as queued with zero duration.
    let response = app
        .clone()
        .oneshot(
            authed(Request::builder().uri("/v1/calls/CAnope/status"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["status"], "queued");
    assert_eq!(body["durationSeconds"], 0);

    let response = app
        .clone()
        .oneshot(
            authed(
                Request::builder()
                    .method("POST")
                    .uri("/v1/calls/CA1/status")
                    .header("content-type", "application/json"),
            )
            .body(Body::from(r#"{"status":"completed","durationSeconds":42}"#))
            .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(
            authed(Request::builder().uri("/v1/calls/CA1/status"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["status"], "completed");
    assert_eq!(body["durationSeconds"], 42);
}

// ---- Webhook ingestion ----

#[tokio::test]
async fn signed_webhook_updates_call_status() {
    let app = gateway().await;
    let body = "CallSid=CA9&CallStatus=in-progress&CallDuration=0";

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/webhooks/telephony")
                .header("content-type", "application/x-www-form-urlencoded")
                .header("x-telephony-signature", sign(body))
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(
            authed(Request::builder().uri("/v1/calls/CA9/status"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(json_body(response).await["status"], "in-progress");
}

#[tokio::test]
async fn webhook_rejects_a_bad_signature() {
    let app = gateway().await;
    let body = "CallSid=CA9&CallStatus=completed&CallDuration=10";

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/webhooks/telephony")
                .header("content-type", "application/x-www-form-urlencoded")
                .header("x-telephony-signature", "deadbeef")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn out_of_order_webhooks_cannot_resurrect_a_finished_call() {
    let app = gateway().await;

    let completed = "CallSid=CA5&CallStatus=completed&CallDuration=30";
    let stale = "CallSid=CA5&CallStatus=ringing";

    for body in [completed, stale] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/webhooks/telephony")
                    .header("content-type", "application/x-www-form-urlencoded")
                    .header("x-telephony-signature", sign(body))
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    let response = app
        .oneshot(
            authed(Request::builder().uri("/v1/calls/CA5/status"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["status"], "completed");
    assert_eq!(body["durationSeconds"], 30);
}

// ---- Call plan ----

#[tokio::test]
async fn call_plan_for_training_dials_the_simulator() {
    let app = gateway().await;
    let response = app
        .oneshot(
            authed(
                Request::builder()
                    .uri("/v1/organizations/org-1/call-plan?direction=training"),
            )
            .body(Body::empty())
            .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["dial"], "simulator");
    assert_eq!(body["record"], true);
    assert_eq!(body["transcribe"], true);
}
