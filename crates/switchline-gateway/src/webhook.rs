// SPDX-FileCopyrightText: 2026 Switchline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telephony provider webhook ingestion.
//!
//! The provider posts form-encoded lifecycle callbacks. Each request
//! carries an `X-Telephony-Signature` header: lowercase hex HMAC-SHA256
//! of the raw body under the shared webhook secret. Verification is
//! fail-closed; with no secret configured every callback is rejected.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use tracing::{debug, warn};

use switchline_core::CallStatus;

use crate::server::GatewayState;

pub const SIGNATURE_HEADER: &str = "x-telephony-signature";

type HmacSha256 = Hmac<Sha256>;

/// Provider callback fields we consume. Unknown fields are ignored;
/// providers send many more than we need.
#[derive(Debug, Deserialize)]
pub struct ProviderCallback {
    #[serde(rename = "CallSid")]
    pub call_sid: String,
    #[serde(rename = "CallStatus")]
    pub call_status: String,
    #[serde(rename = "CallDuration", default)]
    pub call_duration: Option<String>,
}

/// Verify the body signature against the shared secret.
pub fn verify_signature(secret: &str, body: &[u8], signature_hex: &str) -> bool {
    let Ok(signature) = hex::decode(signature_hex) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&signature).is_ok()
}

/// Map a provider status string onto our lifecycle.
///
/// The provider says "initiated" where we say queued. Strings we do
/// not recognize map to `None` and the callback is acknowledged
/// without a status write.
pub fn map_provider_status(raw: &str) -> Option<CallStatus> {
    match raw {
        "initiated" | "queued" => Some(CallStatus::Queued),
        "ringing" => Some(CallStatus::Ringing),
        "in-progress" | "answered" => Some(CallStatus::InProgress),
        "completed" => Some(CallStatus::Completed),
        "failed" => Some(CallStatus::Failed),
        "busy" => Some(CallStatus::Busy),
        "no-answer" => Some(CallStatus::NoAnswer),
        "canceled" => Some(CallStatus::Canceled),
        _ => None,
    }
}

/// `POST /v1/webhooks/telephony`
pub async fn post_telephony_webhook(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(ref secret) = state.webhook_secret else {
        warn!("webhook received but no secret configured -- rejecting");
        return StatusCode::UNAUTHORIZED.into_response();
    };

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if !verify_signature(secret, &body, signature) {
        warn!("webhook signature verification failed");
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let callback: ProviderCallback = match serde_urlencoded::from_bytes(&body) {
        Ok(callback) => callback,
        Err(e) => {
            warn!(error = %e, "undecodable webhook body");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let Some(status) = map_provider_status(&callback.call_status) else {
        debug!(
            call_sid = callback.call_sid,
            raw = callback.call_status,
            "ignoring unrecognized provider status"
        );
        return StatusCode::NO_CONTENT.into_response();
    };

    let duration_seconds = callback
        .call_duration
        .as_deref()
        .and_then(|d| d.parse().ok())
        .unwrap_or(0);

    match state
        .broadcaster
        .set_status(&callback.call_sid, status, duration_seconds)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            warn!(call_sid = callback.call_sid, error = %e, "webhook status write failed");
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}
