// SPDX-FileCopyrightText: 2026 Switchline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Live call status over Server-Sent Events.
//!
//! One event per status update, named `status`, with the wire payload
//! `{"status": "...", "durationSeconds": n}`. The server ends the
//! stream after a terminal status; events published before the client
//! connected are not replayed.

use std::convert::Infallible;

use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, KeepAliveStream, Sse},
};
use futures::stream::{BoxStream, StreamExt};
use tracing::warn;

use switchline_broadcast::StatusStream;

use crate::server::GatewayState;

/// `GET /v1/calls/{call_id}/events`
pub async fn get_call_events(
    State(state): State<GatewayState>,
    Path(call_id): Path<String>,
) -> Sse<KeepAliveStream<BoxStream<'static, Result<Event, Infallible>>>> {
    let stream = match state.broadcaster.subscribe(&call_id).await {
        Ok(stream) => status_events(stream),
        Err(e) => {
            // Degraded store: hand back an immediately-ending stream so
            // the client falls back to polling the status endpoint.
            warn!(call_id, error = %e, "subscribe failed; returning empty event stream");
            futures::stream::empty().boxed()
        }
    };
    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Adapt a status subscription into SSE events.
///
/// Ends when the subscription does, which includes the broadcaster
/// closing it after a terminal update.
pub fn status_events(stream: StatusStream) -> BoxStream<'static, Result<Event, Infallible>> {
    futures::stream::unfold(stream, |mut stream| async move {
        let update = stream.next_update().await?;
        let payload = serde_json::json!({
            "status": update.status,
            "durationSeconds": update.duration_seconds,
        });
        let event = Event::default().event("status").data(payload.to_string());
        Some((Ok(event), stream))
    })
    .boxed()
}
