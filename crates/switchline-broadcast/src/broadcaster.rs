// SPDX-FileCopyrightText: 2026 Switchline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Status upsert, point-in-time read, and live subscription.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use switchline_core::{CallStatus, CallStatusUpdate, LineStore, Subscription, SwitchlineError};

/// Keeps the single latest status of an in-flight call visible to any
/// number of readers, and pushes updates to active subscribers.
pub struct CallStatusBroadcaster {
    store: Arc<dyn LineStore>,
    retention: Duration,
}

fn status_key(call_id: &str) -> String {
    format!("call:{call_id}:status")
}

fn event_channel(call_id: &str) -> String {
    format!("call:{call_id}:events")
}

impl CallStatusBroadcaster {
    /// Create a broadcaster over an injected store handle.
    ///
    /// `retention` bounds how long a status record outlives its last
    /// update before expiring from the cache.
    pub fn new(store: Arc<dyn LineStore>, retention: Duration) -> Self {
        CallStatusBroadcaster { store, retention }
    }

    /// Upsert the call's status record and push it to active subscribers.
    ///
    /// The store write and the publish are independent: a failed publish
    /// never rolls back the record, and subscribers may observe the push
    /// before a concurrent poller observes the stored value.
    ///
    /// Writes that would move the record backward are ignored: once a
    /// record is terminal only idempotent re-writes of the same status
    /// are applied, so out-of-order webhook delivery cannot resurrect a
    /// finished call.
    pub async fn set_status(
        &self,
        call_id: &str,
        status: CallStatus,
        duration_seconds: u64,
    ) -> Result<(), SwitchlineError> {
        if call_id.trim().is_empty() {
            return Err(SwitchlineError::InvalidInput(
                "callId must not be empty".to_string(),
            ));
        }

        let update = CallStatusUpdate {
            status,
            duration_seconds,
        };
        let raw = serde_json::to_string(&update)
            .map_err(|e| SwitchlineError::Internal(format!("status encode failed: {e}")))?;

        // The transition check and the write share the store's per-key
        // atomic unit, so racing writers cannot land a stale status
        // between another writer's check and its write.
        let store_result = self
            .store
            .put_if(&status_key(call_id), &raw, self.retention, &|current| {
                let Some(raw_current) = current else {
                    return true;
                };
                match serde_json::from_str::<CallStatusUpdate>(raw_current) {
                    Ok(record) => {
                        record.status == status || record.status.can_transition_to(status)
                    }
                    // An undecodable record carries no ordering to defend.
                    Err(_) => true,
                }
            })
            .await;

        if let Ok(false) = store_result {
            debug!(call_id, incoming = %status, "ignoring out-of-order status update");
            return Ok(());
        }

        // Best-effort push, attempted regardless of the store outcome.
        match self.store.publish(&event_channel(call_id), &raw).await {
            Ok(receivers) => {
                debug!(call_id, status = %status, receivers, "status published");
            }
            Err(e) => {
                warn!(
                    call_id,
                    error = %e,
                    "status publish failed; pollers still see the stored record"
                );
            }
        }

        store_result.map(|_| ())
    }

    /// Point-in-time read of the call's latest status.
    ///
    /// Returns the default queued/0 shape when no record exists: the
    /// call has not started yet, or the record expired.
    pub async fn get_status(&self, call_id: &str) -> Result<CallStatusUpdate, SwitchlineError> {
        Ok(self
            .read_record(call_id)
            .await?
            .unwrap_or_else(CallStatusUpdate::unknown))
    }

    /// Open a live status stream for the call.
    ///
    /// Updates arrive in publish order. Events published before the
    /// subscription opened are not replayed; `get_status` gives a late
    /// joiner the latest snapshot. The stream ends itself after
    /// delivering a terminal status.
    pub async fn subscribe(&self, call_id: &str) -> Result<StatusStream, SwitchlineError> {
        let sub = self.store.subscribe(&event_channel(call_id)).await?;
        Ok(StatusStream { sub, done: false })
    }

    async fn read_record(
        &self,
        call_id: &str,
    ) -> Result<Option<CallStatusUpdate>, SwitchlineError> {
        let Some(raw) = self.store.get(&status_key(call_id)).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(update) => Ok(Some(update)),
            Err(e) => {
                warn!(call_id, error = %e, "discarding undecodable status record");
                Ok(None)
            }
        }
    }
}

/// A one-way stream of status updates for a single call.
///
/// Terminates after the first terminal update; dropping it unsubscribes
/// with no further effect.
pub struct StatusStream {
    sub: Subscription,
    done: bool,
}

impl StatusStream {
    /// Waits for the next status update.
    ///
    /// Returns `None` once a terminal update has been delivered or the
    /// underlying channel closed (callers fall back to polling).
    pub async fn next_update(&mut self) -> Option<CallStatusUpdate> {
        if self.done {
            return None;
        }
        loop {
            let raw = self.sub.recv().await?;
            match serde_json::from_str::<CallStatusUpdate>(&raw) {
                Ok(update) => {
                    if update.status.is_terminal() {
                        self.done = true;
                    }
                    return Some(update);
                }
                Err(e) => {
                    warn!(error = %e, "dropping malformed status event");
                }
            }
        }
    }
}
