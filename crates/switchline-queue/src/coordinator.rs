// SPDX-FileCopyrightText: 2026 Switchline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Queue operations against the shared store.
//!
//! The coordinator never caches queue state in-process: every read goes
//! to the store so concurrent enqueues and leaves from other handles
//! are always visible.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use switchline_core::{LineStore, QueueEntry, SwitchlineError};

/// FIFO coordinator for per-(organization, resource) waiting lists.
pub struct QueueCoordinator {
    store: Arc<dyn LineStore>,
    entry_ttl: Duration,
}

fn queue_key(organization_id: &str, resource_id: &str) -> String {
    format!("queue:{organization_id}:{resource_id}")
}

fn entry_key(organization_id: &str, resource_id: &str, participant_id: &str) -> String {
    format!("queue:{organization_id}:{resource_id}:entry:{participant_id}")
}

impl QueueCoordinator {
    /// Create a coordinator over an injected store handle.
    ///
    /// `entry_ttl` bounds how long an entry may wait before it
    /// self-expires; it also bounds the stored scenario payload.
    pub fn new(store: Arc<dyn LineStore>, entry_ttl: Duration) -> Self {
        QueueCoordinator { store, entry_ttl }
    }

    /// Join the waiting list, returning the zero-based position.
    ///
    /// Idempotent: a participant who already holds a live entry gets
    /// their existing position back instead of a duplicate entry.
    pub async fn enqueue(
        &self,
        organization_id: &str,
        resource_id: &str,
        participant_id: &str,
        scenario_id: Option<&str>,
    ) -> Result<usize, SwitchlineError> {
        validate_id("organizationId", organization_id)?;
        validate_id("resourceId", resource_id)?;
        validate_id("participantId", participant_id)?;

        let key = queue_key(organization_id, resource_id);
        let position = self
            .store
            .list_append_unique(&key, participant_id, self.entry_ttl)
            .await?;

        // Store the opaque payload alongside the entry, but never
        // overwrite it on an idempotent re-join.
        let payload_key = entry_key(organization_id, resource_id, participant_id);
        if self.store.get(&payload_key).await?.is_none() {
            let entry = QueueEntry {
                participant_id: participant_id.to_string(),
                scenario_id: scenario_id.map(str::to_string),
                enqueued_at: chrono::Utc::now().to_rfc3339(),
            };
            let raw = serde_json::to_string(&entry)
                .map_err(|e| SwitchlineError::Internal(format!("entry encode failed: {e}")))?;
            self.store.put(&payload_key, &raw, self.entry_ttl).await?;
        }

        debug!(
            organization_id,
            resource_id, participant_id, position, "participant enqueued"
        );
        Ok(position)
    }

    /// Zero-based position of the participant, or `None` if not in queue.
    ///
    /// Pure read against the store; reflects concurrent mutation from
    /// other processes.
    pub async fn position(
        &self,
        organization_id: &str,
        resource_id: &str,
        participant_id: &str,
    ) -> Result<Option<usize>, SwitchlineError> {
        let members = self
            .store
            .list_scan(&queue_key(organization_id, resource_id))
            .await?;
        Ok(members.iter().position(|m| m == participant_id))
    }

    /// Remove the participant's entry if present. Idempotent.
    pub async fn leave(
        &self,
        organization_id: &str,
        resource_id: &str,
        participant_id: &str,
    ) -> Result<(), SwitchlineError> {
        self.store
            .list_remove(&queue_key(organization_id, resource_id), participant_id)
            .await?;
        self.store
            .delete(&entry_key(organization_id, resource_id, participant_id))
            .await?;
        debug!(
            organization_id,
            resource_id, participant_id, "participant left queue"
        );
        Ok(())
    }

    /// Take the participant at the front of the line, removing their
    /// entry and returning the stored payload.
    ///
    /// This is the resource-acquisition path: the dial-out worker claims
    /// the head when the line frees up.
    pub async fn claim_front(
        &self,
        organization_id: &str,
        resource_id: &str,
    ) -> Result<Option<QueueEntry>, SwitchlineError> {
        let key = queue_key(organization_id, resource_id);
        let Some(participant_id) = self.store.list_pop_front(&key).await? else {
            return Ok(None);
        };

        let payload_key = entry_key(organization_id, resource_id, &participant_id);
        let raw = self.store.get(&payload_key).await?;
        self.store.delete(&payload_key).await?;

        let entry = match raw.as_deref().map(serde_json::from_str::<QueueEntry>) {
            Some(Ok(entry)) => entry,
            _ => {
                // Payload expired a beat before the list entry; the
                // participant id from the list is still authoritative.
                debug!(
                    organization_id,
                    resource_id, participant_id, "queue entry payload missing"
                );
                QueueEntry {
                    participant_id: participant_id.clone(),
                    scenario_id: None,
                    enqueued_at: String::new(),
                }
            }
        };
        Ok(Some(entry))
    }
}

fn validate_id(field: &str, value: &str) -> Result<(), SwitchlineError> {
    if value.trim().is_empty() {
        return Err(SwitchlineError::InvalidInput(format!(
            "{field} must not be empty"
        )));
    }
    Ok(())
}
