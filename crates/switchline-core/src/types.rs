// SPDX-FileCopyrightText: 2026 Switchline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across Switchline components.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter behind the [`PluginAdapter`](crate::PluginAdapter) trait.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Store,
    Telephony,
}

/// Lifecycle status of a call, as reported by the telephony provider.
///
/// Wire names are kebab-case (`in-progress`, `no-answer`) to match the
/// provider's status callback vocabulary. Transitions form a partial
/// order toward the terminal set: `queued` -> `ringing` -> `in-progress`
/// -> terminal, where any forward step may be skipped (`ringing` can go
/// straight to `no-answer` or `busy`). Terminal states never transition.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum CallStatus {
    Queued,
    Ringing,
    InProgress,
    Completed,
    Failed,
    Busy,
    NoAnswer,
    Canceled,
}

impl CallStatus {
    /// Returns true if no further transition can occur from this status.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            CallStatus::Completed
                | CallStatus::Failed
                | CallStatus::Busy
                | CallStatus::NoAnswer
                | CallStatus::Canceled
        )
    }

    /// Position of this status along the partial order.
    fn rank(self) -> u8 {
        match self {
            CallStatus::Queued => 0,
            CallStatus::Ringing => 1,
            CallStatus::InProgress => 2,
            _ => 3,
        }
    }

    /// Returns true if a record in this status may move to `next`.
    ///
    /// Transitions only go forward along the partial order, and terminal
    /// states accept no transition at all. A status never transitions to
    /// itself; idempotent re-writes are the caller's concern.
    pub fn can_transition_to(self, next: CallStatus) -> bool {
        !self.is_terminal() && next.rank() > self.rank()
    }
}

/// The latest known status and duration of a call.
///
/// This is the exact payload shape pushed to stream subscribers and
/// returned to pollers, one JSON object per event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallStatusUpdate {
    /// Current lifecycle status.
    pub status: CallStatus,
    /// Call duration in seconds. Meaningful only once the call has connected.
    pub duration_seconds: u64,
}

impl CallStatusUpdate {
    /// The default shape for a call with no stored record: not yet
    /// started, or the record expired.
    pub fn unknown() -> Self {
        CallStatusUpdate {
            status: CallStatus::Queued,
            duration_seconds: 0,
        }
    }
}

/// A participant's entry in a training-line waiting list.
///
/// Stored alongside the ordered queue so the dial-out worker that claims
/// the front of the line knows which scenario to launch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntry {
    /// The waiting participant.
    pub participant_id: String,
    /// Opaque training scenario payload, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario_id: Option<String>,
    /// ISO 8601 enqueue timestamp (ordering is by list position, this is informational).
    pub enqueued_at: String,
}
