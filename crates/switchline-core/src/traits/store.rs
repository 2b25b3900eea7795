// SPDX-FileCopyrightText: 2026 Switchline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store trait for the shared key-value backend.
//!
//! Both coordination mechanisms ride on a single shared store exposing
//! ordered-list primitives, keyed values with expiry, and a
//! publish/subscribe channel. The Queue Coordinator and the Call Status
//! Broadcaster only ever speak through this trait and never cache, so
//! every reader observes concurrent mutations from other handles.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::SwitchlineError;
use crate::traits::adapter::PluginAdapter;

/// Shared key-value store with ordered lists, expiry, and pub/sub.
///
/// List mutations must execute atomically per key: `list_append_unique`
/// performs its duplicate check in the same atomic unit as the append,
/// so two racing enqueues for one participant cannot both insert.
#[async_trait]
pub trait LineStore: PluginAdapter {
    /// Initializes the store backend (connections, state).
    async fn initialize(&self) -> Result<(), SwitchlineError>;

    /// Closes the store backend, releasing connections and subscribers.
    async fn close(&self) -> Result<(), SwitchlineError>;

    /// Appends `member` to the ordered list at `key` unless already present,
    /// returning its zero-based position either way. The entry expires after
    /// `ttl` so abandoned members self-evict.
    async fn list_append_unique(
        &self,
        key: &str,
        member: &str,
        ttl: Duration,
    ) -> Result<usize, SwitchlineError>;

    /// Removes `member` from the ordered list at `key`. No-op if absent.
    async fn list_remove(&self, key: &str, member: &str) -> Result<(), SwitchlineError>;

    /// Removes and returns the front member of the ordered list at `key`.
    async fn list_pop_front(&self, key: &str) -> Result<Option<String>, SwitchlineError>;

    /// Returns all live members of the ordered list at `key`, front first.
    async fn list_scan(&self, key: &str) -> Result<Vec<String>, SwitchlineError>;

    /// Stores `value` under `key`, expiring after `ttl`.
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), SwitchlineError>;

    /// Stores `value` under `key` only if `allow` accepts the current
    /// value (`None` when absent or expired), returning whether the
    /// write was applied.
    ///
    /// The check and the write execute in the same atomic unit per key,
    /// so two racing conditional writes cannot interleave between them.
    async fn put_if(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
        allow: &(dyn for<'a> Fn(Option<&'a str>) -> bool + Send + Sync),
    ) -> Result<bool, SwitchlineError>;

    /// Reads the value under `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, SwitchlineError>;

    /// Deletes the value under `key`. No-op if absent.
    async fn delete(&self, key: &str) -> Result<(), SwitchlineError>;

    /// Publishes `payload` to every subscriber active on `channel` at this
    /// moment, returning how many received it. Late joiners see nothing.
    async fn publish(&self, channel: &str, payload: &str) -> Result<usize, SwitchlineError>;

    /// Opens a subscription on `channel`. Delivery starts with the next
    /// publish; dropping the subscription unsubscribes.
    async fn subscribe(&self, channel: &str) -> Result<Subscription, SwitchlineError>;
}

/// A live subscription to a pub/sub channel.
///
/// Wraps a broadcast receiver; messages published while the subscriber
/// is too slow to keep up are skipped with a warning rather than
/// terminating the stream.
pub struct Subscription {
    rx: broadcast::Receiver<String>,
}

impl Subscription {
    /// Wrap a raw broadcast receiver.
    pub fn new(rx: broadcast::Receiver<String>) -> Self {
        Subscription { rx }
    }

    /// Waits for the next published payload.
    ///
    /// Returns `None` once the channel is closed (store shut down or the
    /// last publisher handle dropped).
    pub async fn recv(&mut self) -> Option<String> {
        loop {
            match self.rx.recv().await {
                Ok(payload) => return Some(payload),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "subscriber lagged, missed events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
