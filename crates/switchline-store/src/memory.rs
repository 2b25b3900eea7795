// SPDX-FileCopyrightText: 2026 Switchline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory store backend implementing the [`LineStore`] trait.
//!
//! Expiry is lazy: expired list members and keys are pruned on the next
//! access of the same key, never by a background task. Pub/sub channels
//! are created on first subscribe and dropped once a publish finds no
//! remaining subscribers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::debug;

use switchline_core::{
    AdapterType, HealthStatus, LineStore, PluginAdapter, Subscription, SwitchlineError,
};

/// Buffered events per pub/sub channel before slow subscribers lag.
const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
struct ListEntry {
    member: String,
    expires_at: Instant,
}

#[derive(Debug, Clone)]
struct KvEntry {
    value: String,
    expires_at: Instant,
}

/// In-memory shared store.
///
/// A single instance is constructed at process startup and injected into
/// every component that needs it; all mutation goes through its per-key
/// atomic primitives.
pub struct MemoryStore {
    lists: DashMap<String, Vec<ListEntry>>,
    kv: DashMap<String, KvEntry>,
    channels: DashMap<String, broadcast::Sender<String>>,
    open: AtomicBool,
}

impl MemoryStore {
    /// Create a new, uninitialized store handle.
    pub fn new() -> Self {
        MemoryStore {
            lists: DashMap::new(),
            kv: DashMap::new(),
            channels: DashMap::new(),
            open: AtomicBool::new(false),
        }
    }

    fn ensure_open(&self) -> Result<(), SwitchlineError> {
        if self.open.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(SwitchlineError::Store {
                source: "store not initialized -- call initialize() first".into(),
            })
        }
    }

    fn prune(entries: &mut Vec<ListEntry>, now: Instant) {
        entries.retain(|e| e.expires_at > now);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Store
    }

    async fn health_check(&self) -> Result<HealthStatus, SwitchlineError> {
        if self.open.load(Ordering::Acquire) {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Unhealthy("store closed".to_string()))
        }
    }

    async fn shutdown(&self) -> Result<(), SwitchlineError> {
        self.close().await
    }
}

#[async_trait]
impl LineStore for MemoryStore {
    async fn initialize(&self) -> Result<(), SwitchlineError> {
        self.open.store(true, Ordering::Release);
        debug!("memory store initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), SwitchlineError> {
        self.open.store(false, Ordering::Release);
        // Dropping the senders closes every live subscription.
        self.channels.clear();
        self.lists.clear();
        self.kv.clear();
        debug!("memory store closed");
        Ok(())
    }

    async fn list_append_unique(
        &self,
        key: &str,
        member: &str,
        ttl: Duration,
    ) -> Result<usize, SwitchlineError> {
        self.ensure_open()?;
        let now = Instant::now();
        // The entry guard holds the key's lock for the whole
        // check-then-append, so racing appends cannot both insert.
        let mut entries = self.lists.entry(key.to_string()).or_default();
        Self::prune(&mut entries, now);

        if let Some(position) = entries.iter().position(|e| e.member == member) {
            return Ok(position);
        }

        entries.push(ListEntry {
            member: member.to_string(),
            expires_at: now + ttl,
        });
        Ok(entries.len() - 1)
    }

    async fn list_remove(&self, key: &str, member: &str) -> Result<(), SwitchlineError> {
        self.ensure_open()?;
        if let Some(mut entries) = self.lists.get_mut(key) {
            let now = Instant::now();
            Self::prune(&mut entries, now);
            entries.retain(|e| e.member != member);
        }
        Ok(())
    }

    async fn list_pop_front(&self, key: &str) -> Result<Option<String>, SwitchlineError> {
        self.ensure_open()?;
        let Some(mut entries) = self.lists.get_mut(key) else {
            return Ok(None);
        };
        let now = Instant::now();
        Self::prune(&mut entries, now);
        if entries.is_empty() {
            Ok(None)
        } else {
            Ok(Some(entries.remove(0).member))
        }
    }

    async fn list_scan(&self, key: &str) -> Result<Vec<String>, SwitchlineError> {
        self.ensure_open()?;
        let Some(mut entries) = self.lists.get_mut(key) else {
            return Ok(Vec::new());
        };
        let now = Instant::now();
        Self::prune(&mut entries, now);
        Ok(entries.iter().map(|e| e.member.clone()).collect())
    }

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), SwitchlineError> {
        self.ensure_open()?;
        self.kv.insert(
            key.to_string(),
            KvEntry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn put_if(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
        allow: &(dyn for<'a> Fn(Option<&'a str>) -> bool + Send + Sync),
    ) -> Result<bool, SwitchlineError> {
        self.ensure_open()?;
        let now = Instant::now();
        // The entry guard holds the key's lock across check and write,
        // mirroring list_append_unique.
        match self.kv.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                let current = (occupied.get().expires_at > now)
                    .then(|| occupied.get().value.clone());
                if !allow(current.as_deref()) {
                    return Ok(false);
                }
                occupied.insert(KvEntry {
                    value: value.to_string(),
                    expires_at: now + ttl,
                });
                Ok(true)
            }
            Entry::Vacant(vacant) => {
                if !allow(None) {
                    return Ok(false);
                }
                vacant.insert(KvEntry {
                    value: value.to_string(),
                    expires_at: now + ttl,
                });
                Ok(true)
            }
        }
    }

    async fn get(&self, key: &str) -> Result<Option<String>, SwitchlineError> {
        self.ensure_open()?;
        let now = Instant::now();
        let value = self.kv.get(key).and_then(|entry| {
            (entry.expires_at > now).then(|| entry.value.clone())
        });
        if value.is_none() {
            // Lazy expiry: evict a dead entry on read.
            self.kv.remove_if(key, |_, entry| entry.expires_at <= now);
        }
        Ok(value)
    }

    async fn delete(&self, key: &str) -> Result<(), SwitchlineError> {
        self.ensure_open()?;
        self.kv.remove(key);
        Ok(())
    }

    async fn publish(&self, channel: &str, payload: &str) -> Result<usize, SwitchlineError> {
        self.ensure_open()?;
        let Some(sender) = self.channels.get(channel) else {
            return Ok(0);
        };
        match sender.send(payload.to_string()) {
            Ok(receivers) => Ok(receivers),
            Err(_) => {
                // No live subscribers remain; drop the channel so it
                // does not accumulate per call id.
                drop(sender);
                self.channels.remove(channel);
                Ok(0)
            }
        }
    }

    async fn subscribe(&self, channel: &str) -> Result<Subscription, SwitchlineError> {
        self.ensure_open()?;
        let sender = self
            .channels
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0);
        Ok(Subscription::new(sender.subscribe()))
    }
}
