// SPDX-FileCopyrightText: 2026 Switchline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the coordination stack over an in-memory
//! store: queue coordinator, status broadcaster, and settings resolver,
//! with TTLs short enough to exercise expiry under paused tokio time.

use std::sync::Arc;
use std::time::Duration;

use switchline_broadcast::CallStatusBroadcaster;
use switchline_callflow::{CallSettingsResolver, OrgCallSettings};
use switchline_core::{LineStore, SwitchlineError};
use switchline_queue::QueueCoordinator;
use switchline_store::MemoryStore;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    entry_ttl: Duration,
    retention: Duration,
    default_settings: OrgCallSettings,
    org_settings: Vec<(String, OrgCallSettings)>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            entry_ttl: Duration::from_secs(300),
            retention: Duration::from_secs(3600),
            default_settings: OrgCallSettings::default(),
            org_settings: Vec::new(),
        }
    }

    /// Override the queue entry TTL.
    pub fn with_entry_ttl(mut self, ttl: Duration) -> Self {
        self.entry_ttl = ttl;
        self
    }

    /// Override the status record retention window.
    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    /// Set the service-wide default call settings.
    pub fn with_default_settings(mut self, settings: OrgCallSettings) -> Self {
        self.default_settings = settings;
        self
    }

    /// Add a per-organization settings override.
    pub fn with_org_settings(mut self, org: &str, settings: OrgCallSettings) -> Self {
        self.org_settings.push((org.to_string(), settings));
        self
    }

    /// Build the test harness, initializing the in-memory store.
    pub async fn build(self) -> Result<TestHarness, SwitchlineError> {
        let store: Arc<dyn LineStore> = Arc::new(MemoryStore::new());
        store.initialize().await?;

        let queue = Arc::new(QueueCoordinator::new(store.clone(), self.entry_ttl));
        let broadcaster = Arc::new(CallStatusBroadcaster::new(store.clone(), self.retention));
        let settings = Arc::new(CallSettingsResolver::new(
            self.default_settings,
            self.org_settings,
        ));

        Ok(TestHarness {
            store,
            queue,
            broadcaster,
            settings,
        })
    }
}

/// A complete coordination stack over a private in-memory store.
pub struct TestHarness {
    /// The shared store every component writes through.
    pub store: Arc<dyn LineStore>,
    /// FIFO waiting-list coordinator.
    pub queue: Arc<QueueCoordinator>,
    /// Status cache and fan-out.
    pub broadcaster: Arc<CallStatusBroadcaster>,
    /// Per-organization call settings.
    pub settings: Arc<CallSettingsResolver>,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Enqueue a participant with no scenario, returning the position.
    pub async fn join(
        &self,
        org: &str,
        resource: &str,
        participant: &str,
    ) -> Result<usize, SwitchlineError> {
        self.queue.enqueue(org, resource, participant, None).await
    }
}
