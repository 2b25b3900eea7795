// SPDX-FileCopyrightText: 2026 Switchline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `switchline serve` command implementation.
//!
//! Wires the in-memory store, queue coordinator, status broadcaster,
//! optional telephony launcher, and the HTTP gateway, then serves until
//! a shutdown signal arrives.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use switchline_broadcast::CallStatusBroadcaster;
use switchline_callflow::{CallSettingsResolver, OrgCallSettings, TrainingCallLauncher};
use switchline_config::SwitchlineConfig;
use switchline_core::{LineStore, SwitchlineError};
use switchline_gateway::{AuthConfig, GatewayState, HealthState, ServerConfig};
use switchline_queue::QueueCoordinator;
use switchline_store::MemoryStore;

use crate::shutdown;

/// Runs the `switchline serve` command.
pub async fn run_serve(config: SwitchlineConfig) -> Result<(), SwitchlineError> {
    init_tracing(&config.service.log_level);

    info!("starting switchline serve");

    // Initialize the shared store. Validation has already pinned the
    // backend to "memory"; the match stays so a second backend slots in.
    let store: Arc<dyn LineStore> = match config.store.backend.as_str() {
        "memory" => Arc::new(MemoryStore::new()),
        other => {
            return Err(SwitchlineError::Config(format!(
                "unsupported store backend '{other}'"
            )));
        }
    };
    store.initialize().await?;
    info!(backend = config.store.backend.as_str(), "store initialized");

    let queue = Arc::new(QueueCoordinator::new(
        store.clone(),
        Duration::from_secs(config.store.queue_entry_ttl_secs),
    ));
    let broadcaster = Arc::new(CallStatusBroadcaster::new(
        store.clone(),
        Duration::from_secs(config.store.status_retention_secs),
    ));
    let settings = Arc::new(build_settings_resolver(&config));

    // Telephony launcher is optional; without it the claim path still
    // works, it just never places calls.
    let launcher = build_launcher(&config);
    if launcher.is_some() {
        info!("telephony launcher configured");
    } else {
        info!("telephony launcher not configured; call placement disabled");
    }

    if config.server.bearer_token.is_none() {
        warn!("no bearer token configured; all API requests will be rejected");
    }
    if config.telephony.webhook_secret.is_none() {
        warn!("no webhook secret configured; provider callbacks will be rejected");
    }

    let state = GatewayState {
        queue,
        broadcaster,
        launcher,
        store: store.clone(),
        settings,
        auth: AuthConfig {
            bearer_token: config.server.bearer_token.clone(),
        },
        webhook_secret: config.telephony.webhook_secret.clone(),
        health: HealthState {
            start_time: std::time::Instant::now(),
        },
    };

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };

    let cancel = shutdown::install_signal_handler();
    switchline_gateway::start_server(&server_config, state, cancel).await?;

    store.close().await?;
    info!("switchline serve shutdown complete");
    Ok(())
}

fn build_settings_resolver(config: &SwitchlineConfig) -> CallSettingsResolver {
    let defaults = OrgCallSettings {
        record_calls: config.calls.record_calls,
        transcribe_calls: config.calls.transcribe_calls,
        forward_number: config.calls.forward_number.clone(),
    };
    let overrides = config.organizations.iter().map(|org| {
        (
            org.id.clone(),
            OrgCallSettings {
                record_calls: org.record_calls,
                transcribe_calls: org.transcribe_calls,
                forward_number: org.forward_number.clone(),
            },
        )
    });
    CallSettingsResolver::new(defaults, overrides)
}

fn build_launcher(config: &SwitchlineConfig) -> Option<Arc<TrainingCallLauncher>> {
    let telephony = &config.telephony;
    // Validation guarantees these come as a set.
    let (base_url, account_id, auth_token) = (
        telephony.base_url.as_deref()?,
        telephony.account_id.as_deref()?,
        telephony.auth_token.as_deref()?,
    );
    Some(Arc::new(TrainingCallLauncher::new(
        base_url, account_id, auth_token,
    )))
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("switchline={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launcher_requires_the_full_telephony_set() {
        let mut config = SwitchlineConfig::default();
        assert!(build_launcher(&config).is_none());

        config.telephony.base_url = Some("https://api.example.com".into());
        assert!(build_launcher(&config).is_none());

        config.telephony.account_id = Some("AC1".into());
        config.telephony.auth_token = Some("tok".into());
        assert!(build_launcher(&config).is_some());
    }

    #[test]
    fn org_overrides_take_precedence_over_defaults() {
        let mut config = SwitchlineConfig::default();
        config.calls.record_calls = true;
        config.organizations.push(switchline_config::model::OrganizationConfig {
            id: "org-a".into(),
            record_calls: false,
            transcribe_calls: false,
            forward_number: None,
        });

        let resolver = build_settings_resolver(&config);
        assert!(!resolver.settings_for("org-a").record_calls);
        assert!(resolver.settings_for("org-b").record_calls);
    }
}
