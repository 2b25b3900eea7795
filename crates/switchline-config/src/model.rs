// SPDX-FileCopyrightText: 2026 Switchline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Switchline.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject
//! unrecognized config keys at startup, providing actionable error
//! messages.

use serde::{Deserialize, Serialize};

/// Top-level Switchline configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to
/// sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SwitchlineConfig {
    /// Service identity and logging.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Gateway HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Shared store settings (queue TTLs, status retention).
    #[serde(default)]
    pub store: StoreConfig,

    /// Telephony provider settings.
    #[serde(default)]
    pub telephony: TelephonyConfig,

    /// Default call handling applied to organizations without overrides.
    #[serde(default)]
    pub calls: CallsConfig,

    /// Per-organization call handling overrides.
    #[serde(default)]
    pub organizations: Vec<OrganizationConfig>,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name of the service instance.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "switchline".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Gateway HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Bearer token for the /v1 API. `None` rejects all API requests
    /// (fail-closed).
    #[serde(default)]
    pub bearer_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            bearer_token: None,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8470
}

/// Shared store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Store backend to use. Only "memory" is compiled in.
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Seconds a queue entry may wait before self-expiring.
    #[serde(default = "default_queue_entry_ttl_secs")]
    pub queue_entry_ttl_secs: u64,

    /// Seconds a call status record is retained after its last update.
    #[serde(default = "default_status_retention_secs")]
    pub status_retention_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            queue_entry_ttl_secs: default_queue_entry_ttl_secs(),
            status_retention_secs: default_status_retention_secs(),
        }
    }
}

fn default_backend() -> String {
    "memory".to_string()
}

fn default_queue_entry_ttl_secs() -> u64 {
    300
}

fn default_status_retention_secs() -> u64 {
    3600
}

/// Telephony provider configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelephonyConfig {
    /// Provider API base URL. `None` disables outbound call placement.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Provider account identifier.
    #[serde(default)]
    pub account_id: Option<String>,

    /// Provider API auth token.
    #[serde(default)]
    pub auth_token: Option<String>,

    /// Shared secret for verifying inbound webhook signatures.
    /// `None` rejects all webhooks (fail-closed).
    #[serde(default)]
    pub webhook_secret: Option<String>,
}

/// Default call handling configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CallsConfig {
    /// Record live calls.
    #[serde(default)]
    pub record_calls: bool,

    /// Transcribe recorded calls.
    #[serde(default)]
    pub transcribe_calls: bool,

    /// Forward inbound calls to this number instead of ringing a rep.
    #[serde(default)]
    pub forward_number: Option<String>,
}

/// Per-organization call handling override.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OrganizationConfig {
    /// Organization identifier.
    pub id: String,

    /// Record live calls for this organization.
    #[serde(default)]
    pub record_calls: bool,

    /// Transcribe recorded calls for this organization.
    #[serde(default)]
    pub transcribe_calls: bool,

    /// Forward inbound calls for this organization.
    #[serde(default)]
    pub forward_number: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_complete() {
        let config = SwitchlineConfig::default();
        assert_eq!(config.service.name, "switchline");
        assert_eq!(config.service.log_level, "info");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8470);
        assert!(config.server.bearer_token.is_none());
        assert_eq!(config.store.backend, "memory");
        assert_eq!(config.store.queue_entry_ttl_secs, 300);
        assert_eq!(config.store.status_retention_secs, 3600);
        assert!(config.telephony.base_url.is_none());
        assert!(config.organizations.is_empty());
    }

    #[test]
    fn config_serializes_and_deserializes() {
        let config = SwitchlineConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let back: SwitchlineConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(back.server.port, config.server.port);
    }
}
