// SPDX-FileCopyrightText: 2026 Switchline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy: `./switchline.toml` >
//! `~/.config/switchline/switchline.toml` >
//! `/etc/switchline/switchline.toml`, with environment variable
//! overrides via the `SWITCHLINE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::SwitchlineConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/switchline/switchline.toml` (system-wide)
/// 3. `~/.config/switchline/switchline.toml` (user XDG config)
/// 4. `./switchline.toml` (local directory)
/// 5. `SWITCHLINE_*` environment variables
pub fn load_config() -> Result<SwitchlineConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<SwitchlineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SwitchlineConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SwitchlineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SwitchlineConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SwitchlineConfig::default()))
        .merge(Toml::file("/etc/switchline/switchline.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("switchline/switchline.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("switchline.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity
/// with underscore-containing key names: `SWITCHLINE_SERVER_BEARER_TOKEN`
/// must map to `server.bearer_token`, not `server.bearer.token`.
fn env_provider() -> Env {
    Env::prefixed("SWITCHLINE_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: SWITCHLINE_STORE_QUEUE_ENTRY_TTL_SECS -> "store_queue_entry_ttl_secs"
        let mapped = key
            .as_str()
            .replacen("service_", "service.", 1)
            .replacen("server_", "server.", 1)
            .replacen("store_", "store.", 1)
            .replacen("telephony_", "telephony.", 1)
            .replacen("calls_", "calls.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_yields_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.service.name, "switchline");
        assert_eq!(config.server.port, 8470);
    }

    #[test]
    fn toml_values_override_defaults() {
        let config = load_config_from_str(
            r#"
            [server]
            port = 9000
            bearer_token = "s3cret"

            [store]
            queue_entry_ttl_secs = 30
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bearer_token.as_deref(), Some("s3cret"));
        assert_eq!(config.store.queue_entry_ttl_secs, 30);
        // Untouched sections keep their defaults.
        assert_eq!(config.store.status_retention_secs, 3600);
    }

    #[test]
    fn organizations_array_parses() {
        let config = load_config_from_str(
            r#"
            [[organizations]]
            id = "org1"
            record_calls = true
            transcribe_calls = true

            [[organizations]]
            id = "org2"
            forward_number = "+15550001111"
            "#,
        )
        .unwrap();
        assert_eq!(config.organizations.len(), 2);
        assert!(config.organizations[0].record_calls);
        assert_eq!(
            config.organizations[1].forward_number.as_deref(),
            Some("+15550001111")
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = load_config_from_str(
            r#"
            [server]
            prot = 9000
            "#,
        );
        assert!(result.is_err());
    }
}
