// SPDX-FileCopyrightText: 2026 Switchline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses, non-zero TTLs, and
//! consistent telephony settings.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::SwitchlineConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)`
/// with all collected validation errors (does not fail fast).
pub fn validate_config(config: &SwitchlineConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Validate host is not empty and looks like an IP or hostname.
    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!(
                    "server.host `{host}` is not a valid IP address or hostname"
                ),
            });
        }
    }

    // Only the compiled-in store backend is accepted.
    if config.store.backend != "memory" {
        errors.push(ConfigError::Validation {
            message: format!(
                "store.backend `{}` is not supported (available: memory)",
                config.store.backend
            ),
        });
    }

    if config.store.queue_entry_ttl_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "store.queue_entry_ttl_secs must be at least 1".to_string(),
        });
    }

    if config.store.status_retention_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "store.status_retention_secs must be at least 1".to_string(),
        });
    }

    // Telephony settings must be complete when call placement is enabled.
    if config.telephony.base_url.is_some() {
        if config
            .telephony
            .account_id
            .as_deref()
            .unwrap_or("")
            .trim()
            .is_empty()
        {
            errors.push(ConfigError::Validation {
                message: "telephony.account_id is required when telephony.base_url is set"
                    .to_string(),
            });
        }
        if config
            .telephony
            .auth_token
            .as_deref()
            .unwrap_or("")
            .trim()
            .is_empty()
        {
            errors.push(ConfigError::Validation {
                message: "telephony.auth_token is required when telephony.base_url is set"
                    .to_string(),
            });
        }
    }

    // Organization ids must be present and unique.
    let mut seen_ids = HashSet::new();
    for (i, org) in config.organizations.iter().enumerate() {
        if org.id.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("organizations[{i}].id must not be empty"),
            });
        } else if !seen_ids.insert(&org.id) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "duplicate organization id `{}` in [[organizations]] array",
                    org.id
                ),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OrganizationConfig;

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&SwitchlineConfig::default()).is_ok());
    }

    #[test]
    fn empty_host_is_rejected() {
        let mut config = SwitchlineConfig::default();
        config.server.host = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.to_string().contains("server.host")));
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let mut config = SwitchlineConfig::default();
        config.store.backend = "redis".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.to_string().contains("store.backend")));
    }

    #[test]
    fn zero_ttls_are_rejected() {
        let mut config = SwitchlineConfig::default();
        config.store.queue_entry_ttl_secs = 0;
        config.store.status_retention_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn telephony_base_url_requires_credentials() {
        let mut config = SwitchlineConfig::default();
        config.telephony.base_url = Some("https://api.example.com".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2); // account_id and auth_token both missing

        config.telephony.account_id = Some("AC42".to_string());
        config.telephony.auth_token = Some("token".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn duplicate_organization_ids_are_rejected() {
        let mut config = SwitchlineConfig::default();
        config.organizations = vec![
            OrganizationConfig {
                id: "org1".to_string(),
                ..Default::default()
            },
            OrganizationConfig {
                id: "org1".to_string(),
                ..Default::default()
            },
        ];
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.to_string().contains("duplicate")));
    }
}
