// SPDX-FileCopyrightText: 2026 Switchline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Training-call kickoff against the telephony provider.
//!
//! The kickoff is never fire-and-forget: every attempt carries a
//! correlation id, failures are retried exactly once, and the spawned
//! variant logs the outcome instead of detaching an unobserved task.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use switchline_core::{AdapterType, HealthStatus, PluginAdapter, SwitchlineError};

/// Dial request for one training call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchRequest {
    pub organization_id: String,
    pub participant_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario_id: Option<String>,
}

/// Provider acknowledgement of a placed call.
#[derive(Debug, Clone)]
pub struct LaunchReceipt {
    /// Provider-assigned call identifier; keys the status record.
    pub call_id: String,
    /// Correlation id attached to the kickoff request and its logs.
    pub correlation_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LaunchResponse {
    call_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LaunchBody<'a> {
    #[serde(flatten)]
    request: &'a LaunchRequest,
    correlation_id: &'a str,
}

/// HTTP client for the telephony provider's call-placement API.
pub struct TrainingCallLauncher {
    http: reqwest::Client,
    base_url: String,
    account_id: String,
    auth_token: String,
}

impl TrainingCallLauncher {
    /// Create a launcher for the given provider account.
    pub fn new(base_url: &str, account_id: &str, auth_token: &str) -> Self {
        TrainingCallLauncher {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            account_id: account_id.to_string(),
            auth_token: auth_token.to_string(),
        }
    }

    /// Place a training call, retrying once on failure.
    pub async fn launch(&self, request: &LaunchRequest) -> Result<LaunchReceipt, SwitchlineError> {
        let correlation_id = uuid::Uuid::new_v4().to_string();

        match self.attempt(request, &correlation_id).await {
            Ok(receipt) => Ok(receipt),
            Err(first) => {
                warn!(
                    correlation_id,
                    error = %first,
                    "training call kickoff failed, retrying once"
                );
                self.attempt(request, &correlation_id).await
            }
        }
    }

    /// Spawn the kickoff as a task whose failure is observed and logged.
    pub fn spawn_launch(self: std::sync::Arc<Self>, request: LaunchRequest) {
        tokio::spawn(async move {
            match self.launch(&request).await {
                Ok(receipt) => {
                    info!(
                        call_id = %receipt.call_id,
                        correlation_id = %receipt.correlation_id,
                        participant_id = %request.participant_id,
                        "training call placed"
                    );
                }
                Err(e) => {
                    error!(
                        participant_id = %request.participant_id,
                        error = %e,
                        "training call kickoff failed after retry"
                    );
                }
            }
        });
    }

    async fn attempt(
        &self,
        request: &LaunchRequest,
        correlation_id: &str,
    ) -> Result<LaunchReceipt, SwitchlineError> {
        let url = format!(
            "{}/v1/accounts/{}/calls",
            self.base_url, self.account_id
        );
        let body = LaunchBody {
            request,
            correlation_id,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.auth_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| SwitchlineError::Telephony {
                message: format!("call placement request failed ({correlation_id})"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SwitchlineError::Telephony {
                message: format!("provider returned {status} ({correlation_id})"),
                source: None,
            });
        }

        let parsed: LaunchResponse =
            response
                .json()
                .await
                .map_err(|e| SwitchlineError::Telephony {
                    message: format!("undecodable provider response ({correlation_id})"),
                    source: Some(Box::new(e)),
                })?;

        Ok(LaunchReceipt {
            call_id: parsed.call_id,
            correlation_id: correlation_id.to_string(),
        })
    }
}

#[async_trait]
impl PluginAdapter for TrainingCallLauncher {
    fn name(&self) -> &str {
        "telephony-http"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Telephony
    }

    async fn health_check(&self) -> Result<HealthStatus, SwitchlineError> {
        if self.base_url.is_empty() || self.account_id.is_empty() {
            Ok(HealthStatus::Unhealthy(
                "telephony provider not configured".to_string(),
            ))
        } else {
            Ok(HealthStatus::Healthy)
        }
    }

    async fn shutdown(&self) -> Result<(), SwitchlineError> {
        Ok(())
    }
}
