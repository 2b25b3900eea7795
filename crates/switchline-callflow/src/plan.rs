// SPDX-FileCopyrightText: 2026 Switchline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single dispatch point for call handling behavior.
//!
//! Recording, transcription, and forwarding used to be decided ad hoc
//! wherever a handler touched a call. All of that now funnels through
//! [`plan_call`]: one mapping from (direction, org settings) to an
//! action descriptor the transport glue executes verbatim.

use serde::{Deserialize, Serialize};

/// Which way a call travels relative to the organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CallDirection {
    /// A prospect calling in to the organization.
    Inbound,
    /// A rep dialing out to a prospect.
    Outbound,
    /// A rep dialing the training simulator.
    Training,
}

/// Per-organization call handling configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgCallSettings {
    /// Record live (non-training) calls.
    #[serde(default)]
    pub record_calls: bool,
    /// Transcribe recorded calls. Only effective when recording is on.
    #[serde(default)]
    pub transcribe_calls: bool,
    /// Number inbound calls are forwarded to instead of ringing a rep.
    #[serde(default)]
    pub forward_number: Option<String>,
}

/// Who the provider should connect the call to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DialTarget {
    /// Ring the organization's rep.
    Rep,
    /// Dial the prospect's number.
    Prospect,
    /// Connect to the training simulator line.
    Simulator,
}

/// Action descriptor for one call, executed by the transport glue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallPlan {
    pub dial: DialTarget,
    pub record: bool,
    pub transcribe: bool,
    /// When set, the dial leg is redirected to this number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forward_to: Option<String>,
}

/// Map a call direction and the organization's settings to a plan.
///
/// Training calls are always recorded and transcribed (they exist to be
/// scored) and never forwarded. Live calls follow the org settings;
/// transcription requires a recording, so it is off whenever recording
/// is off regardless of configuration.
pub fn plan_call(direction: CallDirection, settings: &OrgCallSettings) -> CallPlan {
    match direction {
        CallDirection::Training => CallPlan {
            dial: DialTarget::Simulator,
            record: true,
            transcribe: true,
            forward_to: None,
        },
        CallDirection::Outbound => CallPlan {
            dial: DialTarget::Prospect,
            record: settings.record_calls,
            transcribe: settings.record_calls && settings.transcribe_calls,
            forward_to: None,
        },
        CallDirection::Inbound => CallPlan {
            dial: DialTarget::Rep,
            record: settings.record_calls,
            transcribe: settings.record_calls && settings.transcribe_calls,
            forward_to: settings.forward_number.clone(),
        },
    }
}

/// Resolves call handling settings per organization.
///
/// Organizations without an explicit override fall back to the
/// service-wide defaults.
#[derive(Debug, Clone, Default)]
pub struct CallSettingsResolver {
    defaults: OrgCallSettings,
    overrides: std::collections::HashMap<String, OrgCallSettings>,
}

impl CallSettingsResolver {
    pub fn new(
        defaults: OrgCallSettings,
        overrides: impl IntoIterator<Item = (String, OrgCallSettings)>,
    ) -> Self {
        Self {
            defaults,
            overrides: overrides.into_iter().collect(),
        }
    }

    /// Settings for one organization, falling back to the defaults.
    pub fn settings_for(&self, organization_id: &str) -> &OrgCallSettings {
        self.overrides
            .get(organization_id)
            .unwrap_or(&self.defaults)
    }
}
