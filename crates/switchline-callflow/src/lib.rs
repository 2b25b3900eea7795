// SPDX-FileCopyrightText: 2026 Switchline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Call-flow decisions and outbound training-call kickoff.
//!
//! Planning is a pure function from (direction, per-org settings) to an
//! action descriptor, testable without any transport. The launcher is
//! the only component that talks to the telephony provider directly.

pub mod launcher;
pub mod plan;

pub use launcher::{LaunchReceipt, LaunchRequest, TrainingCallLauncher};
pub use plan::{
    plan_call, CallDirection, CallPlan, CallSettingsResolver, DialTarget, OrgCallSettings,
};
