// SPDX-FileCopyrightText: 2026 Switchline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Switchline coordination service.
//!
//! Exposes the Queue Coordinator and Call Status Broadcaster over REST,
//! streams live call status as Server-Sent Events, and ingests the
//! telephony provider's lifecycle webhooks. All backends are injected
//! through [`server::GatewayState`]; the gateway owns no global state.

pub mod auth;
pub mod handlers;
pub mod server;
pub mod sse;
pub mod webhook;

pub use auth::AuthConfig;
pub use server::{build_router, start_server, GatewayState, HealthState, ServerConfig};
