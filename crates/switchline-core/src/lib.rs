// SPDX-FileCopyrightText: 2026 Switchline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Switchline coordination service.
//!
//! This crate provides the foundational trait definitions, error types,
//! and common types used throughout the Switchline workspace: the call
//! status state machine, the shared store seam, and the adapter
//! lifecycle traits all backends implement.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::SwitchlineError;
pub use types::{AdapterType, CallStatus, CallStatusUpdate, HealthStatus, QueueEntry};

pub use traits::{LineStore, PluginAdapter, Subscription};
