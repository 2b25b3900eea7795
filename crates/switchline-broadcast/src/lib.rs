// SPDX-FileCopyrightText: 2026 Switchline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Call Status Broadcaster: latest-status cache plus real-time fan-out.
//!
//! The stored record is a cache, not a system of record: it expires
//! after a bounded retention window and is the authoritative fallback
//! for pollers whenever the push channel drops.

pub mod broadcaster;

pub use broadcaster::{CallStatusBroadcaster, StatusStream};
