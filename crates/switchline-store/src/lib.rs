// SPDX-FileCopyrightText: 2026 Switchline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process implementation of the shared store seam.
//!
//! Provides ordered lists with per-entry expiry, keyed values with
//! expiry, and broadcast-based publish/subscribe. Per-key locking via
//! DashMap entries gives every list mutation the single-command
//! atomicity the coordinator relies on.

pub mod memory;

pub use memory::MemoryStore;
