// SPDX-FileCopyrightText: 2026 Switchline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Queue Coordinator: strict-FIFO waiting lists for scarce call lines.
//!
//! Each (organization, resource) pair owns one ordered list in the
//! shared store. Position 0 is the front of the line. Entries carry a
//! bounded time-to-live so abandoned participants self-expire instead
//! of starving the queue.

pub mod coordinator;

pub use coordinator::QueueCoordinator;
