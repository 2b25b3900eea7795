// SPDX-FileCopyrightText: 2026 Switchline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Switchline integration tests.

pub mod harness;

pub use harness::{TestHarness, TestHarnessBuilder};
