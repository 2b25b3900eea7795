// SPDX-FileCopyrightText: 2026 Switchline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Switchline coordination service.
//!
//! Absence is not an error anywhere in Switchline: a participant who is
//! not in a queue or a call with no stored status is represented by
//! `Option`/default shapes, never by an error variant.

use thiserror::Error;

/// The primary error type used across all Switchline components.
#[derive(Debug, Error)]
pub enum SwitchlineError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Shared store errors (connection loss, command failure, serialization).
    /// Always recoverable: callers fall back to not-in-queue / unknown-status.
    #[error("store error: {source}")]
    Store {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Malformed caller input, rejected before touching the store.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Telephony provider errors (kickoff request failure, bad response).
    #[error("telephony error: {message}")]
    Telephony {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Gateway transport errors (bind failure, serve failure).
    #[error("gateway error: {message}")]
    Gateway {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SwitchlineError {
    /// Wrap an arbitrary error as a recoverable store failure.
    pub fn store<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        SwitchlineError::Store {
            source: Box::new(source),
        }
    }
}
