// SPDX-FileCopyrightText: 2026 Bellhop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Bellhop notification pipeline.

use thiserror::Error;

/// The primary error type used across the Bellhop trait seams and pipeline stages.
///
/// Note that a suppressed notification is *not* an error: the content
/// synthesizer signals suppression by producing no body, and the pipeline
/// delivers a retractable placeholder instead.
#[derive(Debug, Error)]
pub enum BellhopError {
    /// The wake-up payload does not carry the event and room identifiers.
    /// The raw payload is delivered unchanged and no job is created.
    #[error("payload is not a matrix notification")]
    NotAMatrixNotification,

    /// No logged-in session is available; enrichment cannot proceed.
    #[error("no active session")]
    NoActiveSession,

    /// The single-shot event fetch failed (no retry, triggers fallback).
    #[error("event fetch failed: {message}")]
    FetchFailed {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The room state lookup behind sender-name resolution failed.
    #[error("context resolution failed: {message}")]
    ContextResolutionFailed {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The speculative wake-the-caller push could not be dispatched.
    #[error("secondary push failed: {message}")]
    SecondaryPushFailed {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BellhopError {
    /// Shorthand for a `FetchFailed` with a plain message.
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::FetchFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a `ContextResolutionFailed` with a plain message.
    pub fn context(message: impl Into<String>) -> Self {
        Self::ContextResolutionFailed {
            message: message.into(),
            source: None,
        }
    }
}
