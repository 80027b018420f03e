// SPDX-FileCopyrightText: 2026 Bellhop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Bellhop notification pipeline.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Bellhop configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BellhopConfig {
    /// Notification content preferences.
    #[serde(default)]
    pub notifications: NotificationConfig,

    /// Push gateway settings for secondary pushes.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Local app-lock / protection settings.
    #[serde(default)]
    pub protection: ProtectionConfig,

    /// Enrichment pipeline tuning.
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Notification content preferences.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationConfig {
    /// Show decrypted message content in notifications. When false, encrypted
    /// messages get a generic placeholder body.
    #[serde(default = "default_show_decrypted_content")]
    pub show_decrypted_content: bool,

    /// Ring the device when a group call starts. When false, a group-call
    /// notification is tagged to present while foregrounded only.
    #[serde(default)]
    pub ring_for_group_calls: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            show_decrypted_content: default_show_decrypted_content(),
            ring_for_group_calls: false,
        }
    }
}

fn default_show_decrypted_content() -> bool {
    true
}

/// Push gateway settings for secondary pushes.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Base URL of the push gateway.
    #[serde(default = "default_gateway_url")]
    pub url: String,

    /// Application identifier sent with every secondary push.
    #[serde(default = "default_app_id")]
    pub app_id: String,

    /// Registered secondary-push device token. `None` disables secondary pushes.
    #[serde(default)]
    pub push_token: Option<String>,

    /// Gateway-level request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: default_gateway_url(),
            app_id: default_app_id(),
            push_token: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_gateway_url() -> String {
    "https://matrix.org/_matrix/push/v1/notify".to_string()
}

fn default_app_id() -> String {
    "im.bellhop.voip".to_string()
}

fn default_request_timeout_secs() -> u64 {
    15
}

/// Local app-lock / protection settings.
///
/// When protection is active, every notification body is replaced by a
/// generic protected-content placeholder and the title is cleared.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProtectionConfig {
    /// Whether a local app lock (PIN/biometry) is set.
    #[serde(default)]
    pub app_lock_enabled: bool,
}

/// Enrichment pipeline tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Minimum remaining call-invite lifetime, in milliseconds, required to
    /// attempt a secondary push. Narrower margins skip the push rather than
    /// race it.
    #[serde(default = "default_secondary_push_margin_ms")]
    pub secondary_push_margin_ms: u64,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            secondary_push_margin_ms: default_secondary_push_margin_ms(),
            log_level: default_log_level(),
        }
    }
}

fn default_secondary_push_margin_ms() -> u64 {
    20_000
}

fn default_log_level() -> String {
    "info".to_string()
}
