// SPDX-FileCopyrightText: 2026 Bellhop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./bellhop.toml` > `~/.config/bellhop/bellhop.toml`
//! > `/etc/bellhop/bellhop.toml` with environment variable overrides via
//! `BELLHOP_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::BellhopConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/bellhop/bellhop.toml` (system-wide)
/// 3. `~/.config/bellhop/bellhop.toml` (user XDG config)
/// 4. `./bellhop.toml` (local directory)
/// 5. `BELLHOP_*` environment variables
pub fn load_config() -> Result<BellhopConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BellhopConfig::default()))
        .merge(Toml::file("/etc/bellhop/bellhop.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("bellhop/bellhop.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("bellhop.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<BellhopConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BellhopConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<BellhopConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BellhopConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `BELLHOP_GATEWAY_PUSH_TOKEN`
/// must map to `gateway.push_token`, not `gateway.push.token`.
fn env_provider() -> Env {
    Env::prefixed("BELLHOP_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: BELLHOP_GATEWAY_PUSH_TOKEN -> "gateway_push_token"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("notifications_", "notifications.", 1)
            .replacen("gateway_", "gateway.", 1)
            .replacen("protection_", "protection.", 1)
            .replacen("pipeline_", "pipeline.", 1);
        mapped.into()
    })
}
