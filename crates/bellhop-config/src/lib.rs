// SPDX-FileCopyrightText: 2026 Bellhop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Bellhop notification pipeline.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, and environment
//! variable overrides.
//!
//! # Usage
//!
//! ```no_run
//! use bellhop_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("Gateway: {}", config.gateway.url);
//! ```

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::BellhopConfig;
pub use validation::{ConfigError, validate_config};

/// Load configuration from the XDG hierarchy and validate it.
///
/// This is the high-level entry point that:
/// 1. Loads config from TOML files + env vars via Figment
/// 2. On success: runs post-deserialization validation
/// 3. On Figment error: converts it to a [`ConfigError`]
pub fn load_and_validate() -> Result<BellhopConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(vec![ConfigError::Parse {
            message: err.to_string(),
        }]),
    }
}

/// Load configuration from a specific TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<BellhopConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(vec![ConfigError::Parse {
            message: err.to_string(),
        }]),
    }
}
