// SPDX-FileCopyrightText: 2026 Bellhop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as non-empty gateway URLs and sane timeouts.

use thiserror::Error;

use crate::model::BellhopConfig;

/// A configuration error surfaced to the operator.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML failed to parse or deserialize.
    #[error("config parse error: {message}")]
    Parse { message: String },

    /// A semantic validation failed after deserialization.
    #[error("config validation error: {message}")]
    Validation { message: String },
}

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &BellhopConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // A registered push token without a gateway to dispatch through is a
    // misconfiguration, not a disabled feature.
    if config.gateway.push_token.is_some() && config.gateway.url.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.url must not be empty when gateway.push_token is set".to_string(),
        });
    }

    if let Some(token) = &config.gateway.push_token
        && token.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "gateway.push_token must not be empty; omit it to disable secondary pushes"
                .to_string(),
        });
    }

    if config.gateway.app_id.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.app_id must not be empty".to_string(),
        });
    }

    if config.gateway.request_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "gateway.request_timeout_secs must be positive".to_string(),
        });
    }

    if config.pipeline.secondary_push_margin_ms == 0 {
        errors.push(ConfigError::Validation {
            message: "pipeline.secondary_push_margin_ms must be positive".to_string(),
        });
    }

    let level = config.pipeline.log_level.as_str();
    if !matches!(level, "trace" | "debug" | "info" | "warn" | "error") {
        errors.push(ConfigError::Validation {
            message: format!(
                "pipeline.log_level `{level}` is not one of trace, debug, info, warn, error"
            ),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BellhopConfig, GatewayConfig, PipelineConfig};

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&BellhopConfig::default()).is_ok());
    }

    #[test]
    fn empty_gateway_url_with_token_is_rejected() {
        let config = BellhopConfig {
            gateway: GatewayConfig {
                url: "  ".into(),
                push_token: Some("tok".into()),
                ..GatewayConfig::default()
            },
            ..BellhopConfig::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("gateway.url"));
    }

    #[test]
    fn all_errors_are_collected() {
        let config = BellhopConfig {
            gateway: GatewayConfig {
                url: String::new(),
                app_id: String::new(),
                push_token: Some(String::new()),
                request_timeout_secs: 0,
            },
            pipeline: PipelineConfig {
                secondary_push_margin_ms: 0,
                log_level: "loud".into(),
            },
            ..BellhopConfig::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 6);
    }
}
