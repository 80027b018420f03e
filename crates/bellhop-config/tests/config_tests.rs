// SPDX-FileCopyrightText: 2026 Bellhop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Bellhop configuration system.

use std::io::Write;

use bellhop_config::model::BellhopConfig;
use bellhop_config::{load_and_validate_str, load_config_from_path, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_bellhop_config() {
    let toml = r#"
[notifications]
show_decrypted_content = false
ring_for_group_calls = true

[gateway]
url = "https://push.example.com/_matrix/push/v1/notify"
app_id = "com.example.app.voip"
push_token = "abcdef0123456789"
request_timeout_secs = 10

[protection]
app_lock_enabled = true

[pipeline]
secondary_push_margin_ms = 25000
log_level = "debug"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert!(!config.notifications.show_decrypted_content);
    assert!(config.notifications.ring_for_group_calls);
    assert_eq!(
        config.gateway.url,
        "https://push.example.com/_matrix/push/v1/notify"
    );
    assert_eq!(config.gateway.app_id, "com.example.app.voip");
    assert_eq!(config.gateway.push_token.as_deref(), Some("abcdef0123456789"));
    assert_eq!(config.gateway.request_timeout_secs, 10);
    assert!(config.protection.app_lock_enabled);
    assert_eq!(config.pipeline.secondary_push_margin_ms, 25_000);
    assert_eq!(config.pipeline.log_level, "debug");
}

/// Empty TOML produces compiled defaults.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML should deserialize");
    assert!(config.notifications.show_decrypted_content);
    assert!(!config.notifications.ring_for_group_calls);
    assert!(config.gateway.push_token.is_none());
    assert_eq!(config.gateway.request_timeout_secs, 15);
    assert!(!config.protection.app_lock_enabled);
    assert_eq!(config.pipeline.secondary_push_margin_ms, 20_000);
}

/// Unknown keys are rejected rather than silently ignored.
#[test]
fn unknown_key_is_rejected() {
    let toml = r#"
[notifications]
show_decripted_content = false
"#;
    assert!(load_config_from_str(toml).is_err());
}

/// Unknown sections are rejected rather than silently ignored.
#[test]
fn unknown_section_is_rejected() {
    let toml = r#"
[notifcations]
show_decrypted_content = false
"#;
    assert!(load_config_from_str(toml).is_err());
}

/// Validation errors surface through the high-level entry point.
#[test]
fn load_and_validate_rejects_zero_timeout() {
    let toml = r#"
[gateway]
request_timeout_secs = 0
"#;
    let errors = load_and_validate_str(toml).unwrap_err();
    assert!(
        errors
            .iter()
            .any(|e| e.to_string().contains("request_timeout_secs"))
    );
}

/// Parse failures are reported as a single parse error.
#[test]
fn load_and_validate_reports_parse_errors() {
    let errors = load_and_validate_str("not valid toml [").unwrap_err();
    assert_eq!(errors.len(), 1);
}

/// Explicit config files load through the path entry point.
#[test]
fn load_config_from_path_reads_file() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let path = dir.path().join("bellhop.toml");
    let mut file = std::fs::File::create(&path).expect("create config file");
    writeln!(file, "[gateway]\npush_token = \"tok-from-file\"").expect("write config");

    let config = load_config_from_path(&path).expect("load from path");
    assert_eq!(config.gateway.push_token.as_deref(), Some("tok-from-file"));
    // Untouched sections keep their defaults.
    assert_eq!(config.pipeline.secondary_push_margin_ms, 20_000);
}

/// Defaults round-trip through serialization (figment merges serialized defaults).
#[test]
fn default_config_round_trips_through_toml() {
    let config = BellhopConfig::default();
    let toml = toml::to_string(&config).expect("serialize");
    let parsed = load_config_from_str(&toml).expect("reparse");
    assert_eq!(
        parsed.gateway.request_timeout_secs,
        config.gateway.request_timeout_secs
    );
    assert_eq!(
        parsed.pipeline.secondary_push_margin_ms,
        config.pipeline.secondary_push_margin_ms
    );
}
