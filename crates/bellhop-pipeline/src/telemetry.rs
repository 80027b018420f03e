// SPDX-FileCopyrightText: 2026 Bellhop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tracing subscriber setup for host processes embedding the pipeline.

use std::sync::Once;

static INIT: Once = Once::new();

/// Initializes the tracing subscriber with the given log level.
///
/// `RUST_LOG` takes precedence over the configured level. Safe to call more
/// than once; only the first call installs a subscriber.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("bellhop={log_level},warn")));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_names(false)
            .init();
    });
}
