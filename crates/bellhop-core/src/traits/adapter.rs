// SPDX-FileCopyrightText: 2026 Bellhop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait implemented by every external collaborator.

use async_trait::async_trait;

use crate::error::BellhopError;
use crate::types::{AdapterType, HealthStatus};

/// The base trait for the external services the pipeline talks to.
///
/// Every collaborator (sync service, push gateway) implements this trait,
/// which provides identity and health check capabilities.
#[async_trait]
pub trait ServiceAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// Returns the type of adapter (sync service, push gateway).
    fn adapter_type(&self) -> AdapterType;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, BellhopError>;
}
