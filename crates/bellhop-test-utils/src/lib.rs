// SPDX-FileCopyrightText: 2026 Bellhop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Bellhop integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without a homeserver or push gateway.
//!
//! # Components
//!
//! - [`MockSyncService`] - Mock sync service with injectable events and context
//! - [`MockPushGateway`] - Mock push gateway with captured requests and configurable outcomes
//! - [`MockCredentialStore`] - In-memory credential store
//! - [`TestHarness`] - Assembles the full pipeline over the mocks

pub mod harness;
pub mod mock_credentials;
pub mod mock_gateway;
pub mod mock_sync;

pub use harness::{EventBuilder, TestHarness, opaque_payload, wake_payload};
pub use mock_credentials::{MockCredentialStore, test_session};
pub use mock_gateway::{GatewayOutcome, MockPushGateway};
pub use mock_sync::{MockSyncFactory, MockSyncService};
