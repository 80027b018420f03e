// SPDX-FileCopyrightText: 2026 Bellhop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams for the external collaborators consumed by the pipeline.
//!
//! The collaborators are specified only as interfaces: a credential store,
//! a lazy remote-sync service (plus the factory that builds it from
//! credentials), and a secondary-push dispatcher.

pub mod adapter;
pub mod credentials;
pub mod gateway;
pub mod sync;

pub use adapter::ServiceAdapter;
pub use credentials::CredentialStore;
pub use gateway::PushGateway;
pub use sync::{SyncService, SyncServiceFactory};
