// SPDX-FileCopyrightText: 2026 Bellhop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bellhop's notification enrichment pipeline.
//!
//! Turns an opaque push wake-up (event id + room id) into a readable
//! notification under a wall-clock budget, guaranteeing exactly one delivery
//! per event id and something-is-always-delivered semantics. Call invites and
//! ringing group calls additionally trigger a speculative secondary push that
//! defers delivery until the push completes.
//!
//! Entry point is [`NotificationPipeline::handle_wake`]; everything else in
//! this crate is a stage of that chain.

pub mod content;
pub mod context;
pub mod job;
pub mod orchestrator;
pub mod rules;
pub mod strings;
pub mod telemetry;
pub mod voip;

pub use content::{SecondaryPushIntent, Synthesis, SynthesisInput};
pub use job::{DeliverFn, JobPhase, JobTable, NotificationJob};
pub use orchestrator::NotificationPipeline;
pub use voip::SecondaryPushCoordinator;
