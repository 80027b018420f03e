// SPDX-FileCopyrightText: 2026 Bellhop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secondary-push coordination for call invites and ringing group calls.
//!
//! The secondary push is speculative and best-effort: its outcome never
//! changes the notification's content, only *when* the notification is
//! delivered. While the push is in flight, the job's delivery is deferred;
//! the push completing (success, rejection, error, or timeout alike) always
//! triggers delivery through the job table's exactly-once funnel.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use bellhop_config::model::GatewayConfig;
use bellhop_core::BellhopError;
use bellhop_core::traits::PushGateway;
use bellhop_core::types::{Event, SecondaryPushRequest};

use crate::job::{JobPhase, JobTable};

/// Dispatches speculative "ring the device" pushes and wires their completion
/// back into deferred delivery.
pub struct SecondaryPushCoordinator {
    gateway: Arc<dyn PushGateway>,
    jobs: Arc<JobTable>,
    app_id: String,
    push_token: Option<String>,
    request_timeout: Duration,
}

impl SecondaryPushCoordinator {
    pub fn new(gateway: Arc<dyn PushGateway>, jobs: Arc<JobTable>, config: &GatewayConfig) -> Self {
        Self {
            gateway,
            jobs,
            app_id: config.app_id.clone(),
            push_token: config.push_token.clone(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }

    /// Attempts to dispatch a secondary push for the event.
    ///
    /// Skips silently when no push token is registered, or when the event is
    /// encrypted and no cleartext was recovered (ringing on opaque ciphertext
    /// would ring for non-calls too). When a push is dispatched, the job's
    /// phase moves to `SecondaryPushInFlight` before the request leaves, so
    /// enrichment finishing concurrently observes the deferral.
    pub fn maybe_send(&self, event: &Event) {
        let Some(push_token) = &self.push_token else {
            debug!(event_id = %event.event_id, "no push token registered, skipping secondary push");
            return;
        };
        if event.is_encrypted && !event.is_decrypted() {
            debug!(
                event_id = %event.event_id,
                "event not decrypted, skipping secondary push"
            );
            return;
        }

        let marked = self.jobs.with_job(&event.event_id, |job| {
            job.phase = JobPhase::SecondaryPushInFlight;
        });
        if marked.is_none() {
            debug!(event_id = %event.event_id, "job already delivered, skipping secondary push");
            return;
        }

        let event_type = match &event.kind {
            bellhop_core::types::EventKind::Custom(t) => Some(t.clone()),
            _ => None,
        };
        let request = SecondaryPushRequest {
            app_id: self.app_id.clone(),
            push_token: push_token.clone(),
            event_id: event.event_id.clone(),
            room_id: event.room_id.clone(),
            event_type,
            sender: event.sender.clone(),
            timeout: self.request_timeout,
        };

        info!(event_id = %event.event_id, room_id = %event.room_id, "dispatching secondary push");

        let gateway = self.gateway.clone();
        let jobs = self.jobs.clone();
        let timeout = self.request_timeout;
        let event_id = event.event_id.clone();
        tokio::spawn(async move {
            match tokio::time::timeout(timeout, gateway.notify(request)).await {
                Ok(Ok(rejected)) if rejected.is_empty() => {
                    debug!(event_id = %event_id, "secondary push accepted");
                }
                Ok(Ok(rejected)) => {
                    warn!(
                        event_id = %event_id,
                        rejected = rejected.len(),
                        "push gateway rejected the push token"
                    );
                }
                Ok(Err(e)) => {
                    warn!(event_id = %event_id, error = %e, "secondary push failed");
                }
                Err(_) => {
                    let e = BellhopError::Timeout { duration: timeout };
                    warn!(event_id = %event_id, error = %e, "secondary push timed out");
                }
            }
            // Whatever happened to the push, release the deferred delivery.
            jobs.deliver_pending(&event_id);
        });
    }
}
