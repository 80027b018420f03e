// SPDX-FileCopyrightText: 2026 Bellhop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The wake-to-delivery orchestrator.
//!
//! A wake-up registers a job with a provisional generic draft, then runs the
//! enrichment chain: session resolution, single-shot event fetch, context
//! resolution, rule evaluation, content synthesis, optional secondary push.
//! Any stage failing collapses to delivering whatever the draft holds at that
//! point. Nothing in this chain can cause a wake-up to deliver nothing.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use bellhop_config::BellhopConfig;
use bellhop_core::BellhopError;
use bellhop_core::traits::{CredentialStore, PushGateway, SyncService, SyncServiceFactory};
use bellhop_core::types::{
    Event, EventId, Membership, NotificationCategory, NotificationDraft, RoomId, Session, UserId,
    WakePayload,
};

use crate::content::{self, SecondaryPushIntent, Synthesis, SynthesisInput};
use crate::job::{DeliverFn, JobPhase, JobTable};
use crate::voip::SecondaryPushCoordinator;
use crate::{context, rules, strings};

/// Orchestrates enrichment for push wake-ups.
///
/// One instance lives per process and handles concurrent wake-ups; per-event
/// state lives in the job table, shared state behind the session slot's lock.
pub struct NotificationPipeline {
    config: BellhopConfig,
    credentials: Arc<dyn CredentialStore>,
    sync_factory: Arc<dyn SyncServiceFactory>,
    jobs: Arc<JobTable>,
    coordinator: SecondaryPushCoordinator,
    /// The shared sync service, rebuilt only when the active session changes.
    sync_slot: Mutex<Option<(Session, Arc<dyn SyncService>)>>,
}

impl NotificationPipeline {
    pub fn new(
        config: BellhopConfig,
        credentials: Arc<dyn CredentialStore>,
        sync_factory: Arc<dyn SyncServiceFactory>,
        gateway: Arc<dyn PushGateway>,
    ) -> Self {
        let jobs = Arc::new(JobTable::new());
        let coordinator = SecondaryPushCoordinator::new(gateway, jobs.clone(), &config.gateway);
        Self {
            config,
            credentials,
            sync_factory,
            jobs,
            coordinator,
            sync_slot: Mutex::new(None),
        }
    }

    /// Handles one push wake-up. `deliver` is invoked exactly once per event
    /// id, with the best content available at delivery time.
    pub async fn handle_wake(&self, payload: WakePayload, deliver: DeliverFn) {
        let received_at = Utc::now();

        let (event_id, room_id) = match payload.matrix_ids() {
            Ok(ids) => ids,
            Err(e) => {
                // Not one of ours: hand the raw payload through untouched.
                debug!(error = %e, "passing payload through unenriched");
                deliver(NotificationDraft {
                    user_info: payload.0,
                    ..Default::default()
                });
                return;
            }
        };

        info!(event_id = %event_id, room_id = %room_id, "wake-up received");

        // No thread id on the provisional draft: a fallback delivery must not
        // claim a grouping the enrichment never confirmed.
        let draft = NotificationDraft {
            body: Some(strings::fallback_notification()),
            badge: payload.unread_count(),
            user_info: payload.0.clone(),
            ..Default::default()
        };
        self.jobs
            .register(event_id.clone(), received_at, draft, deliver);

        let (current_user, sync) = match self.resolve_sync().await {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!(event_id = %event_id, error = %e, "cannot enrich, delivering fallback");
                self.fallback(&event_id);
                return;
            }
        };

        self.preprocess(sync.as_ref(), &event_id, &room_id).await;

        let event = match sync.event(&event_id, &room_id).await {
            Ok(event) => event,
            Err(e) => {
                warn!(event_id = %event_id, error = %e, "event fetch failed, delivering fallback");
                self.fallback(&event_id);
                return;
            }
        };

        self.process_event(sync.as_ref(), &current_user, &event)
            .await;
    }

    /// The host signals the wall-clock budget is nearly exhausted. The
    /// provisional draft registered at wake-up already guarantees the system
    /// fallback is reasonable, so this only records the miss.
    pub fn time_will_expire(&self, event_id: &EventId) {
        warn!(event_id = %event_id, "enrichment budget nearly exhausted");
    }

    /// Delivers whatever the draft currently holds. Idempotent.
    pub fn fallback(&self, event_id: &EventId) {
        self.jobs.deliver_pending(event_id);
    }

    /// Whether a job is still in flight for the event id.
    pub fn has_job(&self, event_id: &EventId) -> bool {
        self.jobs.contains(event_id)
    }

    /// Returns the active user and the shared sync service, reloading
    /// credentials first and rebuilding the service only when the active
    /// session changed. The user id is resolved here, once per wake-up, so a
    /// logout racing the enrichment cannot change the job's identity
    /// mid-flight.
    async fn resolve_sync(&self) -> Result<(UserId, Arc<dyn SyncService>), BellhopError> {
        self.credentials.reload().await;
        let session = self
            .credentials
            .active_session()
            .await
            .ok_or(BellhopError::NoActiveSession)?;
        let user_id = session.user_id.clone();

        let mut slot = self.sync_slot.lock().await;
        if let Some((cached_session, sync)) = slot.as_ref()
            && cached_session == &session
        {
            return Ok((user_id, sync.clone()));
        }

        info!(user_id = %session.user_id, "active session changed, rebuilding sync service");
        let sync = self.sync_factory.build(&session);
        *slot = Some((session, sync.clone()));
        Ok((user_id, sync))
    }

    /// Cheap draft improvements that need no event fetch: the room display
    /// name as a provisional title. Skipped entirely under protection, where
    /// the title must stay hidden.
    async fn preprocess(&self, sync: &dyn SyncService, event_id: &EventId, room_id: &RoomId) {
        if self.config.protection.app_lock_enabled {
            return;
        }
        if let Some(summary) = sync.room_summary(room_id).await
            && let Some(name) = summary.display_name
        {
            self.jobs.with_job(event_id, |job| {
                job.draft.title = Some(name);
            });
        }
    }

    async fn process_event(&self, sync: &dyn SyncService, current_user: &UserId, event: &Event) {
        let event_id = &event.event_id;

        if let Some(received_at) =
            self.jobs.with_job(event_id, |job| job.received_at)
        {
            let delay_ms = received_at.timestamp_millis() - event.origin_server_ts;
            debug!(event_id = %event_id, delay_ms, "event fetched");
        }

        let synthesis = self.synthesize_content(sync, current_user, event).await;

        let Some(synthesis) = synthesis else {
            // Suppressed or context failed: deliver a retractable placeholder
            // so the host can drop it next time the app runs.
            self.jobs.with_job(event_id, |job| {
                job.draft.category = Some(NotificationCategory::ToBeRemoved);
            });
            self.jobs.deliver_pending(event_id);
            return;
        };

        if synthesis.push_intent != SecondaryPushIntent::None {
            self.coordinator.maybe_send(event);
        }

        let deferred = self.jobs.with_job(event_id, |job| {
            job.draft.title = synthesis.title;
            job.draft.body = synthesis.body;
            job.draft.thread_id = synthesis.thread_id;
            job.draft.category = synthesis.category;
            job.draft.sound = synthesis.sound;
            job.draft.user_info = synthesis.user_info;
            if job.phase == JobPhase::SecondaryPushInFlight {
                job.phase = JobPhase::AwaitingSecondaryPush;
                true
            } else {
                false
            }
        });

        match deferred {
            Some(true) => {
                debug!(event_id = %event_id, "enrichment done, deferring to secondary push");
            }
            Some(false) => {
                self.jobs.deliver_pending(event_id);
            }
            None => {
                debug!(event_id = %event_id, "job already delivered before enrichment finished");
            }
        }
    }

    /// Runs context resolution, rule evaluation and content synthesis.
    /// Returns `None` to signal suppression (deliver a retractable placeholder).
    async fn synthesize_content(
        &self,
        sync: &dyn SyncService,
        current_user: &UserId,
        event: &Event,
    ) -> Option<Synthesis> {
        if event.content.as_object().is_some_and(|o| o.is_empty()) {
            // Redacted or empty content notifies nothing readable.
            debug!(event_id = %event.event_id, "event content is empty, suppressing");
            return None;
        }

        let mentions_only = sync.is_room_mentions_only(&event.room_id).await;
        let summary = sync.room_summary(&event.room_id).await;

        let (room_state, sender_name) = match context::resolve(sync, event).await {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!(event_id = %event.event_id, error = %e, "context resolution failed, suppressing");
                return None;
            }
        };

        let rule = rules::evaluate(sync, event, &room_state).await;

        let input = SynthesisInput {
            event,
            sender_name: &sender_name,
            room_display_name: summary
                .as_ref()
                .and_then(|s| s.display_name.as_deref()),
            viewer_membership: summary
                .as_ref()
                .map(|s| s.membership)
                .unwrap_or(Membership::Unknown),
            mentions_only,
            rule: rule.as_ref(),
            current_user_id: current_user,
            show_decrypted_content: self.config.notifications.show_decrypted_content,
            ring_for_group_calls: self.config.notifications.ring_for_group_calls,
            protection_active: self.config.protection.app_lock_enabled,
            secondary_push_margin_ms: self.config.pipeline.secondary_push_margin_ms,
        };

        let synthesis = content::synthesize(&input);
        if synthesis.is_suppressed() {
            return None;
        }
        Some(synthesis)
    }
}
