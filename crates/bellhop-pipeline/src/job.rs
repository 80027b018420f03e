// SPDX-FileCopyrightText: 2026 Bellhop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-event job bookkeeping and the concurrent job table.
//!
//! Each in-flight wake-up is one [`NotificationJob`] keyed by event id. A job
//! goes through phases: Enriching -> SecondaryPushInFlight ->
//! AwaitingSecondaryPush, and is destroyed the instant delivery happens.
//!
//! Delivery removes the entry from the table before invoking the callback, so
//! a job delivers exactly once: any later delivery attempt for the same event
//! id finds no job and is a no-op.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;

use bellhop_core::types::{EventId, NotificationDraft};

/// The delivery callback registered with a job at wake-up time.
pub type DeliverFn = Box<dyn FnOnce(NotificationDraft) + Send + Sync + 'static>;

/// Phases in the job FSM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    /// The enrichment pipeline is running.
    Enriching,
    /// A secondary push was dispatched and has not completed yet.
    SecondaryPushInFlight,
    /// Enrichment finished while the secondary push was still in flight;
    /// delivery is deferred to the push's completion.
    AwaitingSecondaryPush,
}

impl std::fmt::Display for JobPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobPhase::Enriching => write!(f, "enriching"),
            JobPhase::SecondaryPushInFlight => write!(f, "secondary-push-in-flight"),
            JobPhase::AwaitingSecondaryPush => write!(f, "awaiting-secondary-push"),
        }
    }
}

/// State for one in-flight wake-up.
///
/// The draft is mutated only by stages belonging to this job's pipeline, so
/// it needs no synchronization beyond the table's own entry locking.
pub struct NotificationJob {
    /// When the wake-up was received.
    pub received_at: DateTime<Utc>,
    /// Best-attempt content, updated incrementally. If anything fails along
    /// the way, whatever is stored here is what gets delivered.
    pub draft: NotificationDraft,
    /// Current phase in the job FSM.
    pub phase: JobPhase,
    deliver: Option<DeliverFn>,
}

impl NotificationJob {
    pub fn new(received_at: DateTime<Utc>, draft: NotificationDraft, deliver: DeliverFn) -> Self {
        Self {
            received_at,
            draft,
            phase: JobPhase::Enriching,
            deliver: Some(deliver),
        }
    }
}

/// Concurrent table of in-flight jobs keyed by event id.
///
/// Multiple wake-ups may be in flight at once; entries are independent and
/// support concurrent insert/lookup/remove without cross-job interference.
#[derive(Default)]
pub struct JobTable {
    jobs: DashMap<EventId, NotificationJob>,
}

impl JobTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a job for an event id, replacing any stale entry.
    pub fn register(
        &self,
        event_id: EventId,
        received_at: DateTime<Utc>,
        draft: NotificationDraft,
        deliver: DeliverFn,
    ) {
        self.jobs
            .insert(event_id, NotificationJob::new(received_at, draft, deliver));
    }

    /// Whether a job is currently registered for the event id.
    pub fn contains(&self, event_id: &EventId) -> bool {
        self.jobs.contains_key(event_id)
    }

    /// Number of in-flight jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Runs `f` against the job for `event_id` while holding its entry lock.
    ///
    /// Returns `None` if the job is gone (already delivered). `f` must not
    /// touch the table itself.
    pub fn with_job<R>(
        &self,
        event_id: &EventId,
        f: impl FnOnce(&mut NotificationJob) -> R,
    ) -> Option<R> {
        self.jobs.get_mut(event_id).map(|mut entry| f(&mut entry))
    }

    /// Removes the job and invokes its delivery callback with the current
    /// draft. Returns `false` when the job is absent (already delivered),
    /// which makes repeated fallback calls idempotent.
    ///
    /// The entry is removed before the callback runs; no table lock is held
    /// during the callback.
    pub fn deliver_pending(&self, event_id: &EventId) -> bool {
        let Some((_, mut job)) = self.jobs.remove(event_id) else {
            debug!(event_id = %event_id, "no pending job, already delivered");
            return false;
        };

        debug!(event_id = %event_id, phase = %job.phase, "delivering notification");
        match job.deliver.take() {
            Some(deliver) => {
                deliver(job.draft);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ev(id: &str) -> EventId {
        EventId(id.to_string())
    }

    fn counting_deliver(counter: Arc<AtomicUsize>) -> DeliverFn {
        Box::new(move |_draft| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn job_phase_display() {
        assert_eq!(JobPhase::Enriching.to_string(), "enriching");
        assert_eq!(
            JobPhase::SecondaryPushInFlight.to_string(),
            "secondary-push-in-flight"
        );
        assert_eq!(
            JobPhase::AwaitingSecondaryPush.to_string(),
            "awaiting-secondary-push"
        );
    }

    #[test]
    fn deliver_removes_job_and_invokes_callback_once() {
        let table = JobTable::new();
        let counter = Arc::new(AtomicUsize::new(0));
        table.register(
            ev("$e1"),
            Utc::now(),
            NotificationDraft::default(),
            counting_deliver(counter.clone()),
        );

        assert!(table.contains(&ev("$e1")));
        assert!(table.deliver_pending(&ev("$e1")));
        assert!(!table.contains(&ev("$e1")));
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        // Second attempt is a guaranteed no-op: the job is gone.
        assert!(!table.deliver_pending(&ev("$e1")));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn with_job_mutates_in_place() {
        let table = JobTable::new();
        let counter = Arc::new(AtomicUsize::new(0));
        table.register(
            ev("$e2"),
            Utc::now(),
            NotificationDraft::default(),
            counting_deliver(counter),
        );

        let phase = table.with_job(&ev("$e2"), |job| {
            job.draft.title = Some("Ops".into());
            job.phase = JobPhase::SecondaryPushInFlight;
            job.phase
        });
        assert_eq!(phase, Some(JobPhase::SecondaryPushInFlight));

        let title = table.with_job(&ev("$e2"), |job| job.draft.title.clone());
        assert_eq!(title, Some(Some("Ops".into())));
    }

    #[test]
    fn with_job_on_missing_job_is_none() {
        let table = JobTable::new();
        assert!(table.with_job(&ev("$nope"), |_| ()).is_none());
    }

    #[test]
    fn jobs_are_independent() {
        let table = JobTable::new();
        let c1 = Arc::new(AtomicUsize::new(0));
        let c2 = Arc::new(AtomicUsize::new(0));
        table.register(
            ev("$a"),
            Utc::now(),
            NotificationDraft::default(),
            counting_deliver(c1.clone()),
        );
        table.register(
            ev("$b"),
            Utc::now(),
            NotificationDraft::default(),
            counting_deliver(c2.clone()),
        );
        assert_eq!(table.len(), 2);

        table.deliver_pending(&ev("$a"));
        assert_eq!(c1.load(Ordering::SeqCst), 1);
        assert_eq!(c2.load(Ordering::SeqCst), 0);
        assert!(table.contains(&ev("$b")));
    }

    #[test]
    fn delivered_draft_is_latest_stored_state() {
        let table = JobTable::new();
        let seen = Arc::new(std::sync::Mutex::new(None));
        let seen_clone = seen.clone();
        table.register(
            ev("$c"),
            Utc::now(),
            NotificationDraft::default(),
            Box::new(move |draft| {
                *seen_clone.lock().unwrap() = draft.body.clone();
            }),
        );

        table.with_job(&ev("$c"), |job| job.draft.body = Some("enriched".into()));
        table.deliver_pending(&ev("$c"));
        assert_eq!(seen.lock().unwrap().as_deref(), Some("enriched"));
    }
}
