// SPDX-FileCopyrightText: 2026 Bellhop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock sync service for deterministic testing.
//!
//! `MockSyncService` implements `SyncService` with injectable events, room
//! summaries, state snapshots, profiles and matched rules, plus failure
//! switches for the fallible lookups.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use bellhop_core::BellhopError;
use bellhop_core::traits::{ServiceAdapter, SyncService, SyncServiceFactory};
use bellhop_core::types::{
    AdapterType, Event, EventId, HealthStatus, PushRule, RoomId, RoomState, RoomSummary, Session,
    UserId, UserProfile,
};

/// A mock sync service for testing.
///
/// Everything is injected up front; lookups never touch the network. Failure
/// switches make the fallible lookups (`event`, `room_state`, `profile`)
/// return errors on demand.
pub struct MockSyncService {
    events: Mutex<HashMap<EventId, Event>>,
    summaries: Mutex<HashMap<RoomId, RoomSummary>>,
    states: Mutex<HashMap<RoomId, RoomState>>,
    profiles: Mutex<HashMap<UserId, UserProfile>>,
    rules: Mutex<HashMap<EventId, PushRule>>,
    mentions_only: Mutex<HashSet<RoomId>>,
    fail_event_fetch: AtomicBool,
    fail_room_state: AtomicBool,
    fail_profile: AtomicBool,
}

impl MockSyncService {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(HashMap::new()),
            summaries: Mutex::new(HashMap::new()),
            states: Mutex::new(HashMap::new()),
            profiles: Mutex::new(HashMap::new()),
            rules: Mutex::new(HashMap::new()),
            mentions_only: Mutex::new(HashSet::new()),
            fail_event_fetch: AtomicBool::new(false),
            fail_room_state: AtomicBool::new(false),
            fail_profile: AtomicBool::new(false),
        }
    }

    /// Inject an event to be returned by `event()`.
    pub async fn inject_event(&self, event: Event) {
        self.events.lock().await.insert(event.event_id.clone(), event);
    }

    /// Inject a cached room summary.
    pub async fn inject_summary(&self, room_id: RoomId, summary: RoomSummary) {
        self.summaries.lock().await.insert(room_id, summary);
    }

    /// Inject a room state snapshot.
    pub async fn inject_state(&self, room_id: RoomId, state: RoomState) {
        self.states.lock().await.insert(room_id, state);
    }

    /// Inject a user profile.
    pub async fn inject_profile(&self, user_id: UserId, profile: UserProfile) {
        self.profiles.lock().await.insert(user_id, profile);
    }

    /// Inject a matched rule for an event id.
    pub async fn inject_rule(&self, event_id: EventId, rule: PushRule) {
        self.rules.lock().await.insert(event_id, rule);
    }

    /// Mark a room as mentions-only.
    pub async fn set_mentions_only(&self, room_id: RoomId) {
        self.mentions_only.lock().await.insert(room_id);
    }

    /// Make `event()` fail until cleared.
    pub fn fail_event_fetch(&self, fail: bool) {
        self.fail_event_fetch.store(fail, Ordering::SeqCst);
    }

    /// Make `room_state()` fail until cleared.
    pub fn fail_room_state(&self, fail: bool) {
        self.fail_room_state.store(fail, Ordering::SeqCst);
    }

    /// Make `profile()` fail until cleared.
    pub fn fail_profile(&self, fail: bool) {
        self.fail_profile.store(fail, Ordering::SeqCst);
    }
}

impl Default for MockSyncService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceAdapter for MockSyncService {
    fn name(&self) -> &str {
        "mock-sync"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Sync
    }

    async fn health_check(&self) -> Result<HealthStatus, BellhopError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl SyncService for MockSyncService {
    async fn event(&self, event_id: &EventId, _room_id: &RoomId) -> Result<Event, BellhopError> {
        if self.fail_event_fetch.load(Ordering::SeqCst) {
            return Err(BellhopError::fetch("mock fetch failure"));
        }
        self.events
            .lock()
            .await
            .get(event_id)
            .cloned()
            .ok_or_else(|| BellhopError::fetch(format!("no such event: {event_id}")))
    }

    async fn room_summary(&self, room_id: &RoomId) -> Option<RoomSummary> {
        self.summaries.lock().await.get(room_id).cloned()
    }

    async fn room_state(&self, room_id: &RoomId) -> Result<RoomState, BellhopError> {
        if self.fail_room_state.load(Ordering::SeqCst) {
            return Err(BellhopError::context("mock room state failure"));
        }
        Ok(self
            .states
            .lock()
            .await
            .get(room_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn profile(
        &self,
        user_id: &UserId,
        _room_id: &RoomId,
    ) -> Result<UserProfile, BellhopError> {
        if self.fail_profile.load(Ordering::SeqCst) {
            return Err(BellhopError::context("mock profile failure"));
        }
        Ok(self
            .profiles
            .lock()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn is_room_mentions_only(&self, room_id: &RoomId) -> bool {
        self.mentions_only.lock().await.contains(room_id)
    }

    async fn push_rule_matching(&self, event: &Event, _room_state: &RoomState) -> Option<PushRule> {
        self.rules.lock().await.get(&event.event_id).cloned()
    }
}

/// Factory handing out one shared [`MockSyncService`], counting builds so
/// tests can assert the service is only rebuilt on session changes.
pub struct MockSyncFactory {
    service: Arc<MockSyncService>,
    build_count: std::sync::atomic::AtomicUsize,
}

impl MockSyncFactory {
    pub fn new(service: Arc<MockSyncService>) -> Self {
        Self {
            service,
            build_count: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Number of times `build()` was called.
    pub fn build_count(&self) -> usize {
        self.build_count.load(Ordering::SeqCst)
    }
}

impl SyncServiceFactory for MockSyncFactory {
    fn build(&self, _session: &Session) -> Arc<dyn SyncService> {
        self.build_count.fetch_add(1, Ordering::SeqCst);
        self.service.clone()
    }
}
