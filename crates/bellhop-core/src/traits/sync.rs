// SPDX-FileCopyrightText: 2026 Bellhop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lazy remote-sync service seam.
//!
//! The sync service can fetch a single event by id, resolve a room's cached
//! summary and permission snapshot, resolve a user's profile, and evaluate
//! which notification rule matches an event. Its own wire protocol is a
//! black box; the pipeline only sees typed payloads and failures.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::BellhopError;
use crate::traits::adapter::ServiceAdapter;
use crate::types::{
    Event, EventId, PushRule, RoomId, RoomState, RoomSummary, Session, UserId, UserProfile,
};

/// Credential-bound remote sync service.
///
/// One instance is shared process-wide and must be safe to call concurrently
/// by multiple in-flight jobs.
#[async_trait]
pub trait SyncService: ServiceAdapter {
    /// Fetches a single event by id. One network round trip; a failure is
    /// terminal for the calling job.
    async fn event(&self, event_id: &EventId, room_id: &RoomId) -> Result<Event, BellhopError>;

    /// Returns the cached summary for a room, if one is available.
    async fn room_summary(&self, room_id: &RoomId) -> Option<RoomSummary>;

    /// Resolves a room's permission/state snapshot.
    async fn room_state(&self, room_id: &RoomId) -> Result<RoomState, BellhopError>;

    /// Resolves a user's profile, used when membership has not synced yet.
    async fn profile(&self, user_id: &UserId, room_id: &RoomId)
    -> Result<UserProfile, BellhopError>;

    /// Whether the room notifies for mentions only.
    async fn is_room_mentions_only(&self, room_id: &RoomId) -> bool;

    /// Evaluates which notification rule matches the event, if any.
    async fn push_rule_matching(&self, event: &Event, room_state: &RoomState) -> Option<PushRule>;
}

/// Builds a [`SyncService`] from a credential set.
///
/// The pipeline keeps one instance per process and rebuilds it only when the
/// active session changes, never speculatively.
pub trait SyncServiceFactory: Send + Sync + 'static {
    fn build(&self, session: &Session) -> Arc<dyn SyncService>;
}
