// SPDX-FileCopyrightText: 2026 Bellhop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across the trait seams and the Bellhop pipeline.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

/// Unique identifier for an event (one notification job per event id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub String);

/// Unique identifier for a room/conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(pub String);

/// Unique identifier for a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter behind a trait seam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
pub enum AdapterType {
    Sync,
    PushGateway,
}

/// The opaque key/value payload carried by a push wake-up.
///
/// Only `event_id`, `room_id` and `unread_count` are recognized; every other
/// provider-specific field is passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WakePayload(pub Map<String, Value>);

impl WakePayload {
    pub fn event_id(&self) -> Option<EventId> {
        self.str_field("event_id").map(|s| EventId(s.to_owned()))
    }

    pub fn room_id(&self) -> Option<RoomId> {
        self.str_field("room_id").map(|s| RoomId(s.to_owned()))
    }

    /// Badge value, if the provider attached one.
    pub fn unread_count(&self) -> Option<i64> {
        self.0.get("unread_count").and_then(Value::as_i64)
    }

    /// The event and room identifiers, or the typed rejection when the
    /// payload is not an enrichable notification.
    pub fn matrix_ids(&self) -> Result<(EventId, RoomId), crate::BellhopError> {
        match (self.event_id(), self.room_id()) {
            (Some(event_id), Some(room_id)) => Ok((event_id, room_id)),
            _ => Err(crate::BellhopError::NotAMatrixNotification),
        }
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

/// The kind of a fetched event, after any decryption the sync service could do.
///
/// When an encrypted event was decrypted successfully, `kind` and `content`
/// describe the cleartext. `RoomEncrypted` is only reported when decryption
/// was unavailable, in which case `content` is the opaque ciphertext envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    CallInvite,
    RoomMessage,
    RoomEncrypted,
    RoomMember,
    Sticker,
    Reaction,
    /// Any other event type, carrying its raw type string (e.g. widget events).
    Custom(String),
}

/// A single event fetched by the sync service for enrichment.
#[derive(Debug, Clone)]
pub struct Event {
    pub event_id: EventId,
    pub room_id: RoomId,
    pub sender: UserId,
    /// Origin server timestamp in milliseconds since the epoch.
    pub origin_server_ts: i64,
    /// Age of the event in milliseconds, as reported by the server.
    pub age_ms: u64,
    pub kind: EventKind,
    pub content: Value,
    /// Previous state content, present on membership events.
    pub prev_content: Option<Value>,
    /// Whether the event arrived encrypted on the wire.
    pub is_encrypted: bool,
}

impl Event {
    /// Whether cleartext content is available for this event.
    pub fn is_decrypted(&self) -> bool {
        self.kind != EventKind::RoomEncrypted
    }

    /// The `msgtype` field of a room message, if any.
    pub fn msgtype(&self) -> Option<&str> {
        self.content.get("msgtype").and_then(Value::as_str)
    }

    /// The `body` field of the event content, if any.
    pub fn body(&self) -> Option<&str> {
        self.content.get("body").and_then(Value::as_str)
    }

    /// Whether this event is a rich reply to another event.
    pub fn is_reply(&self) -> bool {
        self.content
            .get("m.relates_to")
            .and_then(|r| r.get("m.in_reply_to"))
            .and_then(|r| r.get("event_id"))
            .is_some()
    }

    /// Whether an audio message is a voice message rather than an audio file.
    pub fn is_voice_message(&self) -> bool {
        self.content.get("org.matrix.msc3245.voice").is_some()
    }

    /// Declared lifetime of a call invite, in milliseconds.
    pub fn call_invite_lifetime_ms(&self) -> Option<u64> {
        self.content.get("lifetime").and_then(Value::as_u64)
    }
}

/// Membership of a user (or of the viewer) in a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Membership {
    Join,
    Invite,
    Leave,
    Ban,
    Unknown,
}

/// Cached summary of a room, owned and mutated by the external sync service.
#[derive(Debug, Clone)]
pub struct RoomSummary {
    pub display_name: Option<String>,
    pub membership: Membership,
}

/// A member entry in a room's permission/state snapshot.
#[derive(Debug, Clone)]
pub struct RoomMember {
    pub user_id: UserId,
    pub display_name: Option<String>,
    pub membership: Membership,
}

/// A room's permission/state snapshot, read-only from the pipeline's perspective.
#[derive(Debug, Clone, Default)]
pub struct RoomState {
    pub members: Vec<RoomMember>,
}

impl RoomState {
    /// The member entry for a user, if membership has synced.
    pub fn member(&self, user_id: &UserId) -> Option<&RoomMember> {
        self.members.iter().find(|m| &m.user_id == user_id)
    }

    /// The resolved display name for a member, if any.
    pub fn member_name(&self, user_id: &UserId) -> Option<&str> {
        self.member(user_id)?.display_name.as_deref()
    }
}

/// A user's profile, looked up when membership has not synced yet.
#[derive(Debug, Clone, Default)]
pub struct UserProfile {
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// A single action attached to a notification rule.
#[derive(Debug, Clone, PartialEq)]
pub enum PushRuleAction {
    Notify,
    DontNotify,
    /// A `set_tweak` action; `value` is absent when the tweak carries no
    /// explicit value.
    SetTweak {
        tweak: String,
        value: Option<Value>,
    },
}

/// A notification rule matched against an event by the sync service.
#[derive(Debug, Clone, PartialEq)]
pub struct PushRule {
    pub rule_id: String,
    pub actions: Vec<PushRuleAction>,
}

/// The resolved notification policy for a message.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedRule {
    /// Whether the message is a highlight (always notify, even in
    /// mention-only rooms). An absent highlight tweak value counts as `true`.
    pub highlight: bool,
    /// The sound to play, with `"default"` already remapped to the canonical
    /// default sound asset name.
    pub sound: Option<String>,
}

/// Platform action-set selector for a delivered notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
pub enum NotificationCategory {
    /// Enables inline reply actions.
    #[strum(serialize = "QUICK_REPLY")]
    #[serde(rename = "QUICK_REPLY")]
    QuickReply,
    /// Dedicated call-action set.
    #[strum(serialize = "CALL_INVITE")]
    #[serde(rename = "CALL_INVITE")]
    CallInvite,
    /// Hint that the notification should be retracted next time the app runs.
    #[strum(serialize = "TO_BE_REMOVED")]
    #[serde(rename = "TO_BE_REMOVED")]
    ToBeRemoved,
}

/// The mutable in-progress notification content for one job.
///
/// Each pipeline stage may overwrite fields but never partially corrupts
/// fields set by an earlier stage; whatever field state exists when delivery
/// happens is what gets delivered.
#[derive(Debug, Clone, Default)]
pub struct NotificationDraft {
    pub title: Option<String>,
    /// Absence means "suppress".
    pub body: Option<String>,
    /// `None` disables grouping (used for calls so they don't stack).
    pub thread_id: Option<String>,
    pub category: Option<NotificationCategory>,
    pub sound: Option<String>,
    pub badge: Option<i64>,
    /// Free-form metadata map delivered alongside the notification.
    pub user_info: Map<String, Value>,
}

/// The active credential set. At most one session is considered current per
/// process; the shared sync-service instance is rebuilt only when this changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
    pub device_id: String,
    pub access_token: String,
    pub homeserver_url: String,
}

/// A best-effort "ring the device" request sent to the push gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct SecondaryPushRequest {
    pub app_id: String,
    pub push_token: String,
    pub event_id: EventId,
    pub room_id: RoomId,
    /// Unused by the gateway today, carried for wire compatibility.
    pub event_type: Option<String>,
    pub sender: UserId,
    pub timeout: std::time::Duration,
}
