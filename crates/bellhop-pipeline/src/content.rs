// SPDX-FileCopyrightText: 2026 Bellhop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Content synthesis: a pure, deterministic function from an event and its
//! resolved context to a notification draft (or an explicit suppress signal).
//!
//! No I/O happens here. The orchestrator gathers everything asynchronous
//! (sender name, room summary, matched rule, preferences) into a
//! [`SynthesisInput`] first, then acts on the returned [`Synthesis`].

use serde_json::{Map, Value, json};

use bellhop_core::types::{
    Event, EventKind, MatchedRule, Membership, NotificationCategory, UserId,
};

use crate::strings;

const MSGTYPE_EMOTE: &str = "m.emote";
const MSGTYPE_IMAGE: &str = "m.image";
const MSGTYPE_VIDEO: &str = "m.video";
const MSGTYPE_AUDIO: &str = "m.audio";
const MSGTYPE_FILE: &str = "m.file";

/// Event types that carry widget state.
const WIDGET_EVENT_TYPES: [&str; 2] = ["m.widget", "im.vector.modular.widgets"];
/// Widget types recognized as a video-conference start.
const JITSI_WIDGET_TYPES: [&str; 2] = ["jitsi", "m.jitsi"];

/// User-info flag asking the host to present the notification even while the
/// app is foregrounded (group calls with ringing disabled).
pub const USER_INFO_KEY_PRESENT_ON_FOREGROUND: &str = "present_on_foreground";

/// Whether a secondary "ring the device" push should be dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecondaryPushIntent {
    #[default]
    None,
    /// A call invite with enough remaining lifetime to deliver the push.
    CallInvite,
    /// A group-call start with ringing enabled by preference.
    GroupCall,
}

/// Everything the synthesizer needs, gathered up front by the orchestrator.
pub struct SynthesisInput<'a> {
    pub event: &'a Event,
    /// Human-readable sender name from the context resolver.
    pub sender_name: &'a str,
    /// Room display name from the cached summary, if available.
    pub room_display_name: Option<&'a str>,
    /// The viewer's membership in the room (invite notices vs. member updates).
    pub viewer_membership: Membership,
    /// Whether the room notifies for mentions only.
    pub mentions_only: bool,
    /// The matched notification rule, if any.
    pub rule: Option<&'a MatchedRule>,
    pub current_user_id: &'a UserId,
    pub show_decrypted_content: bool,
    pub ring_for_group_calls: bool,
    /// Local app-lock state; when set, all content is hidden.
    pub protection_active: bool,
    /// Minimum remaining call-invite lifetime (ms) needed to attempt a
    /// secondary push.
    pub secondary_push_margin_ms: u64,
}

/// The synthesizer's output. `body == None` signals suppression; the
/// orchestrator then delivers a retractable placeholder instead.
#[derive(Debug, Default)]
pub struct Synthesis {
    pub title: Option<String>,
    pub body: Option<String>,
    pub thread_id: Option<String>,
    pub category: Option<NotificationCategory>,
    pub sound: Option<String>,
    pub user_info: Map<String, Value>,
    pub push_intent: SecondaryPushIntent,
}

impl Synthesis {
    fn suppressed() -> Self {
        Self::default()
    }

    pub fn is_suppressed(&self) -> bool {
        self.body.is_none()
    }
}

/// Synthesizes the final notification content for an event.
pub fn synthesize(input: &SynthesisInput<'_>) -> Synthesis {
    let event = input.event;
    let sender = input.sender_name;
    let room_name = input.room_display_name;

    let mut title: Option<String> = None;
    let mut body: Option<String> = None;
    // Default thread id groups by room; call branches clear it so calls
    // never stack with messages.
    let mut thread_id: Option<String> = Some(event.room_id.0.clone());
    let mut extra_info: Map<String, Value> = Map::new();
    let mut push_intent = SecondaryPushIntent::None;

    match &event.kind {
        EventKind::CallInvite => {
            let sdp = event
                .content
                .get("offer")
                .and_then(|offer| offer.get("sdp"))
                .and_then(Value::as_str);
            let is_video_call = sdp.is_some_and(|sdp| sdp.contains("m=video"));

            body = Some(if is_video_call {
                strings::video_call_from_user(sender)
            } else {
                strings::voice_call_from_user(sender)
            });
            thread_id = None;

            // Only worth ringing the device if the invite will still be
            // alive once the secondary push lands.
            if let Some(lifetime) = event.call_invite_lifetime_ms()
                && lifetime > event.age_ms
                && lifetime - event.age_ms > input.secondary_push_margin_ms
            {
                push_intent = SecondaryPushIntent::CallInvite;
            }
        }
        EventKind::RoomEncrypted => {
            // Decryption unavailable: leave the generic fallback body rather
            // than formatting ciphertext fields.
        }
        EventKind::RoomMessage => {
            if input.mentions_only && !input.rule.is_some_and(|r| r.highlight) {
                // Mention-only room and not highlighted: suppress outright.
                return Synthesis::suppressed();
            }

            title = Some(if event.is_reply() {
                strings::reply_title(sender, room_name)
            } else {
                strings::message_title(sender, room_name)
            });

            if event.is_encrypted && !input.show_decrypted_content {
                body = Some(strings::hidden_message());
            } else {
                let text = event.body().unwrap_or_default();
                body = Some(match event.msgtype() {
                    Some(MSGTYPE_EMOTE) => strings::action_from_user(sender, text),
                    Some(MSGTYPE_IMAGE) => strings::image_from_user(sender, text),
                    Some(MSGTYPE_VIDEO) => strings::video_from_user(sender, text),
                    Some(MSGTYPE_AUDIO) => {
                        if event.is_voice_message() {
                            strings::voice_message_from_user(sender)
                        } else {
                            strings::audio_from_user(sender, text)
                        }
                    }
                    Some(MSGTYPE_FILE) => strings::file_from_user(sender, text),
                    // All other message types such as text, notice, server notice.
                    _ => {
                        if event.is_reply() {
                            strip_reply_fallback(text).to_string()
                        } else {
                            text.to_string()
                        }
                    }
                });
            }
        }
        EventKind::RoomMember => {
            if input.viewer_membership == Membership::Join {
                // Already joined: surface displayname/avatar/membership updates.
                title = Some(strings::message_title(sender, room_name));
                body = Some(membership_update_body(event, sender));
            } else {
                // Not joined yet: treat the notification as an invite.
                body = Some(match room_name {
                    Some(room) if room != sender => strings::invite_to_named_room(sender, room),
                    _ => strings::invite_to_chat(sender),
                });
            }
        }
        EventKind::Sticker => {
            title = Some(strings::message_title(sender, room_name));
            body = Some(strings::sticker_from_user(sender));
        }
        EventKind::Reaction => {
            title = Some(strings::message_title(sender, room_name));
            body = Some(strings::reaction_from_user(sender));
        }
        EventKind::Custom(event_type) => {
            if is_jitsi_widget_start(event_type, &event.content) {
                body = Some(strings::group_call_started());
                title = room_name.map(str::to_owned);
                thread_id = None;

                if input.ring_for_group_calls {
                    push_intent = SecondaryPushIntent::GroupCall;
                } else {
                    extra_info.insert(USER_INFO_KEY_PRESENT_ON_FOREGROUND.into(), json!(true));
                }
            }
        }
    }

    // Final override: protection hides everything, superseding every branch.
    if input.protection_active {
        body = Some(strings::protected_message());
        title = None;
    }

    if body.is_none() {
        return Synthesis::suppressed();
    }

    Synthesis {
        title,
        body,
        thread_id,
        category: Some(category_for(
            event,
            input.show_decrypted_content,
            input.protection_active,
        )),
        sound: input.rule.and_then(|r| r.sound.clone()),
        user_info: user_info_for(event, Some(input.current_user_id), extra_info),
        push_intent,
    }
}

/// Body for a membership event when the viewer already belongs to the room.
fn membership_update_body(event: &Event, sender: &str) -> String {
    let membership = event.content.get("membership").and_then(Value::as_str);
    let prev = event.prev_content.as_ref();
    let prev_membership = prev
        .and_then(|p| p.get("membership"))
        .and_then(Value::as_str);

    if membership == Some("join") && prev_membership == Some("join") {
        let new_name = event.content.get("displayname").and_then(Value::as_str);
        let old_name = prev
            .and_then(|p| p.get("displayname"))
            .and_then(Value::as_str);
        if let (Some(old_name), Some(new_name)) = (old_name, new_name)
            && old_name != new_name
        {
            return strings::displayname_changed(old_name, new_name);
        }
        return strings::avatar_changed(sender);
    }

    strings::membership_updated(sender)
}

fn is_jitsi_widget_start(event_type: &str, content: &Value) -> bool {
    WIDGET_EVENT_TYPES.contains(&event_type)
        && content
            .get("type")
            .and_then(Value::as_str)
            .is_some_and(|widget_type| JITSI_WIDGET_TYPES.contains(&widget_type))
}

/// Category selection, independent of the body.
///
/// Content-hidden states and any non-message/non-call type map to
/// `ToBeRemoved`; call invites get the dedicated call-action category; room
/// messages (plain or encrypted) enable inline replies.
pub fn category_for(
    event: &Event,
    show_decrypted_content: bool,
    protection_active: bool,
) -> NotificationCategory {
    let content_shown =
        (!event.is_encrypted || show_decrypted_content) && !protection_active;
    if !content_shown {
        return NotificationCategory::ToBeRemoved;
    }

    match event.kind {
        EventKind::CallInvite => NotificationCategory::CallInvite,
        EventKind::RoomMessage | EventKind::RoomEncrypted => NotificationCategory::QuickReply,
        _ => NotificationCategory::ToBeRemoved,
    }
}

/// Builds the delivered metadata map: `{type: "full", room_id, event_id,
/// user_id?}` plus any branch-specific extras.
pub fn user_info_for(
    event: &Event,
    user_id: Option<&UserId>,
    extra: Map<String, Value>,
) -> Map<String, Value> {
    let mut info = Map::new();
    info.insert("type".into(), json!("full"));
    info.insert("room_id".into(), json!(event.room_id.0));
    info.insert("event_id".into(), json!(event.event_id.0));
    if let Some(user_id) = user_id {
        info.insert("user_id".into(), json!(user_id.0));
    }
    info.extend(extra);
    info
}

/// Strips the rich-reply quoted fallback (leading `> ` lines and the blank
/// separator) from a reply body, leaving only the reply text.
pub fn strip_reply_fallback(body: &str) -> &str {
    let mut rest = body;
    let mut stripped = false;
    while rest.starts_with("> ") || rest.starts_with(">\n") {
        match rest.find('\n') {
            Some(idx) => {
                rest = &rest[idx + 1..];
                stripped = true;
            }
            None => return "",
        }
    }
    if stripped {
        rest.strip_prefix('\n').unwrap_or(rest)
    } else {
        rest
    }
}
