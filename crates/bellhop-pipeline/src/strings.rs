// SPDX-FileCopyrightText: 2026 Bellhop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification body/title templates.
//!
//! One function per template, no I/O. Localization string tables are out of
//! scope; these return the English skeleton the host localizes against.

/// Generic fallback body, aligned with the system body when previews are hidden.
pub fn fallback_notification() -> String {
    "Notification".to_string()
}

/// Placeholder body when encrypted content display is disabled by preference.
pub fn hidden_message() -> String {
    "Message".to_string()
}

/// Placeholder body when local app protection hides all content.
pub fn protected_message() -> String {
    "New message".to_string()
}

pub fn video_call_from_user(sender: &str) -> String {
    format!("Video call from {sender}")
}

pub fn voice_call_from_user(sender: &str) -> String {
    format!("Voice call from {sender}")
}

/// Title for a message notification. The room name is appended only when it
/// differs from the sender name.
pub fn message_title(sender: &str, room_name: Option<&str>) -> String {
    match room_name {
        Some(room) if room != sender => format!("{sender} in {room}"),
        _ => sender.to_string(),
    }
}

/// Title for a reply notification.
pub fn reply_title(sender: &str, room_name: Option<&str>) -> String {
    match room_name {
        Some(room) if room != sender => format!("{sender} replied in {room}"),
        _ => format!("{sender} replied"),
    }
}

pub fn action_from_user(sender: &str, action: &str) -> String {
    format!("* {sender} {action}")
}

pub fn image_from_user(sender: &str, caption: &str) -> String {
    format!("{sender} sent an image: {caption}")
}

pub fn video_from_user(sender: &str, caption: &str) -> String {
    format!("{sender} sent a video: {caption}")
}

pub fn audio_from_user(sender: &str, caption: &str) -> String {
    format!("{sender} sent an audio file: {caption}")
}

pub fn voice_message_from_user(sender: &str) -> String {
    format!("{sender} sent a voice message")
}

pub fn file_from_user(sender: &str, filename: &str) -> String {
    format!("{sender} sent a file: {filename}")
}

pub fn sticker_from_user(sender: &str) -> String {
    format!("{sender} sent a sticker")
}

pub fn reaction_from_user(sender: &str) -> String {
    format!("{sender} sent a reaction")
}

pub fn group_call_started() -> String {
    "Group call started".to_string()
}

pub fn displayname_changed(old_name: &str, new_name: &str) -> String {
    format!("{old_name} changed their display name to {new_name}")
}

pub fn avatar_changed(sender: &str) -> String {
    format!("{sender} changed their avatar")
}

pub fn membership_updated(sender: &str) -> String {
    format!("{sender} updated their profile")
}

pub fn invite_to_named_room(sender: &str, room_name: &str) -> String {
    format!("{sender} invited you to {room_name}")
}

pub fn invite_to_chat(sender: &str) -> String {
    format!("{sender} invited you to chat")
}
