// SPDX-FileCopyrightText: 2026 Bellhop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Context resolution: the asynchronous lookup chain producing the
//! human-readable sender name used by the content synthesizer.
//!
//! Chain: room permission snapshot -> member display name -> (member truly
//! unknown) user profile lookup -> raw sender id. A room-snapshot failure is
//! a hard error; a profile failure is soft.

use tracing::debug;

use bellhop_core::BellhopError;
use bellhop_core::traits::SyncService;
use bellhop_core::types::{Event, RoomState};

/// Resolves the room state and the sender's display name for an event.
pub async fn resolve(
    sync: &dyn SyncService,
    event: &Event,
) -> Result<(RoomState, String), BellhopError> {
    let state = sync.room_state(&event.room_id).await.map_err(|e| {
        BellhopError::ContextResolutionFailed {
            message: format!("room state unavailable for {}", event.room_id),
            source: Some(Box::new(e)),
        }
    })?;

    let sender = &event.sender;
    let member_name = state.member_name(sender).map(str::to_owned);

    // Accept the member-list name when it actually resolves to something, or
    // when the member is at least present in the snapshot.
    if let Some(name) = &member_name
        && name != &sender.0
    {
        let name = name.clone();
        return Ok((state, name));
    }
    if state.member(sender).is_some() {
        let name = member_name.unwrap_or_else(|| sender.0.clone());
        return Ok((state, name));
    }

    // The member is unknown (the notification may have arrived before
    // membership synced). Use the profile to avoid displaying a raw id.
    let name = match sync.profile(sender, &event.room_id).await {
        Ok(profile) => profile.display_name.unwrap_or_else(|| sender.0.clone()),
        Err(e) => {
            debug!(user_id = %sender, error = %e, "profile lookup failed, using raw sender id");
            sender.0.clone()
        }
    };
    Ok((state, name))
}
