// SPDX-FileCopyrightText: 2026 Bellhop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential store seam.

use async_trait::async_trait;

use crate::types::Session;

/// Store returning the currently active logged-in session, if any.
///
/// `reload` is called at the start of every wake-up so a login or logout in
/// the host app is picked up before enrichment starts.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Force-reloads account state from the host's storage.
    async fn reload(&self);

    /// Returns the currently active session, if any.
    async fn active_session(&self) -> Option<Session>;
}
