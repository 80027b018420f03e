// SPDX-FileCopyrightText: 2026 Bellhop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Push gateway seam for speculative "ring the device" requests.

use async_trait::async_trait;

use crate::error::BellhopError;
use crate::traits::adapter::ServiceAdapter;
use crate::types::SecondaryPushRequest;

/// Best-effort dispatcher for secondary pushes (calls, ringing group calls).
#[async_trait]
pub trait PushGateway: ServiceAdapter {
    /// Sends a secondary push. On success, returns the list of push tokens
    /// the gateway rejected.
    async fn notify(&self, request: SecondaryPushRequest) -> Result<Vec<String>, BellhopError>;
}
