// SPDX-FileCopyrightText: 2026 Bellhop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock push gateway for deterministic testing.
//!
//! `MockPushGateway` captures every secondary-push request and completes with
//! a configurable outcome after a configurable delay, so tests can exercise
//! the deferred-delivery race with a paused clock.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use bellhop_core::BellhopError;
use bellhop_core::traits::{PushGateway, ServiceAdapter};
use bellhop_core::types::{AdapterType, HealthStatus, SecondaryPushRequest};

/// Outcome the mock gateway produces for each request.
#[derive(Debug, Clone)]
pub enum GatewayOutcome {
    /// Push accepted, no tokens rejected.
    Accepted,
    /// Push accepted but these tokens were rejected.
    Rejected(Vec<String>),
    /// The request itself failed.
    Error(String),
}

/// A mock push gateway for testing.
pub struct MockPushGateway {
    requests: Mutex<Vec<SecondaryPushRequest>>,
    outcome: Mutex<GatewayOutcome>,
    /// Artificial response latency in milliseconds.
    delay_ms: AtomicU64,
    /// Notified once per completed request.
    completed: Notify,
}

impl MockPushGateway {
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            outcome: Mutex::new(GatewayOutcome::Accepted),
            delay_ms: AtomicU64::new(0),
            completed: Notify::new(),
        }
    }

    /// Configure the outcome of subsequent requests.
    pub async fn set_outcome(&self, outcome: GatewayOutcome) {
        *self.outcome.lock().await = outcome;
    }

    /// Configure an artificial response latency.
    pub fn set_delay_ms(&self, delay_ms: u64) {
        self.delay_ms.store(delay_ms, Ordering::SeqCst);
    }

    /// All captured requests so far.
    pub async fn requests(&self) -> Vec<SecondaryPushRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    /// Wait until the next request completes (after its delay).
    pub async fn wait_for_completion(&self) {
        self.completed.notified().await;
    }
}

impl Default for MockPushGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceAdapter for MockPushGateway {
    fn name(&self) -> &str {
        "mock-gateway"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::PushGateway
    }

    async fn health_check(&self) -> Result<HealthStatus, BellhopError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl PushGateway for MockPushGateway {
    async fn notify(&self, request: SecondaryPushRequest) -> Result<Vec<String>, BellhopError> {
        self.requests.lock().await.push(request);

        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
        }

        let outcome = self.outcome.lock().await.clone();
        self.completed.notify_waiters();
        match outcome {
            GatewayOutcome::Accepted => Ok(Vec::new()),
            GatewayOutcome::Rejected(tokens) => Ok(tokens),
            GatewayOutcome::Error(message) => Err(BellhopError::SecondaryPushFailed {
                message,
                source: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bellhop_core::types::{EventId, RoomId, UserId};
    use std::time::Duration;

    fn request() -> SecondaryPushRequest {
        SecondaryPushRequest {
            app_id: "im.test.voip".into(),
            push_token: "token".into(),
            event_id: EventId("$e".into()),
            room_id: RoomId("!r:hs".into()),
            event_type: None,
            sender: UserId("@alice:hs".into()),
            timeout: Duration::from_secs(15),
        }
    }

    #[tokio::test]
    async fn captures_requests_and_accepts_by_default() {
        let gateway = MockPushGateway::new();
        let rejected = gateway.notify(request()).await.unwrap();
        assert!(rejected.is_empty());
        assert_eq!(gateway.request_count().await, 1);
        assert_eq!(gateway.requests().await[0].push_token, "token");
    }

    #[tokio::test]
    async fn configured_rejection_is_returned() {
        let gateway = MockPushGateway::new();
        gateway
            .set_outcome(GatewayOutcome::Rejected(vec!["token".into()]))
            .await;
        let rejected = gateway.notify(request()).await.unwrap();
        assert_eq!(rejected, vec!["token".to_string()]);
    }

    #[tokio::test]
    async fn configured_error_is_returned() {
        let gateway = MockPushGateway::new();
        gateway
            .set_outcome(GatewayOutcome::Error("gateway down".into()))
            .await;
        assert!(gateway.notify(request()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn delay_is_applied_before_completion() {
        let gateway = MockPushGateway::new();
        gateway.set_delay_ms(5_000);

        let start = tokio::time::Instant::now();
        gateway.notify(request()).await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(5));
    }
}
