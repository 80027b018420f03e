// SPDX-FileCopyrightText: 2026 Bellhop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end pipeline testing.
//!
//! `TestHarness` assembles a complete notification pipeline with mock
//! adapters and an in-memory config. `wake()` drives the full
//! wake-to-delivery chain and hands back a receiver that resolves when the
//! delivery callback fires, so tests can assert both content and timing.

use std::sync::Arc;

use serde_json::{Map, Value, json};
use tokio::sync::oneshot;

use bellhop_config::BellhopConfig;
use bellhop_core::types::{
    Event, EventId, EventKind, NotificationDraft, RoomId, Session, UserId, WakePayload,
};
use bellhop_pipeline::NotificationPipeline;

use crate::mock_credentials::{MockCredentialStore, test_session};
use crate::mock_gateway::MockPushGateway;
use crate::mock_sync::{MockSyncFactory, MockSyncService};

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    config: BellhopConfig,
    session: Option<Session>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            config: BellhopConfig::default(),
            session: Some(test_session()),
        }
    }

    /// Register a secondary-push token (enables secondary pushes).
    pub fn with_push_token(mut self, token: &str) -> Self {
        self.config.gateway.push_token = Some(token.to_string());
        self
    }

    /// Enable the local app lock (protection).
    pub fn with_app_lock(mut self) -> Self {
        self.config.protection.app_lock_enabled = true;
        self
    }

    /// Hide decrypted content in notifications.
    pub fn with_hidden_content(mut self) -> Self {
        self.config.notifications.show_decrypted_content = false;
        self
    }

    /// Ring the device for group-call starts.
    pub fn with_group_call_ringing(mut self) -> Self {
        self.config.notifications.ring_for_group_calls = true;
        self
    }

    /// Override the secondary-push margin.
    pub fn with_secondary_push_margin_ms(mut self, margin_ms: u64) -> Self {
        self.config.pipeline.secondary_push_margin_ms = margin_ms;
        self
    }

    /// Start with no logged-in session.
    pub fn logged_out(mut self) -> Self {
        self.session = None;
        self
    }

    /// Build the test harness with mock adapters.
    pub fn build(self) -> TestHarness {
        let sync = Arc::new(MockSyncService::new());
        let gateway = Arc::new(MockPushGateway::new());
        let factory = Arc::new(MockSyncFactory::new(sync.clone()));
        let credentials = Arc::new(match self.session {
            Some(session) => MockCredentialStore::with_session(session),
            None => MockCredentialStore::logged_out(),
        });

        let pipeline = NotificationPipeline::new(
            self.config,
            credentials.clone(),
            factory.clone(),
            gateway.clone(),
        );

        TestHarness {
            sync,
            gateway,
            factory,
            credentials,
            pipeline,
        }
    }
}

/// A complete test environment with mock adapters.
pub struct TestHarness {
    /// The mock sync service, for injecting events and context.
    pub sync: Arc<MockSyncService>,
    /// The mock push gateway, for asserting secondary pushes.
    pub gateway: Arc<MockPushGateway>,
    /// The sync factory, for asserting rebuild counts.
    pub factory: Arc<MockSyncFactory>,
    /// The credential store, for simulating login/logout.
    pub credentials: Arc<MockCredentialStore>,
    /// The pipeline under test.
    pub pipeline: NotificationPipeline,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Drive a wake-up through the pipeline. The returned receiver resolves
    /// exactly once, when the delivery callback fires; for deferred
    /// deliveries that happens after `handle_wake` itself returns.
    pub async fn wake(&self, payload: WakePayload) -> oneshot::Receiver<NotificationDraft> {
        let (tx, rx) = oneshot::channel();
        self.pipeline
            .handle_wake(
                payload,
                Box::new(move |draft| {
                    let _ = tx.send(draft);
                }),
            )
            .await;
        rx
    }

    /// Wake-up for an event already injected into the mock sync service.
    pub async fn wake_for(&self, event: &Event) -> oneshot::Receiver<NotificationDraft> {
        self.wake(wake_payload(&event.event_id, &event.room_id)).await
    }
}

/// A well-formed wake-up payload for an event.
pub fn wake_payload(event_id: &EventId, room_id: &RoomId) -> WakePayload {
    let value = json!({
        "event_id": event_id.0,
        "room_id": room_id.0,
        "unread_count": 1,
    });
    WakePayload(value.as_object().cloned().unwrap_or_default())
}

/// A payload with no recognizable identifiers.
pub fn opaque_payload() -> WakePayload {
    let mut map = Map::new();
    map.insert("provider_specific".into(), Value::String("blob".into()));
    WakePayload(map)
}

/// Builder for test events, defaulting to a plain text message.
pub struct EventBuilder {
    event: Event,
}

impl EventBuilder {
    pub fn new(event_id: &str, room_id: &str) -> Self {
        Self {
            event: Event {
                event_id: EventId(event_id.to_string()),
                room_id: RoomId(room_id.to_string()),
                sender: UserId("@alice:example.org".to_string()),
                origin_server_ts: 1_700_000_000_000,
                age_ms: 1_000,
                kind: EventKind::RoomMessage,
                content: json!({"msgtype": "m.text", "body": "hello"}),
                prev_content: None,
                is_encrypted: false,
            },
        }
    }

    pub fn sender(mut self, user_id: &str) -> Self {
        self.event.sender = UserId(user_id.to_string());
        self
    }

    pub fn kind(mut self, kind: EventKind) -> Self {
        self.event.kind = kind;
        self
    }

    pub fn content(mut self, content: Value) -> Self {
        self.event.content = content;
        self
    }

    pub fn prev_content(mut self, prev: Value) -> Self {
        self.event.prev_content = Some(prev);
        self
    }

    pub fn encrypted(mut self) -> Self {
        self.event.is_encrypted = true;
        self
    }

    pub fn age_ms(mut self, age_ms: u64) -> Self {
        self.event.age_ms = age_ms;
        self
    }

    /// A voice-call invite with the given lifetime.
    pub fn call_invite(mut self, lifetime_ms: u64) -> Self {
        self.event.kind = EventKind::CallInvite;
        self.event.content = json!({
            "call_id": "c1",
            "lifetime": lifetime_ms,
            "offer": {"type": "offer", "sdp": "v=0\r\nm=audio 9 UDP/TLS/RTP/SAVPF"},
        });
        self
    }

    pub fn build(self) -> Event {
        self.event
    }
}
