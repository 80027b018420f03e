// SPDX-FileCopyrightText: 2026 Bellhop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock credential store for deterministic testing.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use bellhop_core::traits::CredentialStore;
use bellhop_core::types::{Session, UserId};

/// A mock credential store holding an in-memory session slot.
pub struct MockCredentialStore {
    session: Mutex<Option<Session>>,
    reload_count: AtomicUsize,
}

impl MockCredentialStore {
    /// Store with no logged-in session.
    pub fn logged_out() -> Self {
        Self {
            session: Mutex::new(None),
            reload_count: AtomicUsize::new(0),
        }
    }

    /// Store with the given session active.
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
            reload_count: AtomicUsize::new(0),
        }
    }

    /// Replace the active session (simulates login/logout/re-login).
    pub async fn set_session(&self, session: Option<Session>) {
        *self.session.lock().await = session;
    }

    /// Number of times `reload()` was called.
    pub fn reload_count(&self) -> usize {
        self.reload_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialStore for MockCredentialStore {
    async fn reload(&self) {
        self.reload_count.fetch_add(1, Ordering::SeqCst);
    }

    async fn active_session(&self) -> Option<Session> {
        self.session.lock().await.clone()
    }
}

/// A ready-made session for tests.
pub fn test_session() -> Session {
    Session {
        user_id: UserId("@me:example.org".into()),
        device_id: "TESTDEVICE".into(),
        access_token: "syt_test_token".into(),
        homeserver_url: "https://example.org".into(),
    }
}
