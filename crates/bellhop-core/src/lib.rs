// SPDX-FileCopyrightText: 2026 Bellhop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Bellhop notification pipeline.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Bellhop workspace. The external
//! collaborators (credential store, sync service, push gateway) are consumed
//! through the traits defined here and never reimplemented.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::BellhopError;
pub use types::{
    AdapterType, Event, EventId, EventKind, HealthStatus, MatchedRule, Membership,
    NotificationCategory, NotificationDraft, RoomId, Session, UserId, WakePayload,
};

// Re-export all trait seams at crate root.
pub use traits::{CredentialStore, PushGateway, ServiceAdapter, SyncService, SyncServiceFactory};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bellhop_error_has_all_variants() {
        // Verify the full taxonomy exists and can be constructed.
        let _not_matrix = BellhopError::NotAMatrixNotification;
        let _no_session = BellhopError::NoActiveSession;
        let _fetch = BellhopError::FetchFailed {
            message: "test".into(),
            source: Some(Box::new(std::io::Error::other("test"))),
        };
        let _context = BellhopError::ContextResolutionFailed {
            message: "test".into(),
            source: None,
        };
        let _push = BellhopError::SecondaryPushFailed {
            message: "test".into(),
            source: None,
        };
        let _config = BellhopError::Config("test".into());
        let _timeout = BellhopError::Timeout {
            duration: std::time::Duration::from_secs(15),
        };
        let _internal = BellhopError::Internal("test".into());
    }

    #[test]
    fn error_messages_are_stable() {
        assert_eq!(
            BellhopError::NotAMatrixNotification.to_string(),
            "payload is not a matrix notification"
        );
        assert_eq!(
            BellhopError::fetch("timed out").to_string(),
            "event fetch failed: timed out"
        );
    }

    #[test]
    fn adapter_type_round_trip() {
        use std::str::FromStr;
        for variant in [AdapterType::Sync, AdapterType::PushGateway] {
            let s = variant.to_string();
            assert_eq!(AdapterType::from_str(&s).expect("parse"), variant);
        }
    }

    #[test]
    fn session_equality_drives_rebuild() {
        let a = Session {
            user_id: UserId("@alice:hs".into()),
            device_id: "DEV1".into(),
            access_token: "tok".into(),
            homeserver_url: "https://hs".into(),
        };
        let mut b = a.clone();
        assert_eq!(a, b);
        b.access_token = "tok2".into();
        assert_ne!(a, b);
    }

    #[test]
    fn all_trait_seams_are_exported() {
        // If any seam is missing or fails to compile, this test won't build.
        fn _assert_service_adapter<T: ServiceAdapter>() {}
        fn _assert_sync_service<T: SyncService>() {}
        fn _assert_credential_store<T: CredentialStore>() {}
        fn _assert_push_gateway<T: PushGateway>() {}
        fn _assert_sync_factory<T: SyncServiceFactory>() {}
    }
}
