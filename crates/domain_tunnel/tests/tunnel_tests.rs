//! Comprehensive tests for domain_tunnel

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use tokio::sync::watch;

use core_kernel::{ClaimId, ErrorKind, ManualClock};
use domain_tunnel::{
    TunnelConfig, TunnelError, TunnelLifecycleManager, TunnelState, TunnelSweeper,
};
use test_utils::assert_forward_only_history;

fn setup() -> (Arc<ManualClock>, Arc<TunnelLifecycleManager>) {
    let clock = ManualClock::shared(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
    let manager = Arc::new(TunnelLifecycleManager::new(
        TunnelConfig::default(),
        clock.clone(),
    ));
    (clock, manager)
}

// ============================================================================
// Lifecycle Tests
// ============================================================================

mod lifecycle_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_conflict_before_expiry() {
        let (clock, manager) = setup();
        let claim_id = ClaimId::new();

        let session = manager.create_tunnel(claim_id, None, None).await.unwrap();
        assert_eq!(session.state, TunnelState::Established);
        assert_eq!(session.expires_at, session.created_at + Duration::seconds(60));

        clock.advance(Duration::seconds(30));
        let err = manager.create_tunnel(claim_id, None, None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(matches!(
            err,
            TunnelError::ActiveSessionExists { tunnel_id, .. } if tunnel_id == session.id
        ));
    }

    #[tokio::test]
    async fn test_sixty_second_timeout() {
        let (clock, manager) = setup();
        let session = manager.create_tunnel(ClaimId::new(), None, None).await.unwrap();

        assert_eq!(
            manager.get_tunnel(session.id).await.unwrap().state,
            TunnelState::Established
        );

        clock.advance(Duration::seconds(59));
        assert_eq!(
            manager.get_tunnel(session.id).await.unwrap().state,
            TunnelState::Established
        );

        clock.advance(Duration::seconds(1));
        let expired = manager.get_tunnel(session.id).await.unwrap();
        assert_eq!(expired.state, TunnelState::Expired);
        assert!(expired.closed_at.is_none());
        assert_eq!(expired.expires_at, session.expires_at);
    }

    #[tokio::test]
    async fn test_transitions_only_move_forward() {
        let (clock, manager) = setup();
        let claim_id = ClaimId::new();
        let closed = manager.create_tunnel(claim_id, None, None).await.unwrap();
        manager.close_tunnel(closed.id).await.unwrap();
        let expired = manager.create_tunnel(claim_id, None, None).await.unwrap();
        clock.advance(Duration::seconds(120));

        for session in manager.tunnels_for_claim(claim_id).await.unwrap() {
            assert_forward_only_history(&session);
            assert_eq!(session.transitions.len(), 3);
        }

        assert_eq!(
            manager.get_tunnel(expired.id).await.unwrap().state,
            TunnelState::Expired
        );
    }

    #[tokio::test]
    async fn test_close_twice_is_invalid_state() {
        let (_clock, manager) = setup();
        let session = manager.create_tunnel(ClaimId::new(), None, None).await.unwrap();

        let closed = manager.close_tunnel(session.id).await.unwrap();
        assert_eq!(closed.state, TunnelState::Closed);
        assert!(closed.closed_at.is_some());

        let err = manager.close_tunnel(session.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }

    #[tokio::test]
    async fn test_timed_out_session_cannot_be_closed() {
        let (clock, manager) = setup();
        let session = manager.create_tunnel(ClaimId::new(), None, None).await.unwrap();
        clock.advance(Duration::seconds(61));

        let err = manager.close_tunnel(session.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
        assert_eq!(
            manager.get_tunnel(session.id).await.unwrap().state,
            TunnelState::Expired
        );
    }

    #[tokio::test]
    async fn test_custom_labels_are_kept() {
        let (_clock, manager) = setup();
        let session = manager
            .create_tunnel(
                ClaimId::new(),
                Some("WireGuard".to_string()),
                Some("ChaCha20".to_string()),
            )
            .await
            .unwrap();
        assert_eq!(session.protocol, "WireGuard");
        assert_eq!(session.encryption, "ChaCha20");
    }
}

// ============================================================================
// Sweep Tests
// ============================================================================

mod sweep_tests {
    use super::*;

    #[tokio::test]
    async fn test_sweep_expires_only_due_sessions() {
        let (clock, manager) = setup();
        let old = manager.create_tunnel(ClaimId::new(), None, None).await.unwrap();
        clock.advance(Duration::seconds(30));
        let young = manager.create_tunnel(ClaimId::new(), None, None).await.unwrap();
        let closed = manager.create_tunnel(ClaimId::new(), None, None).await.unwrap();
        manager.close_tunnel(closed.id).await.unwrap();

        clock.advance(Duration::seconds(30));
        assert_eq!(manager.sweep_expired().await, 1);
        assert_eq!(manager.sweep_expired().await, 0);

        assert_eq!(manager.get_tunnel(old.id).await.unwrap().state, TunnelState::Expired);
        assert_eq!(
            manager.get_tunnel(young.id).await.unwrap().state,
            TunnelState::Established
        );
        assert_eq!(manager.get_tunnel(closed.id).await.unwrap().state, TunnelState::Closed);
    }

    #[tokio::test]
    async fn test_ended_sessions_are_retained() {
        let (clock, manager) = setup();
        let claim_id = ClaimId::new();
        let closed = manager.create_tunnel(claim_id, None, None).await.unwrap();
        manager.close_tunnel(closed.id).await.unwrap();
        let expired = manager.create_tunnel(claim_id, None, None).await.unwrap();

        clock.advance(Duration::seconds(61));
        assert_eq!(manager.sweep_expired().await, 1);

        assert_eq!(manager.count().await, 2);
        assert_eq!(manager.get_tunnel(closed.id).await.unwrap().state, TunnelState::Closed);
        assert_eq!(manager.get_tunnel(expired.id).await.unwrap().state, TunnelState::Expired);
        let history = manager.tunnels_for_claim(claim_id).await.unwrap();
        let ids: Vec<_> = history.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![expired.id, closed.id]);
        assert!(manager.active_tunnel_for_claim(claim_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sweep_on_empty_manager() {
        let (_clock, manager) = setup();
        assert_eq!(manager.sweep_expired().await, 0);
    }

    #[tokio::test]
    async fn test_sweeper_expires_and_stops_on_shutdown() {
        let (clock, manager) = setup();
        manager.create_tunnel(ClaimId::new(), None, None).await.unwrap();
        clock.advance(Duration::seconds(61));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = TunnelSweeper::new(manager.clone(), std::time::Duration::from_millis(10))
            .spawn(shutdown_rx);

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        shutdown_tx.send(true).unwrap();

        let stats = handle.await.unwrap();
        assert!(stats.runs >= 1);
        assert_eq!(stats.expired, 1);
        assert_eq!(manager.sweep_expired().await, 0);
    }
}

// ============================================================================
// Concurrency Tests
// ============================================================================

mod concurrency_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creation_yields_one_session() {
        let (_clock, manager) = setup();
        let claim_id = ClaimId::new();

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let manager = manager.clone();
                tokio::spawn(async move { manager.create_tunnel(claim_id, None, None).await })
            })
            .collect();

        let mut established = 0;
        let mut conflicts = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(session) => {
                    assert_eq!(session.state, TunnelState::Established);
                    established += 1;
                }
                Err(e) => {
                    assert_eq!(e.kind(), ErrorKind::Conflict);
                    conflicts += 1;
                }
            }
        }

        assert_eq!(established, 1);
        assert_eq!(conflicts, 15);
        assert_eq!(manager.count().await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_different_claims_proceed_independently() {
        let (_clock, manager) = setup();

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let manager = manager.clone();
                tokio::spawn(async move { manager.create_tunnel(ClaimId::new(), None, None).await })
            })
            .collect();

        for task in tasks {
            assert!(task.await.unwrap().is_ok());
        }
        assert_eq!(manager.snapshot().await.len(), 8);
    }
}
