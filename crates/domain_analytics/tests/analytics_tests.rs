//! Comprehensive tests for domain_analytics

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{ClaimId, ErrorKind};
use domain_analytics::{AnalyticsAggregator, AnalyticsError, BucketSize};
use domain_claims::{Claim, ClaimStatus, ClaimStore, ClaimType, InMemoryClaimStore, NewClaim};
use domain_tunnel::TunnelState;
use test_utils::{TemporalFixtures, TestClaimBuilder, TestHarness};

struct Fixture {
    harness: TestHarness,
    aggregator: AnalyticsAggregator,
}

fn start() -> DateTime<Utc> {
    TemporalFixtures::start()
}

fn fixture() -> Fixture {
    let harness = TestHarness::new();
    let aggregator = AnalyticsAggregator::new(
        harness.store.clone(),
        harness.tunnels.clone(),
        harness.clock.clone(),
    );
    Fixture {
        harness,
        aggregator,
    }
}

fn new_claim(customer: &str, claim_type: ClaimType, amount: Decimal) -> NewClaim {
    NewClaim {
        customer: customer.to_string(),
        claim_type,
        amount,
        description: "Rear bumper damaged in parking lot collision".to_string(),
    }
}

async fn insert_at(store: &InMemoryClaimStore, input: NewClaim, at: DateTime<Utc>) -> Claim {
    TestClaimBuilder::from_input(input)
        .created_at(at)
        .insert_into(store)
        .await
}

/// A claim at `at` whose customer does not matter to the test
async fn insert_amount_at(store: &InMemoryClaimStore, amount: Decimal, at: DateTime<Utc>) {
    TestClaimBuilder::new()
        .with_random_customer()
        .with_claim_type(ClaimType::Auto)
        .with_amount(amount)
        .created_at(at)
        .insert_into(store)
        .await;
}

// ============================================================================
// Dashboard Tests
// ============================================================================

mod dashboard_tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_dashboard() {
        let f = fixture();
        let dashboard = f.aggregator.dashboard().await.unwrap();

        assert_eq!(dashboard.total_claims, 0);
        assert_eq!(dashboard.mean_risk_score, None);
        assert_eq!(dashboard.claims_by_status.len(), ClaimStatus::ALL.len());
        assert!(dashboard.claims_by_status.values().all(|c| *c == 0));
        assert_eq!(dashboard.tunnels_by_state.len(), TunnelState::ALL.len());
    }

    #[tokio::test]
    async fn test_dashboard_counts_and_mean() {
        let f = fixture();
        let a = insert_at(&f.harness.store, new_claim("Ann", ClaimType::Auto, dec!(1200)), start()).await;
        insert_at(&f.harness.store, new_claim("Bob", ClaimType::Medical, dec!(800)), start()).await;

        let analysis = f.harness.analysis.analyze(a.id).await.unwrap();

        let dashboard = f.aggregator.dashboard().await.unwrap();
        assert_eq!(dashboard.total_claims, 2);
        assert_eq!(dashboard.analyzed_claims, 1);
        assert_eq!(dashboard.total_claimed_amount, dec!(2000));
        assert_eq!(dashboard.claims_by_status[&ClaimStatus::Submitted], 1);
        assert_eq!(dashboard.mean_risk_score, Some(analysis.assessment.score));
    }

    #[tokio::test]
    async fn test_dashboard_observes_expiry_without_mutating() {
        let f = fixture();
        f.harness.tunnels.create_tunnel(ClaimId::new(), None, None).await.unwrap();
        f.harness.tunnels.create_tunnel(ClaimId::new(), None, None).await.unwrap();

        let before = f.aggregator.dashboard().await.unwrap();
        assert_eq!(before.active_tunnels, 2);
        assert_eq!(before.tunnels_by_state[&TunnelState::Established], 2);

        f.harness.clock.advance(Duration::seconds(60));
        let after = f.aggregator.dashboard().await.unwrap();
        assert_eq!(after.active_tunnels, 0);
        assert_eq!(after.tunnels_by_state[&TunnelState::Expired], 2);

        // Dashboard reads do not sweep
        assert_eq!(f.harness.tunnels.sweep_expired().await, 2);
    }

    #[tokio::test]
    async fn test_dashboard_serializes_status_keys() {
        let f = fixture();
        let json = serde_json::to_value(f.aggregator.dashboard().await.unwrap()).unwrap();
        assert_eq!(json["claims_by_status"]["under_review"], 0);
        assert_eq!(json["tunnels_by_state"]["ESTABLISHED"], 0);
    }

    #[tokio::test]
    async fn test_dashboard_amount_overflow_is_an_error() {
        let f = fixture();
        for _ in 0..2 {
            let mut claim = TestClaimBuilder::new().build();
            claim.amount = Decimal::MAX;
            f.harness.store.insert_claim(claim).await.unwrap();
        }

        let err = f.aggregator.dashboard().await.unwrap_err();
        assert!(matches!(err, AnalyticsError::AmountOverflow(_)));
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}

// ============================================================================
// Trend Tests
// ============================================================================

mod trend_tests {
    use super::*;

    #[tokio::test]
    async fn test_three_consecutive_days() {
        let f = fixture();
        insert_at(&f.harness.store, new_claim("Ann", ClaimType::Auto, dec!(100)), start()).await;
        insert_at(
            &f.harness.store,
            new_claim("Bob", ClaimType::Auto, dec!(200)),
            start() + Duration::days(1),
        )
        .await;
        insert_at(
            &f.harness.store,
            new_claim("Cy", ClaimType::Auto, dec!(300)),
            start() + Duration::days(1) + Duration::hours(2),
        )
        .await;
        insert_at(
            &f.harness.store,
            new_claim("Di", ClaimType::Auto, dec!(400)),
            start() + Duration::days(2),
        )
        .await;

        let report = f.aggregator.trends(BucketSize::Daily).await.unwrap();

        assert_eq!(report.buckets.len(), 3);
        let counts: Vec<usize> = report.buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 2, 1]);
        assert!(report
            .buckets
            .windows(2)
            .all(|w| w[0].bucket_start < w[1].bucket_start));
        assert_eq!(
            report.buckets[0].bucket_start,
            Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(report.buckets[1].mean_amount, dec!(250));
    }

    #[tokio::test]
    async fn test_gaps_are_zero_filled() {
        let f = fixture();
        insert_amount_at(&f.harness.store, dec!(100), start()).await;
        insert_amount_at(&f.harness.store, dec!(100), start() + Duration::hours(3)).await;

        let report = f.aggregator.trends(BucketSize::Hourly).await.unwrap();
        let counts: Vec<usize> = report.buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 0, 0, 1]);
        assert_eq!(report.buckets[1].mean_amount, dec!(0));
    }

    #[tokio::test]
    async fn test_weekly_single_bucket() {
        let f = fixture();
        insert_amount_at(&f.harness.store, dec!(100), start()).await;
        let report = f.aggregator.trends(BucketSize::Weekly).await.unwrap();
        assert_eq!(report.buckets.len(), 1);
        assert_eq!(report.bucket, BucketSize::Weekly);
    }

    #[tokio::test]
    async fn test_empty_store_has_no_buckets() {
        let f = fixture();
        let report = f.aggregator.trends(BucketSize::Daily).await.unwrap();
        assert!(report.buckets.is_empty());
    }
}

// ============================================================================
// Search Tests
// ============================================================================

mod search_tests {
    use super::*;

    #[tokio::test]
    async fn test_search_is_case_insensitive_newest_first() {
        let f = fixture();
        let older =
            insert_at(&f.harness.store, new_claim("Ann Parker", ClaimType::Auto, dec!(100)), start()).await;
        let newer = insert_at(
            &f.harness.store,
            new_claim("Dan Parkes", ClaimType::Property, dec!(100)),
            start() + Duration::minutes(5),
        )
        .await;
        insert_at(&f.harness.store, new_claim("Eve", ClaimType::Medical, dec!(100)), start()).await;

        let results = f.aggregator.search("PARK").await.unwrap();
        let ids: Vec<ClaimId> = results.iter().map(|c| c.id).collect();
        // "parking" appears in every description, so all three match
        assert_eq!(ids.len(), 3);
        assert_eq!(ids[0], newer.id);

        let by_name = f.aggregator.search("parker").await.unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id, older.id);
    }

    #[tokio::test]
    async fn test_search_matches_claim_type() {
        let f = fixture();
        insert_at(&f.harness.store, new_claim("Ann", ClaimType::Property, dec!(100)), start()).await;
        insert_at(&f.harness.store, new_claim("Bob", ClaimType::Auto, dec!(100)), start()).await;

        let results = f.aggregator.search("property").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].claim_type, ClaimType::Property);
    }

    #[tokio::test]
    async fn test_blank_search_is_validation_error() {
        let f = fixture();
        let err = f.aggregator.search("   ").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
