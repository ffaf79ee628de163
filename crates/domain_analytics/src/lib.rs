//! Analytics Domain
//!
//! Read-only views folded over the claim store and the tunnel manager:
//! - a dashboard of counts, totals and the mean risk score
//! - contiguous, epoch-aligned trend buckets of claim volume
//! - free-text claim search

pub mod aggregator;
pub mod trends;
pub mod error;

pub use aggregator::{AnalyticsAggregator, DashboardSnapshot};
pub use trends::{BucketSize, TrendBucket, TrendReport};
pub use error::AnalyticsError;
