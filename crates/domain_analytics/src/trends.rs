//! Time-bucketed claim volume

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use domain_claims::Claim;

use crate::error::AnalyticsError;

/// Upper bound on buckets in one report
pub const MAX_TREND_BUCKETS: usize = 10_000;

/// Bucket width; buckets are aligned to the Unix epoch in UTC
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketSize {
    Hourly,
    #[default]
    Daily,
    Weekly,
}

impl BucketSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            BucketSize::Hourly => "hourly",
            BucketSize::Daily => "daily",
            BucketSize::Weekly => "weekly",
        }
    }

    pub fn width_secs(&self) -> i64 {
        match self {
            BucketSize::Hourly => 3_600,
            BucketSize::Daily => 86_400,
            BucketSize::Weekly => 7 * 86_400,
        }
    }

    /// Start of the bucket containing `at`
    pub fn floor(&self, at: DateTime<Utc>) -> i64 {
        let width = self.width_secs();
        at.timestamp().div_euclid(width) * width
    }
}

impl fmt::Display for BucketSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BucketSize {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hourly" | "hour" => Ok(BucketSize::Hourly),
            "daily" | "day" => Ok(BucketSize::Daily),
            "weekly" | "week" => Ok(BucketSize::Weekly),
            other => Err(AnalyticsError::Validation(format!(
                "unknown bucket '{other}', expected hourly, daily or weekly"
            ))),
        }
    }
}

/// Claim volume within one bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendBucket {
    pub bucket_start: DateTime<Utc>,
    pub count: usize,
    /// Zero for an empty bucket
    pub mean_amount: Decimal,
}

/// Contiguous bucket sequence, oldest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    pub bucket: BucketSize,
    pub buckets: Vec<TrendBucket>,
}

#[derive(Default)]
struct Tally {
    count: usize,
    total: Decimal,
}

/// Folds claims into contiguous buckets from the first claim's bucket to the last
///
/// # Errors
///
/// Returns `Validation` when the span would need more than
/// [`MAX_TREND_BUCKETS`] buckets, and `AmountOverflow` when a bucket's
/// amounts cannot be summed.
pub fn bucketize(claims: &[Claim], bucket: BucketSize) -> Result<TrendReport, AnalyticsError> {
    let mut tallies: BTreeMap<i64, Tally> = BTreeMap::new();
    for claim in claims {
        let tally = tallies.entry(bucket.floor(claim.created_at)).or_default();
        tally.count += 1;
        tally.total = tally
            .total
            .checked_add(claim.amount)
            .ok_or(AnalyticsError::AmountOverflow("bucket amount total"))?;
    }

    let (first, last) = match (tallies.keys().next(), tallies.keys().next_back()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => {
            return Ok(TrendReport {
                bucket,
                buckets: Vec::new(),
            })
        }
    };

    let width = bucket.width_secs();
    let span = usize::try_from((last - first) / width + 1).unwrap_or(usize::MAX);
    if span > MAX_TREND_BUCKETS {
        return Err(AnalyticsError::Validation(format!(
            "{span} {bucket} buckets exceed the limit of {MAX_TREND_BUCKETS}; use a wider bucket"
        )));
    }

    let mut buckets = Vec::with_capacity(span);
    let mut start = first;
    while start <= last {
        let (count, mean_amount) = match tallies.get(&start) {
            Some(tally) if tally.count > 0 => (
                tally.count,
                (tally.total / Decimal::from(tally.count)).round_dp(2),
            ),
            _ => (0, Decimal::ZERO),
        };
        buckets.push(TrendBucket {
            bucket_start: DateTime::from_timestamp(start, 0).unwrap_or_default(),
            count,
            mean_amount,
        });
        start += width;
    }

    Ok(TrendReport { bucket, buckets })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_bucket() {
        assert_eq!("Hourly".parse::<BucketSize>().unwrap(), BucketSize::Hourly);
        assert_eq!("weekly".parse::<BucketSize>().unwrap(), BucketSize::Weekly);
        assert!("monthly".parse::<BucketSize>().is_err());
        assert_eq!(BucketSize::default(), BucketSize::Daily);
    }

    #[test]
    fn test_floor_is_epoch_aligned() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 13, 45, 10).unwrap();
        let hour = Utc.with_ymd_and_hms(2024, 5, 1, 13, 0, 0).unwrap();
        let day = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        assert_eq!(BucketSize::Hourly.floor(at), hour.timestamp());
        assert_eq!(BucketSize::Daily.floor(at), day.timestamp());
        assert_eq!(BucketSize::Weekly.floor(at) % (7 * 86_400), 0);
    }

    #[test]
    fn test_amount_overflow_is_an_error() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let input = domain_claims::NewClaim {
            customer: "Max Out".to_string(),
            claim_type: domain_claims::ClaimType::Other,
            amount: Decimal::ONE,
            description: String::new(),
        };
        let mut claim = Claim::submit(input, at).unwrap();
        claim.amount = Decimal::MAX;
        let claims = vec![claim.clone(), claim];

        let err = bucketize(&claims, BucketSize::Daily).unwrap_err();
        assert!(matches!(err, AnalyticsError::AmountOverflow(_)));
        assert_eq!(err.kind(), core_kernel::ErrorKind::Internal);
    }

    #[test]
    fn test_empty_input() {
        let report = bucketize(&[], BucketSize::Daily).unwrap();
        assert!(report.buckets.is_empty());
    }
}
