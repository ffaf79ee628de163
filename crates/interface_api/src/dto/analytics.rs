//! Analytics DTOs

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use domain_analytics::{BucketSize, TrendBucket, TrendReport};

use super::ApiResponse;

/// Query string of `GET /api/analytics/trends`
#[derive(Debug, Default, Deserialize)]
pub struct TrendParams {
    pub bucket: Option<String>,
}

/// `{"success", "data": [buckets], "total", "bucket"}`
#[derive(Debug, Serialize)]
pub struct TrendsResponse {
    #[serde(flatten)]
    pub envelope: ApiResponse<Vec<TrendBucket>>,
    pub bucket: BucketSize,
}

impl From<TrendReport> for TrendsResponse {
    fn from(report: TrendReport) -> Self {
        Self {
            envelope: ApiResponse::list(report.buckets),
            bucket: report.bucket,
        }
    }
}

impl IntoResponse for TrendsResponse {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    #[test]
    fn test_trends_response_shape() {
        let report = TrendReport {
            bucket: BucketSize::Weekly,
            buckets: vec![TrendBucket {
                bucket_start: Utc.with_ymd_and_hms(2024, 4, 29, 0, 0, 0).unwrap(),
                count: 2,
                mean_amount: Decimal::new(150, 0),
            }],
        };
        let json = serde_json::to_value(TrendsResponse::from(report)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["bucket"], "weekly");
        assert_eq!(json["total"], 1);
        assert!(json["data"].is_array());
        assert_eq!(json["data"][0]["count"], 2);
        assert!(json.get("message").is_none());
    }
}
