//! API error handling
//!
//! Every failure leaves the API as
//! `{"success": false, "error": {"code", "message", "details"?}}`.
//! Domain errors convert by [`ErrorKind`]; extractor rejections are routed
//! through [`ApiJson`], [`ApiPath`] and [`ApiQuery`] so they use the same
//! envelope.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use core_kernel::{CoreError, ErrorKind};
use domain_analytics::AnalyticsError;
use domain_claims::ClaimError;
use domain_tunnel::TunnelError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn from_kind(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            ErrorKind::Validation => ApiError::Validation(message),
            ErrorKind::NotFound => ApiError::NotFound(message),
            ErrorKind::Conflict => ApiError::Conflict(message),
            ErrorKind::InvalidState => ApiError::InvalidState(message),
            ErrorKind::Internal => ApiError::Internal(message),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Conflict(_) | ApiError::InvalidState(_) => StatusCode::CONFLICT,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Wire code
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::NotFound(_) => ErrorKind::NotFound.code(),
            ApiError::Validation(_) => ErrorKind::Validation.code(),
            ApiError::Conflict(_) => ErrorKind::Conflict.code(),
            ApiError::InvalidState(_) => ErrorKind::InvalidState.code(),
            ApiError::Unavailable(_) => "SERVICE_UNAVAILABLE",
            ApiError::Internal(_) => ErrorKind::Internal.code(),
        }
    }

    /// Builds an error envelope response
    pub fn envelope(
        status: StatusCode,
        code: &str,
        message: impl Into<String>,
        details: Option<String>,
    ) -> Response {
        let body = ErrorResponse {
            success: false,
            error: ErrorBody {
                code: code.to_string(),
                message: message.into(),
                details,
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Details of an internal error, attached to the response for the debug middleware
#[derive(Debug, Clone)]
pub struct InternalErrorDetails(pub String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        match self {
            ApiError::Internal(details) => {
                error!(details = %details, "Internal error");
                let mut response = Self::envelope(status, code, "Internal server error", None);
                response.extensions_mut().insert(InternalErrorDetails(details));
                response
            }
            ApiError::Unavailable(message)
            | ApiError::BadRequest(message)
            | ApiError::NotFound(message)
            | ApiError::Validation(message)
            | ApiError::Conflict(message)
            | ApiError::InvalidState(message) => {
                if status.is_server_error() {
                    warn!(code, message = %message, "Request failed");
                }
                Self::envelope(status, code, message, None)
            }
        }
    }
}

impl From<ClaimError> for ApiError {
    fn from(err: ClaimError) -> Self {
        ApiError::from_kind(err.kind(), err.to_string())
    }
}

impl From<TunnelError> for ApiError {
    fn from(err: TunnelError) -> Self {
        ApiError::from_kind(err.kind(), err.to_string())
    }
}

impl From<AnalyticsError> for ApiError {
    fn from(err: AnalyticsError) -> Self {
        ApiError::from_kind(err.kind(), err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::from_kind(err.kind(), err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            // Well-formed JSON of the wrong shape
            JsonRejection::JsonDataError(e) => ApiError::Validation(e.body_text()),
            other => ApiError::BadRequest(format!("Invalid request format: {}", other.body_text())),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        match rejection {
            PathRejection::FailedToDeserializePathParams(e) => ApiError::Validation(e.body_text()),
            other => ApiError::Internal(other.body_text()),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

/// `Json` extractor whose rejections use the error envelope
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `Path` extractor whose rejections use the error envelope
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// `Query` extractor whose rejections use the error envelope
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
