//! Shared API types
//!
//! Error envelope, pagination parsing, and the pagination metadata block
//! used by the list endpoint.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::core::constants::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use crate::data::DataError;
use crate::data::filters::FilterError;

/// Standard API error
///
/// Every variant renders the `{success: false, error, message}` envelope
/// with its HTTP status. Store errors log the cause and return a generic
/// message; the cause never leaks to the client.
#[derive(Debug)]
pub enum ApiError {
    Unauthorized { message: String },
    Configuration { message: String },
    Validation { message: String },
    NotFound { message: String },
    Store { message: String },
    ServiceUnavailable { message: String },
}

impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
        }
    }

    pub fn from_data(e: DataError) -> Self {
        tracing::error!(error = %e, "Store error");
        Self::Store {
            message: "Store operation failed".to_string(),
        }
    }

    fn parts(&self) -> (StatusCode, &'static str, &str) {
        match self {
            Self::Unauthorized { message } => (StatusCode::UNAUTHORIZED, "unauthorized", message),
            Self::Configuration { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "configuration_error",
                message,
            ),
            Self::Validation { message } => (StatusCode::BAD_REQUEST, "validation_error", message),
            Self::NotFound { message } => (StatusCode::NOT_FOUND, "not_found", message),
            Self::Store { message } => (StatusCode::INTERNAL_SERVER_ERROR, "store_error", message),
            Self::ServiceUnavailable { message } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                message,
            ),
        }
    }
}

impl From<FilterError> for ApiError {
    fn from(e: FilterError) -> Self {
        Self::validation(e.to_string())
    }
}

/// Error envelope body
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub success: bool,
    pub error: &'static str,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = self.parts();
        let body = ErrorBody {
            success: false,
            error,
            message: message.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Parse the page limit: default 100 when absent, unparseable, or zero;
/// otherwise clamped into [1, 10000].
pub fn parse_limit(raw: Option<&str>) -> i64 {
    match raw.and_then(|s| s.parse::<i64>().ok()) {
        None | Some(0) => DEFAULT_PAGE_LIMIT,
        Some(n) => n.clamp(1, MAX_PAGE_LIMIT),
    }
}

/// Parse the page offset: default 0 when absent or unparseable; negative
/// values clamp to 0 rather than reaching the store.
pub fn parse_offset(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(0)
        .max(0)
}

/// Parse the streaming row cap: 0 (unlimited) when absent or empty;
/// malformed or negative values are rejected.
pub fn parse_stream_cap(raw: Option<&str>) -> Result<i64, ApiError> {
    match raw {
        None => Ok(0),
        Some("") => Ok(0),
        Some(s) => s
            .parse::<i64>()
            .ok()
            .filter(|n| *n >= 0)
            .ok_or_else(|| ApiError::validation(format!("invalid stream limit: {s:?}"))),
    }
}

/// Pagination metadata in the list response
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub limit: i64,
    pub offset: i64,
    /// Rows returned in this page
    pub count: i64,
    /// Total rows matching the filters
    pub total: i64,
    pub has_more: bool,
}

impl PaginationMeta {
    pub fn new(limit: i64, offset: i64, count: i64, total: i64) -> Self {
        Self {
            limit,
            offset,
            count,
            total,
            has_more: offset + count < total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults() {
        assert_eq!(parse_limit(Some("0")), 100);
        assert_eq!(parse_limit(Some("")), 100);
        assert_eq!(parse_limit(None), 100);
        assert_eq!(parse_limit(Some("abc")), 100);
    }

    #[test]
    fn limit_clamps() {
        assert_eq!(parse_limit(Some("999999")), 10_000);
        assert_eq!(parse_limit(Some("-5")), 1);
        assert_eq!(parse_limit(Some("250")), 250);
    }

    #[test]
    fn offset_defaults_and_clamps() {
        assert_eq!(parse_offset(None), 0);
        assert_eq!(parse_offset(Some("abc")), 0);
        assert_eq!(parse_offset(Some("-3")), 0);
        assert_eq!(parse_offset(Some("40")), 40);
    }

    #[test]
    fn stream_cap_defaults_to_unlimited() {
        assert_eq!(parse_stream_cap(None).unwrap(), 0);
        assert_eq!(parse_stream_cap(Some("")).unwrap(), 0);
        assert_eq!(parse_stream_cap(Some("5000")).unwrap(), 5000);
    }

    #[test]
    fn stream_cap_rejects_malformed_input() {
        assert!(parse_stream_cap(Some("many")).is_err());
        assert!(parse_stream_cap(Some("-1")).is_err());
    }

    #[test]
    fn has_more_boundary() {
        // offset = total - 1, limit = 1 returns the final row
        let meta = PaginationMeta::new(1, 9, 1, 10);
        assert!(!meta.has_more);

        let meta = PaginationMeta::new(1, 8, 1, 10);
        assert!(meta.has_more);

        // empty page past the end
        let meta = PaginationMeta::new(100, 50, 0, 10);
        assert!(!meta.has_more);
    }

    #[test]
    fn error_envelope_statuses() {
        let cases = [
            (ApiError::unauthorized("x"), StatusCode::UNAUTHORIZED),
            (
                ApiError::configuration("x"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (ApiError::validation("x"), StatusCode::BAD_REQUEST),
            (ApiError::not_found("x"), StatusCode::NOT_FOUND),
            (
                ApiError::service_unavailable("x"),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }
}
