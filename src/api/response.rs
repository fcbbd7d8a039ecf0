//! Response bodies and error mapping for the analytics API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AnalyticsError;
use crate::models::{Dashboard, RecordCounts, ResultTable};

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok` once the server is answering.
    pub status: String,
    /// Engine version that built the report.
    pub engine_version: String,
    /// Identifier of the served report.
    pub run_id: Uuid,
    /// Input sizes of the served report.
    pub record_counts: RecordCounts,
}

/// Body of `GET /dashboards/:name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    /// The dashboard.
    pub dashboard: Dashboard,
    /// Its tables in panel order.
    pub tables: Vec<ResultTable>,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response for a malformed query string.
    pub fn bad_query(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: ApiError::validation_error(message),
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<AnalyticsError> for ApiErrorResponse {
    fn from(error: AnalyticsError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            AnalyticsError::TableNotFound { name } => (
                StatusCode::NOT_FOUND,
                ApiError::with_details(
                    "TABLE_NOT_FOUND",
                    message,
                    format!("The report has no table named '{}'", name),
                ),
            ),
            AnalyticsError::UnknownDashboard { name } => (
                StatusCode::NOT_FOUND,
                ApiError::with_details(
                    "DASHBOARD_NOT_FOUND",
                    message,
                    format!(
                        "'{}' is not one of executive, admissions, college_deans, diversity",
                        name
                    ),
                ),
            ),
            AnalyticsError::UnknownDimension { dimension, table } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "UNKNOWN_DIMENSION",
                    message,
                    format!("'{}' is not a grouping field of {}", dimension, table),
                ),
            ),
            AnalyticsError::ConfigNotFound { .. }
            | AnalyticsError::ConfigParseError { .. }
            | AnalyticsError::InvalidScoreTable { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            AnalyticsError::SourceNotFound { .. }
            | AnalyticsError::SourceParseError { .. }
            | AnalyticsError::MissingColumn { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("SOURCE_ERROR", "Input data error", message),
            ),
            AnalyticsError::DuplicateTable { .. } | AnalyticsError::Export { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("ANALYSIS_ERROR", "Analysis failed", message),
            ),
        };

        ApiErrorResponse { status, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_table_not_found_is_404() {
        let response: ApiErrorResponse = AnalyticsError::TableNotFound {
            name: "nope".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.error.code, "TABLE_NOT_FOUND");
        assert!(response.error.message.contains("nope"));
    }

    #[test]
    fn test_unknown_dimension_is_400() {
        let response: ApiErrorResponse = AnalyticsError::UnknownDimension {
            dimension: "shoe_size".to_string(),
            table: "applications".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.code, "UNKNOWN_DIMENSION");
    }

    #[test]
    fn test_config_errors_are_500() {
        let response: ApiErrorResponse = AnalyticsError::ConfigNotFound {
            path: "analysis.yaml".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.error.code, "CONFIG_ERROR");
    }
}
