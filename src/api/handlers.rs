//! HTTP request handlers for the analytics API.
//!
//! Every handler reads from the shared snapshot; nothing is recomputed
//! except the on-demand breakdowns, which are cheap single passes.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    ApplicationDimension, EnrollmentDimension, enrollment_rate_by, enrollment_rate_table,
    retention_by, retention_table,
};
use crate::error::AnalyticsError;
use crate::models::Dashboard;
use crate::report::ENGINE_VERSION;

use super::request::BreakdownQuery;
use super::response::{ApiErrorResponse, DashboardResponse, HealthResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/report", get(report_handler))
        .route("/tables", get(table_names_handler))
        .route("/tables/:name", get(table_handler))
        .route("/dashboards/:name", get(dashboard_handler))
        .route("/applications/enrollment-rate", get(enrollment_rate_handler))
        .route("/enrollment/retention", get(retention_handler))
        .with_state(state)
}

fn json_ok<T: Serialize>(body: T) -> Response {
    (StatusCode::OK, Json(body)).into_response()
}

fn error_response(correlation_id: Uuid, error: AnalyticsError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %error,
        "Request failed"
    );
    ApiErrorResponse::from(error).into_response()
}

fn query_error(correlation_id: Uuid, rejection: QueryRejection) -> Response {
    let body_text = rejection.body_text();
    warn!(
        correlation_id = %correlation_id,
        error = %body_text,
        "Invalid query string"
    );
    ApiErrorResponse::bad_query(body_text).into_response()
}

/// Handler for GET /health.
async fn health_handler(State(state): State<AppState>) -> Response {
    let report = state.report();
    json_ok(HealthResponse {
        status: "ok".to_string(),
        engine_version: ENGINE_VERSION.to_string(),
        run_id: report.run_id,
        record_counts: report.record_counts,
    })
}

/// Handler for GET /report.
async fn report_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        run_id = %state.report().run_id,
        "Serving full report"
    );
    json_ok(state.report())
}

/// Handler for GET /tables.
async fn table_names_handler(State(state): State<AppState>) -> Response {
    json_ok(state.report().table_names())
}

/// Handler for GET /tables/:name.
async fn table_handler(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, table = %name, "Serving table");

    match state.report().table(&name) {
        Ok(table) => json_ok(table),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /dashboards/:name.
async fn dashboard_handler(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, dashboard = %name, "Serving dashboard");

    let tables = name
        .parse::<Dashboard>()
        .and_then(|dashboard| {
            let tables = state.report().dashboard(dashboard)?;
            Ok((dashboard, tables))
        });

    match tables {
        Ok((dashboard, tables)) => json_ok(DashboardResponse {
            dashboard,
            tables: tables.into_iter().cloned().collect(),
        }),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /applications/enrollment-rate?by=<dimension>.
async fn enrollment_rate_handler(
    State(state): State<AppState>,
    query: Result<Query<BreakdownQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return query_error(correlation_id, rejection),
    };

    let dimension = match query.by.parse::<ApplicationDimension>() {
        Ok(dimension) => dimension,
        Err(err) => return error_response(correlation_id, err),
    };

    let start_time = Instant::now();
    let rows = enrollment_rate_by(&state.dataset().applications, dimension);
    info!(
        correlation_id = %correlation_id,
        dimension = dimension.as_str(),
        groups = rows.len(),
        duration_us = start_time.elapsed().as_micros(),
        "Enrollment rate breakdown computed"
    );

    json_ok(enrollment_rate_table(
        format!("enrollment_rate_by_{}", dimension.as_str()),
        dimension,
        &rows,
    ))
}

/// Handler for GET /enrollment/retention?by=<dimension>.
async fn retention_handler(
    State(state): State<AppState>,
    query: Result<Query<BreakdownQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return query_error(correlation_id, rejection),
    };

    let dimension = match query.by.parse::<EnrollmentDimension>() {
        Ok(dimension) => dimension,
        Err(err) => return error_response(correlation_id, err),
    };

    let start_time = Instant::now();
    let rows = retention_by(&state.dataset().enrollment, dimension);
    info!(
        correlation_id = %correlation_id,
        dimension = dimension.as_str(),
        groups = rows.len(),
        duration_us = start_time.elapsed().as_micros(),
        "Retention breakdown computed"
    );

    json_ok(retention_table(
        format!("retention_by_{}", dimension.as_str()),
        dimension,
        &rows,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::sample_dataset;
    use crate::api::response::ApiError;
    use crate::config::AnalysisConfig;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    fn create_test_router() -> Router {
        let state = AppState::build(sample_dataset(), AnalysisConfig::default()).unwrap();
        create_router(state)
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let response = create_test_router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health_reports_record_counts() {
        let (status, body) = get_json("/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["record_counts"]["applications"], 6);
        assert_eq!(body["record_counts"]["enrollments"], 5);
    }

    #[tokio::test]
    async fn test_table_names_in_report_order() {
        let (status, body) = get_json("/tables").await;

        assert_eq!(status, StatusCode::OK);
        let names = body.as_array().unwrap();
        assert_eq!(names[0], "gender_distribution");
    }

    #[tokio::test]
    async fn test_json_responses_carry_a_single_content_type() {
        for uri in ["/report", "/tables/nope"] {
            let response = create_test_router()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();

            let values: Vec<_> = response.headers().get_all("content-type").iter().collect();
            assert_eq!(values, vec!["application/json"], "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_unknown_table_returns_404() {
        let response = create_test_router()
            .oneshot(
                Request::builder()
                    .uri("/tables/nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let content_type = response.headers().get("content-type").unwrap();
        assert_eq!(content_type, "application/json");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "TABLE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_dashboard_tables_in_panel_order() {
        let (status, body) = get_json("/dashboards/diversity").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["dashboard"], "diversity");
        assert_eq!(body["tables"][0]["name"], "ethnicity_by_year");
        assert_eq!(body["tables"].as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_unknown_dashboard_returns_404() {
        let (status, body) = get_json("/dashboards/finance").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "DASHBOARD_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_enrollment_rate_by_college() {
        let (status, body) = get_json("/applications/enrollment-rate?by=college").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "enrollment_rate_by_college");
        assert_eq!(body["columns"][0], "college");
        // Business sorts first; one applicant, enrolled.
        assert_eq!(body["rows"][0][0], "Business");
        assert_eq!(body["rows"][0][3], 100.0);
    }

    #[tokio::test]
    async fn test_retention_by_status() {
        let (status, body) = get_json("/enrollment/retention?by=status").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["columns"][0], "status");
        assert_eq!(body["rows"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_dimension_returns_400() {
        let (status, body) = get_json("/enrollment/retention?by=shoe_size").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "UNKNOWN_DIMENSION");
    }

    #[tokio::test]
    async fn test_missing_dimension_returns_400() {
        let (status, body) = get_json("/applications/enrollment-rate").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }
}
