//! Integration tests for the enrollment analytics engine.
//!
//! Covers:
//! - CSV sources through normalization to the full report
//! - Reference examples (enrollment rate, SAT conversion, diversity index)
//! - CSV/JSON export
//! - The HTTP API
//! - Structural errors

use std::fs;
use std::path::Path;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value as Json;
use tower::ServiceExt;

use enrollment_analytics::analysis::{run_analysis, tables};
use enrollment_analytics::api::{AppState, create_router};
use enrollment_analytics::calculation::{
    ApplicationDimension, enrollment_rate_by, simpson_index,
};
use enrollment_analytics::config::{AnalysisConfig, ConfigLoader};
use enrollment_analytics::error::AnalyticsError;
use enrollment_analytics::ingest::{Dataset, RawTable, load_dataset};
use enrollment_analytics::models::{
    AnalysisReport, ApplicationRecord, Dashboard, ScoreBand, ScoreEquivalenceTable, Value,
};
use enrollment_analytics::report::{REPORT_FILE, export_report};

// =============================================================================
// Test Helpers
// =============================================================================

const APPLICATIONS_CSV: &str = "\
ID,Applied Date,Confirmed Date,Year,COLLEGE_DESCR,Gender,Ethnicity,First Generation,Pell_Eligibility,GPA,ACT_SCORE,SAT_SCORE,Scholarship_Amount
1,2019-11-02,2020-06-01,2020,Engineering,Female,White,Y,Y,3.6,28,,2500
2,2019-12-10,,2020,Engineering,Male,Hispanic/Latino,N,N,3.1,,,
3,01/15/2020,07/01/2020,2020, Business ,Male,Black/African American,0,Y,3.0,,1250,0
4,2020-10-20,2021-05-15,2021,Nursing,Female,Asian,,N,3.9,33,,12000
5,2020-11-01,2021-05-20,2021,Nursing,Non-Binary,White,1,,not a gpa,,,
";

const ENROLLMENT_CSV: &str = "\
ID,YEAR,COLLEGE_DESCR,DEPARTMENT_DESCR,FirstTerm_GPA,FirstTerm_CreditHours,OneYear retention,TwoYear retention,FTPT
1,2020,Engineering,Civil,3.2,15,1,1,FT
3,2020,Business,Finance,3.0,12,1,0,FT
4,2021,Nursing,Nursing,3.5,16,0,0,PT
5,2021,Nursing,Nursing,,,1,,FT
6,2022,Arts,Painting,,,1,1,FT
";

fn csv_dataset() -> Dataset {
    let config = AnalysisConfig::default();
    let applications = RawTable::from_reader("applications", APPLICATIONS_CSV.as_bytes()).unwrap();
    let enrollment = RawTable::from_reader("enrollment", ENROLLMENT_CSV.as_bytes()).unwrap();
    Dataset::from_raw(&applications, &enrollment, &config).unwrap()
}

fn csv_report() -> AnalysisReport {
    run_analysis(&csv_dataset(), &AnalysisConfig::default()).unwrap()
}

fn scalar_f64(report: &AnalysisReport, name: &str) -> f64 {
    report.scalar(name).and_then(Value::as_f64).unwrap()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

fn create_router_for_test() -> Router {
    let state = AppState::build(csv_dataset(), AnalysisConfig::default()).unwrap();
    create_router(state)
}

async fn get(router: Router, uri: &str) -> (StatusCode, Json) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Json = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

fn write_sources(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let applications = dir.join("applications.csv");
    let enrollment = dir.join("enrollment.csv");
    fs::write(&applications, APPLICATIONS_CSV).unwrap();
    fs::write(&enrollment, ENROLLMENT_CSV).unwrap();
    (applications, enrollment)
}

// =============================================================================
// Reference Examples
// =============================================================================

#[test]
fn test_example_enrollment_rate_by_college() {
    let mut engineering_enrolled = ApplicationRecord::new("1");
    engineering_enrolled.year = Some(2020);
    engineering_enrolled.college = Some("Engineering".to_string());
    engineering_enrolled.confirmed_date = chrono::NaiveDate::from_ymd_opt(2020, 6, 1);

    let mut engineering_declined = ApplicationRecord::new("2");
    engineering_declined.year = Some(2020);
    engineering_declined.college = Some("Engineering".to_string());

    let mut business = ApplicationRecord::new("3");
    business.year = Some(2020);
    business.college = Some("Business".to_string());
    business.confirmed_date = chrono::NaiveDate::from_ymd_opt(2020, 7, 1);

    let rows = enrollment_rate_by(
        &[engineering_enrolled, engineering_declined, business],
        ApplicationDimension::College,
    );

    assert_eq!(rows[0].key.to_string(), "Business");
    assert_eq!(rows[0].enrollment_rate, Some(100.0));
    assert_eq!(rows[1].key.to_string(), "Engineering");
    assert_eq!(rows[1].enrollment_rate, Some(50.0));
}

#[test]
fn test_example_sat_conversion_between_bands() {
    let table = ScoreEquivalenceTable::new(
        vec![
            ScoreBand {
                threshold: 1230.0,
                equivalent: 26,
            },
            ScoreBand {
                threshold: 1260.0,
                equivalent: 27,
            },
        ],
        15,
    )
    .unwrap();

    let mut record = ApplicationRecord::new("1");
    record.sat_score = Some(1250.0);

    assert_eq!(table.convert(Some(1250.0)), Some(26));
    assert_eq!(record.standardized_test_score(&table), Some(26.0));
}

#[test]
fn test_example_diversity_index() {
    assert_close(simpson_index([60, 20, 20]).unwrap(), 0.56);
}

// =============================================================================
// Pipeline
// =============================================================================

#[test]
fn test_csv_pipeline_record_counts() {
    let report = csv_report();

    assert_eq!(report.record_counts.applications, 5);
    assert_eq!(report.record_counts.enrollments, 5);
    assert_eq!(report.engine_version, env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_csv_pipeline_enrollment_rate_by_college() {
    let report = csv_report();
    let table = report.table(tables::ENROLLMENT_RATE_BY_COLLEGE).unwrap();

    assert_eq!(
        table.columns,
        vec!["college", "applications", "enrollments", "enrollment_rate"]
    );
    // Sorted by rate, highest first; "Business" was trimmed on ingest.
    let colleges: Vec<&Value> = table.column("college").unwrap();
    assert_eq!(
        colleges,
        vec![
            &Value::from("Business"),
            &Value::from("Nursing"),
            &Value::from("Engineering")
        ]
    );
    assert_eq!(table.rows[2][3], Value::Number(50.0));
}

#[test]
fn test_csv_pipeline_academic_scalars() {
    let report = csv_report();

    // Enrolled GPAs 3.6, 3.0, 3.9; the unparseable cell is missing.
    assert_close(scalar_f64(&report, tables::AVG_GPA_ENROLLED), 3.5);
    // ACT 28, SAT 1250 -> 26, ACT 33.
    assert_close(scalar_f64(&report, tables::AVG_TEST_SCORE_ENROLLED), 29.0);
    assert_close(scalar_f64(&report, tables::MEDIAN_TEST_SCORE_ENROLLED), 28.0);
}

#[test]
fn test_csv_pipeline_retention() {
    let report = csv_report();

    assert_close(scalar_f64(&report, tables::OVERALL_ONE_YEAR_RETENTION), 80.0);
    // A blank retention cell is not retained.
    assert_close(scalar_f64(&report, tables::OVERALL_TWO_YEAR_RETENTION), 40.0);
}

#[test]
fn test_csv_pipeline_diversity_index_by_year() {
    let report = csv_report();
    let table = report.table(tables::DIVERSITY_INDEX_BY_YEAR).unwrap();

    assert_eq!(table.columns, vec!["year", "students", "diversity_index"]);
    assert_eq!(table.rows.len(), 2);
    for row in &table.rows {
        assert_close(row[2].as_f64().unwrap(), 0.5);
    }
}

#[test]
fn test_every_dashboard_resolves() {
    let report = csv_report();

    for dashboard in Dashboard::ALL {
        let tables = report.dashboard(dashboard).unwrap();
        assert!(!tables.is_empty(), "{} has no tables", dashboard);
    }
}

#[test]
fn test_shipped_config_matches_builtin() {
    let loaded = ConfigLoader::load("./config/default").unwrap();
    assert_eq!(loaded.config(), &AnalysisConfig::default());
}

// =============================================================================
// Export
// =============================================================================

#[test]
fn test_load_and_export_round_trip_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let (applications, enrollment) = write_sources(dir.path());
    let config = AnalysisConfig::default();

    let dataset = load_dataset(&applications, &enrollment, &config).unwrap();
    let report = run_analysis(&dataset, &config).unwrap();

    let out = dir.path().join("out");
    let written = export_report(&report, &out).unwrap();
    assert_eq!(written.len(), report.tables.len() + 1);

    let json = fs::read_to_string(out.join(REPORT_FILE)).unwrap();
    let parsed: AnalysisReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.run_id, report.run_id);

    let by_year = fs::read_to_string(out.join("enrollment_by_year.csv")).unwrap();
    let lines: Vec<&str> = by_year.lines().collect();
    assert_eq!(lines[0], "year,enrollments,avg_first_term_gpa,avg_credit_hours");
    // 2022 has no first-term figures; missing cells are empty.
    assert_eq!(lines[3], "2022,1,,");
}

// =============================================================================
// Error Cases
// =============================================================================

#[test]
fn test_missing_required_column_is_fatal() {
    let applications = RawTable::from_reader(
        "applications",
        "ID,Year,COLLEGE_DESCR\n1,2020,Engineering\n".as_bytes(),
    )
    .unwrap();
    let enrollment = RawTable::from_reader("enrollment", ENROLLMENT_CSV.as_bytes()).unwrap();

    let result = Dataset::from_raw(&applications, &enrollment, &AnalysisConfig::default());
    match result {
        Err(AnalyticsError::MissingColumn { table, column }) => {
            assert_eq!(table, "applications");
            assert_eq!(column, "Confirmed Date");
        }
        other => panic!("Expected MissingColumn, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_missing_source_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_dataset(
        dir.path().join("nope.csv"),
        dir.path().join("nope.csv"),
        &AnalysisConfig::default(),
    );
    assert!(matches!(result, Err(AnalyticsError::SourceNotFound { .. })));
}

// =============================================================================
// HTTP API
// =============================================================================

#[tokio::test]
async fn test_api_health() {
    let (status, body) = get(create_router_for_test(), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["record_counts"]["applications"], 5);
}

#[tokio::test]
async fn test_api_report_lists_all_tables() {
    let (status, body) = get(create_router_for_test(), "/report").await;
    let (_, names) = get(create_router_for_test(), "/tables").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["tables"].as_array().unwrap().len(),
        names.as_array().unwrap().len()
    );
}

#[tokio::test]
async fn test_api_table_and_404() {
    let (status, body) = get(create_router_for_test(), "/tables/retention_by_college").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["columns"][0], "college");

    let (status, body) = get(create_router_for_test(), "/tables/payroll").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "TABLE_NOT_FOUND");
}

#[tokio::test]
async fn test_api_dashboard() {
    let (status, body) = get(create_router_for_test(), "/dashboards/executive").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tables"][0]["name"], "applications_by_year");
}

#[tokio::test]
async fn test_api_breakdowns() {
    let (status, body) = get(
        create_router_for_test(),
        "/applications/enrollment-rate?by=year",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rows"][0][0], 2020);
    assert_eq!(body["rows"][0][1], 3);

    let (status, body) = get(create_router_for_test(), "/enrollment/retention?by=college").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rows"][0][0], "Arts");
}

#[tokio::test]
async fn test_api_unknown_dimension() {
    let (status, body) = get(
        create_router_for_test(),
        "/applications/enrollment-rate?by=height",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "UNKNOWN_DIMENSION");
}
