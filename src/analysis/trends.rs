//! Year-over-year application, enrollment and retention trends.
//!
//! Years are listed in ascending order. Records without a year are left out.

use crate::calculation::{
    ApplicationDimension, EnrollmentDimension, Grouped, GroupKey, NumericSummary,
    enrollment_rate_by, enrollment_rate_table, retention_by,
};
use crate::config::AnalysisConfig;
use crate::error::AnalyticsResult;
use crate::ingest::Dataset;
use crate::models::{EnrollmentRecord, TableRow, Value};
use crate::report::ResultAssembler;

use super::tables;

/// Enrolled students and first-term outcomes for one year.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrollmentYearRow {
    /// Academic year.
    pub year: i32,
    /// Enrolled students.
    pub enrollments: usize,
    /// Mean first-term GPA.
    pub avg_first_term_gpa: Option<f64>,
    /// Mean first-term credit hours.
    pub avg_credit_hours: Option<f64>,
}

impl TableRow for EnrollmentYearRow {
    const COLUMNS: &'static [&'static str] =
        &["year", "enrollments", "avg_first_term_gpa", "avg_credit_hours"];

    fn cells(&self) -> Vec<Value> {
        vec![
            self.year.into(),
            self.enrollments.into(),
            self.avg_first_term_gpa.into(),
            self.avg_credit_hours.into(),
        ]
    }
}

/// Retention rates for one year.
#[derive(Debug, Clone, PartialEq)]
pub struct RetentionYearRow {
    /// Academic year.
    pub year: i64,
    /// One-year retention percentage.
    pub one_year_retention: Option<f64>,
    /// Two-year retention percentage.
    pub two_year_retention: Option<f64>,
}

impl TableRow for RetentionYearRow {
    const COLUMNS: &'static [&'static str] = &["year", "one_year_retention", "two_year_retention"];

    fn cells(&self) -> Vec<Value> {
        vec![
            self.year.into(),
            self.one_year_retention.into(),
            self.two_year_retention.into(),
        ]
    }
}

/// Enrolled students, mean first-term GPA and credit hours per year.
pub fn enrollment_by_year(enrollment: &[EnrollmentRecord]) -> Vec<EnrollmentYearRow> {
    let grouped = Grouped::<i32, (usize, NumericSummary, NumericSummary)>::accumulate(
        enrollment,
        |r| r.year,
        |(count, gpa, hours), r| {
            *count += 1;
            gpa.push(r.first_term_gpa);
            hours.push(r.first_term_credit_hours);
        },
    );

    let mut rows: Vec<EnrollmentYearRow> = grouped
        .into_entries()
        .into_iter()
        .map(|(year, (enrollments, gpa, hours))| EnrollmentYearRow {
            year,
            enrollments,
            avg_first_term_gpa: gpa.mean(),
            avg_credit_hours: hours.mean(),
        })
        .collect();
    rows.sort_by_key(|row| row.year);
    rows
}

/// One- and two-year retention per year.
pub fn retention_by_year(enrollment: &[EnrollmentRecord]) -> Vec<RetentionYearRow> {
    retention_by(enrollment, EnrollmentDimension::Year)
        .into_iter()
        .filter_map(|row| match row.key {
            GroupKey::Integer(year) => Some(RetentionYearRow {
                year,
                one_year_retention: row.one_year_retention,
                two_year_retention: row.two_year_retention,
            }),
            GroupKey::Text(_) => None,
        })
        .collect()
}

pub(super) fn register(
    dataset: &Dataset,
    _config: &AnalysisConfig,
    assembler: &mut ResultAssembler,
) -> AnalyticsResult<()> {
    let applications = enrollment_rate_by(&dataset.applications, ApplicationDimension::Year);
    assembler.table(enrollment_rate_table(
        tables::APPLICATIONS_BY_YEAR,
        ApplicationDimension::Year,
        &applications,
    ))?;
    assembler.rows(
        tables::ENROLLMENT_BY_YEAR,
        &enrollment_by_year(&dataset.enrollment),
    )?;
    assembler.rows(
        tables::RETENTION_BY_YEAR,
        &retention_by_year(&dataset.enrollment),
    )?;

    Ok(())
}
