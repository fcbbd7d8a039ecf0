//! Retention of enrolled students.

use crate::calculation::{
    EnrollmentDimension, RateCounter, RetentionBreakdown, retention_by, retention_table,
    sort_desc_by,
};
use crate::config::AnalysisConfig;
use crate::error::AnalyticsResult;
use crate::ingest::Dataset;
use crate::models::EnrollmentRecord;
use crate::report::ResultAssembler;

use super::tables;

/// One- and two-year retention over every enrolled student.
pub fn overall_retention(enrollment: &[EnrollmentRecord]) -> (Option<f64>, Option<f64>) {
    let mut one_year = RateCounter::default();
    let mut two_year = RateCounter::default();
    for record in enrollment {
        one_year.record(record.one_year_retained);
        two_year.record(record.two_year_retained);
    }
    (one_year.rate(), two_year.rate())
}

/// Retention per college, highest one-year retention first.
pub fn retention_by_college(enrollment: &[EnrollmentRecord]) -> Vec<RetentionBreakdown> {
    let mut rows = retention_by(enrollment, EnrollmentDimension::College);
    sort_desc_by(&mut rows, |row| row.one_year_retention);
    rows
}

pub(super) fn register(
    dataset: &Dataset,
    _config: &AnalysisConfig,
    assembler: &mut ResultAssembler,
) -> AnalyticsResult<()> {
    let (one_year, two_year) = overall_retention(&dataset.enrollment);
    assembler.scalar(tables::OVERALL_ONE_YEAR_RETENTION, one_year);
    assembler.scalar(tables::OVERALL_TWO_YEAR_RETENTION, two_year);

    assembler.table(retention_table(
        tables::RETENTION_BY_COLLEGE,
        EnrollmentDimension::College,
        &retention_by_college(&dataset.enrollment),
    ))?;
    assembler.table(retention_table(
        tables::RETENTION_BY_STATUS,
        EnrollmentDimension::Status,
        &retention_by(&dataset.enrollment, EnrollmentDimension::Status),
    ))?;

    Ok(())
}
