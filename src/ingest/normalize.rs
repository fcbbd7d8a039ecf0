//! Normalization of raw tables into canonical records.
//!
//! Structural problems (a required column is absent) abort with an error
//! before any row is read. Everything else degrades to missing values.

use tracing::{debug, info, warn};

use crate::config::{ApplicationColumns, CategoryConfig, EnrollmentColumns};
use crate::error::AnalyticsResult;
use crate::models::{ApplicationRecord, EnrollmentRecord, StudentLoad};

use super::fields::{
    clean_text, parse_date, parse_decimal, parse_flag, parse_number, parse_pell, parse_year,
    retention_flag,
};
use super::source::RawTable;

/// Re-applies the canonical text and number rules to a record.
///
/// Normalized records are already canonical, so this is a no-op on them.
/// It exists for records built by hand or deserialized from elsewhere.
pub trait Canonicalize {
    /// Returns the canonical form of the record.
    fn canonicalize(self) -> Self;
}

fn canonical_text(value: Option<String>) -> Option<String> {
    clean_text(value.as_deref())
}

fn canonical_number(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

impl Canonicalize for ApplicationRecord {
    fn canonicalize(self) -> Self {
        Self {
            id: self.id.trim().to_string(),
            college: canonical_text(self.college),
            gender: canonical_text(self.gender),
            ethnicity: canonical_text(self.ethnicity),
            gpa: canonical_number(self.gpa),
            act_score: canonical_number(self.act_score),
            sat_score: canonical_number(self.sat_score),
            ..self
        }
    }
}

impl Canonicalize for EnrollmentRecord {
    fn canonicalize(self) -> Self {
        Self {
            id: self.id.trim().to_string(),
            college: canonical_text(self.college),
            department: canonical_text(self.department),
            first_term_gpa: canonical_number(self.first_term_gpa),
            first_term_credit_hours: canonical_number(self.first_term_credit_hours),
            ..self
        }
    }
}

/// Normalizes the applications export.
///
/// Required columns: id, year, confirmed date and college. Other mapped
/// columns are optional; when absent, their field is missing on every record.
///
/// # Errors
///
/// Returns `MissingColumn` if a required column is absent.
pub fn normalize_applications(
    table: &RawTable,
    columns: &ApplicationColumns,
    categories: &CategoryConfig,
) -> AnalyticsResult<Vec<ApplicationRecord>> {
    let id = table.require_column(&columns.id)?;
    let year = table.require_column(&columns.year)?;
    let confirmed_date = table.require_column(&columns.confirmed_date)?;
    let college = table.require_column(&columns.college)?;

    let applied_date = table.column_index(&columns.applied_date);
    let gender = table.column_index(&columns.gender);
    let ethnicity = table.column_index(&columns.ethnicity);
    let first_generation = table.column_index(&columns.first_generation);
    let pell = table.column_index(&columns.pell);
    let gpa = table.column_index(&columns.gpa);
    let act_score = table.column_index(&columns.act_score);
    let sat_score = table.column_index(&columns.sat_score);
    let scholarship_amount = table.column_index(&columns.scholarship_amount);

    let records: Vec<ApplicationRecord> = (0..table.len())
        .map(|row| ApplicationRecord {
            id: table.cell(row, Some(id)).unwrap_or_default().trim().to_string(),
            applied_date: parse_date(table.cell(row, applied_date)),
            confirmed_date: parse_date(table.cell(row, Some(confirmed_date))),
            year: parse_year(table.cell(row, Some(year))),
            college: clean_text(table.cell(row, Some(college))),
            gender: clean_text(table.cell(row, gender)),
            ethnicity: clean_text(table.cell(row, ethnicity)),
            first_generation: parse_flag(table.cell(row, first_generation)),
            pell: parse_pell(table.cell(row, pell), categories),
            gpa: parse_number(table.cell(row, gpa)),
            act_score: parse_number(table.cell(row, act_score)),
            sat_score: parse_number(table.cell(row, sat_score)),
            scholarship_amount: parse_decimal(table.cell(row, scholarship_amount)),
        })
        .collect();

    let enrolled = records.iter().filter(|r| r.enrolled()).count();
    let negative_lags = records
        .iter()
        .filter(|r| r.days_to_confirmation().is_some_and(|days| days < 0))
        .count();

    debug!(
        table = table.name(),
        missing_year = records.iter().filter(|r| r.year.is_none()).count(),
        missing_college = records.iter().filter(|r| r.college.is_none()).count(),
        missing_gpa = records.iter().filter(|r| r.gpa.is_none()).count(),
        missing_test_scores = records
            .iter()
            .filter(|r| r.act_score.is_none() && r.sat_score.is_none())
            .count(),
        "Application field coverage"
    );

    if negative_lags > 0 {
        warn!(
            table = table.name(),
            records = negative_lags,
            "Confirmation date precedes application date"
        );
    }

    info!(
        table = table.name(),
        records = records.len(),
        enrolled,
        "Normalized application records"
    );

    Ok(records)
}

/// Normalizes the enrollment export.
///
/// Required columns: id, year, college and one-year retention.
///
/// # Errors
///
/// Returns `MissingColumn` if a required column is absent.
pub fn normalize_enrollment(
    table: &RawTable,
    columns: &EnrollmentColumns,
) -> AnalyticsResult<Vec<EnrollmentRecord>> {
    let id = table.require_column(&columns.id)?;
    let year = table.require_column(&columns.year)?;
    let college = table.require_column(&columns.college)?;
    let one_year = table.require_column(&columns.one_year_retention)?;

    let department = table.column_index(&columns.department);
    let first_term_gpa = table.column_index(&columns.first_term_gpa);
    let credit_hours = table.column_index(&columns.first_term_credit_hours);
    let two_year = table.column_index(&columns.two_year_retention);
    let status = table.column_index(&columns.status);

    let records: Vec<EnrollmentRecord> = (0..table.len())
        .map(|row| EnrollmentRecord {
            id: table.cell(row, Some(id)).unwrap_or_default().trim().to_string(),
            year: parse_year(table.cell(row, Some(year))),
            college: clean_text(table.cell(row, Some(college))),
            department: clean_text(table.cell(row, department)),
            first_term_gpa: parse_number(table.cell(row, first_term_gpa)),
            first_term_credit_hours: parse_number(table.cell(row, credit_hours)),
            one_year_retained: retention_flag(table.cell(row, Some(one_year))),
            two_year_retained: retention_flag(table.cell(row, two_year)),
            status: table.cell(row, status).and_then(StudentLoad::parse),
        })
        .collect();

    debug!(
        table = table.name(),
        missing_year = records.iter().filter(|r| r.year.is_none()).count(),
        missing_department = records.iter().filter(|r| r.department.is_none()).count(),
        missing_first_term_gpa = records.iter().filter(|r| r.first_term_gpa.is_none()).count(),
        "Enrollment field coverage"
    );

    info!(
        table = table.name(),
        records = records.len(),
        retained_one_year = records.iter().filter(|r| r.one_year_retained).count(),
        "Normalized enrollment records"
    );

    Ok(records)
}
