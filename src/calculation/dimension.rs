//! Named grouping dimensions and the rate breakdowns built on them.
//!
//! Dimensions are parsed from caller-supplied names (CLI, HTTP query), so
//! an unknown name is a structural error rather than an empty result.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::AnalyticsError;
use crate::ingest::{APPLICATIONS_TABLE, ENROLLMENT_TABLE};
use crate::models::{ApplicationRecord, EnrollmentRecord, ResultTable, Value};

use super::grouping::{Grouped, RateCounter};

/// A grouping key: an ordinal (year, month) or a category label.
///
/// Integers order before labels; within a variant the natural order holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum GroupKey {
    /// Ordinal key such as a year.
    Integer(i64),
    /// Categorical key such as a college name.
    Text(String),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Integer(i) => write!(f, "{}", i),
            GroupKey::Text(s) => f.write_str(s),
        }
    }
}

impl From<GroupKey> for Value {
    fn from(key: GroupKey) -> Self {
        match key {
            GroupKey::Integer(i) => Value::Integer(i),
            GroupKey::Text(s) => Value::Text(s),
        }
    }
}

fn flag_label(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

/// Dimensions available for grouping application records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApplicationDimension {
    /// Academic year.
    Year,
    /// College applied to.
    College,
    /// Reported gender.
    Gender,
    /// Reported ethnicity.
    Ethnicity,
    /// First-generation flag (`Yes` / `No`).
    FirstGeneration,
    /// Pell eligibility label; `Unknown` is a group of its own.
    Pell,
    /// Calendar month of the application date.
    AppliedMonth,
}

impl ApplicationDimension {
    /// All dimensions in documentation order.
    pub const ALL: [ApplicationDimension; 7] = [
        ApplicationDimension::Year,
        ApplicationDimension::College,
        ApplicationDimension::Gender,
        ApplicationDimension::Ethnicity,
        ApplicationDimension::FirstGeneration,
        ApplicationDimension::Pell,
        ApplicationDimension::AppliedMonth,
    ];

    /// The name accepted by [`FromStr`] and used as a column header.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationDimension::Year => "year",
            ApplicationDimension::College => "college",
            ApplicationDimension::Gender => "gender",
            ApplicationDimension::Ethnicity => "ethnicity",
            ApplicationDimension::FirstGeneration => "first_generation",
            ApplicationDimension::Pell => "pell",
            ApplicationDimension::AppliedMonth => "applied_month",
        }
    }

    /// The record's key on this dimension; `None` excludes the record.
    pub fn key(&self, record: &ApplicationRecord) -> Option<GroupKey> {
        match self {
            ApplicationDimension::Year => record.year.map(|y| GroupKey::Integer(i64::from(y))),
            ApplicationDimension::College => record.college.clone().map(GroupKey::Text),
            ApplicationDimension::Gender => record.gender.clone().map(GroupKey::Text),
            ApplicationDimension::Ethnicity => record.ethnicity.clone().map(GroupKey::Text),
            ApplicationDimension::FirstGeneration => record
                .first_generation
                .map(|flag| GroupKey::Text(flag_label(flag).to_string())),
            ApplicationDimension::Pell => Some(GroupKey::Text(record.pell.label().to_string())),
            ApplicationDimension::AppliedMonth => record
                .applied_month()
                .map(|m| GroupKey::Integer(i64::from(m))),
        }
    }
}

impl FromStr for ApplicationDimension {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        ApplicationDimension::ALL
            .into_iter()
            .find(|d| d.as_str() == name)
            .ok_or_else(|| AnalyticsError::UnknownDimension {
                dimension: s.to_string(),
                table: APPLICATIONS_TABLE.to_string(),
            })
    }
}

/// Dimensions available for grouping enrollment records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnrollmentDimension {
    /// Academic year.
    Year,
    /// College of enrollment.
    College,
    /// Department of enrollment.
    Department,
    /// Full-time / part-time status.
    Status,
}

impl EnrollmentDimension {
    /// All dimensions in documentation order.
    pub const ALL: [EnrollmentDimension; 4] = [
        EnrollmentDimension::Year,
        EnrollmentDimension::College,
        EnrollmentDimension::Department,
        EnrollmentDimension::Status,
    ];

    /// The name accepted by [`FromStr`] and used as a column header.
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentDimension::Year => "year",
            EnrollmentDimension::College => "college",
            EnrollmentDimension::Department => "department",
            EnrollmentDimension::Status => "status",
        }
    }

    /// The record's key on this dimension; `None` excludes the record.
    pub fn key(&self, record: &EnrollmentRecord) -> Option<GroupKey> {
        match self {
            EnrollmentDimension::Year => record.year.map(|y| GroupKey::Integer(i64::from(y))),
            EnrollmentDimension::College => record.college.clone().map(GroupKey::Text),
            EnrollmentDimension::Department => record.department.clone().map(GroupKey::Text),
            EnrollmentDimension::Status => record
                .status
                .as_ref()
                .map(|status| GroupKey::Text(status.label().to_string())),
        }
    }
}

impl FromStr for EnrollmentDimension {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        EnrollmentDimension::ALL
            .into_iter()
            .find(|d| d.as_str() == name)
            .ok_or_else(|| AnalyticsError::UnknownDimension {
                dimension: s.to_string(),
                table: ENROLLMENT_TABLE.to_string(),
            })
    }
}

/// Applications, enrollments and enrollment rate for one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrollmentRateBreakdown {
    /// Group key.
    pub key: GroupKey,
    /// Applications in the group.
    pub applications: usize,
    /// Enrolled applicants in the group.
    pub enrollments: usize,
    /// Enrollments over applications, as a percentage.
    pub enrollment_rate: Option<f64>,
}

/// Retention rates for one group of enrolled students.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetentionBreakdown {
    /// Group key.
    pub key: GroupKey,
    /// One-year retention percentage.
    pub one_year_retention: Option<f64>,
    /// Two-year retention percentage.
    pub two_year_retention: Option<f64>,
    /// Students in the group.
    pub students: usize,
}

/// Enrollment rate per group, ordered by key.
///
/// Records without a key on the dimension are excluded.
///
/// # Examples
///
/// ```
/// use enrollment_analytics::calculation::{ApplicationDimension, enrollment_rate_by};
/// use enrollment_analytics::models::ApplicationRecord;
/// use chrono::NaiveDate;
///
/// let mut enrolled = ApplicationRecord::new("1");
/// enrolled.college = Some("Engineering".to_string());
/// enrolled.confirmed_date = NaiveDate::from_ymd_opt(2020, 6, 1);
///
/// let mut declined = ApplicationRecord::new("2");
/// declined.college = Some("Engineering".to_string());
///
/// let rows = enrollment_rate_by(&[enrolled, declined], ApplicationDimension::College);
/// assert_eq!(rows[0].enrollment_rate, Some(50.0));
/// ```
pub fn enrollment_rate_by(
    records: &[ApplicationRecord],
    dimension: ApplicationDimension,
) -> Vec<EnrollmentRateBreakdown> {
    let grouped = Grouped::<GroupKey, RateCounter>::accumulate(
        records,
        |record| dimension.key(record),
        |counter, record| counter.record(record.enrolled()),
    );

    let mut rows: Vec<EnrollmentRateBreakdown> = grouped
        .into_entries()
        .into_iter()
        .map(|(key, counter)| EnrollmentRateBreakdown {
            key,
            applications: counter.total,
            enrollments: counter.hits,
            enrollment_rate: counter.rate(),
        })
        .collect();
    rows.sort_by(|a, b| a.key.cmp(&b.key));
    rows
}

/// One- and two-year retention per group, ordered by key.
pub fn retention_by(
    records: &[EnrollmentRecord],
    dimension: EnrollmentDimension,
) -> Vec<RetentionBreakdown> {
    let grouped = Grouped::<GroupKey, (RateCounter, RateCounter)>::accumulate(
        records,
        |record| dimension.key(record),
        |(one_year, two_year), record| {
            one_year.record(record.one_year_retained);
            two_year.record(record.two_year_retained);
        },
    );

    let mut rows: Vec<RetentionBreakdown> = grouped
        .into_entries()
        .into_iter()
        .map(|(key, (one_year, two_year))| RetentionBreakdown {
            key,
            one_year_retention: one_year.rate(),
            two_year_retention: two_year.rate(),
            students: one_year.total,
        })
        .collect();
    rows.sort_by(|a, b| a.key.cmp(&b.key));
    rows
}

/// Renders an enrollment rate breakdown with the dimension as first column.
pub fn enrollment_rate_table(
    name: impl Into<String>,
    dimension: ApplicationDimension,
    rows: &[EnrollmentRateBreakdown],
) -> ResultTable {
    ResultTable {
        name: name.into(),
        columns: vec![
            dimension.as_str().to_string(),
            "applications".to_string(),
            "enrollments".to_string(),
            "enrollment_rate".to_string(),
        ],
        rows: rows
            .iter()
            .map(|row| {
                vec![
                    row.key.clone().into(),
                    row.applications.into(),
                    row.enrollments.into(),
                    row.enrollment_rate.into(),
                ]
            })
            .collect(),
    }
}

/// Renders a retention breakdown with the dimension as first column.
pub fn retention_table(
    name: impl Into<String>,
    dimension: EnrollmentDimension,
    rows: &[RetentionBreakdown],
) -> ResultTable {
    ResultTable {
        name: name.into(),
        columns: vec![
            dimension.as_str().to_string(),
            "one_year_retention".to_string(),
            "two_year_retention".to_string(),
            "students".to_string(),
        ],
        rows: rows
            .iter()
            .map(|row| {
                vec![
                    row.key.clone().into(),
                    row.one_year_retention.into(),
                    row.two_year_retention.into(),
                    row.students.into(),
                ]
            })
            .collect(),
    }
}
