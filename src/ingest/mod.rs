//! Input boundary: CSV exports to canonical records.
//!
//! Reading ([`source`]) is kept apart from typing ([`fields`], [`normalize`])
//! so the normalization rules can be exercised on in-memory tables.

pub mod fields;
mod normalize;
mod source;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::AnalysisConfig;
use crate::error::AnalyticsResult;
use crate::models::{ApplicationRecord, EnrollmentRecord, RecordCounts};

pub use normalize::{Canonicalize, normalize_applications, normalize_enrollment};
pub use source::RawTable;

/// Table name used for the applications export in errors and logs.
pub const APPLICATIONS_TABLE: &str = "applications";

/// Table name used for the enrollment export in errors and logs.
pub const ENROLLMENT_TABLE: &str = "enrollment";

/// The two canonical record collections an analysis runs over.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Application records, in input order.
    pub applications: Vec<ApplicationRecord>,
    /// Enrollment records, in input order.
    pub enrollment: Vec<EnrollmentRecord>,
}

impl Dataset {
    /// Normalizes two raw tables into a dataset.
    ///
    /// # Errors
    ///
    /// Returns `MissingColumn` if either table lacks a required column.
    pub fn from_raw(
        applications: &RawTable,
        enrollment: &RawTable,
        config: &AnalysisConfig,
    ) -> AnalyticsResult<Self> {
        let columns = config.columns();
        Ok(Self {
            applications: normalize_applications(
                applications,
                &columns.applications,
                config.categories(),
            )?,
            enrollment: normalize_enrollment(enrollment, &columns.enrollment)?,
        })
    }

    /// Number of records in each collection.
    pub fn record_counts(&self) -> RecordCounts {
        RecordCounts {
            applications: self.applications.len(),
            enrollments: self.enrollment.len(),
        }
    }
}

/// Reads and normalizes both CSV exports.
///
/// # Errors
///
/// Returns `SourceNotFound` or `SourceParseError` if a file cannot be read,
/// and `MissingColumn` if a required column is absent.
pub fn load_dataset<P, Q>(
    applications_path: P,
    enrollment_path: Q,
    config: &AnalysisConfig,
) -> AnalyticsResult<Dataset>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let applications = RawTable::from_path(APPLICATIONS_TABLE, applications_path.as_ref())?;
    let enrollment = RawTable::from_path(ENROLLMENT_TABLE, enrollment_path.as_ref())?;

    let dataset = Dataset::from_raw(&applications, &enrollment, config)?;

    info!(
        applications = dataset.applications.len(),
        enrollments = dataset.enrollment.len(),
        "Loaded dataset"
    );

    Ok(dataset)
}
