//! Most popular colleges and departments.

use crate::calculation::{count_by, top_n};
use crate::config::AnalysisConfig;
use crate::error::AnalyticsResult;
use crate::ingest::Dataset;
use crate::models::{ApplicationRecord, EnrollmentRecord};
use crate::report::ResultAssembler;

use super::{pairs_table, tables};

/// Colleges ranked by number of applications, largest first.
pub fn top_colleges_by_applications(
    applications: &[ApplicationRecord],
    n: usize,
) -> Vec<(String, usize)> {
    top_n(&count_by(applications, |r| r.college.clone()), n)
}

/// Departments ranked by number of enrolled students, largest first.
pub fn top_departments_by_enrollment(
    enrollment: &[EnrollmentRecord],
    n: usize,
) -> Vec<(String, usize)> {
    top_n(&count_by(enrollment, |r| r.department.clone()), n)
}

/// Colleges ranked by number of enrolled students, largest first.
pub fn top_colleges_by_enrollment(
    enrollment: &[EnrollmentRecord],
    n: usize,
) -> Vec<(String, usize)> {
    top_n(&count_by(enrollment, |r| r.college.clone()), n)
}

pub(super) fn register(
    dataset: &Dataset,
    config: &AnalysisConfig,
    assembler: &mut ResultAssembler,
) -> AnalyticsResult<()> {
    let n = config.limits().top_programs;

    assembler.table(pairs_table(
        tables::TOP_COLLEGES_BY_APPLICATIONS,
        ["college", "applications"],
        top_colleges_by_applications(&dataset.applications, n),
    ))?;
    assembler.table(pairs_table(
        tables::TOP_DEPARTMENTS_BY_ENROLLMENT,
        ["department", "enrollments"],
        top_departments_by_enrollment(&dataset.enrollment, n),
    ))?;
    assembler.table(pairs_table(
        tables::TOP_COLLEGES_BY_ENROLLMENT,
        ["college", "enrollments"],
        top_colleges_by_enrollment(&dataset.enrollment, n),
    ))?;

    Ok(())
}
