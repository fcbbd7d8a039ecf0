//! College deans dashboard panels.

use crate::calculation::{CrossTab, Grouped, NumericSummary, RateCounter, sort_desc_by};
use crate::config::AnalysisConfig;
use crate::error::AnalyticsResult;
use crate::ingest::Dataset;
use crate::models::{ApplicationRecord, Dashboard, EnrollmentRecord, TableRow, Value};
use crate::report::ResultAssembler;

use super::programs::{top_colleges_by_enrollment, top_departments_by_enrollment};
use super::{enrolled_applicants, pairs_table, tables};

/// Enrollments of one college in one year.
#[derive(Debug, Clone, PartialEq)]
pub struct CollegeYearRow {
    /// College name.
    pub college: String,
    /// Academic year.
    pub year: i32,
    /// Enrolled students.
    pub enrollments: usize,
}

impl TableRow for CollegeYearRow {
    const COLUMNS: &'static [&'static str] = &["college", "year", "enrollments"];

    fn cells(&self) -> Vec<Value> {
        vec![
            self.college.as_str().into(),
            self.year.into(),
            self.enrollments.into(),
        ]
    }
}

/// First-term outcomes of one college's enrolled students.
#[derive(Debug, Clone, PartialEq)]
pub struct CollegeOutcome {
    /// College name.
    pub college: String,
    /// Mean first-term GPA.
    pub avg_first_term_gpa: Option<f64>,
    /// One-year retention percentage.
    pub one_year_retention: Option<f64>,
    /// Mean first-term credit hours.
    pub avg_credit_hours: Option<f64>,
}

/// Yearly enrollments of the `n` largest colleges, in long format.
///
/// Colleges appear in rank order; each college's years are ascending.
pub fn college_enrollment_trend(enrollment: &[EnrollmentRecord], n: usize) -> Vec<CollegeYearRow> {
    top_colleges_by_enrollment(enrollment, n)
        .into_iter()
        .flat_map(|(college, _)| {
            let by_year = Grouped::<i32, usize>::accumulate(
                enrollment
                    .iter()
                    .filter(|r| r.college.as_deref() == Some(college.as_str())),
                |r| r.year,
                |count, _| *count += 1,
            );
            let mut years = by_year.into_entries();
            years.sort_by_key(|(year, _)| *year);

            years.into_iter().map(move |(year, enrollments)| CollegeYearRow {
                college: college.clone(),
                year,
                enrollments,
            })
        })
        .collect()
}

/// First-term GPA, retention and credit hours per college, in first-seen order.
pub fn college_outcomes(enrollment: &[EnrollmentRecord]) -> Vec<CollegeOutcome> {
    let grouped = Grouped::<String, (NumericSummary, RateCounter, NumericSummary)>::accumulate(
        enrollment,
        |r| r.college.clone(),
        |(gpa, retention, hours), r| {
            gpa.push(r.first_term_gpa);
            retention.record(r.one_year_retained);
            hours.push(r.first_term_credit_hours);
        },
    );

    grouped
        .into_entries()
        .into_iter()
        .map(|(college, (gpa, retention, hours))| CollegeOutcome {
            college,
            avg_first_term_gpa: gpa.mean(),
            one_year_retention: retention.rate(),
            avg_credit_hours: hours.mean(),
        })
        .collect()
}

/// Ranks outcomes by one metric, highest first, and keeps `n`.
pub fn rank_outcomes<F>(outcomes: &[CollegeOutcome], n: usize, metric: F) -> Vec<(String, Option<f64>)>
where
    F: Fn(&CollegeOutcome) -> Option<f64>,
{
    let mut ranked: Vec<(String, Option<f64>)> = outcomes
        .iter()
        .map(|o| (o.college.clone(), metric(o)))
        .collect();
    sort_desc_by(&mut ranked, |(_, value)| *value);
    ranked.truncate(n);
    ranked
}

/// Gender percentages per college among enrolled applicants.
///
/// Rows are normalized to 100, ordered by the `sort_label` share (highest
/// first) and cut to `n`. Applicants without a college or gender are left out.
pub fn gender_mix_by_college(
    applications: &[ApplicationRecord],
    sort_label: &str,
    n: usize,
) -> CrossTab<String> {
    CrossTab::from_pairs(
        "college",
        enrolled_applicants(applications)
            .filter_map(|r| Some((r.college.clone()?, r.gender.clone()?))),
    )
    .row_normalized()
    .sorted_by_column(sort_label)
    .truncated(n)
}

pub(super) fn register(
    dataset: &Dataset,
    config: &AnalysisConfig,
    assembler: &mut ResultAssembler,
) -> AnalyticsResult<()> {
    let limits = config.limits();
    let n = limits.college_deans;

    assembler.rows(
        tables::COLLEGE_ENROLLMENT_TREND,
        &college_enrollment_trend(&dataset.enrollment, limits.college_trend),
    )?;

    let outcomes = college_outcomes(&dataset.enrollment);
    assembler.table(pairs_table(
        tables::FIRST_TERM_GPA_BY_COLLEGE,
        ["college", "avg_first_term_gpa"],
        rank_outcomes(&outcomes, n, |o| o.avg_first_term_gpa),
    ))?;
    assembler.table(pairs_table(
        tables::DEANS_RETENTION_BY_COLLEGE,
        ["college", "one_year_retention"],
        rank_outcomes(&outcomes, n, |o| o.one_year_retention),
    ))?;
    assembler.table(pairs_table(
        tables::CREDIT_HOURS_BY_COLLEGE,
        ["college", "avg_credit_hours"],
        rank_outcomes(&outcomes, n, |o| o.avg_credit_hours),
    ))?;

    assembler.crosstab(
        tables::GENDER_MIX_BY_COLLEGE,
        &gender_mix_by_college(
            &dataset.applications,
            &config.categories().female_label,
            n,
        ),
    )?;
    assembler.table(pairs_table(
        tables::DEANS_TOP_DEPARTMENTS,
        ["department", "enrollments"],
        top_departments_by_enrollment(&dataset.enrollment, n),
    ))?;

    assembler.dashboard(
        Dashboard::CollegeDeans,
        &[
            tables::COLLEGE_ENROLLMENT_TREND,
            tables::FIRST_TERM_GPA_BY_COLLEGE,
            tables::DEANS_RETENTION_BY_COLLEGE,
            tables::GENDER_MIX_BY_COLLEGE,
            tables::CREDIT_HOURS_BY_COLLEGE,
            tables::DEANS_TOP_DEPARTMENTS,
        ],
    )
}
