//! Executive dashboard panels.

use rust_decimal::Decimal;

use crate::calculation::{Grouped, NumericSummary, count_by, top_n};
use crate::config::{AnalysisConfig, ScholarshipBand};
use crate::error::AnalyticsResult;
use crate::ingest::Dataset;
use crate::models::{ApplicationRecord, Dashboard};
use crate::report::ResultAssembler;

use super::programs::top_colleges_by_enrollment;
use super::{enrolled_applicants, pairs_table, tables};

/// Mean high school GPA of enrolled applicants per year, ascending by year.
pub fn avg_gpa_by_year(applications: &[ApplicationRecord]) -> Vec<(i32, Option<f64>)> {
    let grouped = Grouped::<i32, NumericSummary>::accumulate(
        enrolled_applicants(applications),
        |r| r.year,
        |summary, r| summary.push(r.gpa),
    );

    let mut rows: Vec<(i32, Option<f64>)> = grouped
        .iter()
        .map(|(year, summary)| (*year, summary.mean()))
        .collect();
    rows.sort_by_key(|(year, _)| *year);
    rows
}

/// Index of the band an amount falls into.
///
/// Bands are right-inclusive: the first band whose upper bound is at or
/// above the amount. An amount above every bounded band falls in the last
/// band when that band is unbounded.
fn band_index(bands: &[ScholarshipBand], amount: Decimal) -> Option<usize> {
    bands
        .iter()
        .position(|band| band.upper.is_none_or(|upper| amount <= upper))
}

/// Enrolled scholarship recipients (amount above zero) per amount band.
///
/// Every band is listed, in configured order, including empty ones.
pub fn scholarship_distribution(
    applications: &[ApplicationRecord],
    bands: &[ScholarshipBand],
) -> Vec<(String, usize)> {
    let mut counts = vec![0usize; bands.len()];
    for amount in enrolled_applicants(applications).filter_map(|r| r.scholarship_amount) {
        if amount <= Decimal::ZERO {
            continue;
        }
        if let Some(index) = band_index(bands, amount) {
            counts[index] += 1;
        }
    }

    bands
        .iter()
        .zip(counts)
        .map(|(band, count)| (band.label.clone(), count))
        .collect()
}

/// Ethnicities ranked by number of applications; unreported is not ranked.
pub fn top_ethnicities(applications: &[ApplicationRecord], n: usize) -> Vec<(String, usize)> {
    top_n(&count_by(applications, |r| r.ethnicity.clone()), n)
}

pub(super) fn register(
    dataset: &Dataset,
    config: &AnalysisConfig,
    assembler: &mut ResultAssembler,
) -> AnalyticsResult<()> {
    let n = config.limits().executive;

    assembler.table(pairs_table(
        tables::AVG_GPA_BY_YEAR,
        ["year", "avg_gpa"],
        avg_gpa_by_year(&dataset.applications),
    ))?;
    assembler.table(pairs_table(
        tables::SCHOLARSHIP_DISTRIBUTION,
        ["band", "recipients"],
        scholarship_distribution(&dataset.applications, &config.settings().scholarship_bands),
    ))?;
    assembler.table(pairs_table(
        tables::EXECUTIVE_TOP_COLLEGES,
        ["college", "enrollments"],
        top_colleges_by_enrollment(&dataset.enrollment, n),
    ))?;
    assembler.table(pairs_table(
        tables::EXECUTIVE_TOP_ETHNICITIES,
        ["ethnicity", "applications"],
        top_ethnicities(&dataset.applications, n),
    ))?;

    assembler.dashboard(
        Dashboard::Executive,
        &[
            tables::APPLICATIONS_BY_YEAR,
            tables::EXECUTIVE_TOP_COLLEGES,
            tables::GENDER_DISTRIBUTION,
            tables::EXECUTIVE_TOP_ETHNICITIES,
            tables::AVG_GPA_BY_YEAR,
            tables::RETENTION_BY_YEAR,
            tables::SCHOLARSHIP_DISTRIBUTION,
        ],
    )
}
