//! Admissions dashboard panels.
//!
//! Everything except the monthly volume and the enrollment rate is
//! computed over enrolled applicants only.

use tracing::warn;

use crate::calculation::{
    ApplicationDimension, NumericSummary, count_by, enrollment_rate_by,
    enrollment_rate_table, sort_desc_by, top_n,
};
use crate::config::AnalysisConfig;
use crate::error::AnalyticsResult;
use crate::ingest::Dataset;
use crate::models::{ApplicationRecord, Dashboard, TableRow, Value};
use crate::report::ResultAssembler;

use super::{enrolled_applicants, pairs_table, tables};

/// Confirmation lags above this many days are flagged as suspicious.
const LONG_CONFIRMATION_LAG_DAYS: i64 = 365;

/// One GPA histogram bin, `[bin_start, bin_end)`.
#[derive(Debug, Clone, PartialEq)]
pub struct GpaBinRow {
    /// Inclusive lower edge.
    pub bin_start: f64,
    /// Exclusive upper edge.
    pub bin_end: f64,
    /// Enrolled applicants in the bin.
    pub students: usize,
}

impl TableRow for GpaBinRow {
    const COLUMNS: &'static [&'static str] = &["bin_start", "bin_end", "students"];

    fn cells(&self) -> Vec<Value> {
        vec![self.bin_start.into(), self.bin_end.into(), self.students.into()]
    }
}

/// Summary of days from application to confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationLagRow {
    /// Applicants with both dates.
    pub count: usize,
    /// Mean lag in days.
    pub mean: Option<f64>,
    /// Median lag in days.
    pub median: Option<f64>,
    /// Shortest lag.
    pub min: Option<f64>,
    /// Longest lag.
    pub max: Option<f64>,
    /// Lags below zero (confirmation recorded before application).
    pub negative_count: usize,
}

impl TableRow for ConfirmationLagRow {
    const COLUMNS: &'static [&'static str] =
        &["count", "mean", "median", "min", "max", "negative_count"];

    fn cells(&self) -> Vec<Value> {
        vec![
            self.count.into(),
            self.mean.into(),
            self.median.into(),
            self.min.into(),
            self.max.into(),
            self.negative_count.into(),
        ]
    }
}

/// Applications per calendar month (1-12), ascending by month.
pub fn applications_by_month(applications: &[ApplicationRecord]) -> Vec<(u32, usize)> {
    let mut rows: Vec<(u32, usize)> = count_by(applications, |r| r.applied_month())
        .into_entries();
    rows.sort_by_key(|(month, _)| *month);
    rows
}

/// Enrolled applicants per ACT score, ascending.
///
/// Fractional scores are truncated to the whole point they fall in.
pub fn act_distribution(applications: &[ApplicationRecord]) -> Vec<(i64, usize)> {
    let mut rows: Vec<(i64, usize)> = count_by(enrolled_applicants(applications), |r| {
        r.act_score.map(|score| score.floor() as i64)
    })
    .into_entries();
    rows.sort_by_key(|(score, _)| *score);
    rows
}

/// Histogram of enrolled applicants' GPA in bins of `width`.
///
/// Only occupied bins are listed, ascending. A GPA whose bin edges cannot be
/// represented is skipped with a warning.
pub fn gpa_distribution(applications: &[ApplicationRecord], width: f64) -> Vec<GpaBinRow> {
    if !(width.is_finite() && width > 0.0) {
        return Vec::new();
    }

    let mut rows: Vec<(i64, usize)> = count_by(enrolled_applicants(applications), |r| {
        let gpa = r.gpa?;
        let bin = gpa_bin(gpa, width);
        if bin.is_none() {
            warn!(id = %r.id, gpa, "GPA outside the representable histogram range, skipped");
        }
        bin
    })
    .into_entries();
    rows.sort_by_key(|(bin, _)| *bin);

    rows.into_iter()
        .map(|(bin, students)| GpaBinRow {
            bin_start: bin as f64 * width,
            bin_end: (bin + 1) as f64 * width,
            students,
        })
        .collect()
}

/// Index of the bin holding `gpa`, while both edges stay finite and exact.
fn gpa_bin(gpa: f64, width: f64) -> Option<i64> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

    let bin = (gpa / width).floor();
    if !bin.is_finite() || bin.abs() >= MAX_EXACT {
        return None;
    }
    let bin = bin as i64;
    let end = bin.checked_add(1)? as f64 * width;
    end.is_finite().then_some(bin)
}

/// Enrolled applicants per first-generation flag (`No` before `Yes`).
pub fn enrolled_by_first_generation(applications: &[ApplicationRecord]) -> Vec<(&'static str, usize)> {
    let mut counts = [0usize; 2];
    for flag in enrolled_applicants(applications).filter_map(|r| r.first_generation) {
        counts[usize::from(flag)] += 1;
    }

    [("No", counts[0]), ("Yes", counts[1])]
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .collect()
}

/// Enrolled applicants per Pell eligibility label, most frequent first.
pub fn pell_distribution(applications: &[ApplicationRecord]) -> Vec<(&'static str, usize)> {
    let counts = count_by(enrolled_applicants(applications), |r| Some(r.pell.label()));
    top_n(&counts, counts.len())
}

/// Summary of enrolled applicants' days from application to confirmation.
///
/// Negative and very long lags are kept in the figures and logged.
pub fn days_to_confirmation(applications: &[ApplicationRecord]) -> ConfirmationLagRow {
    let lags: Vec<i64> = enrolled_applicants(applications)
        .filter_map(ApplicationRecord::days_to_confirmation)
        .collect();
    let summary: NumericSummary = lags.iter().map(|&days| Some(days as f64)).collect();

    let negative_count = lags.iter().filter(|&&days| days < 0).count();
    let long_count = lags
        .iter()
        .filter(|&&days| days > LONG_CONFIRMATION_LAG_DAYS)
        .count();
    if negative_count > 0 || long_count > 0 {
        warn!(
            negative = negative_count,
            over_a_year = long_count,
            "Suspicious days to confirmation"
        );
    }

    ConfirmationLagRow {
        count: lags.len(),
        mean: summary.mean(),
        median: summary.median(),
        min: summary.min(),
        max: summary.max(),
        negative_count,
    }
}

pub(super) fn register(
    dataset: &Dataset,
    config: &AnalysisConfig,
    assembler: &mut ResultAssembler,
) -> AnalyticsResult<()> {
    let applications = &dataset.applications;
    let n = config.limits().admissions;

    assembler.table(pairs_table(
        tables::APPLICATIONS_BY_MONTH,
        ["month", "applications"],
        applications_by_month(applications),
    ))?;

    let mut by_college = enrollment_rate_by(applications, ApplicationDimension::College);
    sort_desc_by(&mut by_college, |row| row.enrollment_rate);
    by_college.truncate(n);
    assembler.table(enrollment_rate_table(
        tables::ENROLLMENT_RATE_BY_COLLEGE,
        ApplicationDimension::College,
        &by_college,
    ))?;

    assembler.table(pairs_table(
        tables::ACT_DISTRIBUTION,
        ["act_score", "students"],
        act_distribution(applications),
    ))?;
    assembler.rows(
        tables::GPA_DISTRIBUTION,
        &gpa_distribution(applications, config.settings().gpa_bin_width),
    )?;
    assembler.table(pairs_table(
        tables::ENROLLED_BY_FIRST_GENERATION,
        ["first_generation", "students"],
        enrolled_by_first_generation(applications),
    ))?;
    assembler.table(pairs_table(
        tables::PELL_DISTRIBUTION,
        ["pell", "students"],
        pell_distribution(applications),
    ))?;
    assembler.rows(
        tables::DAYS_TO_CONFIRMATION,
        &[days_to_confirmation(applications)],
    )?;

    assembler.dashboard(
        Dashboard::Admissions,
        &[
            tables::APPLICATIONS_BY_MONTH,
            tables::ENROLLMENT_RATE_BY_COLLEGE,
            tables::ACT_DISTRIBUTION,
            tables::GPA_DISTRIBUTION,
            tables::ENROLLED_BY_FIRST_GENERATION,
            tables::APPLICATIONS_BY_YEAR,
            tables::PELL_DISTRIBUTION,
            tables::DAYS_TO_CONFIRMATION,
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::{App, applications, date, sample_dataset};

    #[test]
    fn test_applications_by_month() {
        let mut records = sample_dataset().applications;
        records[1].applied_date = date(2020, 2, 10);
        records[5].applied_date = None;

        // Fixture applications are dated in November unless changed.
        assert_eq!(applications_by_month(&records), vec![(2, 1), (11, 4)]);
    }

    #[test]
    fn test_enrollment_rate_example() {
        let records = applications(&[
            App {
                college: "Engineering",
                enrolled: true,
                ..App::default()
            },
            App {
                college: "Engineering",
                ..App::default()
            },
            App {
                college: "Business",
                enrolled: true,
                ..App::default()
            },
        ]);

        let mut rows = enrollment_rate_by(&records, ApplicationDimension::College);
        sort_desc_by(&mut rows, |row| row.enrollment_rate);

        assert_eq!(rows[0].key.to_string(), "Business");
        assert_eq!(rows[0].enrollment_rate, Some(100.0));
        assert_eq!(rows[1].key.to_string(), "Engineering");
        assert_eq!(rows[1].enrollment_rate, Some(50.0));
    }

    #[test]
    fn test_act_distribution_enrolled_only() {
        let mut records = sample_dataset().applications;
        records[1].act_score = Some(20.0);
        records[4].act_score = Some(27.5);

        assert_eq!(act_distribution(&records), vec![(27, 1), (28, 1), (33, 1)]);
    }

    #[test]
    fn test_gpa_bins_list_occupied_bins_ascending() {
        let mut records = sample_dataset().applications;
        records[2].gpa = Some(2.1);

        let rows = gpa_distribution(&records, 0.5);
        let summary: Vec<(f64, usize)> = rows.iter().map(|r| (r.bin_start, r.students)).collect();
        // Enrolled GPAs: 3.6, 2.1, 3.9, 3.4.
        assert_eq!(summary, vec![(2.0, 1), (3.0, 1), (3.5, 2)]);
        assert_eq!(rows[2].bin_end, 4.0);
    }

    #[test]
    fn test_gpa_outliers_stay_bounded() {
        let mut records = sample_dataset().applications;
        records[0].gpa = Some(5e6);
        records[2].gpa = Some(1e300);
        records[3].gpa = Some(f64::INFINITY);

        let rows = gpa_distribution(&records, 0.5);
        let summary: Vec<(f64, usize)> = rows.iter().map(|r| (r.bin_start, r.students)).collect();
        // 1e300 and infinity have no representable bin; 5e6 is its own bin.
        assert_eq!(summary, vec![(3.0, 1), (5e6, 1)]);
        assert_eq!(rows[1].bin_end, 5e6 + 0.5);
    }

    #[test]
    fn test_gpa_distribution_without_gpas_is_empty() {
        let records = applications(&[App {
            enrolled: true,
            ..App::default()
        }]);
        assert!(gpa_distribution(&records, 0.5).is_empty());
        assert!(gpa_distribution(&sample_dataset().applications, 0.0).is_empty());
    }

    #[test]
    fn test_enrolled_by_first_generation() {
        // Enrolled flags: true, false, missing, true.
        assert_eq!(
            enrolled_by_first_generation(&sample_dataset().applications),
            vec![("No", 1), ("Yes", 2)]
        );
    }

    #[test]
    fn test_pell_distribution_enrolled() {
        let rows = pell_distribution(&sample_dataset().applications);
        assert_eq!(rows, vec![("Eligible", 2), ("Not Eligible", 1), ("Unknown", 1)]);
    }

    #[test]
    fn test_days_to_confirmation_keeps_negative_lags() {
        let mut records = sample_dataset().applications;
        // Applied 2020-11-15, confirmed five days earlier.
        records[4].confirmed_date = date(2020, 11, 10);

        let summary = days_to_confirmation(&records);
        assert_eq!(summary.count, 4);
        assert_eq!(summary.negative_count, 1);
        assert_eq!(summary.min, Some(-5.0));
        assert_eq!(summary.max, Some(168.0));
    }
}
