//! Demographic mix per college.
//!
//! Female, White, URM and Pell percentages use the whole college as the
//! denominator, so an unreported value counts as not matching. The
//! first-generation percentage only counts applicants with a reported flag.

use crate::calculation::{Grouped, RateCounter, sort_desc_by};
use crate::config::{AnalysisConfig, CategoryConfig};
use crate::error::AnalyticsResult;
use crate::ingest::Dataset;
use crate::models::{ApplicationRecord, PellEligibility, TableRow, Value};
use crate::report::ResultAssembler;

use super::tables;

/// Demographic mix of one college.
#[derive(Debug, Clone, PartialEq)]
pub struct CollegeDiversityRow {
    /// College name.
    pub college: String,
    /// Applicants in the college.
    pub total_applications: usize,
    /// Female percentage.
    pub female_pct: Option<f64>,
    /// First-generation percentage among reported flags.
    pub first_gen_pct: Option<f64>,
    /// Pell-eligible percentage.
    pub pell_pct: Option<f64>,
    /// White percentage.
    pub white_pct: Option<f64>,
    /// Under-represented minority percentage.
    pub urm_pct: Option<f64>,
}

impl TableRow for CollegeDiversityRow {
    const COLUMNS: &'static [&'static str] = &[
        "college",
        "total_applications",
        "female_pct",
        "first_gen_pct",
        "pell_pct",
        "white_pct",
        "urm_pct",
    ];

    fn cells(&self) -> Vec<Value> {
        vec![
            self.college.as_str().into(),
            self.total_applications.into(),
            self.female_pct.into(),
            self.first_gen_pct.into(),
            self.pell_pct.into(),
            self.white_pct.into(),
            self.urm_pct.into(),
        ]
    }
}

#[derive(Debug, Default)]
struct CollegeMix {
    female: RateCounter,
    first_gen: RateCounter,
    pell: RateCounter,
    white: RateCounter,
    urm: RateCounter,
}

/// Computes the mix of every college with at least one applicant.
///
/// Rows are ordered by application count, largest first; ties keep
/// first-seen order. Applicants without a college are excluded.
pub fn college_diversity<'a, I>(applications: I, categories: &CategoryConfig) -> Vec<CollegeDiversityRow>
where
    I: IntoIterator<Item = &'a ApplicationRecord>,
{
    let grouped = Grouped::<String, CollegeMix>::accumulate(
        applications,
        |r| r.college.clone(),
        |mix, r| {
            let ethnicity = r.ethnicity.as_deref();
            mix.female
                .record(r.gender.as_deref() == Some(categories.female_label.as_str()));
            mix.pell.record(r.pell == PellEligibility::Eligible);
            mix.white
                .record(ethnicity == Some(categories.white_label.as_str()));
            mix.urm
                .record(ethnicity.is_some_and(|e| categories.is_urm(e)));
            if let Some(flag) = r.first_generation {
                mix.first_gen.record(flag);
            }
        },
    );

    let mut rows: Vec<CollegeDiversityRow> = grouped
        .into_entries()
        .into_iter()
        .map(|(college, mix)| CollegeDiversityRow {
            college,
            total_applications: mix.female.total,
            female_pct: mix.female.rate(),
            first_gen_pct: mix.first_gen.rate(),
            pell_pct: mix.pell.rate(),
            white_pct: mix.white.rate(),
            urm_pct: mix.urm.rate(),
        })
        .collect();

    sort_desc_by(&mut rows, |row| Some(row.total_applications as f64));
    rows
}

pub(super) fn register(
    dataset: &Dataset,
    config: &AnalysisConfig,
    assembler: &mut ResultAssembler,
) -> AnalyticsResult<()> {
    let rows = college_diversity(&dataset.applications, config.categories());
    assembler.rows(tables::COLLEGE_DIVERSITY, &rows)
}
