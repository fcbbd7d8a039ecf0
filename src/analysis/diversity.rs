//! Diversity dashboard panels.
//!
//! All panels cover enrolled applicants. The ethnicity-by-year table counts
//! an unreported ethnicity under the configured unknown label; the
//! diversity index leaves it out.

use crate::calculation::{CrossTab, Grouped, simpson_index, sort_desc_by};
use crate::config::{AnalysisConfig, CategoryConfig};
use crate::error::AnalyticsResult;
use crate::ingest::Dataset;
use crate::models::{ApplicationRecord, Dashboard, TableRow, Value};
use crate::report::ResultAssembler;

use super::college_diversity::{CollegeDiversityRow, college_diversity};
use super::deans::gender_mix_by_college;
use super::{enrolled_applicants, pairs_table, tables};

/// Simpson's index of one year's enrolled applicants.
#[derive(Debug, Clone, PartialEq)]
pub struct DiversityIndexRow {
    /// Academic year.
    pub year: i32,
    /// Enrolled applicants in the year, reported ethnicity or not.
    pub students: usize,
    /// Index over reported ethnicities; undefined when none was reported.
    pub diversity_index: Option<f64>,
}

impl TableRow for DiversityIndexRow {
    const COLUMNS: &'static [&'static str] = &["year", "students", "diversity_index"];

    fn cells(&self) -> Vec<Value> {
        vec![
            self.year.into(),
            self.students.into(),
            self.diversity_index.into(),
        ]
    }
}

/// Enrolled applicants per year (rows, ascending) and ethnicity (columns).
pub fn ethnicity_by_year(
    applications: &[ApplicationRecord],
    categories: &CategoryConfig,
) -> CrossTab<i32> {
    CrossTab::from_pairs(
        "year",
        enrolled_applicants(applications).filter_map(|r| {
            let ethnicity = r
                .ethnicity
                .clone()
                .unwrap_or_else(|| categories.unknown_label.clone());
            r.year.map(|year| (year, ethnicity))
        }),
    )
    .sorted_by_key()
}

/// Simpson's diversity index of enrolled applicants per year, ascending.
pub fn diversity_index_by_year(applications: &[ApplicationRecord]) -> Vec<DiversityIndexRow> {
    let grouped = Grouped::<i32, (usize, Grouped<String, usize>)>::accumulate(
        enrolled_applicants(applications),
        |r| r.year,
        |(students, ethnicities), r| {
            *students += 1;
            if let Some(ethnicity) = &r.ethnicity {
                *ethnicities.entry_or_insert_with(ethnicity.clone(), || 0) += 1;
            }
        },
    );

    let mut rows: Vec<DiversityIndexRow> = grouped
        .into_entries()
        .into_iter()
        .map(|(year, (students, ethnicities))| DiversityIndexRow {
            year,
            students,
            diversity_index: simpson_index(ethnicities.iter().map(|(_, count)| *count)),
        })
        .collect();
    rows.sort_by_key(|row| row.year);
    rows
}

/// Ranks colleges by one percentage, highest first, and keeps `n`.
fn rank_colleges<F>(rows: &[CollegeDiversityRow], n: usize, metric: F) -> Vec<(String, Option<f64>)>
where
    F: Fn(&CollegeDiversityRow) -> Option<f64>,
{
    let mut ranked: Vec<(String, Option<f64>)> =
        rows.iter().map(|r| (r.college.clone(), metric(r))).collect();
    sort_desc_by(&mut ranked, |(_, value)| *value);
    ranked.truncate(n);
    ranked
}

pub(super) fn register(
    dataset: &Dataset,
    config: &AnalysisConfig,
    assembler: &mut ResultAssembler,
) -> AnalyticsResult<()> {
    let categories = config.categories();
    let n = config.limits().diversity;

    assembler.crosstab(
        tables::ETHNICITY_BY_YEAR,
        &ethnicity_by_year(&dataset.applications, categories),
    )?;

    let colleges = college_diversity(enrolled_applicants(&dataset.applications), categories);
    assembler.table(pairs_table(
        tables::FIRST_GEN_BY_COLLEGE,
        ["college", "first_gen_pct"],
        rank_colleges(&colleges, n, |r| r.first_gen_pct),
    ))?;
    assembler.table(pairs_table(
        tables::PELL_BY_COLLEGE,
        ["college", "pell_pct"],
        rank_colleges(&colleges, n, |r| r.pell_pct),
    ))?;
    assembler.table(pairs_table(
        tables::URM_BY_COLLEGE,
        ["college", "urm_pct"],
        rank_colleges(&colleges, n, |r| r.urm_pct),
    ))?;

    assembler.crosstab(
        tables::DIVERSITY_GENDER_MIX_BY_COLLEGE,
        &gender_mix_by_college(&dataset.applications, &categories.female_label, n),
    )?;
    assembler.rows(
        tables::DIVERSITY_INDEX_BY_YEAR,
        &diversity_index_by_year(&dataset.applications),
    )?;

    assembler.dashboard(
        Dashboard::Diversity,
        &[
            tables::ETHNICITY_BY_YEAR,
            tables::FIRST_GEN_BY_COLLEGE,
            tables::PELL_BY_COLLEGE,
            tables::URM_BY_COLLEGE,
            tables::DIVERSITY_GENDER_MIX_BY_COLLEGE,
            tables::DIVERSITY_INDEX_BY_YEAR,
        ],
    )
}
