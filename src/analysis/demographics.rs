//! Applicant demographics.
//!
//! Gender and ethnicity shares exclude applicants who did not report a
//! value. First-generation share is taken over reported flags; Pell share
//! and URM shares are taken over every application.

use crate::calculation::{count_by, mean, percentage_distribution, rate};
use crate::config::{AnalysisConfig, CategoryConfig};
use crate::error::AnalyticsResult;
use crate::ingest::Dataset;
use crate::models::{ApplicationRecord, PellEligibility};
use crate::report::ResultAssembler;

use super::{pairs_table, tables};

/// Demographic profile of an applicant pool.
#[derive(Debug, Clone, PartialEq)]
pub struct Demographics {
    /// Gender shares, most frequent first.
    pub gender: Vec<(String, f64)>,
    /// Ethnicity shares, most frequent first.
    pub ethnicity: Vec<(String, f64)>,
    /// First-generation percentage among applicants with a reported flag.
    pub first_gen_pct: Option<f64>,
    /// Pell-eligible percentage of all applicants.
    pub pell_pct: Option<f64>,
}

/// Computes the demographic profile of `applications`.
///
/// # Examples
///
/// ```
/// use enrollment_analytics::analysis::demographics::demographics;
/// use enrollment_analytics::models::ApplicationRecord;
///
/// let mut a = ApplicationRecord::new("1");
/// a.gender = Some("Female".to_string());
/// a.first_generation = Some(true);
/// let mut b = ApplicationRecord::new("2");
/// b.first_generation = Some(false);
///
/// let profile = demographics(&[a, b]);
/// assert_eq!(profile.gender, vec![("Female".to_string(), 100.0)]);
/// assert_eq!(profile.first_gen_pct, Some(50.0));
/// assert_eq!(profile.pell_pct, Some(0.0));
/// ```
pub fn demographics(applications: &[ApplicationRecord]) -> Demographics {
    let gender = count_by(applications, |r| r.gender.clone());
    let ethnicity = count_by(applications, |r| r.ethnicity.clone());

    Demographics {
        gender: percentage_distribution(&gender),
        ethnicity: percentage_distribution(&ethnicity),
        first_gen_pct: first_generation_pct(applications),
        pell_pct: pell_eligible_pct(applications),
    }
}

/// Share of first-generation applicants among those with a reported flag.
pub fn first_generation_pct<'a, I>(applications: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a ApplicationRecord>,
{
    mean(
        applications
            .into_iter()
            .map(|r| r.first_generation.map(|flag| if flag { 100.0 } else { 0.0 })),
    )
}

/// Share of Pell-eligible applicants; unknown eligibility counts as not eligible.
pub fn pell_eligible_pct<'a, I>(applications: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a ApplicationRecord>,
{
    let (hits, total) = applications.into_iter().fold((0, 0), |(hits, total), r| {
        (hits + usize::from(r.pell == PellEligibility::Eligible), total + 1)
    });
    rate(hits, total)
}

/// Share of applicants whose ethnicity is in the URM list; missing counts as not URM.
pub fn urm_pct<'a, I>(applications: I, categories: &CategoryConfig) -> Option<f64>
where
    I: IntoIterator<Item = &'a ApplicationRecord>,
{
    let (hits, total) = applications.into_iter().fold((0, 0), |(hits, total), r| {
        let urm = r.ethnicity.as_deref().is_some_and(|e| categories.is_urm(e));
        (hits + usize::from(urm), total + 1)
    });
    rate(hits, total)
}

pub(super) fn register(
    dataset: &Dataset,
    config: &AnalysisConfig,
    assembler: &mut ResultAssembler,
) -> AnalyticsResult<()> {
    let profile = demographics(&dataset.applications);

    assembler.table(pairs_table(
        tables::GENDER_DISTRIBUTION,
        ["gender", "percentage"],
        profile.gender,
    ))?;
    assembler.table(pairs_table(
        tables::ETHNICITY_DISTRIBUTION,
        ["ethnicity", "percentage"],
        profile.ethnicity,
    ))?;
    assembler.scalar(tables::FIRST_GEN_PCT, profile.first_gen_pct);
    assembler.scalar(tables::PELL_PCT, profile.pell_pct);
    assembler.scalar(
        tables::URM_PCT,
        urm_pct(&dataset.applications, config.categories()),
    );

    Ok(())
}
