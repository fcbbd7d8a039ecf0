//! Configuration types for the analytics engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Every section has a
//! default matching the university's standard export layout, so a partial
//! `analysis.yaml` only needs to list what differs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{ScoreBand, ScoreEquivalenceTable};

/// Column names of the applications export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationColumns {
    /// Record identifier column.
    pub id: String,
    /// Application date column.
    pub applied_date: String,
    /// Confirmation date column.
    pub confirmed_date: String,
    /// Academic year column.
    pub year: String,
    /// College description column.
    pub college: String,
    /// Gender column.
    pub gender: String,
    /// Ethnicity column.
    pub ethnicity: String,
    /// First-generation flag column.
    pub first_generation: String,
    /// Pell eligibility column.
    pub pell: String,
    /// High school GPA column.
    pub gpa: String,
    /// ACT score column.
    pub act_score: String,
    /// SAT score column.
    pub sat_score: String,
    /// Scholarship amount column.
    pub scholarship_amount: String,
}

impl Default for ApplicationColumns {
    fn default() -> Self {
        Self {
            id: "ID".to_string(),
            applied_date: "Applied Date".to_string(),
            confirmed_date: "Confirmed Date".to_string(),
            year: "Year".to_string(),
            college: "COLLEGE_DESCR".to_string(),
            gender: "Gender".to_string(),
            ethnicity: "Ethnicity".to_string(),
            first_generation: "First Generation".to_string(),
            pell: "Pell_Eligibility".to_string(),
            gpa: "GPA".to_string(),
            act_score: "ACT_SCORE".to_string(),
            sat_score: "SAT_SCORE".to_string(),
            scholarship_amount: "Scholarship_Amount".to_string(),
        }
    }
}

/// Column names of the enrollment export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrollmentColumns {
    /// Record identifier column.
    pub id: String,
    /// Academic year column.
    pub year: String,
    /// College description column.
    pub college: String,
    /// Department description column.
    pub department: String,
    /// First-term GPA column.
    pub first_term_gpa: String,
    /// First-term credit hours column.
    pub first_term_credit_hours: String,
    /// One-year retention indicator column.
    pub one_year_retention: String,
    /// Two-year retention indicator column.
    pub two_year_retention: String,
    /// Full-time / part-time status column.
    pub status: String,
}

impl Default for EnrollmentColumns {
    fn default() -> Self {
        Self {
            id: "ID".to_string(),
            year: "YEAR".to_string(),
            college: "COLLEGE_DESCR".to_string(),
            department: "DEPARTMENT_DESCR".to_string(),
            first_term_gpa: "FirstTerm_GPA".to_string(),
            first_term_credit_hours: "FirstTerm_CreditHours".to_string(),
            one_year_retention: "OneYear retention".to_string(),
            two_year_retention: "TwoYear retention".to_string(),
            status: "FTPT".to_string(),
        }
    }
}

/// Column names for both input tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    /// Applications export columns.
    pub applications: ApplicationColumns,
    /// Enrollment export columns.
    pub enrollment: EnrollmentColumns,
}

/// Category labels and codes that drive group-relative percentages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    /// Ethnicities counted as under-represented minorities.
    pub urm_ethnicities: Vec<String>,
    /// Ethnicity label reported as the White percentage.
    pub white_label: String,
    /// Gender label reported as the Female percentage.
    pub female_label: String,
    /// Raw Pell codes meaning eligible.
    pub pell_eligible_codes: Vec<String>,
    /// Raw Pell codes meaning not eligible.
    pub pell_ineligible_codes: Vec<String>,
    /// Label for blank category values that are counted rather than dropped.
    pub unknown_label: String,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            urm_ethnicities: vec![
                "Black/African American".to_string(),
                "Hispanic/Latino".to_string(),
                "American Indian/Alaska Native".to_string(),
                "Native Hawaiian/Pacific Islander".to_string(),
            ],
            white_label: "White".to_string(),
            female_label: "Female".to_string(),
            pell_eligible_codes: vec!["Y".to_string()],
            pell_ineligible_codes: vec!["N".to_string()],
            unknown_label: "Unknown".to_string(),
        }
    }
}

impl CategoryConfig {
    /// Returns true if the ethnicity is in the URM list.
    pub fn is_urm(&self, ethnicity: &str) -> bool {
        self.urm_ethnicities.iter().any(|e| e == ethnicity)
    }
}

/// One scholarship amount band.
///
/// Bands are right-inclusive: an amount falls in the first band whose
/// `upper` is at or above it. The last band usually has no upper bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScholarshipBand {
    /// Display label (e.g. `$1K-$3K`).
    pub label: String,
    /// Inclusive upper bound; `None` means unbounded.
    #[serde(default)]
    pub upper: Option<Decimal>,
}

/// Default scholarship bands: (0,1000], (1000,3000], (3000,5000], (5000,10000], >10000.
pub fn default_scholarship_bands() -> Vec<ScholarshipBand> {
    [
        ("<$1K", Some(1000)),
        ("$1K-$3K", Some(3000)),
        ("$3K-$5K", Some(5000)),
        ("$5K-$10K", Some(10000)),
        (">$10K", None),
    ]
    .into_iter()
    .map(|(label, upper)| ScholarshipBand {
        label: label.to_string(),
        upper: upper.map(Decimal::from),
    })
    .collect()
}

/// Row limits for top-N panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelLimits {
    /// Top programs analysis (colleges and departments).
    pub top_programs: usize,
    /// Executive dashboard top-N panels.
    pub executive: usize,
    /// Admissions dashboard top-N panels.
    pub admissions: usize,
    /// College deans dashboard top-N panels.
    pub college_deans: usize,
    /// Colleges followed over time on the deans dashboard.
    pub college_trend: usize,
    /// Diversity dashboard top-N panels.
    pub diversity: usize,
}

impl Default for PanelLimits {
    fn default() -> Self {
        Self {
            top_programs: 10,
            executive: 5,
            admissions: 10,
            college_deans: 10,
            college_trend: 5,
            diversity: 8,
        }
    }
}

/// Contents of `analysis.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Input column names.
    pub columns: ColumnNames,
    /// Category labels.
    pub categories: CategoryConfig,
    /// Scholarship amount bands.
    pub scholarship_bands: Vec<ScholarshipBand>,
    /// Top-N sizes.
    pub limits: PanelLimits,
    /// Width of GPA histogram bins.
    pub gpa_bin_width: f64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            columns: ColumnNames::default(),
            categories: CategoryConfig::default(),
            scholarship_bands: default_scholarship_bands(),
            limits: PanelLimits::default(),
            gpa_bin_width: 0.5,
        }
    }
}

/// Contents of `score_equivalence.yaml` before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreTableFile {
    /// Bands in any order.
    pub bands: Vec<ScoreBand>,
    /// Equivalent for scores below every band.
    pub floor: u32,
}

/// Complete, validated analysis configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisConfig {
    settings: AnalysisSettings,
    score_table: ScoreEquivalenceTable,
}

impl AnalysisConfig {
    /// Creates a configuration from its parts.
    pub fn new(settings: AnalysisSettings, score_table: ScoreEquivalenceTable) -> Self {
        Self {
            settings,
            score_table,
        }
    }

    /// Returns the settings from `analysis.yaml`.
    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    /// Returns the input column names.
    pub fn columns(&self) -> &ColumnNames {
        &self.settings.columns
    }

    /// Returns the category labels.
    pub fn categories(&self) -> &CategoryConfig {
        &self.settings.categories
    }

    /// Returns the top-N sizes.
    pub fn limits(&self) -> &PanelLimits {
        &self.settings.limits
    }

    /// Returns the SAT to ACT equivalence table.
    pub fn score_table(&self) -> &ScoreEquivalenceTable {
        &self.score_table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "limits:\n  diversity: 3\ncategories:\n  female_label: F\n";
        let settings: AnalysisSettings = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(settings.limits.diversity, 3);
        assert_eq!(settings.limits.top_programs, 10);
        assert_eq!(settings.categories.female_label, "F");
        assert_eq!(settings.categories.white_label, "White");
        assert_eq!(settings.columns.applications.confirmed_date, "Confirmed Date");
        assert_eq!(settings.scholarship_bands.len(), 5);
    }

    #[test]
    fn test_is_urm() {
        let categories = CategoryConfig::default();
        assert!(categories.is_urm("Hispanic/Latino"));
        assert!(!categories.is_urm("White"));
        assert!(!categories.is_urm("hispanic/latino"));
    }

    #[test]
    fn test_default_scholarship_bands_are_right_inclusive_ranges() {
        let bands = default_scholarship_bands();
        assert_eq!(bands[0].upper, Some(Decimal::from(1000)));
        assert_eq!(bands[4].label, ">$10K");
        assert_eq!(bands[4].upper, None);
    }

    #[test]
    fn test_scholarship_band_upper_from_yaml() {
        let yaml = "- label: small\n  upper: 500\n- label: large\n";
        let bands: Vec<ScholarshipBand> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(bands[0].upper, Some(Decimal::from(500)));
        assert_eq!(bands[1].upper, None);
    }
}
