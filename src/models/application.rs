//! Application record model.
//!
//! One row per applicant per admission cycle. Enrollment status, the
//! confirmation lag and the combined test score are derived on demand and
//! never stored.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ScoreEquivalenceTable;

/// Pell grant eligibility as recorded on the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PellEligibility {
    /// Eligible for a Pell grant.
    Eligible,
    /// Not eligible for a Pell grant.
    NotEligible,
    /// No usable eligibility value on record.
    Unknown,
}

impl PellEligibility {
    /// Returns the display label used in result tables.
    pub fn label(&self) -> &'static str {
        match self {
            PellEligibility::Eligible => "Eligible",
            PellEligibility::NotEligible => "Not Eligible",
            PellEligibility::Unknown => "Unknown",
        }
    }
}

/// A canonical application record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    /// Identifier of the application row.
    pub id: String,
    /// The date the application was submitted.
    pub applied_date: Option<NaiveDate>,
    /// The date the applicant confirmed enrollment.
    pub confirmed_date: Option<NaiveDate>,
    /// Academic year (cycle label).
    pub year: Option<i32>,
    /// College the applicant applied to.
    pub college: Option<String>,
    /// Reported gender.
    pub gender: Option<String>,
    /// Reported ethnicity.
    pub ethnicity: Option<String>,
    /// First-generation college student flag.
    pub first_generation: Option<bool>,
    /// Pell grant eligibility.
    pub pell: PellEligibility,
    /// High school GPA.
    pub gpa: Option<f64>,
    /// ACT composite score.
    pub act_score: Option<f64>,
    /// SAT composite score.
    pub sat_score: Option<f64>,
    /// Scholarship amount awarded.
    pub scholarship_amount: Option<Decimal>,
}

impl ApplicationRecord {
    /// Returns true when the applicant confirmed enrollment.
    ///
    /// # Examples
    ///
    /// ```
    /// use enrollment_analytics::models::{ApplicationRecord, PellEligibility};
    /// use chrono::NaiveDate;
    ///
    /// let mut record = ApplicationRecord::new("app_001");
    /// assert!(!record.enrolled());
    ///
    /// record.confirmed_date = NaiveDate::from_ymd_opt(2020, 6, 1);
    /// assert!(record.enrolled());
    /// ```
    pub fn enrolled(&self) -> bool {
        self.confirmed_date.is_some()
    }

    /// Days between application and confirmation.
    ///
    /// Only defined when both dates are present. Negative values are passed
    /// through as-is.
    pub fn days_to_confirmation(&self) -> Option<i64> {
        match (self.applied_date, self.confirmed_date) {
            (Some(applied), Some(confirmed)) => Some((confirmed - applied).num_days()),
            _ => None,
        }
    }

    /// Calendar month (1-12) of the application date.
    pub fn applied_month(&self) -> Option<u32> {
        self.applied_date.map(|date| date.month())
    }

    /// ACT score if present, otherwise the ACT equivalent of the SAT score.
    pub fn standardized_test_score(&self, table: &ScoreEquivalenceTable) -> Option<f64> {
        self.act_score
            .or_else(|| table.convert(self.sat_score).map(f64::from))
    }

    /// Creates an empty record carrying only an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            applied_date: None,
            confirmed_date: None,
            year: None,
            college: None,
            gender: None,
            ethnicity: None,
            first_generation: None,
            pell: PellEligibility::Unknown,
            gpa: None,
            act_score: None,
            sat_score: None,
            scholarship_amount: None,
        }
    }
}
