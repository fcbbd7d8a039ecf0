//! Academic profile of enrolled applicants.

use rust_decimal::Decimal;

use crate::calculation::{NumericSummary, decimal_mean, rate};
use crate::config::AnalysisConfig;
use crate::error::AnalyticsResult;
use crate::ingest::Dataset;
use crate::models::{ApplicationRecord, ScoreEquivalenceTable};
use crate::report::ResultAssembler;

use super::{enrolled_applicants, tables};

/// GPA, test score and scholarship figures for enrolled applicants.
#[derive(Debug, Clone, PartialEq)]
pub struct AcademicQuality {
    /// Mean high school GPA.
    pub avg_gpa: Option<f64>,
    /// Median high school GPA.
    pub median_gpa: Option<f64>,
    /// Mean standardized (ACT-scale) test score.
    pub avg_test_score: Option<f64>,
    /// Median standardized test score.
    pub median_test_score: Option<f64>,
    /// Mean scholarship amount over applicants with a recorded amount.
    pub avg_scholarship: Option<Decimal>,
    /// Share of enrolled applicants with a scholarship above zero.
    pub scholarship_recipients_pct: Option<f64>,
}

/// Computes the academic profile of the enrolled applicants.
///
/// The standardized score uses the ACT score when present and otherwise
/// converts the SAT score through `score_table`.
pub fn academic_quality(
    applications: &[ApplicationRecord],
    score_table: &ScoreEquivalenceTable,
) -> AcademicQuality {
    let enrolled: Vec<&ApplicationRecord> = enrolled_applicants(applications).collect();

    let gpa: NumericSummary = enrolled.iter().map(|r| r.gpa).collect();
    let test_scores: NumericSummary = enrolled
        .iter()
        .map(|r| r.standardized_test_score(score_table))
        .collect();
    let recipients = enrolled
        .iter()
        .filter(|r| r.scholarship_amount.is_some_and(|a| a > Decimal::ZERO))
        .count();

    AcademicQuality {
        avg_gpa: gpa.mean(),
        median_gpa: gpa.median(),
        avg_test_score: test_scores.mean(),
        median_test_score: test_scores.median(),
        avg_scholarship: decimal_mean(enrolled.iter().map(|r| r.scholarship_amount))
            .map(|amount| amount.round_dp(2)),
        scholarship_recipients_pct: rate(recipients, enrolled.len()),
    }
}

pub(super) fn register(
    dataset: &Dataset,
    config: &AnalysisConfig,
    assembler: &mut ResultAssembler,
) -> AnalyticsResult<()> {
    let quality = academic_quality(&dataset.applications, config.score_table());

    assembler.scalar(tables::AVG_GPA_ENROLLED, quality.avg_gpa);
    assembler.scalar(tables::MEDIAN_GPA_ENROLLED, quality.median_gpa);
    assembler.scalar(tables::AVG_TEST_SCORE_ENROLLED, quality.avg_test_score);
    assembler.scalar(tables::MEDIAN_TEST_SCORE_ENROLLED, quality.median_test_score);
    assembler.scalar(tables::AVG_SCHOLARSHIP_ENROLLED, quality.avg_scholarship);
    assembler.scalar(
        tables::SCHOLARSHIP_RECIPIENTS_PCT,
        quality.scholarship_recipients_pct,
    );

    Ok(())
}
