//! Analyses over the canonical records.
//!
//! Each submodule computes one family of statistics from a [`Dataset`] and
//! registers its tables with the [`ResultAssembler`]. The dashboard modules
//! (`executive`, `admissions`, `deans`, `diversity`) also declare which
//! tables make up their panels.
//!
//! # Example
//!
//! ```
//! use enrollment_analytics::analysis::{run_analysis, tables};
//! use enrollment_analytics::config::AnalysisConfig;
//! use enrollment_analytics::ingest::Dataset;
//!
//! let report = run_analysis(&Dataset::default(), &AnalysisConfig::default()).unwrap();
//! assert!(report.table(tables::APPLICATIONS_BY_YEAR).unwrap().is_empty());
//! ```

pub mod academic_quality;
pub mod admissions;
pub mod college_diversity;
pub mod deans;
pub mod demographics;
pub mod diversity;
pub mod executive;
pub mod programs;
pub mod retention;
pub mod trends;

use tracing::info;

use crate::config::AnalysisConfig;
use crate::error::AnalyticsResult;
use crate::ingest::Dataset;
use crate::models::{AnalysisReport, ApplicationRecord, ResultTable, Value};
use crate::report::ResultAssembler;

/// Names of every table and scalar in the report.
///
/// These names, the column names and the row order of each table are the
/// contract with downstream renderers.
pub mod tables {
    /// Gender share of all applications.
    pub const GENDER_DISTRIBUTION: &str = "gender_distribution";
    /// Ethnicity share of all applications, most frequent first.
    pub const ETHNICITY_DISTRIBUTION: &str = "ethnicity_distribution";
    /// Demographic mix per college.
    pub const COLLEGE_DIVERSITY: &str = "college_diversity";
    /// Colleges with the most applications.
    pub const TOP_COLLEGES_BY_APPLICATIONS: &str = "top_colleges_by_applications";
    /// Departments with the most enrolled students.
    pub const TOP_DEPARTMENTS_BY_ENROLLMENT: &str = "top_departments_by_enrollment";
    /// Colleges with the most enrolled students.
    pub const TOP_COLLEGES_BY_ENROLLMENT: &str = "top_colleges_by_enrollment";
    /// Applications, enrollments and enrollment rate per year.
    pub const APPLICATIONS_BY_YEAR: &str = "applications_by_year";
    /// Enrolled students and first-term outcomes per year.
    pub const ENROLLMENT_BY_YEAR: &str = "enrollment_by_year";
    /// Retention rates per year.
    pub const RETENTION_BY_YEAR: &str = "retention_by_year";
    /// Retention rates per college, highest one-year retention first.
    pub const RETENTION_BY_COLLEGE: &str = "retention_by_college";
    /// Retention rates per full-time / part-time status.
    pub const RETENTION_BY_STATUS: &str = "retention_by_status";

    /// Mean GPA of enrolled applicants per year.
    pub const AVG_GPA_BY_YEAR: &str = "avg_gpa_by_year";
    /// Enrolled scholarship recipients per amount band.
    pub const SCHOLARSHIP_DISTRIBUTION: &str = "scholarship_distribution";
    /// Top colleges by enrollment for the executive dashboard.
    pub const EXECUTIVE_TOP_COLLEGES: &str = "executive_top_colleges";
    /// Top ethnicities by applications for the executive dashboard.
    pub const EXECUTIVE_TOP_ETHNICITIES: &str = "executive_top_ethnicities";

    /// Applications per calendar month of the application date.
    pub const APPLICATIONS_BY_MONTH: &str = "applications_by_month";
    /// Enrollment rate per college, highest first.
    pub const ENROLLMENT_RATE_BY_COLLEGE: &str = "enrollment_rate_by_college";
    /// Enrolled applicants per ACT score.
    pub const ACT_DISTRIBUTION: &str = "act_distribution";
    /// Enrolled applicants per GPA bin.
    pub const GPA_DISTRIBUTION: &str = "gpa_distribution";
    /// Enrolled applicants per first-generation flag.
    pub const ENROLLED_BY_FIRST_GENERATION: &str = "enrolled_by_first_generation";
    /// Enrolled applicants per Pell eligibility label.
    pub const PELL_DISTRIBUTION: &str = "pell_distribution";
    /// Summary of days from application to confirmation.
    pub const DAYS_TO_CONFIRMATION: &str = "days_to_confirmation";

    /// Enrollments per year for the largest colleges, one row per pair.
    pub const COLLEGE_ENROLLMENT_TREND: &str = "college_enrollment_trend";
    /// Mean first-term GPA per college, highest first.
    pub const FIRST_TERM_GPA_BY_COLLEGE: &str = "first_term_gpa_by_college";
    /// One-year retention per college for the deans dashboard.
    pub const DEANS_RETENTION_BY_COLLEGE: &str = "deans_retention_by_college";
    /// Mean first-term credit hours per college, highest first.
    pub const CREDIT_HOURS_BY_COLLEGE: &str = "credit_hours_by_college";
    /// Gender percentages per college among enrolled applicants.
    pub const GENDER_MIX_BY_COLLEGE: &str = "gender_mix_by_college";
    /// Departments with the most enrolled students, deans dashboard size.
    pub const DEANS_TOP_DEPARTMENTS: &str = "deans_top_departments";

    /// Enrolled applicants per year and ethnicity.
    pub const ETHNICITY_BY_YEAR: &str = "ethnicity_by_year";
    /// First-generation share per college among enrolled applicants.
    pub const FIRST_GEN_BY_COLLEGE: &str = "first_gen_by_college";
    /// Pell-eligible share per college among enrolled applicants.
    pub const PELL_BY_COLLEGE: &str = "pell_by_college";
    /// URM share per college among enrolled applicants.
    pub const URM_BY_COLLEGE: &str = "urm_by_college";
    /// Gender percentages per college for the diversity dashboard.
    pub const DIVERSITY_GENDER_MIX_BY_COLLEGE: &str = "diversity_gender_mix_by_college";
    /// Simpson's diversity index of enrolled applicants per year.
    pub const DIVERSITY_INDEX_BY_YEAR: &str = "diversity_index_by_year";

    /// Scalar: first-generation share of applicants with a reported flag.
    pub const FIRST_GEN_PCT: &str = "first_gen_pct";
    /// Scalar: Pell-eligible share of all applications.
    pub const PELL_PCT: &str = "pell_pct";
    /// Scalar: URM share of all applications.
    pub const URM_PCT: &str = "urm_pct";
    /// Scalar: mean high school GPA of enrolled applicants.
    pub const AVG_GPA_ENROLLED: &str = "avg_gpa_enrolled";
    /// Scalar: median high school GPA of enrolled applicants.
    pub const MEDIAN_GPA_ENROLLED: &str = "median_gpa_enrolled";
    /// Scalar: mean standardized test score of enrolled applicants.
    pub const AVG_TEST_SCORE_ENROLLED: &str = "avg_test_score_enrolled";
    /// Scalar: median standardized test score of enrolled applicants.
    pub const MEDIAN_TEST_SCORE_ENROLLED: &str = "median_test_score_enrolled";
    /// Scalar: mean scholarship amount of enrolled applicants.
    pub const AVG_SCHOLARSHIP_ENROLLED: &str = "avg_scholarship_enrolled";
    /// Scalar: share of enrolled applicants with a positive scholarship.
    pub const SCHOLARSHIP_RECIPIENTS_PCT: &str = "scholarship_recipients_pct";
    /// Scalar: one-year retention over all enrolled students.
    pub const OVERALL_ONE_YEAR_RETENTION: &str = "overall_one_year_retention";
    /// Scalar: two-year retention over all enrolled students.
    pub const OVERALL_TWO_YEAR_RETENTION: &str = "overall_two_year_retention";
}

/// Runs every analysis and assembles the report.
///
/// # Errors
///
/// Only structural failures surface here (a duplicate table name or a
/// dashboard naming an unknown table). Missing data never fails a run.
pub fn run_analysis(dataset: &Dataset, config: &AnalysisConfig) -> AnalyticsResult<AnalysisReport> {
    info!(
        applications = dataset.applications.len(),
        enrollments = dataset.enrollment.len(),
        "Running analysis"
    );

    let mut assembler = ResultAssembler::new();

    demographics::register(dataset, config, &mut assembler)?;
    college_diversity::register(dataset, config, &mut assembler)?;
    programs::register(dataset, config, &mut assembler)?;
    academic_quality::register(dataset, config, &mut assembler)?;
    trends::register(dataset, config, &mut assembler)?;
    retention::register(dataset, config, &mut assembler)?;

    executive::register(dataset, config, &mut assembler)?;
    admissions::register(dataset, config, &mut assembler)?;
    deans::register(dataset, config, &mut assembler)?;
    diversity::register(dataset, config, &mut assembler)?;

    Ok(assembler.finish(dataset.record_counts()))
}

/// Applicants who confirmed enrollment, in input order.
pub fn enrolled_applicants(
    applications: &[ApplicationRecord],
) -> impl Iterator<Item = &ApplicationRecord> {
    applications.iter().filter(|record| record.enrolled())
}

/// Builds a two-column table from `(label, value)` pairs.
pub(crate) fn pairs_table<L, V, I>(name: &str, columns: [&str; 2], pairs: I) -> ResultTable
where
    L: Into<Value>,
    V: Into<Value>,
    I: IntoIterator<Item = (L, V)>,
{
    ResultTable {
        name: name.to_string(),
        columns: columns.iter().map(|c| c.to_string()).collect(),
        rows: pairs
            .into_iter()
            .map(|(label, value)| vec![label.into(), value.into()])
            .collect(),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Small hand-built datasets shared by the analysis tests.

    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use crate::ingest::Dataset;
    use crate::models::{ApplicationRecord, EnrollmentRecord, PellEligibility, StudentLoad};

    pub fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    pub struct App<'a> {
        pub year: i32,
        pub college: &'a str,
        pub enrolled: bool,
        pub gender: Option<&'a str>,
        pub ethnicity: Option<&'a str>,
        pub first_gen: Option<bool>,
        pub pell: PellEligibility,
        pub gpa: Option<f64>,
    }

    impl Default for App<'_> {
        fn default() -> Self {
            Self {
                year: 2020,
                college: "Engineering",
                enrolled: false,
                gender: None,
                ethnicity: None,
                first_gen: None,
                pell: PellEligibility::Unknown,
                gpa: None,
            }
        }
    }

    impl App<'_> {
        pub fn build(&self, id: usize) -> ApplicationRecord {
            let mut record = ApplicationRecord::new(id.to_string());
            record.year = Some(self.year);
            record.college = Some(self.college.to_string());
            record.applied_date = date(self.year - 1, 11, 15);
            if self.enrolled {
                record.confirmed_date = date(self.year, 5, 1);
            }
            record.gender = self.gender.map(str::to_string);
            record.ethnicity = self.ethnicity.map(str::to_string);
            record.first_generation = self.first_gen;
            record.pell = self.pell;
            record.gpa = self.gpa;
            record
        }
    }

    pub fn applications(specs: &[App<'_>]) -> Vec<ApplicationRecord> {
        specs.iter().enumerate().map(|(i, s)| s.build(i + 1)).collect()
    }

    pub fn student(
        year: i32,
        college: &str,
        department: &str,
        one_year: bool,
        two_year: bool,
    ) -> EnrollmentRecord {
        let mut record = EnrollmentRecord::new(format!("{}-{}-{}", year, college, department));
        record.year = Some(year);
        record.college = Some(college.to_string());
        record.department = Some(department.to_string());
        record.one_year_retained = one_year;
        record.two_year_retained = two_year;
        record.status = Some(StudentLoad::FullTime);
        record
    }

    /// Three colleges over two years with a mix of demographics.
    pub fn sample_dataset() -> Dataset {
        let mut applications = applications(&[
            App {
                enrolled: true,
                gender: Some("Female"),
                ethnicity: Some("White"),
                first_gen: Some(true),
                pell: PellEligibility::Eligible,
                gpa: Some(3.6),
                ..App::default()
            },
            App {
                gender: Some("Male"),
                ethnicity: Some("Hispanic/Latino"),
                first_gen: Some(false),
                pell: PellEligibility::NotEligible,
                gpa: Some(3.1),
                ..App::default()
            },
            App {
                college: "Business",
                enrolled: true,
                gender: Some("Male"),
                ethnicity: Some("Black/African American"),
                first_gen: Some(false),
                pell: PellEligibility::Eligible,
                gpa: Some(3.0),
                ..App::default()
            },
            App {
                year: 2021,
                enrolled: true,
                gender: Some("Female"),
                ethnicity: Some("Asian"),
                pell: PellEligibility::NotEligible,
                gpa: Some(3.9),
                ..App::default()
            },
            App {
                year: 2021,
                college: "Nursing",
                enrolled: true,
                gender: Some("Female"),
                ethnicity: Some("White"),
                first_gen: Some(true),
                gpa: Some(3.4),
                ..App::default()
            },
            App {
                year: 2021,
                college: "Nursing",
                ..App::default()
            },
        ]);
        applications[0].act_score = Some(28.0);
        applications[2].sat_score = Some(1250.0);
        applications[3].act_score = Some(33.0);
        applications[0].scholarship_amount = Some(Decimal::from(2500));
        applications[2].scholarship_amount = Some(Decimal::ZERO);
        applications[3].scholarship_amount = Some(Decimal::from(12000));

        let mut enrollment = vec![
            student(2020, "Engineering", "Civil Engineering", true, true),
            student(2020, "Engineering", "Mechanical Engineering", false, false),
            student(2020, "Business", "Finance", true, false),
            student(2021, "Engineering", "Civil Engineering", true, false),
            student(2021, "Nursing", "Nursing", true, true),
        ];
        enrollment[0].first_term_gpa = Some(3.2);
        enrollment[1].first_term_gpa = Some(2.4);
        enrollment[2].first_term_gpa = Some(3.0);
        enrollment[0].first_term_credit_hours = Some(15.0);
        enrollment[1].first_term_credit_hours = Some(12.0);
        enrollment[4].first_term_credit_hours = Some(16.0);
        enrollment[4].status = Some(StudentLoad::PartTime);

        Dataset {
            applications,
            enrollment,
        }
    }
}
