//! Enrollment record model.

use serde::{Deserialize, Serialize};

/// Full-time / part-time load of an enrolled student.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentLoad {
    /// Full-time student.
    FullTime,
    /// Part-time student.
    PartTime,
    /// Any other recorded status, kept verbatim.
    Other(String),
}

impl StudentLoad {
    /// Parses a raw status code such as `FT` or `Part-Time`.
    ///
    /// Blank input yields `None`; unrecognized codes are kept as `Other`.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        let folded: String = trimmed
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        Some(match folded.as_str() {
            "ft" | "f" | "fulltime" => StudentLoad::FullTime,
            "pt" | "p" | "parttime" => StudentLoad::PartTime,
            _ => StudentLoad::Other(trimmed.to_string()),
        })
    }

    /// Returns the display label used in result tables.
    pub fn label(&self) -> &str {
        match self {
            StudentLoad::FullTime => "Full-Time",
            StudentLoad::PartTime => "Part-Time",
            StudentLoad::Other(label) => label,
        }
    }
}

/// A canonical enrollment record.
///
/// Retention flags are plain booleans: normalization already applied the
/// strict `"1"` rule, so there is no missing state left for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    /// Identifier of the enrollment row.
    pub id: String,
    /// Academic year (cycle label).
    pub year: Option<i32>,
    /// College of enrollment.
    pub college: Option<String>,
    /// Department of enrollment.
    pub department: Option<String>,
    /// GPA earned in the first term.
    pub first_term_gpa: Option<f64>,
    /// Credit hours attempted in the first term.
    pub first_term_credit_hours: Option<f64>,
    /// Retained after one year.
    pub one_year_retained: bool,
    /// Retained after two years.
    pub two_year_retained: bool,
    /// Full-time / part-time status.
    pub status: Option<StudentLoad>,
}

impl EnrollmentRecord {
    /// Creates an empty record carrying only an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            year: None,
            college: None,
            department: None,
            first_term_gpa: None,
            first_term_credit_hours: None,
            one_year_retained: false,
            two_year_retained: false,
            status: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_and_part_time_codes() {
        assert_eq!(StudentLoad::parse("FT"), Some(StudentLoad::FullTime));
        assert_eq!(StudentLoad::parse(" Full-Time "), Some(StudentLoad::FullTime));
        assert_eq!(StudentLoad::parse("pt"), Some(StudentLoad::PartTime));
        assert_eq!(StudentLoad::parse("Part Time"), Some(StudentLoad::PartTime));
    }

    #[test]
    fn test_parse_blank_is_missing() {
        assert_eq!(StudentLoad::parse(""), None);
        assert_eq!(StudentLoad::parse("   "), None);
    }

    #[test]
    fn test_parse_unknown_code_is_kept() {
        assert_eq!(
            StudentLoad::parse("Audit"),
            Some(StudentLoad::Other("Audit".to_string()))
        );
        assert_eq!(StudentLoad::Other("Audit".to_string()).label(), "Audit");
    }

    #[test]
    fn test_new_record_is_not_retained() {
        let record = EnrollmentRecord::new("enr_001");
        assert!(!record.one_year_retained);
        assert!(!record.two_year_retained);
        assert_eq!(record.status, None);
    }
}
