//! Error types for the enrollment analytics engine.
//!
//! Only structural problems are errors here. A malformed cell or an empty
//! group is a normal condition and shows up as a missing value instead.

use thiserror::Error;

/// The main error type for the analytics engine.
///
/// # Example
///
/// ```
/// use enrollment_analytics::error::AnalyticsError;
///
/// let error = AnalyticsError::MissingColumn {
///     table: "applications".to_string(),
///     column: "Confirmed Date".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Required column 'Confirmed Date' is missing from table 'applications'"
/// );
/// ```
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A score equivalence table violates its ordering rules.
    #[error("Invalid score equivalence table: {message}")]
    InvalidScoreTable {
        /// What made the table invalid.
        message: String,
    },

    /// An input data file was not found.
    #[error("Source file not found: {path}")]
    SourceNotFound {
        /// The path that was not found.
        path: String,
    },

    /// An input data source could not be read as CSV.
    #[error("Failed to read source '{source_name}': {message}")]
    SourceParseError {
        /// The name of the source (table name or path).
        source_name: String,
        /// A description of the read error.
        message: String,
    },

    /// A required column is absent from an input table.
    #[error("Required column '{column}' is missing from table '{table}'")]
    MissingColumn {
        /// The table being normalized.
        table: String,
        /// The column that was not found.
        column: String,
    },

    /// A grouping dimension does not name a normalized field.
    #[error("Unknown grouping dimension '{dimension}' for table '{table}'")]
    UnknownDimension {
        /// The requested dimension name.
        dimension: String,
        /// The table the dimension was requested for.
        table: String,
    },

    /// Two result tables were registered under the same name.
    #[error("Duplicate result table: {name}")]
    DuplicateTable {
        /// The repeated table name.
        name: String,
    },

    /// A result table was requested that the report does not contain.
    #[error("Result table not found: {name}")]
    TableNotFound {
        /// The requested table name.
        name: String,
    },

    /// A dashboard name does not match any known dashboard.
    #[error("Unknown dashboard: {name}")]
    UnknownDashboard {
        /// The requested dashboard name.
        name: String,
    },

    /// Writing an exported artifact failed.
    #[error("Failed to export '{path}': {message}")]
    Export {
        /// The output path.
        path: String,
        /// A description of the failure.
        message: String,
    },
}

/// A type alias for Results that return AnalyticsError.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = AnalyticsError::ConfigNotFound {
            path: "/missing/analysis.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/analysis.yaml"
        );
    }

    #[test]
    fn test_missing_column_names_table_and_column() {
        let error = AnalyticsError::MissingColumn {
            table: "enrollment".to_string(),
            column: "OneYear retention".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Required column 'OneYear retention' is missing from table 'enrollment'"
        );
    }

    #[test]
    fn test_unknown_dimension_displays_dimension() {
        let error = AnalyticsError::UnknownDimension {
            dimension: "shoe_size".to_string(),
            table: "applications".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Unknown grouping dimension 'shoe_size' for table 'applications'"
        );
    }

    #[test]
    fn test_source_parse_error_displays_message() {
        let error = AnalyticsError::SourceParseError {
            source_name: "applications".to_string(),
            message: "found record with 3 fields, but the previous record has 4 fields"
                .to_string(),
        };
        assert!(error.to_string().starts_with("Failed to read source 'applications'"));
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<AnalyticsError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_table_not_found() -> AnalyticsResult<()> {
            Err(AnalyticsError::TableNotFound {
                name: "retention_by_college".to_string(),
            })
        }

        fn propagates_error() -> AnalyticsResult<()> {
            returns_table_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
