//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading analysis
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::models::ScoreEquivalenceTable;

use super::types::{AnalysisConfig, AnalysisSettings, ScoreTableFile};

/// Loads and provides access to analysis configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── analysis.yaml           # Column names, categories, bands, top-N sizes
/// └── score_equivalence.yaml  # SAT to ACT step table
/// ```
///
/// # Example
///
/// ```no_run
/// use enrollment_analytics::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("URM categories: {:?}", loader.config().categories().urm_ethnicities);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AnalysisConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - The score equivalence table is not monotone
    pub fn load<P: AsRef<Path>>(path: P) -> AnalyticsResult<Self> {
        let path = path.as_ref();

        let settings_path = path.join("analysis.yaml");
        let settings = Self::load_yaml::<AnalysisSettings>(&settings_path)?;

        let table_path = path.join("score_equivalence.yaml");
        let table_file = Self::load_yaml::<ScoreTableFile>(&table_path)?;
        let score_table = ScoreEquivalenceTable::new(table_file.bands, table_file.floor)?;

        Self::validate(&settings, &settings_path)?;

        info!(
            path = %path.display(),
            score_bands = score_table.bands().len(),
            "Loaded analysis configuration"
        );

        Ok(Self {
            config: AnalysisConfig::new(settings, score_table),
        })
    }

    /// Wraps the built-in defaults without touching the filesystem.
    pub fn builtin() -> Self {
        Self {
            config: AnalysisConfig::default(),
        }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> AnalyticsResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| AnalyticsError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| AnalyticsError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Checks settings that serde cannot express.
    fn validate(settings: &AnalysisSettings, path: &Path) -> AnalyticsResult<()> {
        let parse_error = |message: String| AnalyticsError::ConfigParseError {
            path: path.display().to_string(),
            message,
        };

        if !(settings.gpa_bin_width.is_finite() && settings.gpa_bin_width > 0.0) {
            return Err(parse_error(format!(
                "gpa_bin_width must be positive, got {}",
                settings.gpa_bin_width
            )));
        }

        let bounds: Vec<_> = settings
            .scholarship_bands
            .iter()
            .map(|band| band.upper)
            .collect();
        for (i, pair) in bounds.windows(2).enumerate() {
            match (pair[0], pair[1]) {
                (None, _) => {
                    return Err(parse_error(format!(
                        "scholarship band {} is unbounded but is not the last band",
                        i
                    )));
                }
                (Some(lower), Some(upper)) if upper <= lower => {
                    return Err(parse_error(format!(
                        "scholarship band bounds must increase ({} then {})",
                        lower, upper
                    )));
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Returns the underlying analysis configuration.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Consumes the loader and returns the configuration.
    pub fn into_config(self) -> AnalysisConfig {
        self.config
    }
}
