//! Configuration loading and management for the analytics engine.
//!
//! This module loads analysis settings (input column names, category labels,
//! scholarship bands, top-N sizes) and the score equivalence table from YAML
//! files. Built-in defaults reproduce the standard export layout.
//!
//! # Example
//!
//! ```no_run
//! use enrollment_analytics::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap().into_config();
//! println!("Female label: {}", config.categories().female_label);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AnalysisConfig, AnalysisSettings, ApplicationColumns, CategoryConfig, ColumnNames,
    EnrollmentColumns, PanelLimits, ScholarshipBand, ScoreTableFile, default_scholarship_bands,
};
