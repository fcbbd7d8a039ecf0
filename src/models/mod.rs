//! Core data models for the enrollment analytics engine.
//!
//! This module contains the canonical records, the score equivalence table,
//! and the result types handed to renderers and exporters.

mod application;
mod enrollment;
mod report;
mod score_table;
mod table;

pub use application::{ApplicationRecord, PellEligibility};
pub use enrollment::{EnrollmentRecord, StudentLoad};
pub use report::{AnalysisReport, Dashboard, DashboardLayout, RecordCounts};
pub use score_table::{ScoreBand, ScoreEquivalenceTable};
pub use table::{ResultTable, Scalar, TableRow, Value};
