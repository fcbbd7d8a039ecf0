//! Analysis report model.
//!
//! The [`AnalysisReport`] is the single artifact produced by a run. It holds
//! every named table and scalar along with the dashboards that group them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ResultTable, Scalar, Value};
use crate::error::{AnalyticsError, AnalyticsResult};

/// Stakeholder dashboards backed by the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dashboard {
    /// Provost's office and senior leadership.
    Executive,
    /// Admissions office.
    Admissions,
    /// College deans.
    CollegeDeans,
    /// Diversity and inclusion.
    Diversity,
}

impl Dashboard {
    /// All dashboards in presentation order.
    pub const ALL: [Dashboard; 4] = [
        Dashboard::Executive,
        Dashboard::Admissions,
        Dashboard::CollegeDeans,
        Dashboard::Diversity,
    ];

    /// The snake_case name used in URLs and file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dashboard::Executive => "executive",
            Dashboard::Admissions => "admissions",
            Dashboard::CollegeDeans => "college_deans",
            Dashboard::Diversity => "diversity",
        }
    }
}

impl fmt::Display for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dashboard {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dashboard::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| AnalyticsError::UnknownDashboard {
                name: s.to_string(),
            })
    }
}

/// Tables grouped under one dashboard, in panel order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardLayout {
    /// The dashboard.
    pub dashboard: Dashboard,
    /// Table names in panel order.
    pub tables: Vec<String>,
}

/// Number of canonical records that went into the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecordCounts {
    /// Application records.
    pub applications: usize,
    /// Enrollment records.
    pub enrollments: usize,
}

/// The complete output of an analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Unique identifier for this run.
    pub run_id: Uuid,
    /// When the report was assembled.
    pub generated_at: DateTime<Utc>,
    /// Version of the engine that produced the report.
    pub engine_version: String,
    /// Input sizes.
    pub record_counts: RecordCounts,
    /// Result tables in assembly order.
    pub tables: Vec<ResultTable>,
    /// Scalar summaries in assembly order.
    pub scalars: Vec<Scalar>,
    /// Dashboard membership of tables.
    pub dashboards: Vec<DashboardLayout>,
}

impl AnalysisReport {
    /// Looks up a table by name.
    ///
    /// # Errors
    ///
    /// Returns `TableNotFound` if no table has that name.
    pub fn table(&self, name: &str) -> AnalyticsResult<&ResultTable> {
        self.tables
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| AnalyticsError::TableNotFound {
                name: name.to_string(),
            })
    }

    /// Looks up a scalar value by name.
    pub fn scalar(&self, name: &str) -> Option<&Value> {
        self.scalars.iter().find(|s| s.name == name).map(|s| &s.value)
    }

    /// Table names in report order.
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    /// Returns the tables of a dashboard in panel order.
    pub fn dashboard(&self, dashboard: Dashboard) -> AnalyticsResult<Vec<&ResultTable>> {
        let layout = self
            .dashboards
            .iter()
            .find(|d| d.dashboard == dashboard)
            .ok_or_else(|| AnalyticsError::UnknownDashboard {
                name: dashboard.to_string(),
            })?;

        layout.tables.iter().map(|name| self.table(name)).collect()
    }
}
