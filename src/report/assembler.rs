//! Result assembly.
//!
//! The [`ResultAssembler`] packages analysis outputs into an
//! [`AnalysisReport`]. It never re-sorts or recomputes anything: tables,
//! rows and scalars come out in the order they went in.

use std::collections::HashSet;
use std::hash::Hash;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::calculation::CrossTab;
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::models::{
    AnalysisReport, Dashboard, DashboardLayout, RecordCounts, ResultTable, Scalar, TableRow,
    Value,
};

/// Version string stamped on every report.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Collects named tables, scalars and dashboard layouts.
///
/// # Examples
///
/// ```
/// use enrollment_analytics::models::{Dashboard, RecordCounts, TableRow, Value};
/// use enrollment_analytics::report::ResultAssembler;
///
/// struct YearRow(i32, usize);
///
/// impl TableRow for YearRow {
///     const COLUMNS: &'static [&'static str] = &["year", "applications"];
///
///     fn cells(&self) -> Vec<Value> {
///         vec![self.0.into(), self.1.into()]
///     }
/// }
///
/// let mut assembler = ResultAssembler::new();
/// assembler.rows("applications_by_year", &[YearRow(2020, 3), YearRow(2021, 5)]).unwrap();
/// assembler.scalar("pell_pct", Some(40.0));
/// assembler.dashboard(Dashboard::Executive, &["applications_by_year"]).unwrap();
///
/// let report = assembler.finish(RecordCounts::default());
/// assert_eq!(report.table_names(), vec!["applications_by_year"]);
/// assert_eq!(report.scalar("pell_pct"), Some(&Value::Number(40.0)));
/// ```
#[derive(Debug, Default)]
pub struct ResultAssembler {
    tables: Vec<ResultTable>,
    names: HashSet<String>,
    scalars: Vec<Scalar>,
    dashboards: Vec<DashboardLayout>,
}

impl ResultAssembler {
    /// Creates an empty assembler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a finished table.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateTable` if a table with the same name was already added.
    pub fn table(&mut self, table: ResultTable) -> AnalyticsResult<()> {
        if !self.names.insert(table.name.clone()) {
            return Err(AnalyticsError::DuplicateTable { name: table.name });
        }

        debug!(
            table = %table.name,
            columns = table.columns.len(),
            rows = table.rows.len(),
            "Assembled table"
        );
        self.tables.push(table);
        Ok(())
    }

    /// Adds a table built from typed rows, keeping their order.
    pub fn rows<R: TableRow>(&mut self, name: &str, rows: &[R]) -> AnalyticsResult<()> {
        self.table(ResultTable::from_rows(name, rows))
    }

    /// Adds a cross-tab as a wide table.
    pub fn crosstab<K>(&mut self, name: &str, crosstab: &CrossTab<K>) -> AnalyticsResult<()>
    where
        K: Eq + Hash + Clone + Into<Value>,
    {
        self.table(crosstab.to_table(name))
    }

    /// Adds a named scalar. A later scalar with the same name replaces the value.
    pub fn scalar(&mut self, name: &str, value: impl Into<Value>) {
        let value = value.into();
        match self.scalars.iter_mut().find(|s| s.name == name) {
            Some(existing) => existing.value = value,
            None => self.scalars.push(Scalar {
                name: name.to_string(),
                value,
            }),
        }
    }

    /// Declares the tables of a dashboard, in panel order.
    ///
    /// # Errors
    ///
    /// Returns `TableNotFound` if a listed table has not been added.
    pub fn dashboard(&mut self, dashboard: Dashboard, tables: &[&str]) -> AnalyticsResult<()> {
        if let Some(missing) = tables.iter().find(|name| !self.names.contains(**name)) {
            return Err(AnalyticsError::TableNotFound {
                name: missing.to_string(),
            });
        }

        let tables: Vec<String> = tables.iter().map(|name| name.to_string()).collect();
        match self.dashboards.iter_mut().find(|d| d.dashboard == dashboard) {
            Some(layout) => layout.tables.extend(tables),
            None => self.dashboards.push(DashboardLayout { dashboard, tables }),
        }
        Ok(())
    }

    /// Stamps the report with a run id and timestamp.
    pub fn finish(self, record_counts: RecordCounts) -> AnalysisReport {
        let report = AnalysisReport {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            engine_version: ENGINE_VERSION.to_string(),
            record_counts,
            tables: self.tables,
            scalars: self.scalars,
            dashboards: self.dashboards,
        };

        info!(
            run_id = %report.run_id,
            tables = report.tables.len(),
            scalars = report.scalars.len(),
            "Assembled analysis report"
        );

        report
    }
}
