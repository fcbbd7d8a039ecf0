//! Raw tabular input.
//!
//! A [`RawTable`] is a header row plus string cells, exactly as read from a
//! CSV export. No typing happens here; that is the normalization stage's job.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::{AnalyticsError, AnalyticsResult};

/// A header row plus rows of string cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Creates a table from in-memory headers and rows.
    ///
    /// Headers are trimmed so that `" YEAR "` matches `YEAR`. A leading byte
    /// order mark is dropped.
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            headers: headers
                .into_iter()
                .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
                .collect(),
            rows,
        }
    }

    /// Reads a CSV document with a header row.
    ///
    /// Rows may be shorter or longer than the header; absent trailing cells
    /// read as missing. Invalid UTF-8 is replaced rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns `SourceParseError` if the CSV structure cannot be read.
    ///
    /// # Examples
    ///
    /// ```
    /// use enrollment_analytics::ingest::RawTable;
    ///
    /// let csv = "ID,YEAR\n1,2020\n2,2021\n";
    /// let table = RawTable::from_reader("enrollment", csv.as_bytes()).unwrap();
    /// assert_eq!(table.len(), 2);
    /// assert_eq!(table.cell(1, table.column_index("YEAR")), Some("2021"));
    /// ```
    pub fn from_reader<R: Read>(name: impl Into<String>, reader: R) -> AnalyticsResult<Self> {
        let name = name.into();
        let parse_error = |e: csv::Error| AnalyticsError::SourceParseError {
            source_name: name.clone(),
            message: e.to_string(),
        };

        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .byte_headers()
            .map_err(parse_error)?
            .iter()
            .map(|h| String::from_utf8_lossy(h).into_owned())
            .collect();

        let mut rows = Vec::new();
        for record in csv_reader.byte_records() {
            let record = record.map_err(parse_error)?;
            rows.push(
                record
                    .iter()
                    .map(|cell| String::from_utf8_lossy(cell).into_owned())
                    .collect(),
            );
        }

        debug!(source = %name, columns = headers.len(), rows = rows.len(), "Read raw table");

        Ok(Self::new(name, headers, rows))
    }

    /// Reads a CSV file with a header row.
    ///
    /// # Errors
    ///
    /// Returns `SourceNotFound` if the file cannot be opened, or
    /// `SourceParseError` if its contents are not readable CSV.
    pub fn from_path<P: AsRef<Path>>(name: impl Into<String>, path: P) -> AnalyticsResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|_| AnalyticsError::SourceNotFound {
            path: path.display().to_string(),
        })?;
        Self::from_reader(name, file)
    }

    /// Name of the table (used in error messages).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Header names in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true when the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact (trimmed) header name.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column.trim())
    }

    /// Position of a column that must exist.
    ///
    /// # Errors
    ///
    /// Returns `MissingColumn` naming this table and the column.
    pub fn require_column(&self, column: &str) -> AnalyticsResult<usize> {
        self.column_index(column)
            .ok_or_else(|| AnalyticsError::MissingColumn {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// Raw text of a cell, if both the column and the cell exist.
    pub fn cell(&self, row: usize, column: Option<usize>) -> Option<&str> {
        let column = column?;
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
    }
}
