//! Result table model.
//!
//! Every analysis output is handed to renderers and exporters as a
//! [`ResultTable`]: a name, an ordered list of column names, and rows of
//! [`Value`] cells. Column names and row order are part of the contract.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// A single cell in a result table.
///
/// `Missing` serializes to JSON `null` and marks an undefined statistic,
/// such as a rate over an empty group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Integral value (counts, years).
    Integer(i64),
    /// Floating point value (rates, means).
    Number(f64),
    /// Categorical label.
    Text(String),
    /// Undefined or absent value.
    Missing,
}

impl Value {
    /// Returns true for [`Value::Missing`].
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Numeric view of the cell, if it holds a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text view of the cell, if it holds a label.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        if value.is_finite() {
            Value::Number(value)
        } else {
            Value::Missing
        }
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        value.to_f64().map(Value::from).unwrap_or(Value::Missing)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Missing)
    }
}

/// A typed row that knows its column layout.
///
/// Implementors list their column names once; the assembler uses them as
/// the table header.
pub trait TableRow {
    /// Column names in output order.
    const COLUMNS: &'static [&'static str];

    /// Cells in the same order as [`TableRow::COLUMNS`].
    fn cells(&self) -> Vec<Value>;
}

/// A named table of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    /// Stable table name (e.g. `retention_by_college`).
    pub name: String,
    /// Column names in output order.
    pub columns: Vec<String>,
    /// Rows of cells, each as long as `columns`.
    pub rows: Vec<Vec<Value>>,
}

impl ResultTable {
    /// Builds a table from typed rows, preserving their order.
    ///
    /// # Examples
    ///
    /// ```
    /// use enrollment_analytics::models::{ResultTable, TableRow, Value};
    ///
    /// struct CountRow {
    ///     label: String,
    ///     count: usize,
    /// }
    ///
    /// impl TableRow for CountRow {
    ///     const COLUMNS: &'static [&'static str] = &["label", "count"];
    ///
    ///     fn cells(&self) -> Vec<Value> {
    ///         vec![self.label.clone().into(), self.count.into()]
    ///     }
    /// }
    ///
    /// let table = ResultTable::from_rows(
    ///     "counts",
    ///     &[CountRow { label: "Engineering".to_string(), count: 3 }],
    /// );
    /// assert_eq!(table.columns, vec!["label", "count"]);
    /// assert_eq!(table.rows[0][1], Value::Integer(3));
    /// ```
    pub fn from_rows<R: TableRow>(name: impl Into<String>, rows: &[R]) -> Self {
        Self {
            name: name.into(),
            columns: R::COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: rows.iter().map(TableRow::cells).collect(),
        }
    }

    /// Returns the position of a column by name.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Returns every cell of a column, top to bottom.
    pub fn column(&self, column: &str) -> Option<Vec<&Value>> {
        let index = self.column_index(column)?;
        Some(self.rows.iter().filter_map(|row| row.get(index)).collect())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A named scalar summary value (e.g. overall retention rate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scalar {
    /// Stable scalar name.
    pub name: String,
    /// The value; `Missing` when undefined.
    pub value: Value,
}
