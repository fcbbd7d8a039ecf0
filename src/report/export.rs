//! File export of an analysis report.
//!
//! Each table becomes `<table>.csv` with a header row; the whole report is
//! also written as `report.json`. Missing values are empty CSV fields and
//! JSON `null`.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::models::{AnalysisReport, ResultTable, Value};

/// File name of the JSON report.
pub const REPORT_FILE: &str = "report.json";

/// Text of one CSV cell.
///
/// # Examples
///
/// ```
/// use enrollment_analytics::models::Value;
/// use enrollment_analytics::report::cell_text;
///
/// assert_eq!(cell_text(&Value::Integer(2020)), "2020");
/// assert_eq!(cell_text(&Value::Number(62.5)), "62.5");
/// assert_eq!(cell_text(&Value::Missing), "");
/// ```
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Integer(i) => i.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Text(s) => s.clone(),
        Value::Missing => String::new(),
    }
}

/// Writes one table as CSV with a header row.
pub fn write_table_csv<W: Write>(table: &ResultTable, writer: W) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(cell_text))?;
    }
    writer.flush()?;
    Ok(())
}

fn export_error(path: &Path, message: impl ToString) -> AnalyticsError {
    AnalyticsError::Export {
        path: path.display().to_string(),
        message: message.to_string(),
    }
}

/// Writes every table and the JSON report into `out_dir`.
///
/// The directory is created if needed. Returns the written paths, tables
/// first in report order and the JSON report last.
///
/// # Errors
///
/// Returns `Export` naming the file that could not be written.
pub fn export_report<P: AsRef<Path>>(
    report: &AnalysisReport,
    out_dir: P,
) -> AnalyticsResult<Vec<PathBuf>> {
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir).map_err(|e| export_error(out_dir, e))?;

    let mut written = Vec::with_capacity(report.tables.len() + 1);

    for table in &report.tables {
        let path = out_dir.join(format!("{}.csv", table.name));
        let file = File::create(&path).map_err(|e| export_error(&path, e))?;
        write_table_csv(table, BufWriter::new(file)).map_err(|e| export_error(&path, e))?;
        written.push(path);
    }

    let path = out_dir.join(REPORT_FILE);
    let file = File::create(&path).map_err(|e| export_error(&path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report).map_err(|e| export_error(&path, e))?;
    writer.flush().map_err(|e| export_error(&path, e))?;
    written.push(path);

    info!(
        run_id = %report.run_id,
        out_dir = %out_dir.display(),
        files = written.len(),
        "Exported analysis report"
    );

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordCounts;
    use crate::report::ResultAssembler;

    fn retention_table() -> ResultTable {
        ResultTable {
            name: "retention_by_college".to_string(),
            columns: vec![
                "college".to_string(),
                "one_year_retention".to_string(),
                "students".to_string(),
            ],
            rows: vec![
                vec![Value::from("Arts, Letters"), Value::Number(75.0), Value::Integer(4)],
                vec![Value::from("Law"), Value::Missing, Value::Integer(0)],
            ],
        }
    }

    #[test]
    fn test_csv_writes_missing_as_empty_field() {
        let mut buffer = Vec::new();
        write_table_csv(&retention_table(), &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text,
            "college,one_year_retention,students\n\"Arts, Letters\",75,4\nLaw,,0\n"
        );
    }

    #[test]
    fn test_export_report_writes_tables_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let mut assembler = ResultAssembler::new();
        assembler.table(retention_table()).unwrap();
        assembler.scalar("overall_one_year_retention", None::<f64>);
        let report = assembler.finish(RecordCounts::default());

        let written = export_report(&report, dir.path().join("out")).unwrap();

        assert_eq!(written.len(), 2);
        assert!(written[0].ends_with("retention_by_college.csv"));
        assert!(written[1].ends_with(REPORT_FILE));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&written[1]).unwrap()).unwrap();
        assert_eq!(json["tables"][0]["rows"][1][1], serde_json::Value::Null);
        assert_eq!(json["scalars"][0]["value"], serde_json::Value::Null);
        assert_eq!(json["run_id"], report.run_id.to_string());
    }

    #[test]
    fn test_export_to_unwritable_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "not a directory").unwrap();

        let report = ResultAssembler::new().finish(RecordCounts::default());
        assert!(matches!(
            export_report(&report, blocker.join("out")),
            Err(AnalyticsError::Export { .. })
        ));
    }
}
