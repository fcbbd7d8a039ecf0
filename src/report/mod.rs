//! Packaging and export of analysis results.

mod assembler;
mod export;

pub use assembler::{ENGINE_VERSION, ResultAssembler};
pub use export::{REPORT_FILE, cell_text, export_report, write_table_csv};
