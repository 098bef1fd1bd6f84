//! Report exporter.
//!
//! Exports the requested PeptideShaker reports from the project database
//! into `reports/` and converts each tab-delimited `.txt` report into an
//! `.xlsx` workbook next to it.

mod error;
mod exporter;
mod kind;
mod spreadsheet;

pub use error::ReportError;
pub use exporter::{ReportExporter, ReportOutcome, REPORTS_LOG_FILE, REPORT_CLI_CLASS};
pub use kind::{codes_argument, ReportKind};
pub use spreadsheet::{convert_directory, convert_to_xlsx, SpreadsheetConversion};
