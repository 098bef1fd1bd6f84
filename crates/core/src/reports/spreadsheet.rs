//! Tab-delimited report to `.xlsx` conversion.

use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use super::error::ReportError;
use crate::files::{split_extension, with_extension};

/// What [`convert_directory`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpreadsheetConversion {
    /// Reports found, by file name.
    pub reports: Vec<String>,
    /// Spreadsheets written, by file name.
    pub converted: Vec<String>,
    /// Reports that could not be converted, by file name.
    pub failed: Vec<String>,
}

/// Writes the tab-delimited table at `source` to a one-sheet workbook at
/// `destination`. Returns the number of rows written, header included.
///
/// The first row is the header and always written as text. Below it, cells
/// that parse as finite numbers are written as numbers; empty cells are left
/// blank. Rows may have differing lengths.
pub fn convert_to_xlsx(source: &Path, destination: &Path) -> Result<u32, ReportError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_path(source)
        .map_err(|e| ReportError::read(source, e))?;

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let mut rows = 0u32;
    for record in reader.records() {
        let record = record.map_err(|e| ReportError::read(source, e))?;
        for (col, field) in record.iter().enumerate() {
            if field.is_empty() {
                continue;
            }
            let Ok(col) = u16::try_from(col) else {
                break;
            };
            let written = match numeric_cell(rows, field) {
                Some(number) => worksheet.write_number(rows, col, number),
                None => worksheet.write_string(rows, col, field),
            };
            written.map_err(|e| ReportError::write(destination, e))?;
        }
        rows += 1;
    }

    workbook
        .save(destination)
        .map_err(|e| ReportError::write(destination, e))?;
    Ok(rows)
}

fn numeric_cell(row: u32, field: &str) -> Option<f64> {
    if row == 0 {
        return None;
    }
    field
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Converts every `.txt` file in `dir` to an `.xlsx` next to it.
///
/// Each report is converted on the blocking pool in turn; one failure is
/// logged and does not prevent the others.
pub async fn convert_directory(dir: &Path) -> Result<SpreadsheetConversion, ReportError> {
    let mut outcome = SpreadsheetConversion::default();
    let mut reader = tokio::fs::read_dir(dir).await?;
    let mut reports = Vec::new();
    while let Some(entry) = reader.next_entry().await? {
        let name = entry.file_name().to_string_lossy().to_string();
        if !matches!(split_extension(&name), Some((_, "txt"))) {
            continue;
        }
        match tokio::fs::metadata(entry.path()).await {
            Ok(meta) if meta.is_file() => reports.push(name),
            Ok(_) => {}
            Err(e) => {
                warn!("Skipping report {}: {}", name, e);
                outcome.failed.push(name);
            }
        }
    }
    reports.sort();

    for name in reports {
        let source = dir.join(&name);
        let xlsx_name = with_extension(&name, "xlsx");
        let destination = dir.join(&xlsx_name);

        match convert_blocking(source, destination.clone()).await {
            Ok(rows) => {
                info!(
                    "The file: {} has been successfully converted to 'xlsx' format: {} ({} rows)",
                    name,
                    destination.display(),
                    rows
                );
                outcome.converted.push(xlsx_name);
            }
            Err(e) => {
                error!(
                    "Error! The file: {} has not been converted to 'xlsx' format: {}",
                    name, e
                );
                outcome.failed.push(name.clone());
            }
        }
        outcome.reports.push(name);
    }
    Ok(outcome)
}

async fn convert_blocking(source: PathBuf, destination: PathBuf) -> Result<u32, ReportError> {
    tokio::task::spawn_blocking(move || convert_to_xlsx(&source, &destination))
        .await
        .map_err(|e| ReportError::Task(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_numeric_cells_skip_header() {
        assert_eq!(numeric_cell(0, "12"), None);
        assert_eq!(numeric_cell(1, "12"), Some(12.0));
        assert_eq!(numeric_cell(1, " 0.5 "), Some(0.5));
        assert_eq!(numeric_cell(1, "NaN"), None);
        assert_eq!(numeric_cell(1, "inf"), None);
        assert_eq!(numeric_cell(1, "P12345"), None);
    }

    #[test]
    fn test_convert_writes_workbook() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("run1_Default_PSM_Report.txt");
        std::fs::write(
            &source,
            "\tProtein(s)\tSequence\tScore\nP1\tP12345\tPEPTIDE\t98.5\n2\tQ99999\tMK\n",
        )
        .unwrap();
        let destination = dir.path().join("run1_Default_PSM_Report.xlsx");

        let rows = convert_to_xlsx(&source, &destination).unwrap();
        assert_eq!(rows, 3);
        let bytes = std::fs::read(&destination).unwrap();
        // xlsx files are zip archives.
        assert_eq!(&bytes[..2], b"PK");
    }

    #[tokio::test]
    async fn test_convert_directory_isolates_failures() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a_Report.txt"), "A\tB\n1\t2\n").unwrap();
        std::fs::write(dir.path().join("b_Report.txt"), "X\n").unwrap();
        std::fs::write(dir.path().join("reports_cli.log"), "log").unwrap();
        // A directory named like a report cannot be converted and is ignored.
        std::fs::create_dir(dir.path().join("c_Report.txt")).unwrap();
        // Invalid UTF-8 fails to parse as a string record.
        std::fs::write(dir.path().join("bad.txt"), [b'A', b'\t', 0xff, 0xfe, b'\n']).unwrap();

        let outcome = convert_directory(dir.path()).await.unwrap();
        assert_eq!(outcome.reports, vec!["a_Report.txt", "b_Report.txt", "bad.txt"]);
        assert_eq!(outcome.converted, vec!["a_Report.xlsx", "b_Report.xlsx"]);
        assert_eq!(outcome.failed, vec!["bad.txt"]);
        assert!(dir.path().join("a_Report.xlsx").is_file());
        assert!(!dir.path().join("bad.xlsx").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_convert_directory_skips_unreadable_entries() {
        let dir = TempDir::new().unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone.txt"), dir.path().join("a_Report.txt"))
            .unwrap();
        std::fs::write(dir.path().join("b_Report.txt"), "A\tB\n1\t2\n").unwrap();

        let outcome = convert_directory(dir.path()).await.unwrap();
        assert_eq!(outcome.failed, vec!["a_Report.txt"]);
        assert_eq!(outcome.converted, vec!["b_Report.xlsx"]);
        assert!(dir.path().join("b_Report.xlsx").is_file());
    }
}
