//! Error types for the reports module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from exporting or converting reports.
///
/// None of these stop the pipeline; a failure converting one report is
/// logged and the remaining reports are still converted.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The reports directory could not be created.
    #[error("Failed to create reports directory: {path}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A tabular report could not be parsed.
    #[error("Failed to read report {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The spreadsheet could not be written.
    #[error("Failed to write spreadsheet {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    /// The conversion task did not complete.
    #[error("Conversion task failed: {0}")]
    Task(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReportError {
    pub fn read(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: rust_xlsxwriter::XlsxError) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}
