//! Error types for the converter module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop raw file discovery.
///
/// Per-file conversion failures are not errors; they are recorded in the
/// converter's run record.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The raw directory does not exist.
    #[error("Raw directory not found: {path}")]
    RawDirectoryMissing { path: PathBuf },

    /// The raw directory could not be listed.
    #[error("Failed to scan {path}: {source}")]
    ScanFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConversionError {
    /// Creates a scan error, mapping `NotFound` to a missing directory.
    pub fn scan(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::RawDirectoryMissing { path }
        } else {
            Self::ScanFailed { path, source }
        }
    }
}
