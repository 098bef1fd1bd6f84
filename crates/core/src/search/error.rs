//! Error types for the search module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that prevent the search engine from being invoked.
///
/// A search that runs and fails is not an error; check
/// [`super::SearchResult::output_path`].
#[derive(Debug, Error)]
pub enum SearchError {
    /// No tier fragment qualified for searching.
    #[error("No files to search")]
    NoInputFiles,

    /// The processed directory could not be listed.
    #[error("Failed to scan {path}: {source}")]
    ScanFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SearchError {
    pub fn scan(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ScanFailed {
            path: path.into(),
            source,
        }
    }
}
