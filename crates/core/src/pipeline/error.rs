//! Error types for the pipeline module.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::converter::ConversionError;
use crate::workspace::WorkspaceError;

/// Conditions that end a run. Everything else is logged and recorded.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Workspace, executables or parameter files are missing.
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    /// The raw directory could not be scanned.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// No open-format spectra exist after conversion.
    #[error("No .mzML files available in {raw_dir}")]
    NoSpectra { raw_dir: PathBuf },

    /// The reference name cannot be used as a file name.
    #[error("Invalid reference name: {name:?}")]
    InvalidReferenceName { name: String },
}
