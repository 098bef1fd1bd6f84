//! Workspace manager.
//!
//! A workspace is a root directory holding `raw/` (input spectra), `processed/`
//! (deconvolution outputs), `searched/` (search and aggregation outputs) and
//! `reports/`, plus three parameter files. This module validates that layout
//! and the external executables before any stage runs.

mod error;
mod manager;

pub use error::WorkspaceError;
pub use manager::{
    ensure_dir, resolve_reference_name, verify_executables, verify_parameters, ParameterFiles,
    ToolAvailability, Workspace, PROCESSED_DIR, RAW_DIR, REPORTS_DIR, SEARCHED_DIR,
};
