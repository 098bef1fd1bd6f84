//! Pipeline orchestrator.
//!
//! Stage order:
//!
//! 1. Open the workspace and check executables and parameter files
//! 2. Create `processed/` and `searched/`
//! 3. Convert raw spectra (ThermoRawFileParser)
//! 4. Deconvolve (DIA-Umpire SE)
//! 5. Remove intermediates from `raw/`
//! 6. Move tier fragments and peak clusters to `processed/`
//! 7. Search (SearchGUI)
//! 8. Aggregate (PeptideShaker)
//! 9. Export reports (ReportCLI) and convert them to `.xlsx`
//!
//! Each stage only reads what the previous ones left on disk.

mod error;
mod runner;

pub use error::PipelineError;
pub use runner::{Pipeline, Preflight};
