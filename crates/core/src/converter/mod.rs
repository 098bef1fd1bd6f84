//! Format converter.
//!
//! Finds vendor raw spectra in `raw/` that have no open-format counterpart
//! and converts them with ThermoRawFileParser:
//!
//! ```text
//! ThermoRawFileParser -i raw/<x>.raw -b raw/<x>.mzML
//! ```
//!
//! # Example
//!
//! ```ignore
//! use diaflow_core::converter::FormatConverter;
//!
//! let mut converter = FormatConverter::new(runner, parser_path, workspace.raw_dir());
//! let discovery = converter.discover().await?;
//! converter.convert(&discovery.pending).await;
//! println!("Converted {} files", converter.count());
//! ```

mod error;
mod thermo;

pub use error::ConversionError;
pub use thermo::{discover, Discovery, FormatConverter};
