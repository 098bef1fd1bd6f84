//! Raw to open-format conversion through ThermoRawFileParser.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::error::ConversionError;
use crate::files::{self, split_extension, with_extension, OPEN_FORMAT_EXTENSION, RAW_EXTENSION};
use crate::record::{RunRecord, Stage};
use crate::tools::{Invocation, ToolRunner};

/// Result of scanning the raw directory once.
///
/// Every entry lands in at most one of the two sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    /// Open-format spectra already present (`<x>.mzML`).
    pub already_converted: BTreeSet<String>,
    /// Raw spectra with no open-format sibling (`<x>.raw`).
    pub pending: BTreeSet<String>,
}

/// Scans `raw_dir` and splits its spectra into converted and pending.
///
/// A raw file is pending only when `<x>.mzML` is absent, so running the scan
/// again after a successful conversion yields no pending work.
pub async fn discover(raw_dir: &Path) -> Result<Discovery, ConversionError> {
    let entries = files::snapshot(raw_dir)
        .await
        .map_err(|e| ConversionError::scan(raw_dir, e))?;

    // Extension alone decides: a tier-like stem such as `exp_Q1` is still a spectrum here.
    let mut discovery = Discovery::default();
    let mut raw_files = Vec::new();
    for entry in entries.iter().filter(|e| !e.is_dir) {
        match split_extension(&entry.name) {
            Some((_, OPEN_FORMAT_EXTENSION)) => {
                discovery.already_converted.insert(entry.name.clone());
            }
            Some((_, RAW_EXTENSION)) => raw_files.push(&entry.name),
            _ => {}
        }
    }
    for name in raw_files {
        let converted = with_extension(name, OPEN_FORMAT_EXTENSION);
        if !discovery.already_converted.contains(&converted) {
            discovery.pending.insert(name.clone());
        }
    }

    info!(
        "Found {} converted and {} unconverted spectra in {}",
        discovery.already_converted.len(),
        discovery.pending.len(),
        raw_dir.display()
    );
    Ok(discovery)
}

/// Converts vendor raw spectra to mzML, one file at a time.
pub struct FormatConverter {
    runner: Arc<dyn ToolRunner>,
    tool: PathBuf,
    raw_dir: PathBuf,
    record: RunRecord,
}

impl FormatConverter {
    pub fn new(runner: Arc<dyn ToolRunner>, tool: impl Into<PathBuf>, raw_dir: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            tool: tool.into(),
            raw_dir: raw_dir.into(),
            record: RunRecord::new(Stage::Conversion),
        }
    }

    /// Scans the raw directory this converter works in.
    pub async fn discover(&self) -> Result<Discovery, ConversionError> {
        discover(&self.raw_dir).await
    }

    /// Converts every pending raw file.
    ///
    /// Skipped when there is nothing pending or the parser is not installed.
    /// A failed file is logged and left out of the success list; the batch
    /// always runs to the end.
    pub async fn convert(&mut self, pending: &BTreeSet<String>) -> &RunRecord {
        if pending.is_empty() {
            info!("There are no raw files left to convert");
            return &self.record;
        }
        if !tokio::fs::try_exists(&self.tool).await.unwrap_or(false) {
            warn!(
                "Skipping conversion of {} raw files: {} is not available",
                pending.len(),
                self.tool.display()
            );
            return &self.record;
        }

        info!("==========");
        info!("Converting {} raw files to {}", pending.len(), OPEN_FORMAT_EXTENSION);
        self.record.start();
        self.record.to_process = pending.iter().cloned().collect();

        let total = pending.len();
        for (index, name) in pending.iter().enumerate() {
            let output = with_extension(name, OPEN_FORMAT_EXTENSION);
            info!("({}/{}) Converting {}", index + 1, total, name);

            let invocation = Invocation::new(&self.tool)
                .arg("-i")
                .arg(self.raw_dir.join(name).to_string_lossy())
                .arg("-b")
                .arg(self.raw_dir.join(&output).to_string_lossy());

            match self.runner.run(&invocation).await {
                Ok(result) if result.success() => {
                    info!("{} has been converted to {}", name, output);
                    self.record.succeed(output);
                }
                Ok(result) => {
                    warn!("Conversion of {} failed with {}", name, result.status_label());
                    self.record.fail(name.clone());
                }
                Err(e) => {
                    error!("Conversion of {} could not run: {}", name, e);
                    self.record.fail(name.clone());
                }
            }
        }

        self.record.finish();
        info!(
            "Conversion finished: {} succeeded, {} failed",
            self.record.succeeded.len(),
            self.record.failed.len()
        );
        &self.record
    }

    /// Number of files converted so far.
    pub fn count(&self) -> usize {
        self.record.succeeded.len()
    }

    pub fn record(&self) -> &RunRecord {
        &self.record
    }

    /// Open-format spectra available downstream: those found by `discovery`
    /// followed by this run's successes, without repeats.
    pub fn available(&self, discovery: &Discovery) -> Vec<String> {
        let mut available: Vec<String> = discovery.already_converted.iter().cloned().collect();
        for name in &self.record.succeeded {
            if !discovery.already_converted.contains(name) {
                available.push(name.clone());
            }
        }
        available
    }
}
