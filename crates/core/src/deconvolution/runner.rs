//! DIA-Umpire signal extraction, one spectrum at a time.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, error, info, warn};

use crate::config::DeconvolutionConfig;
use crate::files::{self, strip_extension};
use crate::record::{RunRecord, Stage};
use crate::tools::{Invocation, Tool, ToolRegistry, ToolRunner};

/// Suffix of the per-sample copy of DIA-Umpire's log.
pub const SAMPLE_LOG_SUFFIX: &str = "_diaumpire.log";

/// What a deconvolution batch left for the next stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeconvolutionOutcome {
    /// Input files that did not fail, in first-seen order.
    pub processed: Vec<String>,
    /// Input files whose invocation failed or could not start.
    pub failed: Vec<String>,
}

/// Runs DIA-Umpire SE over converted spectra.
///
/// DIA-Umpire always writes its log to the same path next to its input, so
/// files are processed strictly one after another and the log is renamed to
/// `<x>_diaumpire.log` before the next file starts.
pub struct DeconvolutionRunner {
    runner: Arc<dyn ToolRunner>,
    java: PathBuf,
    jar: PathBuf,
    params: PathBuf,
    raw_dir: PathBuf,
    max_memory: String,
    log_file_name: String,
    record: RunRecord,
}

impl DeconvolutionRunner {
    pub fn new(
        runner: Arc<dyn ToolRunner>,
        registry: &ToolRegistry,
        params: impl Into<PathBuf>,
        raw_dir: impl Into<PathBuf>,
        config: &DeconvolutionConfig,
    ) -> Self {
        Self {
            runner,
            java: registry.path(Tool::Java).to_path_buf(),
            jar: registry.path(Tool::DiaUmpireSe).to_path_buf(),
            params: params.into(),
            raw_dir: raw_dir.into(),
            max_memory: config.max_memory.trim().to_string(),
            log_file_name: config.log_file_name.clone(),
            record: RunRecord::new(Stage::Deconvolution),
        }
    }

    /// Deconvolves every file in `files`, each at most once.
    ///
    /// A failing file never stops the batch. The returned `processed` list is
    /// the de-duplicated input minus everything that failed.
    pub async fn process(&mut self, files: &[String]) -> DeconvolutionOutcome {
        let inputs = dedupe(files);
        if inputs.len() < files.len() {
            debug!(
                "Ignoring {} duplicate deconvolution inputs",
                files.len() - inputs.len()
            );
        }

        info!("==========");
        info!("Running DIA-Umpire on {} files", inputs.len());
        self.record.start();
        self.record.to_process = inputs.clone();

        let total = inputs.len();
        for (index, name) in inputs.iter().enumerate() {
            info!("({}/{}) Deconvolving {}", index + 1, total, name);
            let invocation = self.invocation(name);

            match self.runner.run(&invocation).await {
                Ok(output) if output.success() => {
                    info!(
                        "{} was processed in {:.1} seconds",
                        name,
                        output.duration_ms as f64 / 1000.0
                    );
                    self.record.succeed(name.clone());
                }
                Ok(output) => {
                    warn!(
                        "DIA-Umpire failed on {} with {}",
                        name,
                        output.status_label()
                    );
                    self.record.fail(name.clone());
                }
                Err(e) => {
                    error!("DIA-Umpire could not run on {}: {}", name, e);
                    self.record.fail(name.clone());
                }
            }

            self.preserve_log(name).await;
        }

        self.record.finish();

        let failed: HashSet<&String> = self.record.failed.iter().collect();
        let processed: Vec<String> = inputs
            .iter()
            .filter(|name| !failed.contains(name))
            .cloned()
            .collect();

        info!(
            "Deconvolution finished: {} processed, {} failed",
            processed.len(),
            self.record.failed.len()
        );
        if !self.record.failed.is_empty() {
            warn!("Files that failed deconvolution: {}", self.record.failed.join(", "));
        }

        DeconvolutionOutcome {
            processed,
            failed: self.record.failed.clone(),
        }
    }

    pub fn record(&self) -> &RunRecord {
        &self.record
    }

    fn invocation(&self, name: &str) -> Invocation {
        Invocation::new(&self.java)
            .arg("-jar")
            .arg(format!("-Xmx{}", self.max_memory))
            .arg(self.jar.to_string_lossy())
            .arg(self.raw_dir.join(name).to_string_lossy())
            .arg(self.params.to_string_lossy())
            .current_dir(&self.raw_dir)
    }

    /// Renames the shared log to the sample's log name, if the tool wrote one.
    async fn preserve_log(&self, name: &str) {
        let shared = self.raw_dir.join(&self.log_file_name);
        if !files::is_file(&shared).await {
            debug!("No DIA-Umpire log found after processing {}", name);
            return;
        }
        let target = sample_log_path(&self.raw_dir, name);
        if let Err(e) = fs::rename(&shared, &target).await {
            warn!(
                "Could not rename {} to {}: {}",
                shared.display(),
                target.display(),
                e
            );
        }
    }
}

/// Per-sample log path for input `name`.
pub fn sample_log_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}{}", strip_extension(name), SAMPLE_LOG_SUFFIX))
}

/// Removes repeated names, keeping the first occurrence of each.
pub fn dedupe(files: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    files
        .iter()
        .filter(|name| seen.insert(name.as_str()))
        .cloned()
        .collect()
}
