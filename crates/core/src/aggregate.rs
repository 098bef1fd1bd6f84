//! PeptideShaker import of the search results into one project database.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::files;
use crate::record::{RunRecord, Stage};
use crate::search::{join_paths, SearchResult};
use crate::tools::{
    remove_matching, write_invocation_log, Invocation, Tool, ToolRegistry, ToolRunner,
};
use crate::workspace::ParameterFiles;

pub const PEPTIDE_SHAKER_CLI_CLASS: &str = "eu.isas.peptideshaker.cmd.PeptideShakerCLI";

pub const SHAKER_LOG_FILE: &str = "shaker_cli.log";

/// Outcome of one PeptideShaker invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationResult {
    /// `searched/<ref>.psdb`.
    pub expected_output: PathBuf,
    pub exit_code: Option<i32>,
    pub log_path: Option<PathBuf>,
}

impl AggregationResult {
    pub async fn output_path(&self) -> Option<&Path> {
        (self.exit_code == Some(0) && files::is_file(&self.expected_output).await)
            .then_some(self.expected_output.as_path())
    }
}

/// Builds `searched/<ref>.psdb` from a search archive.
pub struct ResultAggregator {
    runner: Arc<dyn ToolRunner>,
    java: PathBuf,
    peptide_shaker: PathBuf,
    params: ParameterFiles,
    searched_dir: PathBuf,
    record: RunRecord,
}

impl ResultAggregator {
    pub fn new(
        runner: Arc<dyn ToolRunner>,
        registry: &ToolRegistry,
        params: ParameterFiles,
        searched_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runner,
            java: registry.path(Tool::Java).to_path_buf(),
            peptide_shaker: registry.path(Tool::PeptideShaker).to_path_buf(),
            params,
            searched_dir: searched_dir.into(),
            record: RunRecord::new(Stage::Aggregation),
        }
    }

    /// Imports `search` into a PeptideShaker project.
    ///
    /// Returns `None` without invoking anything when the search left no
    /// usable archive. Tool failures are logged; the absence of
    /// [`AggregationResult::output_path`] is the failure signal.
    pub async fn aggregate(
        &mut self,
        search: &SearchResult,
        reference_name: &str,
    ) -> Option<AggregationResult> {
        info!("==========");
        info!("Preparing the PeptideShaker file.");

        let Some(identification) = search.output_path().await else {
            warn!("Skipping PeptideShaker: the search produced no results archive");
            return None;
        };

        self.record.start();
        let expected_output = self.searched_dir.join(format!("{reference_name}.psdb"));
        let output_name = format!("{reference_name}.psdb");
        self.record.to_process.push(output_name.clone());

        let invocation = Invocation::new(&self.java)
            .arg("-cp")
            .arg(self.peptide_shaker.to_string_lossy())
            .arg(PEPTIDE_SHAKER_CLI_CLASS)
            .arg("-reference")
            .arg(reference_name)
            .arg("-identification_files")
            .arg(identification.to_string_lossy())
            .arg("-spectrum_files")
            .arg(join_paths(&search.spectrum_files))
            .arg("-fasta_file")
            .arg(self.params.database.to_string_lossy())
            .arg("-id_params")
            .arg(self.params.search.to_string_lossy())
            .arg("-out")
            .arg(expected_output.to_string_lossy());

        let mut result = AggregationResult {
            expected_output,
            exit_code: None,
            log_path: None,
        };

        match self.runner.run(&invocation).await {
            Ok(output) => {
                result.exit_code = output.exit_code;
                let log_path = self.searched_dir.join(SHAKER_LOG_FILE);
                match write_invocation_log(&log_path, &invocation, &output).await {
                    Ok(()) => {
                        info!("Log can be found in {}", log_path.display());
                        result.log_path = Some(log_path);
                    }
                    Err(e) => warn!("Could not write {}: {}", log_path.display(), e),
                }

                if output.success() {
                    info!(
                        "Import complete, results can be found in {}",
                        result.expected_output.display()
                    );
                    match remove_matching(&self.searched_dir, "PeptideShaker", "html").await {
                        Ok(_) => {}
                        Err(e) => warn!("Could not clean {}: {}", self.searched_dir.display(), e),
                    }
                } else {
                    error!(
                        "Error found during the PeptideShaker process: {}",
                        output.status_label()
                    );
                }
            }
            Err(e) => error!("Error found during the PeptideShaker process: {}", e),
        }

        if result.output_path().await.is_some() {
            self.record.succeed(output_name);
        } else {
            self.record.fail(output_name);
        }
        self.record.finish();
        Some(result)
    }

    pub fn record(&self) -> &RunRecord {
        &self.record
    }
}
