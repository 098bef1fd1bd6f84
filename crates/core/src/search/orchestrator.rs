//! One batched SearchGUI run over the selected tier fragments.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::error::SearchError;
use super::selection::{refresh_inputs, select_searchable, Selection};
use crate::config::SearchConfig;
use crate::files::{self, QualityTier};
use crate::record::{RunRecord, Stage};
use crate::tools::{
    remove_matching, write_invocation_log, Invocation, Tool, ToolRegistry, ToolRunner,
};
use crate::workspace::ParameterFiles;

/// Main class of the SearchGUI command line interface.
pub const SEARCH_CLI_CLASS: &str = "eu.isas.searchgui.cmd.SearchCLI";

/// Log written into `searched/` for every search that ran.
pub const SEARCH_LOG_FILE: &str = "search_cli.log";

/// Outcome of one search invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Where SearchGUI is told to write its results (`searched/<ref>.zip`).
    pub expected_output: PathBuf,
    /// Fragments passed to the engine, in argument order.
    pub spectrum_files: Vec<PathBuf>,
    /// Exit code, or `None` when the engine could not be started.
    pub exit_code: Option<i32>,
    /// Invocation log, when one was written.
    pub log_path: Option<PathBuf>,
}

impl SearchResult {
    /// Whether the engine exited cleanly and left its archive behind.
    pub async fn usable_output(&self) -> bool {
        self.exit_code == Some(0) && files::is_file(&self.expected_output).await
    }

    /// The result archive, when it is usable.
    pub async fn output_path(&self) -> Option<&Path> {
        self.usable_output()
            .await
            .then_some(self.expected_output.as_path())
    }
}

/// Rebuilds the searchable set from `processed/` and runs SearchGUI once.
pub struct SearchOrchestrator {
    runner: Arc<dyn ToolRunner>,
    java: PathBuf,
    search_gui: PathBuf,
    params: ParameterFiles,
    processed_dir: PathBuf,
    searched_dir: PathBuf,
    engines: Vec<String>,
    tiers: Vec<QualityTier>,
    record: RunRecord,
}

impl SearchOrchestrator {
    pub fn new(
        runner: Arc<dyn ToolRunner>,
        registry: &ToolRegistry,
        params: ParameterFiles,
        processed_dir: impl Into<PathBuf>,
        searched_dir: impl Into<PathBuf>,
        config: &SearchConfig,
    ) -> Self {
        Self {
            runner,
            java: registry.path(Tool::Java).to_path_buf(),
            search_gui: registry.path(Tool::SearchGui).to_path_buf(),
            params,
            processed_dir: processed_dir.into(),
            searched_dir: searched_dir.into(),
            engines: config.engines.iter().map(|e| e.trim().to_string()).collect(),
            tiers: config.tiers.clone(),
            record: RunRecord::new(Stage::Search),
        }
    }

    /// Stems of the `.mgf` files currently in `processed/`.
    pub async fn refresh_inputs(&self) -> Result<Vec<String>, SearchError> {
        refresh_inputs(&self.processed_dir).await
    }

    /// Selects fragments for the configured tiers from a fresh snapshot.
    pub async fn select_searchable(&self, base_names: &[String]) -> Result<Selection, SearchError> {
        select_searchable(base_names, &self.processed_dir, &self.tiers).await
    }

    /// Refreshes, selects and, if anything qualified, searches.
    ///
    /// Returns the selection alongside the search outcome so that the
    /// exclusions can be reported even when nothing was searched.
    pub async fn search(
        &mut self,
        reference_name: &str,
    ) -> (Selection, Result<SearchResult, SearchError>) {
        info!("==========");
        info!("Running database search with SearchGUI CLI.");
        info!("Using {} search engine.", self.engines.join(", "));

        let selection = match self.refresh_inputs().await {
            Ok(base_names) => match self.select_searchable(&base_names).await {
                Ok(selection) => selection,
                Err(e) => return (Selection::default(), Err(e)),
            },
            Err(e) => return (Selection::default(), Err(e)),
        };

        let result = self.run_search(&selection.to_search, reference_name).await;
        (selection, result)
    }

    /// Invokes SearchGUI once with every file in `to_search`.
    ///
    /// Fails only when `to_search` is empty, without invoking anything. A
    /// failing or unlaunchable engine is logged and reflected in the result.
    pub async fn run_search(
        &mut self,
        to_search: &BTreeSet<PathBuf>,
        reference_name: &str,
    ) -> Result<SearchResult, SearchError> {
        if to_search.is_empty() {
            error!("No files to search.");
            return Err(SearchError::NoInputFiles);
        }

        info!("Files to search:");
        for path in to_search {
            info!("{}", display_name(path));
        }

        self.record.start();
        self.record.to_process = to_search.iter().map(|p| display_name(p)).collect();

        let spectrum_files: Vec<PathBuf> = to_search.iter().cloned().collect();
        let expected_output = self.searched_dir.join(format!("{reference_name}.zip"));
        let invocation = self.invocation(&spectrum_files, reference_name);

        let mut result = SearchResult {
            expected_output,
            spectrum_files,
            exit_code: None,
            log_path: None,
        };

        match self.runner.run(&invocation).await {
            Ok(output) => {
                result.exit_code = output.exit_code;
                let log_path = self.searched_dir.join(SEARCH_LOG_FILE);
                match write_invocation_log(&log_path, &invocation, &output).await {
                    Ok(()) => {
                        info!("Log of searches can be found in {}", log_path.display());
                        result.log_path = Some(log_path);
                    }
                    Err(e) => warn!("Could not write {}: {}", log_path.display(), e),
                }

                if output.success() {
                    info!(
                        "Searches completed, results can be found in {}",
                        result.expected_output.display()
                    );
                    self.remove_html_reports().await;
                } else {
                    error!(
                        "Error found during the database searching process: {}",
                        output.status_label()
                    );
                }
            }
            Err(e) => error!("Error found during the database searching process: {}", e),
        }

        if result.usable_output().await {
            self.record.succeeded = self.record.to_process.clone();
        } else {
            if result.exit_code == Some(0) {
                warn!(
                    "SearchGUI exited cleanly but {} is missing",
                    result.expected_output.display()
                );
            }
            self.record.failed = self.record.to_process.clone();
        }
        self.record.finish();
        Ok(result)
    }

    pub fn record(&self) -> &RunRecord {
        &self.record
    }

    fn invocation(&self, spectrum_files: &[PathBuf], reference_name: &str) -> Invocation {
        let mut invocation = Invocation::new(&self.java)
            .arg("-cp")
            .arg(self.search_gui.to_string_lossy())
            .arg(SEARCH_CLI_CLASS)
            .arg("-spectrum_files")
            .arg(join_paths(spectrum_files))
            .arg("-fasta_file")
            .arg(self.params.database.to_string_lossy())
            .arg("-output_folder")
            .arg(self.searched_dir.to_string_lossy())
            .arg("-id_params")
            .arg(self.params.search.to_string_lossy());
        for engine in &self.engines {
            invocation = invocation.arg(format!("-{engine}")).arg("1");
        }
        invocation
            .arg("-output_default_name")
            .arg(reference_name)
            .arg("-output_data")
            .arg("1")
    }

    async fn remove_html_reports(&self) {
        match remove_matching(&self.searched_dir, "SearchGUI", "html").await {
            Ok(removed) if !removed.is_empty() => {
                info!("Removed {} SearchGUI html reports", removed.len())
            }
            Ok(_) => {}
            Err(e) => warn!("Could not clean {}: {}", self.searched_dir.display(), e),
        }
    }
}

/// Comma-joined paths, as the CLI tools expect for `-spectrum_files`.
pub fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
