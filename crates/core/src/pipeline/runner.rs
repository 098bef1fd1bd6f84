//! Linear execution of every stage over one workspace.

use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

use super::error::PipelineError;
use crate::aggregate::ResultAggregator;
use crate::cleaner::ArtifactCleaner;
use crate::config::{validate_config, Config};
use crate::converter::FormatConverter;
use crate::deconvolution::DeconvolutionRunner;
use crate::mover::StageMover;
use crate::reports::ReportExporter;
use crate::search::{SearchError, SearchOrchestrator};
use crate::summary::RunSummary;
use crate::tools::{Tool, ToolRegistry, ToolRunner};
use crate::workspace::{
    resolve_reference_name, verify_executables, verify_parameters, ParameterFiles, Workspace,
};

/// Workspace that passed every startup check, ready for [`Pipeline::run_with`].
#[derive(Debug)]
pub struct Preflight {
    workspace: Workspace,
    registry: ToolRegistry,
    params: ParameterFiles,
}

impl Preflight {
    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }
}

/// Runs the whole workflow, one stage after the other.
///
/// Every external program goes through the injected [`ToolRunner`], so the
/// pipeline can be driven end to end with a mock.
pub struct Pipeline {
    config: Config,
    runner: Arc<dyn ToolRunner>,
}

impl Pipeline {
    pub fn new(config: Config, runner: Arc<dyn ToolRunner>) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Checks every precondition of a run without touching the workspace.
    ///
    /// Fails when the configuration is invalid, `raw/` is missing, or an
    /// executable or parameter file is absent.
    pub fn preflight(&self) -> Result<Preflight, PipelineError> {
        validate_config(&self.config)?;
        let workspace = Workspace::open(&self.config.workspace.root)?;
        let root = workspace.root().to_path_buf();
        let registry = ToolRegistry::resolve(&self.config.tools, &root);
        verify_executables(&registry)?;
        let params = ParameterFiles::resolve(&self.config.parameters, &root);
        verify_parameters(&params)?;
        Ok(Preflight {
            workspace,
            registry,
            params,
        })
    }

    /// Checks the preconditions, then runs every stage to completion.
    pub async fn run(&self, reference_name: Option<&str>) -> Result<RunSummary, PipelineError> {
        let preflight = self.preflight()?;
        self.run_with(preflight, reference_name).await
    }

    /// Runs every stage over a workspace that passed [`Pipeline::preflight`].
    ///
    /// `reference_name` overrides the configured one; when neither is set the
    /// workspace directory name is used. Nothing in the workspace is created
    /// before the name is accepted.
    pub async fn run_with(
        &self,
        preflight: Preflight,
        reference_name: Option<&str>,
    ) -> Result<RunSummary, PipelineError> {
        let started_at = Utc::now();
        let Preflight {
            workspace,
            registry,
            params,
        } = preflight;
        let root = workspace.root().to_path_buf();

        let reference = resolve_reference_name(
            reference_name.or(self.config.reference_name.as_deref()),
            &root,
        );
        if reference.contains(['/', '\\']) {
            error!("The reference name cannot contain a path separator: {}", reference);
            return Err(PipelineError::InvalidReferenceName { name: reference });
        }
        info!("Reference name: {}", reference);

        workspace.ensure_stage_dirs().await?;
        let raw_dir = workspace.raw_dir();
        let mut summary = RunSummary::new(&reference, started_at);

        // Conversion
        let mut converter = FormatConverter::new(
            self.runner.clone(),
            registry.path(Tool::ThermoRawFileParser),
            &raw_dir,
        );
        let discovery = converter.discover().await?;
        converter.convert(&discovery.pending).await;
        let spectra = converter.available(&discovery);
        if spectra.is_empty() {
            error!(
                "No .mzML files found in {}. Please check the raw data.",
                raw_dir.display()
            );
            return Err(PipelineError::NoSpectra { raw_dir });
        }

        // Deconvolution
        let mut deconvolution = DeconvolutionRunner::new(
            self.runner.clone(),
            &registry,
            &params.deconvolution,
            &raw_dir,
            &self.config.deconvolution,
        );
        let outcome = deconvolution.process(&spectra).await;

        let mut cleaner = ArtifactCleaner::new();
        cleaner.clean(&raw_dir).await;

        let mut mover = StageMover::new();
        mover
            .move_known_artifacts(&outcome.processed, &raw_dir, &workspace.processed_dir())
            .await;

        // Search
        let mut search = SearchOrchestrator::new(
            self.runner.clone(),
            &registry,
            params.clone(),
            workspace.processed_dir(),
            workspace.searched_dir(),
            &self.config.search,
        );
        let (selection, search_result) = search.search(&reference).await;
        summary.excluded = selection.excluded;
        let search_result = match search_result {
            Ok(result) => Some(result),
            Err(SearchError::NoInputFiles) => None,
            Err(e) => {
                error!("Error found during the database searching process: {}", e);
                None
            }
        };

        // Aggregation
        let mut aggregator = ResultAggregator::new(
            self.runner.clone(),
            &registry,
            params.clone(),
            workspace.searched_dir(),
        );
        let aggregation = match &search_result {
            Some(result) => aggregator.aggregate(result, &reference).await,
            None => {
                info!("Skipping PeptideShaker: nothing was searched");
                None
            }
        };
        if let Some(result) = &search_result {
            summary.search_output = result.output_path().await.map(Path::to_path_buf);
        }
        if let Some(aggregation) = &aggregation {
            summary.project = aggregation.output_path().await.map(Path::to_path_buf);
        }

        // Reports
        let mut exporter = ReportExporter::new(
            self.runner.clone(),
            &registry,
            workspace.reports_dir(),
            &self.config.reports,
        );
        match &summary.project {
            Some(project) => {
                if let Some(report) = exporter.export(project).await {
                    summary.spreadsheets = report
                        .spreadsheets
                        .map(|s| s.converted)
                        .unwrap_or_default();
                }
            }
            None => info!("Skipping report export: no PeptideShaker project was built"),
        }

        summary.records = vec![
            converter.record().clone(),
            deconvolution.record().clone(),
            cleaner.record().clone(),
            mover.record().clone(),
            search.record().clone(),
            aggregator.record().clone(),
            exporter.record().clone(),
        ];
        summary.processed = outcome.processed;
        summary.finished_at = Utc::now();
        summary.log();
        Ok(summary)
    }
}
