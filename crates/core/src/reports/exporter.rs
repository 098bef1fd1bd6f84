//! ReportCLI export of the PeptideShaker project.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::kind::{codes_argument, ReportKind};
use super::spreadsheet::{convert_directory, SpreadsheetConversion};
use crate::config::ReportsConfig;
use crate::record::{RunRecord, Stage};
use crate::tools::{write_invocation_log, Invocation, Tool, ToolRegistry, ToolRunner};
use crate::workspace::ensure_dir;

pub const REPORT_CLI_CLASS: &str = "eu.isas.peptideshaker.cmd.ReportCLI";

pub const REPORTS_LOG_FILE: &str = "reports_cli.log";

/// What the export stage produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportOutcome {
    /// Exit code of ReportCLI, `None` if it could not be started.
    pub exit_code: Option<i32>,
    pub log_path: Option<PathBuf>,
    /// Spreadsheet conversion, when enabled and the directory could be read.
    pub spreadsheets: Option<SpreadsheetConversion>,
}

impl ReportOutcome {
    pub fn exported(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Exports the configured reports and converts them to spreadsheets.
pub struct ReportExporter {
    runner: Arc<dyn ToolRunner>,
    java: PathBuf,
    peptide_shaker: PathBuf,
    reports_dir: PathBuf,
    kinds: Vec<ReportKind>,
    convert_to_spreadsheet: bool,
    record: RunRecord,
}

impl ReportExporter {
    pub fn new(
        runner: Arc<dyn ToolRunner>,
        registry: &ToolRegistry,
        reports_dir: impl Into<PathBuf>,
        config: &ReportsConfig,
    ) -> Self {
        Self {
            runner,
            java: registry.path(Tool::Java).to_path_buf(),
            peptide_shaker: registry.path(Tool::PeptideShaker).to_path_buf(),
            reports_dir: reports_dir.into(),
            kinds: config.kinds.clone(),
            convert_to_spreadsheet: config.convert_to_spreadsheet,
            record: RunRecord::new(Stage::Reports),
        }
    }

    /// Runs ReportCLI against `project` (`searched/<ref>.psdb`), then converts
    /// every `.txt` in `reports/` to `.xlsx`.
    ///
    /// Returns `None` when `reports/` cannot be created. Tool failures are
    /// logged; reports already present are still converted.
    pub async fn export(&mut self, project: &Path) -> Option<ReportOutcome> {
        info!("==========");
        info!("Exporting requested PeptideShaker reports.");

        if let Err(e) = ensure_dir(&self.reports_dir).await {
            error!("The reports directory could not be set up: {}", e);
            return None;
        }

        self.record.start();
        let titles: Vec<&str> = self.kinds.iter().map(|k| k.title()).collect();
        info!("Requested reports: {}", titles.join(", "));

        let invocation = Invocation::new(&self.java)
            .arg("-cp")
            .arg(self.peptide_shaker.to_string_lossy())
            .arg(REPORT_CLI_CLASS)
            .arg("-in")
            .arg(project.to_string_lossy())
            .arg("-out_reports")
            .arg(self.reports_dir.to_string_lossy())
            .arg("-reports")
            .arg(codes_argument(&self.kinds));

        let mut outcome = ReportOutcome::default();
        match self.runner.run(&invocation).await {
            Ok(output) => {
                outcome.exit_code = output.exit_code;
                if output.success() {
                    info!(
                        "PeptideShaker reports have been successfully exported to {}",
                        self.reports_dir.display()
                    );
                } else {
                    error!(
                        "Error found during the PeptideShaker Report Export process: {}",
                        output.status_label()
                    );
                }
                let log_path = self.reports_dir.join(REPORTS_LOG_FILE);
                match write_invocation_log(&log_path, &invocation, &output).await {
                    Ok(()) => {
                        info!("Log of the exported reports can be found in {}", log_path.display());
                        outcome.log_path = Some(log_path);
                    }
                    Err(e) => warn!("Could not write {}: {}", log_path.display(), e),
                }
            }
            Err(e) => error!("Error found during the PeptideShaker Report Export process: {}", e),
        }

        if self.convert_to_spreadsheet {
            match convert_directory(&self.reports_dir).await {
                Ok(conversion) => {
                    self.record.to_process = conversion.reports.clone();
                    self.record.succeeded = conversion.converted.clone();
                    self.record.failed = conversion.failed.clone();
                    outcome.spreadsheets = Some(conversion);
                }
                Err(e) => error!("Could not convert reports: {}", e),
            }
        }

        self.record.finish();
        Some(outcome)
    }

    pub fn record(&self) -> &RunRecord {
        &self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MockResponse, MockToolRunner};
    use tempfile::TempDir;

    fn exporter(root: &Path, mock: &MockToolRunner, convert: bool) -> ReportExporter {
        let config = ReportsConfig {
            convert_to_spreadsheet: convert,
            ..ReportsConfig::default()
        };
        ReportExporter::new(
            Arc::new(mock.clone()),
            &fixtures::registry_with_fake_tools(root),
            root.join("reports"),
            &config,
        )
    }

    #[tokio::test]
    async fn test_export_and_convert() {
        let dir = TempDir::new().unwrap();
        let reports = dir.path().join("reports");
        let psm = reports.join("run1_Default_PSM_Report.txt");
        let protein = reports.join("run1_Default_Protein_Report.txt");

        let mock = MockToolRunner::new();
        mock.set_handler(move |_| {
            MockResponse::success()
                .creating(psm.clone(), "Sequence\tScore\nMK\t1.5\n")
                .creating(protein.clone(), "Accession\nP1\n")
        })
        .await;

        let mut exporter = exporter(dir.path(), &mock, true);
        let project = dir.path().join("searched/run1.psdb");
        let outcome = exporter.export(&project).await.unwrap();

        assert!(outcome.exported());
        assert!(reports.join(REPORTS_LOG_FILE).is_file());
        let spreadsheets = outcome.spreadsheets.unwrap();
        assert_eq!(
            spreadsheets.converted,
            vec![
                "run1_Default_PSM_Report.xlsx",
                "run1_Default_Protein_Report.xlsx"
            ]
        );
        assert!(reports.join("run1_Default_PSM_Report.xlsx").is_file());
        assert_eq!(exporter.record().succeeded.len(), 2);

        let args = &mock.invocations().await[0].args;
        assert_eq!(args[2], REPORT_CLI_CLASS);
        assert_eq!(args.last().unwrap(), "3, 9");
        assert!(args
            .windows(2)
            .any(|w| w[0] == "-in" && w[1] == project.to_string_lossy()));
    }

    #[tokio::test]
    async fn test_failed_export_still_converts_existing_reports() {
        let dir = TempDir::new().unwrap();
        let reports = dir.path().join("reports");
        std::fs::create_dir(&reports).unwrap();
        std::fs::write(reports.join("old.txt"), "A\n1\n").unwrap();

        let mock = MockToolRunner::new();
        mock.set_handler(|_| MockResponse::launch_failure()).await;

        let mut exporter = exporter(dir.path(), &mock, true);
        let outcome = exporter
            .export(&dir.path().join("searched/run1.psdb"))
            .await
            .unwrap();
        assert!(!outcome.exported());
        assert!(outcome.log_path.is_none());
        assert_eq!(outcome.spreadsheets.unwrap().converted, vec!["old.xlsx"]);
    }

    #[tokio::test]
    async fn test_conversion_can_be_disabled() {
        let dir = TempDir::new().unwrap();
        let mock = MockToolRunner::new();
        let mut exporter = exporter(dir.path(), &mock, false);
        let outcome = exporter
            .export(&dir.path().join("searched/run1.psdb"))
            .await
            .unwrap();
        assert!(outcome.spreadsheets.is_none());
        assert!(dir.path().join("reports").is_dir());
    }
}
