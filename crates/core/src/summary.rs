//! End of run summary.

use chrono::{DateTime, Duration, Local, Utc};
use std::path::PathBuf;
use tracing::info;

use crate::record::{RunRecord, Stage};
use crate::search::Exclusion;

/// Everything the pipeline reports once all stages have run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub reference_name: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// One record per stage, in pipeline order.
    pub records: Vec<RunRecord>,
    /// Open-format spectra that made it through deconvolution.
    pub processed: Vec<String>,
    /// Search candidates left out, with their reasons.
    pub excluded: Vec<Exclusion>,
    /// `searched/<ref>.zip`, when the search succeeded.
    pub search_output: Option<PathBuf>,
    /// `searched/<ref>.psdb`, when aggregation succeeded.
    pub project: Option<PathBuf>,
    /// Spreadsheets written into `reports/`.
    pub spreadsheets: Vec<String>,
}

impl RunSummary {
    pub fn new(reference_name: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            reference_name: reference_name.into(),
            started_at,
            finished_at: started_at,
            records: Vec::new(),
            processed: Vec::new(),
            excluded: Vec::new(),
            search_output: None,
            project: None,
            spreadsheets: Vec::new(),
        }
    }

    pub fn record(&self, stage: Stage) -> Option<&RunRecord> {
        self.records.iter().find(|r| r.stage == stage)
    }

    /// Wall-clock time from pipeline start to finish.
    pub fn total_elapsed(&self) -> Duration {
        self.finished_at - self.started_at
    }

    /// Every file that failed in any stage, prefixed by the stage.
    pub fn failures(&self) -> Vec<(Stage, &str)> {
        self.records
            .iter()
            .flat_map(|r| r.failed.iter().map(move |f| (r.stage, f.as_str())))
            .collect()
    }

    /// Whether every stage finished without failures and produced a project.
    pub fn is_clean(&self) -> bool {
        self.failures().is_empty() && self.project.is_some()
    }

    /// Writes the summary to the log.
    pub fn log(&self) {
        info!("============================");
        info!(" Summary");
        info!("============================");

        info!("Successfully processed:");
        if self.processed.is_empty() {
            info!("No files processed successfully.");
        } else {
            for name in &self.processed {
                info!("         {}", name);
            }
        }

        let failures = self.failures();
        if !failures.is_empty() {
            info!("Failed to process:");
            for (stage, name) in failures {
                info!("         {} ({})", name, stage);
            }
            info!("==========");
        }

        if !self.excluded.is_empty() {
            info!("Not searched:");
            for exclusion in &self.excluded {
                info!("         {} ({})", exclusion.file_name, exclusion.reason);
            }
        }

        for record in &self.records {
            let Some(elapsed) = record.elapsed() else {
                info!("{} did not run", stage_title(record.stage));
                continue;
            };
            info!(
                "{} handled {} files in {} mins:seconds",
                stage_title(record.stage),
                record.to_process.len(),
                format_minutes(elapsed)
            );
        }

        if let Some(output) = &self.search_output {
            info!("Search results: {}", output.display());
        }
        if let Some(project) = &self.project {
            info!("PeptideShaker project: {}", project.display());
        }

        info!(
            "Total time taken for the whole process = {} hours:mins:seconds",
            format_hours(self.total_elapsed())
        );
        info!(
            "Date & Time of when the process finished: {}",
            self.finished_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
        );
    }
}

fn stage_title(stage: Stage) -> &'static str {
    match stage {
        Stage::Conversion => "Thermo RAW File Parser",
        Stage::Deconvolution => "DIA-Umpire",
        Stage::Cleaning => "Artifact cleaning",
        Stage::Moving => "Moving to processed",
        Stage::Search => "SearchGUI",
        Stage::Aggregation => "PeptideShaker",
        Stage::Reports => "Report export",
    }
}

/// `MM:SS`. Minutes do not wrap at the hour.
pub fn format_minutes(elapsed: Duration) -> String {
    let seconds = elapsed.num_seconds().max(0);
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// `HH:MM:SS`. Hours do not wrap at the day.
pub fn format_hours(elapsed: Duration) -> String {
    let seconds = elapsed.num_seconds().max(0);
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::ExclusionReason;

    #[test]
    fn test_time_formats() {
        assert_eq!(format_minutes(Duration::seconds(0)), "00:00");
        assert_eq!(format_minutes(Duration::seconds(754)), "12:34");
        assert_eq!(format_minutes(Duration::seconds(3723)), "62:03");
        assert_eq!(format_minutes(Duration::milliseconds(-5)), "00:00");
        assert_eq!(format_hours(Duration::seconds(3723)), "01:02:03");
        assert_eq!(format_hours(Duration::seconds(90_061)), "25:01:01");
    }

    #[test]
    fn test_failures_across_stages() {
        let start = Utc::now();
        let mut summary = RunSummary::new("run1", start);
        let mut conversion = RunRecord::new(Stage::Conversion);
        conversion.fail("a.raw");
        let mut deconvolution = RunRecord::new(Stage::Deconvolution);
        deconvolution.fail("b.mzML");
        summary.records = vec![conversion, deconvolution];
        summary.excluded.push(Exclusion {
            file_name: "b_Q1.mgf".to_string(),
            reason: ExclusionReason::Missing,
        });
        summary.finished_at = start + Duration::seconds(61);

        assert_eq!(
            summary.failures(),
            vec![(Stage::Conversion, "a.raw"), (Stage::Deconvolution, "b.mzML")]
        );
        assert!(!summary.is_clean());
        assert_eq!(format_hours(summary.total_elapsed()), "00:01:01");
        assert!(summary.record(Stage::Deconvolution).is_some());
        assert!(summary.record(Stage::Search).is_none());
        summary.log();
    }
}
