//! Relocation of deconvolution outputs from `raw/` to `processed/`.

use std::path::Path;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::files::{self, strip_extension, MOVABLE_SUFFIXES};
use crate::record::{RunRecord, Stage};

/// Moves the per-sample outputs the search needs into the stage directory.
#[derive(Debug)]
pub struct StageMover {
    record: RunRecord,
}

impl Default for StageMover {
    fn default() -> Self {
        Self::new()
    }
}

impl StageMover {
    pub fn new() -> Self {
        Self {
            record: RunRecord::new(Stage::Moving),
        }
    }

    /// For each processed spectrum `<base>.<ext>` in `names` and each movable
    /// suffix, moves `from/<base><suffix>` to `to/<base><suffix>` when it exists.
    ///
    /// Absent files are skipped silently; files are never copied and left behind.
    pub async fn move_known_artifacts(&mut self, names: &[String], from: &Path, to: &Path) -> &RunRecord {
        info!("==========");
        info!("Moving {} sample outputs to {}", names.len(), to.display());
        self.record.start();

        for name in names {
            let base = strip_extension(name);
            for suffix in MOVABLE_SUFFIXES {
                let file_name = format!("{base}{suffix}");
                let source = from.join(&file_name);
                if !files::is_file(&source).await {
                    continue;
                }
                self.record.to_process.push(file_name.clone());
                match move_file(&source, &to.join(&file_name)).await {
                    Ok(()) => {
                        debug!("Moved {}", file_name);
                        self.record.succeed(file_name);
                    }
                    Err(e) => {
                        warn!("Could not move {}: {}", source.display(), e);
                        self.record.fail(file_name);
                    }
                }
            }
        }

        self.record.finish();
        info!("Moved {} files to {}", self.record.succeeded.len(), to.display());
        &self.record
    }

    pub fn record(&self) -> &RunRecord {
        &self.record
    }
}

/// Renames `source` to `destination`, falling back to copy and delete when
/// the two live on different filesystems.
async fn move_file(source: &Path, destination: &Path) -> std::io::Result<()> {
    match fs::rename(source, destination).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::CrossesDevices || e.raw_os_error() == Some(18) => {
            fs::copy(source, destination).await?;
            fs::remove_file(source).await
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_moves_known_suffixes_only() {
        let dir = TempDir::new().unwrap();
        let raw = dir.path().join("raw");
        let processed = dir.path().join("processed");
        std::fs::create_dir(&raw).unwrap();
        std::fs::create_dir(&processed).unwrap();

        for name in [
            "s1.mzML",
            "s1_Q1.mgf",
            "s1_Q2.mgf",
            "s1_Q3.mzML",
            "s1_PeakCluster.csv",
            "s1_diaumpire.log",
            "s2_Q1.mgf",
        ] {
            std::fs::write(raw.join(name), name).unwrap();
        }

        let mut mover = StageMover::new();
        let record = mover
            .move_known_artifacts(&["s1.mzML".to_string()], &raw, &processed)
            .await;

        assert_eq!(
            record.succeeded,
            vec!["s1_Q1.mgf", "s1_Q2.mgf", "s1_Q3.mzML", "s1_PeakCluster.csv"]
        );
        assert!(record.failed.is_empty());
        assert_eq!(
            std::fs::read_to_string(processed.join("s1_Q1.mgf")).unwrap(),
            "s1_Q1.mgf"
        );
        assert!(!raw.join("s1_Q1.mgf").exists());
        // Untouched: the spectrum itself, logs, and samples not listed.
        assert!(raw.join("s1.mzML").exists());
        assert!(raw.join("s1_diaumpire.log").exists());
        assert!(raw.join("s2_Q1.mgf").exists());
    }

    #[tokio::test]
    async fn test_missing_outputs_are_skipped() {
        let dir = TempDir::new().unwrap();
        let mut mover = StageMover::new();
        let record = mover
            .move_known_artifacts(&["ghost.mzML".to_string()], dir.path(), dir.path())
            .await;
        assert!(record.to_process.is_empty());
        assert!(record.ran());
    }
}
