//! Removal of DIA-Umpire intermediates nothing downstream reads.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

use crate::files::{self, FileRole};
use crate::record::{RunRecord, Stage};

/// Deletes byproduct files and `_Peak` working directories from one directory.
#[derive(Debug)]
pub struct ArtifactCleaner {
    record: RunRecord,
}

impl Default for ArtifactCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtifactCleaner {
    pub fn new() -> Self {
        Self {
            record: RunRecord::new(Stage::Cleaning),
        }
    }

    /// Single pass over `dir`.
    ///
    /// An entry is removed when its name ends with one of the byproduct
    /// suffixes, or when it is a directory ending in `_Peak` (removed with its
    /// contents). Everything else is left alone. Removal failures are logged
    /// and recorded, never returned.
    pub async fn clean(&mut self, dir: &Path) -> &RunRecord {
        info!("==========");
        info!("Removing intermediate files from {}", dir.display());
        self.record.start();

        let entries = match files::snapshot(dir).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Could not list {}: {}", dir.display(), e);
                self.record.finish();
                return &self.record;
            }
        };

        for entry in entries {
            let role = entry.role();
            if !role.is_disposable() {
                continue;
            }
            let path = dir.join(&entry.name);
            let removed = match (role, entry.is_dir) {
                (FileRole::Byproduct, false) => fs::remove_file(&path).await,
                (FileRole::PeakDirectory, true) => remove_peak_directory(&path).await,
                _ => continue,
            };
            self.record.to_process.push(entry.name.clone());
            match removed {
                Ok(()) => self.record.succeed(entry.name),
                Err(e) => {
                    warn!("Could not remove {}: {}", path.display(), e);
                    self.record.fail(entry.name);
                }
            }
        }

        self.record.finish();
        info!("Removed {} intermediate entries", self.record.succeeded.len());
        &self.record
    }

    pub fn record(&self) -> &RunRecord {
        &self.record
    }
}

/// Empties a peak directory file by file, then removes it.
///
/// A link to a directory is unlinked; its target is left alone.
async fn remove_peak_directory(path: &Path) -> std::io::Result<()> {
    if fs::symlink_metadata(path).await?.file_type().is_symlink() {
        return fs::remove_file(path).await;
    }
    let mut nested: Vec<PathBuf> = Vec::new();
    let mut reader = fs::read_dir(path).await?;
    while let Some(entry) = reader.next_entry().await? {
        if entry.file_type().await?.is_dir() {
            nested.push(entry.path());
        } else {
            fs::remove_file(entry.path()).await?;
        }
    }
    for dir in nested {
        fs::remove_dir_all(&dir).await?;
    }
    fs::remove_dir(path).await
}
