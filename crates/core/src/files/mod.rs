//! File naming conventions and directory snapshots.
//!
//! The pipeline keeps no state outside the filesystem: which stage a sample
//! has reached is encoded in the names of the files it left behind.
//! [`FileRole::classify`] is the parser for that naming grammar.

mod role;
mod tier;

pub use role::{
    split_extension, strip_extension, with_extension, FileRole, FragmentFormat,
    BYPRODUCT_SUFFIXES, MOVABLE_SUFFIXES, OPEN_FORMAT_EXTENSION, PEAK_CLUSTER_SUFFIX,
    PEAK_DIRECTORY_MARKER, RAW_EXTENSION, SEARCH_EXTENSION,
};
pub use tier::QualityTier;

use std::path::Path;
use tokio::fs;

/// Whether `path` is a regular file, following links.
pub async fn is_file(path: &Path) -> bool {
    fs::metadata(path).await.map(|m| m.is_file()).unwrap_or(false)
}

/// A directory entry captured by [`snapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub is_dir: bool,
    pub len: u64,
}

impl Entry {
    pub fn role(&self) -> FileRole {
        FileRole::classify(&self.name)
    }
}

/// Lists `dir` once, sorted by name.
///
/// The result is a point-in-time view; later changes to the directory are not
/// reflected. Symlinks are followed, so sizes describe the target. Entries
/// whose names are not valid UTF-8, or whose metadata cannot be read (broken
/// links included), are logged and skipped.
pub async fn snapshot(dir: &Path) -> std::io::Result<Vec<Entry>> {
    let mut entries = Vec::new();
    let mut reader = fs::read_dir(dir).await?;
    while let Some(entry) = reader.next_entry().await? {
        let Ok(name) = entry.file_name().into_string() else {
            tracing::warn!("Skipping non UTF-8 entry in {}", dir.display());
            continue;
        };
        let meta = match fs::metadata(entry.path()).await {
            Ok(meta) => meta,
            Err(e) => {
                tracing::warn!("Skipping {}: {}", entry.path().display(), e);
                continue;
            }
        };
        entries.push(Entry {
            name,
            is_dir: meta.is_dir(),
            len: meta.len(),
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_snapshot_sorted_with_sizes() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.mgf"), b"1234").unwrap();
        std::fs::write(dir.path().join("a.raw"), b"").unwrap();
        std::fs::create_dir(dir.path().join("c_Peak")).unwrap();

        let entries = snapshot(dir.path()).await.unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.raw", "b.mgf", "c_Peak"]);
        assert_eq!(entries[1].len, 4);
        assert!(entries[2].is_dir);
        assert_eq!(entries[2].role(), FileRole::PeakDirectory);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_snapshot_follows_symlinks() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("target.bin");
        std::fs::write(&target, b"").unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("s_Q1.mgf")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("t_Q1.mgf"))
            .unwrap();

        let entries = snapshot(dir.path()).await.unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        // the dangling link is left out
        assert_eq!(names, vec!["s_Q1.mgf", "target.bin"]);
        assert_eq!(entries[0].len, 0);
        assert!(!entries[0].is_dir);
    }

    #[tokio::test]
    async fn test_snapshot_missing_dir() {
        let dir = TempDir::new().unwrap();
        assert!(snapshot(&dir.path().join("nope")).await.is_err());
    }
}
