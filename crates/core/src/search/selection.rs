//! Choosing which tier fragments go to the search engine.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::warn;

use super::error::SearchError;
use crate::files::{self, split_extension, Entry, QualityTier, SEARCH_EXTENSION};

/// Endings that mark an `.mgf` stem as something other than a sample.
pub const DISQUALIFYING_MARKERS: [&str; 3] = ["_PeakCluster", ".cms", ".mzML"];

/// Why a candidate was left out of the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExclusionReason {
    /// The stem ends in a disqualifying marker.
    Disqualified,
    /// The expected tier fragment does not exist.
    Missing,
    /// The expected tier fragment exists but is zero bytes.
    Empty,
}

impl ExclusionReason {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Disqualified => "disqualified",
            Self::Missing => "missing",
            Self::Empty => "empty",
        }
    }
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A file name that will not be searched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Exclusion {
    pub file_name: String,
    pub reason: ExclusionReason,
}

/// Outcome of [`select_from_entries`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Full paths of non-empty tier fragments, sorted.
    pub to_search: BTreeSet<PathBuf>,
    /// Excluded names in discovery order, each listed once.
    pub excluded: Vec<Exclusion>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.to_search.is_empty()
    }

    /// File names of the selected fragments.
    pub fn file_names(&self) -> Vec<String> {
        self.to_search
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .collect()
    }

    fn exclude(&mut self, file_name: String, reason: ExclusionReason) {
        if self.excluded.iter().any(|e| e.file_name == file_name) {
            return;
        }
        match reason {
            ExclusionReason::Disqualified => warn!("{} will not be searched.", file_name),
            ExclusionReason::Missing => warn!(
                "{} will not be searched as the tier file does not exist.",
                file_name
            ),
            ExclusionReason::Empty => warn!(
                "{} will not be searched as the tier file is empty.",
                file_name
            ),
        }
        self.excluded.push(Exclusion { file_name, reason });
    }
}

/// Stems of the `.mgf` files in `processed_dir`, sorted.
pub async fn refresh_inputs(processed_dir: &Path) -> Result<Vec<String>, SearchError> {
    let entries = files::snapshot(processed_dir)
        .await
        .map_err(|e| SearchError::scan(processed_dir, e))?;
    Ok(mgf_stems(&entries))
}

/// Lists `processed_dir` once and selects from that snapshot.
pub async fn select_searchable(
    base_names: &[String],
    processed_dir: &Path,
    tiers: &[QualityTier],
) -> Result<Selection, SearchError> {
    let entries = files::snapshot(processed_dir)
        .await
        .map_err(|e| SearchError::scan(processed_dir, e))?;
    Ok(select_from_entries(base_names, processed_dir, &entries, tiers))
}

/// Selects the searchable tier fragments from a directory snapshot.
///
/// Stems ending in a disqualifying marker are excluded as `<stem>.mgf`. Every
/// other stem has one tier suffix stripped, then for each requested tier the
/// fragment `<normalized><tier suffix>.mgf` is selected when the snapshot
/// shows it as a non-empty file. Pure: the same snapshot and tiers always
/// give the same selection.
pub fn select_from_entries(
    base_names: &[String],
    processed_dir: &Path,
    entries: &[Entry],
    tiers: &[QualityTier],
) -> Selection {
    let sizes: HashMap<&str, u64> = entries
        .iter()
        .filter(|e| !e.is_dir)
        .map(|e| (e.name.as_str(), e.len))
        .collect();

    let mut selection = Selection::default();
    for base in base_names {
        if DISQUALIFYING_MARKERS.iter().any(|m| base.ends_with(m)) {
            selection.exclude(
                format!("{base}.{SEARCH_EXTENSION}"),
                ExclusionReason::Disqualified,
            );
            continue;
        }

        let normalized = QualityTier::strip_from(base);
        for tier in tiers {
            let file_name = format!("{}{}.{}", normalized, tier.suffix(), SEARCH_EXTENSION);
            match sizes.get(file_name.as_str()) {
                Some(len) if *len > 0 => {
                    selection.to_search.insert(processed_dir.join(&file_name));
                }
                Some(_) => selection.exclude(file_name, ExclusionReason::Empty),
                None => selection.exclude(file_name, ExclusionReason::Missing),
            }
        }
    }
    selection
}

fn mgf_stems(entries: &[Entry]) -> Vec<String> {
    entries
        .iter()
        .filter(|e| !e.is_dir)
        .filter_map(|e| match split_extension(&e.name) {
            Some((stem, SEARCH_EXTENSION)) => Some(stem.to_string()),
            _ => None,
        })
        .collect()
}
