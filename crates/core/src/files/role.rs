//! Filename grammar of the pipeline.
//!
//! Every artifact in the workspace is identified by its name alone. This module
//! is the single place that turns a name into a role; stages match on
//! [`FileRole`] instead of testing suffixes ad hoc.

use super::tier::QualityTier;

/// Extension of vendor (Thermo) raw spectra.
pub const RAW_EXTENSION: &str = "raw";

/// Extension of open-format spectra.
pub const OPEN_FORMAT_EXTENSION: &str = "mzML";

/// Extension of the peak lists handed to the search engine.
pub const SEARCH_EXTENSION: &str = "mgf";

/// Directory marker for DIA-Umpire peak working directories.
pub const PEAK_DIRECTORY_MARKER: &str = "_Peak";

/// Suffix of the peak cluster table DIA-Umpire leaves per sample.
pub const PEAK_CLUSTER_SUFFIX: &str = "_PeakCluster.csv";

/// Intermediate files DIA-Umpire leaves behind that nothing downstream reads.
pub const BYPRODUCT_SUFFIXES: [&str; 10] = [
    ".DIAWindowsFS",
    ".RTidxFS",
    ".ScanClusterMapping_Q1",
    ".ScanClusterMapping_Q2",
    ".ScanClusterMapping_Q3",
    ".ScanidxFS",
    ".ScanPosFS",
    ".ScanRTFS",
    "_diasetting.ser",
    "_params.ser",
];

/// Per-sample outputs relocated from `raw/` to `processed/` after deconvolution.
pub const MOVABLE_SUFFIXES: [&str; 7] = [
    "_Q1.mgf",
    "_Q2.mgf",
    "_Q3.mgf",
    "_Q1.mzML",
    "_Q2.mzML",
    "_Q3.mzML",
    PEAK_CLUSTER_SUFFIX,
];

/// Container format of a tier fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentFormat {
    Mgf,
    MzMl,
}

impl FragmentFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mgf => SEARCH_EXTENSION,
            Self::MzMl => OPEN_FORMAT_EXTENSION,
        }
    }
}

/// Role of a workspace entry, derived from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileRole {
    /// Vendor raw spectrum awaiting conversion (`<x>.raw`).
    RawSpectrum,
    /// Converted spectrum, input of deconvolution (`<x>.mzML`).
    OpenFormatSpectrum,
    /// Per-tier deconvolution output (`<x>_Q1.mgf`, `<x>_Q1Q2_combined.mgf`, ...).
    TierFragment {
        tier: QualityTier,
        format: FragmentFormat,
    },
    /// Peak cluster table (`<x>_PeakCluster.csv`).
    PeakCluster,
    /// Disposable deconvolution intermediate.
    Byproduct,
    /// Disposable peak working directory (`<x>_Peak`).
    PeakDirectory,
    /// Tool or pipeline log.
    LogArtifact,
    /// Tab-delimited report exported by PeptideShaker.
    TabularReport,
    Unrecognized,
}

impl FileRole {
    /// Classifies an entry by name. Exactly one role is returned for any name.
    pub fn classify(name: &str) -> FileRole {
        if BYPRODUCT_SUFFIXES.iter().any(|s| name.ends_with(s)) {
            return FileRole::Byproduct;
        }
        if name.ends_with(PEAK_DIRECTORY_MARKER) {
            return FileRole::PeakDirectory;
        }
        if name.ends_with(PEAK_CLUSTER_SUFFIX) {
            return FileRole::PeakCluster;
        }

        let Some((stem, extension)) = split_extension(name) else {
            return FileRole::Unrecognized;
        };

        let format = match extension {
            SEARCH_EXTENSION => Some(FragmentFormat::Mgf),
            OPEN_FORMAT_EXTENSION => Some(FragmentFormat::MzMl),
            _ => None,
        };
        if let (Some(format), Some(tier)) = (format, QualityTier::detect(stem)) {
            return FileRole::TierFragment { tier, format };
        }

        match extension {
            RAW_EXTENSION => FileRole::RawSpectrum,
            OPEN_FORMAT_EXTENSION => FileRole::OpenFormatSpectrum,
            "log" => FileRole::LogArtifact,
            "txt" => FileRole::TabularReport,
            _ => FileRole::Unrecognized,
        }
    }

    /// Whether the artifact cleaner deletes entries with this role.
    pub fn is_disposable(&self) -> bool {
        matches!(self, FileRole::Byproduct | FileRole::PeakDirectory)
    }
}

/// Splits `name` at its last dot. Names without a stem or extension yield `None`.
pub fn split_extension(name: &str) -> Option<(&str, &str)> {
    let (stem, extension) = name.rsplit_once('.')?;
    if stem.is_empty() || extension.is_empty() {
        return None;
    }
    Some((stem, extension))
}

/// Name without its terminal extension; unchanged when there is none.
pub fn strip_extension(name: &str) -> &str {
    split_extension(name).map(|(stem, _)| stem).unwrap_or(name)
}

/// Replaces the terminal extension of `name` with `extension`.
pub fn with_extension(name: &str, extension: &str) -> String {
    format!("{}.{}", strip_extension(name), extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_spectra() {
        assert_eq!(FileRole::classify("sample1.raw"), FileRole::RawSpectrum);
        assert_eq!(
            FileRole::classify("sample1.mzML"),
            FileRole::OpenFormatSpectrum
        );
        // Extension matching is case sensitive, like the tools' own outputs.
        assert_eq!(FileRole::classify("sample1.mzml"), FileRole::Unrecognized);
    }

    #[test]
    fn test_classify_tier_fragments() {
        assert_eq!(
            FileRole::classify("sample1_Q1.mgf"),
            FileRole::TierFragment {
                tier: QualityTier::Q1,
                format: FragmentFormat::Mgf
            }
        );
        assert_eq!(
            FileRole::classify("sample1_Q3.mzML"),
            FileRole::TierFragment {
                tier: QualityTier::Q3,
                format: FragmentFormat::MzMl
            }
        );
        assert_eq!(
            FileRole::classify("sample1_Q1Q2Q3_combined.mgf"),
            FileRole::TierFragment {
                tier: QualityTier::Q1Q2Q3,
                format: FragmentFormat::Mgf
            }
        );
    }

    #[test]
    fn test_classify_disposables() {
        for suffix in BYPRODUCT_SUFFIXES {
            let name = format!("sample1{suffix}");
            assert_eq!(FileRole::classify(&name), FileRole::Byproduct, "{name}");
        }
        assert_eq!(FileRole::classify("sample1_Peak"), FileRole::PeakDirectory);
        assert!(FileRole::PeakDirectory.is_disposable());
        assert!(!FileRole::PeakCluster.is_disposable());
    }

    #[test]
    fn test_classify_misc() {
        assert_eq!(
            FileRole::classify("sample1_PeakCluster.csv"),
            FileRole::PeakCluster
        );
        assert_eq!(
            FileRole::classify("sample1_diaumpire.log"),
            FileRole::LogArtifact
        );
        assert_eq!(
            FileRole::classify("Default_PSM_Report.txt"),
            FileRole::TabularReport
        );
        assert_eq!(FileRole::classify("notes"), FileRole::Unrecognized);
        assert_eq!(FileRole::classify(".hidden"), FileRole::Unrecognized);
    }

    #[test]
    fn test_movable_suffixes_classify_as_outputs() {
        for suffix in MOVABLE_SUFFIXES {
            let role = FileRole::classify(&format!("s{suffix}"));
            assert!(
                matches!(role, FileRole::TierFragment { .. } | FileRole::PeakCluster),
                "{suffix} -> {role:?}"
            );
        }
    }

    #[test]
    fn test_extension_helpers() {
        assert_eq!(strip_extension("sample1.raw"), "sample1");
        assert_eq!(strip_extension("a.b.mgf"), "a.b");
        assert_eq!(strip_extension("plain"), "plain");
        assert_eq!(with_extension("sample1.raw", "mzML"), "sample1.mzML");
    }
}
