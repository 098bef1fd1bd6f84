//! Reports PeptideShaker's ReportCLI can export.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A ReportCLI report, identified on the command line by its code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    CertificateOfAnalysis,
    DefaultHierarchicalReport,
    DefaultPsmPhosphorylationReport,
    DefaultPsmReport,
    DefaultPsmReportWithNonValidatedMatches,
    DefaultPeptidePhosphorylationReport,
    DefaultPeptideReport,
    DefaultPeptideReportWithNonValidatedMatches,
    DefaultProteinPhosphorylationReport,
    DefaultProteinReport,
    DefaultProteinReportWithNonValidatedMatches,
    ExtendedPsmReport,
    /// User defined reports (`-n`).
    Custom,
}

impl ReportKind {
    pub const ALL: [ReportKind; 13] = [
        ReportKind::CertificateOfAnalysis,
        ReportKind::DefaultHierarchicalReport,
        ReportKind::DefaultPsmPhosphorylationReport,
        ReportKind::DefaultPsmReport,
        ReportKind::DefaultPsmReportWithNonValidatedMatches,
        ReportKind::DefaultPeptidePhosphorylationReport,
        ReportKind::DefaultPeptideReport,
        ReportKind::DefaultPeptideReportWithNonValidatedMatches,
        ReportKind::DefaultProteinPhosphorylationReport,
        ReportKind::DefaultProteinReport,
        ReportKind::DefaultProteinReportWithNonValidatedMatches,
        ReportKind::ExtendedPsmReport,
        ReportKind::Custom,
    ];

    /// Numeric code passed to `-reports`.
    pub fn code(&self) -> u8 {
        match self {
            Self::CertificateOfAnalysis => 0,
            Self::DefaultHierarchicalReport => 1,
            Self::DefaultPsmPhosphorylationReport => 2,
            Self::DefaultPsmReport => 3,
            Self::DefaultPsmReportWithNonValidatedMatches => 4,
            Self::DefaultPeptidePhosphorylationReport => 5,
            Self::DefaultPeptideReport => 6,
            Self::DefaultPeptideReportWithNonValidatedMatches => 7,
            Self::DefaultProteinPhosphorylationReport => 8,
            Self::DefaultProteinReport => 9,
            Self::DefaultProteinReportWithNonValidatedMatches => 10,
            Self::ExtendedPsmReport => 11,
            Self::Custom => 12,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.code() == code)
    }

    /// Name as PeptideShaker lists it.
    pub fn title(&self) -> &'static str {
        match self {
            Self::CertificateOfAnalysis => "Certificate of Analysis",
            Self::DefaultHierarchicalReport => "Default Hierarchical Report",
            Self::DefaultPsmPhosphorylationReport => "Default PSM Phosphorylation Report",
            Self::DefaultPsmReport => "Default PSM Report",
            Self::DefaultPsmReportWithNonValidatedMatches => {
                "Default PSM Report with non-validated matches"
            }
            Self::DefaultPeptidePhosphorylationReport => "Default Peptide Phosphorylation Report",
            Self::DefaultPeptideReport => "Default Peptide Report",
            Self::DefaultPeptideReportWithNonValidatedMatches => {
                "Default Peptide Report with non-validated matches"
            }
            Self::DefaultProteinPhosphorylationReport => "Default Protein Phosphorylation Report",
            Self::DefaultProteinReport => "Default Protein Report",
            Self::DefaultProteinReportWithNonValidatedMatches => {
                "Default Protein Report with non-validated matches"
            }
            Self::ExtendedPsmReport => "Extended PSM Report",
            Self::Custom => "Custom reports",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Renders the `-reports` argument, e.g. `"3, 9"`.
pub fn codes_argument(kinds: &[ReportKind]) -> String {
    kinds
        .iter()
        .map(|k| k.code().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_contiguous() {
        for (index, kind) in ReportKind::ALL.iter().enumerate() {
            assert_eq!(kind.code() as usize, index);
            assert_eq!(ReportKind::from_code(kind.code()), Some(*kind));
        }
        assert_eq!(ReportKind::from_code(13), None);
    }

    #[test]
    fn test_codes_argument() {
        assert_eq!(
            codes_argument(&[ReportKind::DefaultPsmReport, ReportKind::DefaultProteinReport]),
            "3, 9"
        );
        assert_eq!(codes_argument(&[ReportKind::ExtendedPsmReport]), "11");
    }

    #[test]
    fn test_serde_names() {
        let kind: ReportKind = serde_json::from_str("\"default_protein_report\"").unwrap();
        assert_eq!(kind, ReportKind::DefaultProteinReport);
        assert_eq!(
            serde_json::to_string(&ReportKind::DefaultPsmReportWithNonValidatedMatches).unwrap(),
            "\"default_psm_report_with_non_validated_matches\""
        );
    }
}
