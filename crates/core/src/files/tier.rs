//! Quality tiers produced by DIA-Umpire signal extraction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A quality band of deconvolved pseudo-MS/MS spectra.
///
/// DIA-Umpire writes one fragment file per single tier (`_Q1`, `_Q2`, `_Q3`);
/// the combined tiers name files produced by merging those fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum QualityTier {
    Q1,
    Q2,
    Q3,
    Q1Q2,
    Q1Q3,
    Q2Q3,
    Q1Q2Q3,
}

impl QualityTier {
    /// Every tier, ordered from the longest suffix to the shortest.
    pub const ALL: [QualityTier; 7] = [
        QualityTier::Q1Q2Q3,
        QualityTier::Q1Q2,
        QualityTier::Q1Q3,
        QualityTier::Q2Q3,
        QualityTier::Q1,
        QualityTier::Q2,
        QualityTier::Q3,
    ];

    /// Filename suffix appended to a sample base name.
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Q1 => "_Q1",
            Self::Q2 => "_Q2",
            Self::Q3 => "_Q3",
            Self::Q1Q2 => "_Q1Q2_combined",
            Self::Q1Q3 => "_Q1Q3_combined",
            Self::Q2Q3 => "_Q2Q3_combined",
            Self::Q1Q2Q3 => "_Q1Q2Q3_combined",
        }
    }

    /// Selection code used in configuration (`"1"`, `"12"`, `"123"`, ...).
    pub fn code(&self) -> &'static str {
        match self {
            Self::Q1 => "1",
            Self::Q2 => "2",
            Self::Q3 => "3",
            Self::Q1Q2 => "12",
            Self::Q1Q3 => "13",
            Self::Q2Q3 => "23",
            Self::Q1Q2Q3 => "123",
        }
    }

    /// Short display name (`Q1`, `Q1Q2`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Q1 => "Q1",
            Self::Q2 => "Q2",
            Self::Q3 => "Q3",
            Self::Q1Q2 => "Q1Q2",
            Self::Q1Q3 => "Q1Q3",
            Self::Q2Q3 => "Q2Q3",
            Self::Q1Q2Q3 => "Q1Q2Q3",
        }
    }

    /// Parses a selection code.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    /// Returns the tier whose suffix terminates `stem`, if any.
    pub fn detect(stem: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| stem.ends_with(t.suffix()))
    }

    /// Removes a trailing tier suffix from `stem`.
    ///
    /// At most one suffix is removed, so `a_Q1_Q2` becomes `a_Q1`.
    pub fn strip_from(stem: &str) -> &str {
        match Self::detect(stem) {
            Some(tier) => &stem[..stem.len() - tier.suffix().len()],
            None => stem,
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for QualityTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(tier) = Self::from_code(trimmed) {
            return Ok(tier);
        }
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("unknown quality tier: {trimmed}"))
    }
}

impl TryFrom<String> for QualityTier {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QualityTier> for String {
    fn from(tier: QualityTier) -> Self {
        tier.code().to_string()
    }
}
