//! Per-stage bookkeeping of which files were attempted, succeeded and failed.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Pipeline stages that keep a run record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Conversion,
    Deconvolution,
    Cleaning,
    Moving,
    Search,
    Aggregation,
    Reports,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Conversion => "conversion",
            Self::Deconvolution => "deconvolution",
            Self::Cleaning => "cleaning",
            Self::Moving => "moving",
            Self::Search => "search",
            Self::Aggregation => "aggregation",
            Self::Reports => "reports",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ephemeral record of one stage run.
///
/// Owned by the stage that produced it; downstream stages only read it.
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    pub stage: Stage,
    pub to_process: Vec<String>,
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunRecord {
    pub fn new(stage: Stage) -> Self {
        Self {
            stage,
            to_process: Vec::new(),
            succeeded: Vec::new(),
            failed: Vec::new(),
            started_at: None,
            finished_at: None,
        }
    }

    pub fn start(&mut self) {
        self.started_at = Some(Utc::now());
        self.finished_at = None;
    }

    pub fn finish(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Utc::now());
        }
        self.finished_at = Some(Utc::now());
    }

    pub fn succeed(&mut self, name: impl Into<String>) {
        self.succeeded.push(name.into());
    }

    pub fn fail(&mut self, name: impl Into<String>) {
        self.failed.push(name.into());
    }

    /// Whether the stage actually ran (was started and finished).
    pub fn ran(&self) -> bool {
        self.started_at.is_some() && self.finished_at.is_some()
    }

    /// Wall-clock time between start and finish.
    pub fn elapsed(&self) -> Option<chrono::Duration> {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}
