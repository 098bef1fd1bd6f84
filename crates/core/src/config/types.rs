use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::files::QualityTier;
use crate::reports::ReportKind;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub workspace: WorkspaceConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub parameters: ParametersConfig,
    #[serde(default)]
    pub deconvolution: DeconvolutionConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub reports: ReportsConfig,
    /// Label for the consolidated outputs. Prompted for when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_name: Option<String>,
}

/// Workspace layout
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkspaceConfig {
    /// Directory holding `raw/`, `processed/`, `searched/` and `reports/`.
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Run log written at the root, truncated on every run.
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            log_file: default_log_file(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_log_file() -> String {
    "dia_umpire_automation.log".to_string()
}

/// Locations of the external executables
///
/// Relative paths are resolved against the workspace root; bare program
/// names (no path separator) are looked up on `PATH`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default = "default_java")]
    pub java: PathBuf,
    #[serde(default = "default_dia_umpire_se")]
    pub dia_umpire_se: PathBuf,
    #[serde(default = "default_search_gui")]
    pub search_gui: PathBuf,
    #[serde(default = "default_peptide_shaker")]
    pub peptide_shaker: PathBuf,
    #[serde(default = "default_thermo_file_parser")]
    pub thermo_file_parser: PathBuf,
    /// Per-invocation timeout in seconds. Unset means wait indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            java: default_java(),
            dia_umpire_se: default_dia_umpire_se(),
            search_gui: default_search_gui(),
            peptide_shaker: default_peptide_shaker(),
            thermo_file_parser: default_thermo_file_parser(),
            timeout_secs: None,
        }
    }
}

fn default_java() -> PathBuf {
    PathBuf::from("java")
}

fn default_dia_umpire_se() -> PathBuf {
    PathBuf::from("tools/DIA_Umpire_SE-2.2.8.jar")
}

fn default_search_gui() -> PathBuf {
    PathBuf::from("tools/SearchGUI-4.2.17/SearchGUI-4.2.17.jar")
}

fn default_peptide_shaker() -> PathBuf {
    PathBuf::from("tools/PeptideShaker-2.2.25/PeptideShaker-2.2.25.jar")
}

fn default_thermo_file_parser() -> PathBuf {
    PathBuf::from("tools/SearchGUI-4.2.17/resources/ThermoRawFileParser/ThermoRawFileParser")
}

/// User supplied parameter files, relative to the workspace root
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ParametersConfig {
    #[serde(default = "default_deconvolution_params")]
    pub deconvolution: PathBuf,
    #[serde(default = "default_search_params")]
    pub search: PathBuf,
    #[serde(default = "default_database")]
    pub database: PathBuf,
}

impl Default for ParametersConfig {
    fn default() -> Self {
        Self {
            deconvolution: default_deconvolution_params(),
            search: default_search_params(),
            database: default_database(),
        }
    }
}

fn default_deconvolution_params() -> PathBuf {
    PathBuf::from("umpire-se.params")
}

fn default_search_params() -> PathBuf {
    PathBuf::from("search.par")
}

fn default_database() -> PathBuf {
    PathBuf::from("database.fasta")
}

/// DIA-Umpire signal extraction settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeconvolutionConfig {
    /// JVM heap ceiling, passed as `-Xmx<max_memory>`.
    #[serde(default = "default_max_memory")]
    pub max_memory: String,
    /// Log file DIA-Umpire always writes next to its input.
    #[serde(default = "default_umpire_log")]
    pub log_file_name: String,
}

impl Default for DeconvolutionConfig {
    fn default() -> Self {
        Self {
            max_memory: default_max_memory(),
            log_file_name: default_umpire_log(),
        }
    }
}

fn default_max_memory() -> String {
    "8G".to_string()
}

fn default_umpire_log() -> String {
    "diaumpire_se.log".to_string()
}

/// SearchGUI settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Search engines enabled on the SearchGUI command line (`-<engine> 1`).
    #[serde(default = "default_engines")]
    pub engines: Vec<String>,
    /// Quality tiers to search.
    #[serde(default = "default_tiers")]
    pub tiers: Vec<QualityTier>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            engines: default_engines(),
            tiers: default_tiers(),
        }
    }
}

fn default_engines() -> Vec<String> {
    vec!["xtandem".to_string()]
}

fn default_tiers() -> Vec<QualityTier> {
    vec![QualityTier::Q1]
}

/// PeptideShaker report export settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportsConfig {
    #[serde(default = "default_report_kinds")]
    pub kinds: Vec<ReportKind>,
    /// Convert exported `.txt` reports to `.xlsx`.
    #[serde(default = "default_true")]
    pub convert_to_spreadsheet: bool,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            kinds: default_report_kinds(),
            convert_to_spreadsheet: true,
        }
    }
}

fn default_report_kinds() -> Vec<ReportKind> {
    vec![ReportKind::DefaultPsmReport, ReportKind::DefaultProteinReport]
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_empty_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.workspace.root, PathBuf::from("."));
        assert_eq!(config.workspace.log_file, "dia_umpire_automation.log");
        assert_eq!(config.parameters.search, PathBuf::from("search.par"));
        assert_eq!(config.deconvolution.max_memory, "8G");
        assert_eq!(config.search.engines, vec!["xtandem".to_string()]);
        assert_eq!(config.search.tiers, vec![QualityTier::Q1]);
        assert_eq!(config.reports.kinds.len(), 2);
        assert!(config.reports.convert_to_spreadsheet);
        assert!(config.reference_name.is_none());
        assert!(config.tools.timeout_secs.is_none());
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml = r#"
reference_name = "liver_run"

[workspace]
root = "/data/run1"

[tools]
java = "/opt/java11/bin/java"
dia_umpire_se = "/opt/DIA_Umpire_SE-2.2.8.jar"
timeout_secs = 7200

[deconvolution]
max_memory = "16G"

[search]
engines = ["xtandem", "msgf"]
tiers = ["1", "12"]

[reports]
kinds = ["default_psm_report"]
convert_to_spreadsheet = false
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.reference_name.as_deref(), Some("liver_run"));
        assert_eq!(config.workspace.root, PathBuf::from("/data/run1"));
        assert_eq!(config.tools.java, PathBuf::from("/opt/java11/bin/java"));
        assert_eq!(config.tools.timeout_secs, Some(7200));
        assert_eq!(config.deconvolution.max_memory, "16G");
        assert_eq!(config.search.engines.len(), 2);
        assert_eq!(
            config.search.tiers,
            vec![QualityTier::Q1, QualityTier::Q1Q2]
        );
        assert_eq!(config.reports.kinds, vec![ReportKind::DefaultPsmReport]);
        assert!(!config.reports.convert_to_spreadsheet);
    }

    #[test]
    fn test_unknown_tier_fails() {
        let toml = r#"
[search]
tiers = ["7"]
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.search.tiers, config.search.tiers);
        assert_eq!(parsed.tools.java, config.tools.java);
    }
}
