//! Workspace layout, startup checks and reference name derivation.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, warn};

use super::error::WorkspaceError;
use crate::config::ParametersConfig;
use crate::tools::{Tool, ToolRegistry};

pub const RAW_DIR: &str = "raw";
pub const PROCESSED_DIR: &str = "processed";
pub const SEARCHED_DIR: &str = "searched";
pub const REPORTS_DIR: &str = "reports";

/// Handle to a validated workspace root.
///
/// Holding one proves `raw/` existed when it was opened.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Opens the workspace at `root`. Fails if `raw/` does not exist.
    ///
    /// The root is made absolute. Nothing is created; see [`Workspace::ensure_stage_dirs`].
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, WorkspaceError> {
        let root = root.into();
        let raw = root.join(RAW_DIR);
        if !raw.is_dir() {
            error!(
                "The raw directory does not exist! Please create {} and provide the data.",
                raw.display()
            );
            return Err(WorkspaceError::MissingDirectory { path: raw });
        }
        info!("The raw directory has been set up: {}", raw.display());
        // Absolute, so tool arguments stay valid under any working directory.
        let root = std::fs::canonicalize(&root).unwrap_or(root);
        Ok(Self { root })
    }

    /// Creates `processed/` and `searched/` when absent.
    pub async fn ensure_stage_dirs(&self) -> Result<(), WorkspaceError> {
        for dir in [self.processed_dir(), self.searched_dir()] {
            ensure_dir(&dir).await?;
        }
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.root.join(RAW_DIR)
    }

    pub fn processed_dir(&self) -> PathBuf {
        self.root.join(PROCESSED_DIR)
    }

    pub fn searched_dir(&self) -> PathBuf {
        self.root.join(SEARCHED_DIR)
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.root.join(REPORTS_DIR)
    }
}

/// Creates `dir` when absent, logging which case applied.
pub async fn ensure_dir(dir: &Path) -> Result<(), WorkspaceError> {
    if fs::metadata(dir).await.map(|m| m.is_dir()).unwrap_or(false) {
        info!("The following directory already exists: {}", dir.display());
        return Ok(());
    }
    fs::create_dir_all(dir)
        .await
        .map_err(|e| WorkspaceError::DirectoryCreationFailed {
            path: dir.to_path_buf(),
            source: e,
        })?;
    info!("The following directory has been created: {}", dir.display());
    Ok(())
}

/// What the executable check found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolAvailability {
    /// Whether raw files can be converted in this run.
    pub converter_available: bool,
}

/// Checks every registered executable exists.
///
/// A missing raw file parser only disables conversion; any other missing
/// tool fails with the full list of missing names.
pub fn verify_executables(registry: &ToolRegistry) -> Result<ToolAvailability, WorkspaceError> {
    let mut missing = Vec::new();
    let mut converter_available = true;

    for (tool, path) in registry.iter() {
        if registry.is_available(tool) {
            info!("{} executable has been found at {}", tool, path.display());
        } else if tool.is_mandatory() {
            error!(
                "{} cannot be found at {}. Please provide the absolute filepath.",
                tool,
                path.display()
            );
            missing.push(tool.key().to_string());
        } else {
            warn!(
                "Only existing .mzML files will be processed as {} has not been found",
                tool
            );
            converter_available = false;
        }
    }

    if !missing.is_empty() {
        error!("List of missing executables: {}", missing.join(", "));
        return Err(WorkspaceError::MissingExecutables { names: missing });
    }

    Ok(ToolAvailability {
        converter_available,
    })
}

/// The three user supplied parameter files, resolved against the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterFiles {
    pub deconvolution: PathBuf,
    pub search: PathBuf,
    pub database: PathBuf,
}

impl ParameterFiles {
    pub fn resolve(config: &ParametersConfig, root: &Path) -> Self {
        Self {
            deconvolution: root.join(&config.deconvolution),
            search: root.join(&config.search),
            database: root.join(&config.database),
        }
    }

    fn labelled(&self) -> [(&'static str, &Path); 3] {
        [
            ("deconvolution parameters", &self.deconvolution),
            ("search parameters", &self.search),
            ("sequence database", &self.database),
        ]
    }
}

/// Checks all three parameter files exist; every one is mandatory.
pub fn verify_parameters(params: &ParameterFiles) -> Result<(), WorkspaceError> {
    let mut missing = Vec::new();
    for (label, path) in params.labelled() {
        if path.is_file() {
            info!("{} file has been found for {}", path.display(), label);
        } else {
            error!("{} for {} has not been found!", path.display(), label);
            missing.push(file_label(path));
        }
    }

    if !missing.is_empty() {
        error!("Parameter files missing: {}", missing.join(", "));
        return Err(WorkspaceError::MissingParameterFiles { names: missing });
    }
    Ok(())
}

/// Reference name for the run: the trimmed input, or the workspace
/// directory name when the input is absent or blank.
pub fn resolve_reference_name(input: Option<&str>, root: &Path) -> String {
    match input.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => directory_name(root),
    }
}

fn directory_name(path: &Path) -> String {
    let resolved = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    resolved
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "diaflow".to_string())
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn workspace_with_raw() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(RAW_DIR)).unwrap();
        dir
    }

    #[test]
    fn test_open_requires_raw() {
        let dir = TempDir::new().unwrap();
        let err = Workspace::open(dir.path()).unwrap_err();
        assert!(matches!(err, WorkspaceError::MissingDirectory { .. }));
        // nothing was created
        assert!(!dir.path().join(PROCESSED_DIR).exists());
    }

    #[test]
    fn test_open_normalizes_root() {
        let dir = workspace_with_raw();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let ws = Workspace::open(dir.path().join("sub").join("..")).unwrap();
        assert!(ws.root().is_absolute());
        assert_eq!(ws.root(), dir.path().canonicalize().unwrap().as_path());
    }

    #[tokio::test]
    async fn test_setup_creates_stage_dirs_idempotently() {
        let dir = workspace_with_raw();
        let ws = Workspace::open(dir.path()).unwrap();
        ws.ensure_stage_dirs().await.unwrap();
        assert!(ws.processed_dir().is_dir());
        assert!(ws.searched_dir().is_dir());
        assert!(!ws.reports_dir().exists());

        std::fs::write(ws.processed_dir().join("keep.mgf"), b"x").unwrap();
        ws.ensure_stage_dirs().await.unwrap();
        assert!(ws.processed_dir().join("keep.mgf").exists());
    }

    #[test]
    fn test_verify_executables_parser_optional() {
        let dir = TempDir::new().unwrap();
        let mut paths = Vec::new();
        for tool in Tool::ALL {
            if tool == Tool::ThermoRawFileParser {
                paths.push((tool, dir.path().join("missing-parser")));
                continue;
            }
            let path = dir.path().join(tool.key());
            std::fs::write(&path, b"").unwrap();
            paths.push((tool, path));
        }

        let availability = verify_executables(&ToolRegistry::from_paths(paths)).unwrap();
        assert!(!availability.converter_available);
    }

    #[test]
    fn test_verify_executables_lists_all_missing() {
        let dir = TempDir::new().unwrap();
        let java = dir.path().join("java");
        std::fs::write(&java, b"").unwrap();
        let registry = ToolRegistry::from_paths([
            (Tool::Java, java),
            (Tool::DiaUmpireSe, dir.path().join("umpire.jar")),
            (Tool::SearchGui, dir.path().join("searchgui.jar")),
        ]);

        match verify_executables(&registry) {
            Err(WorkspaceError::MissingExecutables { names }) => {
                assert_eq!(names, vec!["dia_umpire_se", "search_gui", "peptide_shaker"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_verify_parameters() {
        let dir = TempDir::new().unwrap();
        let params = ParameterFiles::resolve(&ParametersConfig::default(), dir.path());
        std::fs::write(&params.deconvolution, b"").unwrap();

        match verify_parameters(&params) {
            Err(WorkspaceError::MissingParameterFiles { names }) => {
                assert_eq!(names, vec!["search.par", "database.fasta"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }

        std::fs::write(&params.search, b"").unwrap();
        std::fs::write(&params.database, b">P1\nMK\n").unwrap();
        assert!(verify_parameters(&params).is_ok());
    }

    #[test]
    fn test_reference_name_defaults_to_root_name() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("liver_experiment");
        std::fs::create_dir(&root).unwrap();

        assert_eq!(resolve_reference_name(Some(" run7 "), &root), "run7");
        assert_eq!(resolve_reference_name(Some("   "), &root), "liver_experiment");
        assert_eq!(resolve_reference_name(None, &root), "liver_experiment");
    }
}
