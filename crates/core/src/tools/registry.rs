//! Immutable map from logical tool to executable path.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::ToolsConfig;

/// An external program the pipeline drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tool {
    Java,
    DiaUmpireSe,
    SearchGui,
    PeptideShaker,
    ThermoRawFileParser,
}

impl Tool {
    pub const ALL: [Tool; 5] = [
        Tool::Java,
        Tool::DiaUmpireSe,
        Tool::SearchGui,
        Tool::PeptideShaker,
        Tool::ThermoRawFileParser,
    ];

    /// Configuration key naming this tool.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Java => "java",
            Self::DiaUmpireSe => "dia_umpire_se",
            Self::SearchGui => "search_gui",
            Self::PeptideShaker => "peptide_shaker",
            Self::ThermoRawFileParser => "thermo_file_parser",
        }
    }

    /// Whether the run cannot start without this tool.
    ///
    /// Without the raw file parser, already converted spectra are still processed.
    pub fn is_mandatory(&self) -> bool {
        !matches!(self, Self::ThermoRawFileParser)
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Resolved executable paths, built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    paths: BTreeMap<Tool, PathBuf>,
}

impl ToolRegistry {
    /// Resolves every configured path against `root`.
    pub fn resolve(config: &ToolsConfig, root: &Path) -> Self {
        let configured = [
            (Tool::Java, &config.java),
            (Tool::DiaUmpireSe, &config.dia_umpire_se),
            (Tool::SearchGui, &config.search_gui),
            (Tool::PeptideShaker, &config.peptide_shaker),
            (Tool::ThermoRawFileParser, &config.thermo_file_parser),
        ];
        let paths = configured
            .into_iter()
            .map(|(tool, path)| (tool, resolve_program(path, root)))
            .collect();
        Self { paths }
    }

    /// Builds a registry from explicit paths. Tools not listed are unresolved.
    pub fn from_paths(paths: impl IntoIterator<Item = (Tool, PathBuf)>) -> Self {
        Self {
            paths: paths.into_iter().collect(),
        }
    }

    /// Path of `tool`; an empty path when it was never configured.
    pub fn path(&self, tool: Tool) -> &Path {
        self.paths
            .get(&tool)
            .map(PathBuf::as_path)
            .unwrap_or_else(|| Path::new(""))
    }

    /// Whether the path configured for `tool` exists.
    pub fn is_available(&self, tool: Tool) -> bool {
        let path = self.path(tool);
        !path.as_os_str().is_empty() && path.exists()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Tool, &Path)> {
        Tool::ALL.into_iter().map(|tool| (tool, self.path(tool)))
    }
}

/// Resolves a configured program path.
///
/// Absolute paths are kept. A bare name is searched on `PATH` and kept verbatim
/// when not found there. Other relative paths are joined onto `root`.
pub fn resolve_program(path: &Path, root: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    if path.components().count() == 1 {
        if let Some(found) = search_path(path) {
            return found;
        }
        let rooted = root.join(path);
        if rooted.exists() {
            return rooted;
        }
        return path.to_path_buf();
    }
    root.join(path)
}

fn search_path(program: &Path) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_relative_against_root() {
        let root = Path::new("/data/run");
        assert_eq!(
            resolve_program(Path::new("tools/a.jar"), root),
            PathBuf::from("/data/run/tools/a.jar")
        );
        assert_eq!(
            resolve_program(Path::new("/opt/a.jar"), root),
            PathBuf::from("/opt/a.jar")
        );
    }

    #[test]
    fn test_resolve_bare_name_in_root() {
        let root = TempDir::new().unwrap();
        std::fs::write(root.path().join("parser-not-on-path-xyz"), b"").unwrap();
        assert_eq!(
            resolve_program(Path::new("parser-not-on-path-xyz"), root.path()),
            root.path().join("parser-not-on-path-xyz")
        );
        assert_eq!(
            resolve_program(Path::new("definitely-missing-xyz"), root.path()),
            PathBuf::from("definitely-missing-xyz")
        );
    }

    #[test]
    fn test_registry_availability() {
        let root = TempDir::new().unwrap();
        let jar = root.path().join("DIA_Umpire_SE.jar");
        std::fs::write(&jar, b"").unwrap();

        let registry = ToolRegistry::from_paths([(Tool::DiaUmpireSe, jar.clone())]);
        assert!(registry.is_available(Tool::DiaUmpireSe));
        assert!(!registry.is_available(Tool::SearchGui));
        assert_eq!(registry.path(Tool::DiaUmpireSe), jar.as_path());
        assert_eq!(registry.iter().count(), Tool::ALL.len());
    }

    #[test]
    fn test_only_parser_is_optional() {
        let optional: Vec<_> = Tool::ALL.iter().filter(|t| !t.is_mandatory()).collect();
        assert_eq!(optional, vec![&Tool::ThermoRawFileParser]);
    }
}
