//! Testing utilities and mock implementations.
//!
//! This module provides a mock of the `ToolRunner` trait plus helpers to lay
//! out throwaway workspaces, allowing every stage and the full pipeline to be
//! exercised without Java, DIA-Umpire, SearchGUI or PeptideShaker installed.

mod mock_runner;

pub use mock_runner::{MockResponse, MockToolRunner};

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::path::{Path, PathBuf};

    use crate::config::Config;
    use crate::tools::{Tool, ToolRegistry};
    use crate::workspace::{ParameterFiles, RAW_DIR};

    /// Create `root/raw` and the three default parameter files.
    pub fn workspace_root(root: &Path) -> PathBuf {
        std::fs::create_dir_all(root.join(RAW_DIR)).expect("create raw dir");
        let params = ParameterFiles::resolve(&Config::default().parameters, root);
        for path in [&params.deconvolution, &params.search, &params.database] {
            std::fs::write(path, b"# test parameters\n").expect("write parameter file");
        }
        root.to_path_buf()
    }

    /// Create empty stand-ins for every executable under `root/bin` and
    /// return a config pointing at them.
    pub fn config_with_fake_tools(root: &Path) -> Config {
        let bin = root.join("bin");
        std::fs::create_dir_all(&bin).expect("create bin dir");
        let mut config = Config::default();
        config.workspace.root = root.to_path_buf();
        config.tools.java = touch(&bin, "java");
        config.tools.dia_umpire_se = touch(&bin, "DIA_Umpire_SE.jar");
        config.tools.search_gui = touch(&bin, "SearchGUI.jar");
        config.tools.peptide_shaker = touch(&bin, "PeptideShaker.jar");
        config.tools.thermo_file_parser = touch(&bin, "ThermoRawFileParser");
        config
    }

    /// Registry with every tool pointing at an existing empty file.
    pub fn registry_with_fake_tools(root: &Path) -> ToolRegistry {
        let config = config_with_fake_tools(root);
        ToolRegistry::resolve(&config.tools, root)
    }

    /// Write a file of `len` bytes.
    pub fn file_of_size(path: &Path, len: usize) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(path, vec![b'x'; len]).expect("write file");
    }

    /// Tool paths that do not exist.
    pub fn missing_tool(root: &Path, tool: Tool) -> PathBuf {
        root.join("missing").join(tool.key())
    }

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"").expect("create fake tool");
        path
    }
}
