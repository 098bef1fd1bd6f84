//! Error types for the workspace module.

use std::path::PathBuf;
use thiserror::Error;

/// Preconditions that stop the run before any stage starts.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// A directory the run depends on does not exist.
    #[error("Directory not found: {path}")]
    MissingDirectory { path: PathBuf },

    /// One or more mandatory executables are missing.
    #[error("Missing executables: {}", names.join(", "))]
    MissingExecutables { names: Vec<String> },

    /// One or more mandatory parameter files are missing.
    #[error("Missing parameter files: {}", names.join(", "))]
    MissingParameterFiles { names: Vec<String> },

    /// Failed to create a stage directory.
    #[error("Failed to create directory: {path}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_list_names() {
        let err = WorkspaceError::MissingExecutables {
            names: vec!["java".to_string(), "search_gui".to_string()],
        };
        assert_eq!(err.to_string(), "Missing executables: java, search_gui");

        let err = WorkspaceError::MissingParameterFiles {
            names: vec!["search.par".to_string()],
        };
        assert_eq!(err.to_string(), "Missing parameter files: search.par");
    }
}
