//! Error types for external tool invocations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that prevent an external tool from producing an exit status.
///
/// A tool that runs and exits non-zero is not an error at this level; see
/// [`super::ToolOutput::success`].
#[derive(Debug, Error)]
pub enum ToolError {
    /// Program could not be found.
    #[error("Executable not found at path: {path}")]
    NotFound { path: PathBuf },

    /// Program exists but could not be started.
    #[error("Failed to launch {path}: {source}")]
    LaunchFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Program did not exit within the configured timeout and was killed.
    #[error("{program} timed out after {timeout_secs} seconds")]
    Timeout { program: String, timeout_secs: u64 },

    /// I/O error while waiting for the program.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ToolError {
    /// Creates a launch error, mapping `NotFound` to its own variant.
    pub fn launch(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::LaunchFailed { path, source }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_maps_not_found() {
        let err = ToolError::launch(
            "/missing/java",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, ToolError::NotFound { .. }));

        let err = ToolError::launch(
            "/bin/java",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope"),
        );
        assert!(matches!(err, ToolError::LaunchFailed { .. }));
        assert!(err.to_string().contains("/bin/java"));
    }
}
