//! Per-invocation log files and cleanup of tool-emitted clutter.

use std::path::{Path, PathBuf};
use tokio::fs;

use super::runner::{Invocation, ToolOutput};

/// Writes the command line and captured output of one invocation to `path`,
/// replacing any previous log.
pub async fn write_invocation_log(
    path: &Path,
    invocation: &Invocation,
    output: &ToolOutput,
) -> std::io::Result<()> {
    let mut contents = String::new();
    contents.push_str("Command line arguments\n");
    contents.push_str("----------------------\n");
    contents.push_str(&invocation.command_line());
    contents.push_str("\n\nRun Log\n-------\n");
    contents.push_str(&output.stdout);
    contents.push_str(&output.stderr);
    fs::write(path, contents).await
}

/// Deletes files in `dir` named `<prefix>*.<extension>`. Returns what was removed.
///
/// Failures to delete individual files are logged and skipped.
pub async fn remove_matching(
    dir: &Path,
    prefix: &str,
    extension: &str,
) -> std::io::Result<Vec<PathBuf>> {
    let suffix = format!(".{extension}");
    let mut removed = Vec::new();
    let mut reader = fs::read_dir(dir).await?;
    while let Some(entry) = reader.next_entry().await? {
        let name = entry.file_name().to_string_lossy().to_string();
        if !name.starts_with(prefix) || !name.ends_with(&suffix) {
            continue;
        }
        let path = entry.path();
        match fs::remove_file(&path).await {
            Ok(()) => removed.push(path),
            Err(e) => tracing::warn!("Failed to remove {}: {}", path.display(), e),
        }
    }
    removed.sort();
    Ok(removed)
}
