//! Mock tool runner for testing.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::tools::{Invocation, ToolError, ToolOutput, ToolRunner};

/// Scripted outcome of one mocked invocation.
#[derive(Debug, Clone, Default)]
pub struct MockResponse {
    /// Exit code reported; ignored when `launch_error` is set.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    /// Files written before the response is returned, as a real tool would.
    pub creates: Vec<(PathBuf, Vec<u8>)>,
    /// Fail as if the program could not be started.
    pub launch_error: bool,
}

impl MockResponse {
    /// Exit code 0, no output.
    pub fn success() -> Self {
        Self::exit(0)
    }

    pub fn exit(code: i32) -> Self {
        Self {
            exit_code: Some(code),
            ..Default::default()
        }
    }

    pub fn launch_failure() -> Self {
        Self {
            launch_error: true,
            ..Default::default()
        }
    }

    /// Adds a file the tool "writes".
    pub fn creating(mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        self.creates.push((path.into(), contents.into()));
        self
    }

    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = stdout.into();
        self
    }
}

type Handler = Arc<dyn Fn(&Invocation) -> MockResponse + Send + Sync>;

/// Mock implementation of the ToolRunner trait.
///
/// Provides controllable behavior for testing:
/// - Record every invocation for assertions
/// - Script exit codes and launch failures per invocation
/// - Simulate the files a tool would write
///
/// # Example
///
/// ```rust,ignore
/// use diaflow_core::testing::{MockResponse, MockToolRunner};
///
/// let runner = MockToolRunner::new();
/// runner
///     .set_handler(|inv| {
///         if inv.mentions("bad.mzML") {
///             MockResponse::exit(1)
///         } else {
///             MockResponse::success()
///         }
///     })
///     .await;
///
/// // ... run a stage ...
/// assert_eq!(runner.invocation_count().await, 2);
/// ```
#[derive(Clone)]
pub struct MockToolRunner {
    invocations: Arc<RwLock<Vec<Invocation>>>,
    handler: Arc<RwLock<Option<Handler>>>,
}

impl Default for MockToolRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MockToolRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockToolRunner").finish_non_exhaustive()
    }
}

impl MockToolRunner {
    /// Create a mock runner where every invocation succeeds.
    pub fn new() -> Self {
        Self {
            invocations: Arc::new(RwLock::new(Vec::new())),
            handler: Arc::new(RwLock::new(None)),
        }
    }

    /// Decide the response for each invocation.
    pub async fn set_handler<F>(&self, handler: F)
    where
        F: Fn(&Invocation) -> MockResponse + Send + Sync + 'static,
    {
        *self.handler.write().await = Some(Arc::new(handler));
    }

    /// Get all recorded invocations, in call order.
    pub async fn invocations(&self) -> Vec<Invocation> {
        self.invocations.read().await.clone()
    }

    /// Get the number of invocations performed.
    pub async fn invocation_count(&self) -> usize {
        self.invocations.read().await.len()
    }

    /// Invocations with an argument containing `needle`.
    pub async fn invocations_mentioning(&self, needle: &str) -> Vec<Invocation> {
        self.invocations
            .read()
            .await
            .iter()
            .filter(|inv| inv.mentions(needle))
            .cloned()
            .collect()
    }

    /// Clear recorded invocations.
    pub async fn clear_recorded(&self) {
        self.invocations.write().await.clear();
    }
}

#[async_trait]
impl ToolRunner for MockToolRunner {
    async fn run(&self, invocation: &Invocation) -> Result<ToolOutput, ToolError> {
        self.invocations.write().await.push(invocation.clone());

        let handler = self.handler.read().await.clone();
        let response = match handler {
            Some(handler) => handler(invocation),
            None => MockResponse::success(),
        };

        if response.launch_error {
            return Err(ToolError::LaunchFailed {
                path: invocation.program.clone(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "mock launch failure"),
            });
        }

        for (path, contents) in &response.creates {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(path, contents).await?;
        }

        Ok(ToolOutput {
            exit_code: response.exit_code,
            stdout: response.stdout,
            stderr: response.stderr,
            duration_ms: 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_default_succeeds_and_records() {
        let runner = MockToolRunner::new();
        let output = runner
            .run(&Invocation::new("java").arg("a.mzML"))
            .await
            .unwrap();
        assert!(output.success());
        assert_eq!(runner.invocation_count().await, 1);
        assert_eq!(runner.invocations_mentioning("a.mzML").await.len(), 1);
    }

    #[tokio::test]
    async fn test_handler_scripts_outcomes() {
        let dir = TempDir::new().unwrap();
        let created = dir.path().join("out/result.zip");
        let created_clone = created.clone();

        let runner = MockToolRunner::new();
        runner
            .set_handler(move |inv| {
                if inv.mentions("fail") {
                    MockResponse::exit(1)
                } else if inv.mentions("crash") {
                    MockResponse::launch_failure()
                } else {
                    MockResponse::success().creating(created_clone.clone(), "zip")
                }
            })
            .await;

        let failed = runner.run(&Invocation::new("t").arg("fail")).await.unwrap();
        assert_eq!(failed.exit_code, Some(1));
        assert!(runner.run(&Invocation::new("t").arg("crash")).await.is_err());
        runner.run(&Invocation::new("t").arg("ok")).await.unwrap();
        assert!(created.exists());
        assert_eq!(runner.invocation_count().await, 3);

        runner.clear_recorded().await;
        assert_eq!(runner.invocation_count().await, 0);
    }
}
