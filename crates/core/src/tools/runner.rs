//! Synchronous-per-call execution of external programs.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tokio::time::{timeout, Duration};

use super::error::ToolError;

/// A single command line to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Working directory; inherits the pipeline's when `None`.
    pub current_dir: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Space-joined command line, for logs.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.to_string_lossy().to_string())
            .chain(self.args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Whether any argument contains `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.args.iter().any(|a| a.contains(needle))
    }
}

/// What a finished program left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code; `None` when terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
}

impl ToolOutput {
    /// Exit status 0.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Exit code rendered for logs.
    pub fn status_label(&self) -> String {
        match self.exit_code {
            Some(code) => format!("exit code {code}"),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Runs external programs. Every call waits for the program to exit.
#[async_trait]
pub trait ToolRunner: Send + Sync {
    /// Runs the invocation to completion.
    ///
    /// Returns `Ok` for any program that ran, whatever its exit status.
    async fn run(&self, invocation: &Invocation) -> Result<ToolOutput, ToolError>;
}

/// Runs invocations as child processes with captured output.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    timeout_secs: Option<u64>,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kills programs still running after `timeout_secs`.
    pub fn with_timeout(mut self, timeout_secs: Option<u64>) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

#[async_trait]
impl ToolRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<ToolOutput, ToolError> {
        let start = Instant::now();

        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &invocation.current_dir {
            command.current_dir(dir);
        }

        tracing::debug!("Running: {}", invocation.command_line());
        let child = command
            .spawn()
            .map_err(|e| ToolError::launch(&invocation.program, e))?;

        let output = match self.timeout_secs {
            Some(secs) => match timeout(Duration::from_secs(secs), child.wait_with_output()).await
            {
                Ok(result) => result?,
                // Dropping the wait future kills the child (kill_on_drop).
                Err(_) => {
                    return Err(ToolError::Timeout {
                        program: invocation.program.display().to_string(),
                        timeout_secs: secs,
                    })
                }
            },
            None => child.wait_with_output().await?,
        };

        Ok(ToolOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_builder() {
        let inv = Invocation::new("/usr/bin/java")
            .args(["-jar", "-Xmx8G"])
            .arg("DIA_Umpire_SE.jar")
            .current_dir("/data");
        assert_eq!(
            inv.command_line(),
            "/usr/bin/java -jar -Xmx8G DIA_Umpire_SE.jar"
        );
        assert!(inv.mentions("Umpire"));
        assert!(!inv.mentions("SearchGUI"));
        assert_eq!(inv.current_dir, Some(PathBuf::from("/data")));
    }

    #[test]
    fn test_output_status() {
        let ok = ToolOutput {
            exit_code: Some(0),
            ..Default::default()
        };
        assert!(ok.success());
        let failed = ToolOutput {
            exit_code: Some(2),
            ..Default::default()
        };
        assert!(!failed.success());
        assert_eq!(failed.status_label(), "exit code 2");
        assert!(!ToolOutput::default().success());
    }

    #[tokio::test]
    async fn test_missing_program_is_not_found() {
        let runner = ProcessRunner::new();
        let inv = Invocation::new("/nonexistent/definitely/missing-tool");
        let err = runner.run(&inv).await.unwrap_err();
        assert!(matches!(err, ToolError::NotFound { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_captures_exit_code_and_output() {
        let runner = ProcessRunner::new();
        let inv = Invocation::new("sh").args(["-c", "echo out; echo err >&2; exit 3"]);
        let output = runner.run(&inv).await.unwrap();
        assert_eq!(output.exit_code, Some(3));
        assert_eq!(output.stdout.trim(), "out");
        assert_eq!(output.stderr.trim(), "err");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_kills_program() {
        let runner = ProcessRunner::new().with_timeout(Some(1));
        let inv = Invocation::new("sh").args(["-c", "sleep 30"]);
        let err = runner.run(&inv).await.unwrap_err();
        assert!(matches!(err, ToolError::Timeout { timeout_secs: 1, .. }));
    }
}
