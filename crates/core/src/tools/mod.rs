//! External tool execution.
//!
//! Every scientific step of the pipeline is delegated to a third-party
//! program. This module provides the `ToolRunner` trait used by the stages,
//! the process-backed implementation, the registry of resolved executable
//! paths, and helpers for the log files written around each invocation.
//!
//! # Example
//!
//! ```ignore
//! use diaflow_core::tools::{Invocation, ProcessRunner, ToolRunner};
//!
//! let runner = ProcessRunner::new().with_timeout(Some(3600));
//! let inv = Invocation::new("java").args(["-jar", "-Xmx8G", "DIA_Umpire_SE.jar"]);
//! let output = runner.run(&inv).await?;
//! if !output.success() {
//!     eprintln!("{}", output.stderr);
//! }
//! ```

mod error;
mod invocation_log;
mod registry;
mod runner;

pub use error::ToolError;
pub use invocation_log::{remove_matching, write_invocation_log};
pub use registry::{resolve_program, Tool, ToolRegistry};
pub use runner::{Invocation, ProcessRunner, ToolOutput, ToolRunner};
