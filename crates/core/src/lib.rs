pub mod aggregate;
pub mod cleaner;
pub mod config;
pub mod converter;
pub mod deconvolution;
pub mod files;
pub mod mover;
pub mod pipeline;
pub mod record;
pub mod reports;
pub mod search;
pub mod summary;
pub mod testing;
pub mod tools;
pub mod workspace;

pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, Config,
    ConfigError,
};
pub use pipeline::{Pipeline, PipelineError, Preflight};
pub use summary::RunSummary;
pub use tools::{ProcessRunner, ToolRunner};
