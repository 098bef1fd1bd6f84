use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use diaflow_core::{
    load_config_or_default, validate_config, Config, Pipeline, ProcessRunner, RunSummary,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable naming the configuration file.
const CONFIG_ENV: &str = "DIAFLOW_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "diaflow.toml";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        eprintln!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config_path = std::env::var(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

    // Loaded before logging so the run log can go to the workspace root.
    let config = load_config_or_default(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path));

    let log_path = config.as_ref().ok().map(run_log_path);
    init_logging(log_path.as_deref())?;

    let config = config?;
    validate_config(&config).context("Configuration validation failed")?;

    info!("diaflow v{}", VERSION);
    info!("Configuration: {:?}", config_path);
    info!("Workspace root: {:?}", config.workspace.root);
    if let Some(path) = &log_path {
        info!("Run log: {:?}", path);
    }

    let runner = Arc::new(ProcessRunner::new().with_timeout(config.tools.timeout_secs));
    let pipeline = Pipeline::new(config, runner);
    let summary = execute(&pipeline, || {
        prompt_reference_name(&mut io::stdin().lock(), &mut io::stdout())
    })
    .await?;

    info!(
        "Finished {} in {} seconds",
        summary.reference_name,
        summary.total_elapsed().num_seconds()
    );
    Ok(())
}

/// Checks the workspace, asks for a reference name when none is configured,
/// then runs every stage. Nothing is asked when a precondition fails.
async fn execute<F>(pipeline: &Pipeline, ask_reference_name: F) -> Result<RunSummary>
where
    F: FnOnce() -> Result<Option<String>>,
{
    let preflight = pipeline.preflight().context("Pipeline aborted")?;
    let reference_name = match &pipeline.config().reference_name {
        Some(name) => Some(name.clone()),
        None => ask_reference_name().context("Failed to read the reference name")?,
    };
    pipeline
        .run_with(preflight, reference_name.as_deref())
        .await
        .context("Pipeline aborted")
}

fn run_log_path(config: &Config) -> PathBuf {
    config.workspace.root.join(&config.workspace.log_file)
}

/// Console logging, plus the run log at `log_path` truncated for this run.
fn init_logging(log_path: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let console = tracing_subscriber::fmt::layer().with_target(false);

    let file_layer = match log_path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create run log {:?}", path))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(false)
                    .without_time(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .init();
    Ok(())
}

/// Asks once for a reference name. A blank answer yields `None`, leaving the
/// workspace directory name as the default.
fn prompt_reference_name<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Option<String>> {
    write!(
        output,
        "Please enter a reference name for this run (leave blank to use the workspace name): "
    )?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let name = line.trim();
    Ok((!name.is_empty()).then(|| name.to_string()))
}
