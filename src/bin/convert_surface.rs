//! convert-surface - convert a surface between formats
//!
//! # Usage
//! ```bash
//! # Re-encode a DFS surface
//! convert-surface --surfin lh.pial.dfs --surfout lh.pial.copy.dfs
//!
//! # Attach a FreeSurfer overlay as per-vertex attributes
//! convert-surface --surfin lh.pial.dfs --surfout lh.thickness.dfs --overlay lh.thickness.mgh
//! ```

use clap::Parser;
use shapeio::config::ShapeConfig;
use shapeio::error::Result;
use shapeio::shape::surface_format;
use shapeio::utils::global_metrics;
use shapeio::utils::logging::init_logging;
use shapeio::FormatDispatcher;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

/// Convert surface formats
#[derive(Parser, Debug)]
#[command(name = "convert-surface")]
#[command(about = "Convert surface formats")]
#[command(version)]
struct Cli {
    /// Input surface
    #[arg(long = "surfin", alias = "in")]
    surfin: PathBuf,

    /// Output surface
    #[arg(long = "surfout", alias = "out")]
    surfout: PathBuf,

    /// Scalar overlay attached as per-vertex attributes [mgh]
    #[arg(long)]
    overlay: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn load_config(cli: &Cli) -> Result<ShapeConfig> {
    let config = match &cli.config {
        Some(path) => ShapeConfig::from_file(path)?,
        None => ShapeConfig::from_env()?,
    };
    config.validate_strict()?;
    Ok(config)
}

fn run(cli: &Cli, config: &ShapeConfig) -> Result<()> {
    let dispatcher = FormatDispatcher::with_defaults(&config.codec);
    surface_format(&dispatcher, &cli.surfin, &cli.surfout, cli.overlay.as_deref())?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    let status = match run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Conversion failed");
            ExitCode::FAILURE
        }
    };
    global_metrics().log_metrics();
    status
}
