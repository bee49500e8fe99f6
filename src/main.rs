use std::path::PathBuf;

use abalone_rings::{pipeline, PipelineConfig};
use anyhow::{Context, Result};
use clap::Parser;

/// Default workbook name; pass a path to use another file.
const DEFAULT_DATA_PATH: &str = "Manya_Gogia_DataModeling.xlsx";

#[derive(Parser)]
#[command(name = "abalone-rings")]
#[command(about = "Fit a linear model of abalone ring counts and report held-out error", long_about = None)]
struct Cli {
    /// Workbook with an "Original Data" sheet, or a CSV with the same rows
    #[arg(default_value = DEFAULT_DATA_PATH)]
    path: PathBuf,

    /// JSON file overriding sheet name, test fraction, seed or scaling mode
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    log::debug!("Config: {config:?}");

    let evaluation = pipeline::run(&cli.path, &config)
        .with_context(|| format!("running pipeline on {}", cli.path.display()))?;
    log::debug!(
        "Metrics: {}",
        serde_json::to_string(&evaluation.metrics).context("serializing metrics")?
    );

    print!("{}", evaluation.metrics);
    Ok(())
}
