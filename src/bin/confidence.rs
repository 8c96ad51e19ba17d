//! Calculate the confidence interval for each step of a benchmark.
//!
//! Reads `<measurements-dir>/<benchmark>/<step>/<repeat>/summary_out.csv`
//! and writes `<measurements-dir>/<benchmark>/<step>/confidence.yml`.

use anyhow::Context;
use clap::Parser;
use interference::confidence::{self, ConfidencePolicy, MEASUREMENTS_DIR};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Calculate confidence intervals.
#[derive(Debug, Parser)]
#[command(name = "confidence", version, about, long_about = None)]
struct ConfidenceArgs {
    /// Benchmark directory name
    #[arg(long)]
    benchmark: String,

    /// Directory holding all benchmark directories
    #[arg(long, default_value = MEASUREMENTS_DIR)]
    measurements_dir: PathBuf,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = ConfidenceArgs::parse();

    let root = args.measurements_dir.join(&args.benchmark);
    confidence::run(&root, &ConfidencePolicy::default())
        .with_context(|| format!("failed to compute confidence intervals for {}", root.display()))?;
    Ok(())
}
