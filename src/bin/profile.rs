//! Generate profile CSV files for load generation.

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use interference::profile::{self, plot};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const CHART_WIDTH: usize = 80;
const CHART_HEIGHT: usize = 16;

/// Generate CSV profile files.
#[derive(Debug, Parser)]
#[command(name = "profile", version, about, long_about = None)]
struct ProfileArgs {
    /// Path of the output file
    #[arg(long, short = 'o')]
    output: PathBuf,

    /// Draw the profile on stdout before writing it
    #[arg(long)]
    show: bool,

    /// Profile type
    #[command(subcommand)]
    command: Option<ProfileCommand>,
}

#[derive(Debug, Subcommand)]
enum ProfileCommand {
    /// Generate a linear profile.
    Linear {
        /// Minimum RPS
        #[arg(long, allow_negative_numbers = true)]
        min: i64,

        /// Maximum RPS
        #[arg(long, allow_negative_numbers = true)]
        max: i64,

        /// Profile duration (in seconds)
        #[arg(long, short = 'd')]
        duration: i64,
    },
    /// Generate a step profile.
    Step {
        /// Start RPS
        #[arg(long, allow_negative_numbers = true)]
        rps: i64,

        /// Number of steps
        #[arg(long)]
        steps: i64,

        /// RPS increase per step
        #[arg(long, allow_negative_numbers = true)]
        increase: i64,

        /// Step repeats
        #[arg(long)]
        repeats: i64,

        /// Step duration (in seconds)
        #[arg(long, short = 'd')]
        step_duration: i64,
    },
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
    let args = ProfileArgs::parse();

    let rates = match args.command {
        Some(ProfileCommand::Linear { min, max, duration }) => {
            profile::generate_linear(min, max, duration)?
        }
        Some(ProfileCommand::Step {
            rps,
            steps,
            increase,
            repeats,
            step_duration,
        }) => profile::generate_stepwise(rps, steps, increase, repeats, step_duration)?,
        None => {
            let _ = ProfileArgs::command().write_help(&mut std::io::stderr());
            std::process::exit(1);
        }
    };

    if args.show {
        print!("{}", plot::render(&rates, CHART_WIDTH, CHART_HEIGHT));
    }

    profile::write_profile(&args.output, &rates)
        .with_context(|| format!("failed to write profile to {}", args.output.display()))?;
    Ok(())
}
