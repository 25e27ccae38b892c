use std::path::PathBuf;

use clap::Args;

use permtune::config::TuneConfig;
use permtune::sweep::{run_sweep, ProcessLauncher, SweepEvent};

use super::fail;

#[derive(Args)]
pub struct SweepArgs {
    /// Number of tensor dimensions (the original variants use 2, 3, and 4)
    #[arg(short, long)]
    pub rank: usize,
    /// Tuning binary (default: ./permutation_tuning_<rank>)
    #[arg(long)]
    pub command: Option<PathBuf>,
    /// Directory for per-point output files (default: data<rank>)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Data type tag to sweep; repeat for several (default: F32, F16)
    #[arg(long = "data-type", value_name = "TAG")]
    pub data_types: Vec<String>,
    /// First size of every axis
    #[arg(long)]
    pub min_size: Option<u64>,
    /// Largest size of any single axis
    #[arg(long)]
    pub max_size: Option<u64>,
    /// Skip shapes whose element count reaches this value
    #[arg(long)]
    pub max_product: Option<u64>,
    /// Growth factor between consecutive sizes
    #[arg(long)]
    pub step: Option<u64>,
    /// Print the commands without running them
    #[arg(long)]
    pub dry_run: bool,
    /// Save a JSON summary of the sweep
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,
}

pub fn cmd_sweep(args: SweepArgs, config: &TuneConfig) {
    let mut sweep = match config.sweep_config(args.rank) {
        Ok(s) => s,
        Err(e) => fail(e),
    };
    if let Some(command) = args.command {
        sweep.command = command;
    }
    if let Some(dir) = args.output_dir {
        sweep.output_dir = dir;
    }
    if !args.data_types.is_empty() {
        sweep.data_types = args.data_types;
    }
    if let Some(v) = args.min_size {
        sweep.min_size = v;
    }
    if let Some(v) = args.max_size {
        sweep.max_size = v;
    }
    if let Some(v) = args.max_product {
        sweep.max_product = v;
    }
    if let Some(v) = args.step {
        sweep.step = v;
    }

    let report = run_sweep(&sweep, &mut ProcessLauncher, args.dry_run, |event| match event {
        SweepEvent::Running { command } => println!("Running: {}", command),
        SweepEvent::Failed { command, message } => {
            println!("Error while running command: {}\n{}", command, message)
        }
    });
    let report = match report {
        Ok(r) => r,
        Err(e) => fail(e),
    };

    eprintln!(
        "Sweep rank {}: {} planned, {} launched, {} failed",
        report.rank,
        report.planned,
        report.launched,
        report.failures.len()
    );

    if let Some(path) = args.report {
        if let Err(e) = report.save(&path) {
            fail(e);
        }
    }
}
