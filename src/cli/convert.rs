use std::path::PathBuf;

use clap::Args;

use permtune::config::TuneConfig;
use permtune::diagnostic::render_diagnostics;
use permtune::lut::{convert_file, DEFAULT_INPUT, DEFAULT_OUTPUT};

use super::fail;

#[derive(Args)]
pub struct ConvertArgs {
    /// Input file of `<data file>:<instance>` lines (default: best_instances.txt)
    #[arg(short, long)]
    pub input: Option<PathBuf>,
    /// Output file of lookup-table entries (default: cpp_lut_items.txt)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn cmd_convert(args: ConvertArgs, config: &TuneConfig) {
    let input = args
        .input
        .or_else(|| config.convert_input.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));
    let output = args
        .output
        .or_else(|| config.convert_output.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    let (source, conversion) = match convert_file(&input, &output) {
        Ok(result) => result,
        Err(e) => fail(e),
    };

    render_diagnostics(
        &conversion.diagnostics,
        &input.to_string_lossy(),
        &source,
    );

    println!("Conversion complete. Check '{}'", output.display());
    eprintln!(
        "  {} entries written, {} lines skipped",
        conversion.entries.len(),
        conversion.diagnostics.len()
    );
}
