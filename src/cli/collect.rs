use std::path::PathBuf;

use clap::Args;

use permtune::collect::{collect_dir, DEFAULT_BEST_OUTPUT, DEFAULT_FREQUENCY_OUTPUT};
use permtune::TuneError;

use super::fail;

#[derive(Args)]
pub struct CollectArgs {
    /// Sweep output directory (e.g. data2)
    pub dir: PathBuf,
    /// Where to write `<data file>:<instance>` lines
    #[arg(long, default_value = DEFAULT_BEST_OUTPUT)]
    pub best: PathBuf,
    /// Where to write `<instance>, <wins>` lines
    #[arg(long, default_value = DEFAULT_FREQUENCY_OUTPUT)]
    pub frequency: PathBuf,
    /// Only pick instances that appear in this file
    #[arg(long, value_name = "PATH")]
    pub shortlist: Option<PathBuf>,
}

pub fn cmd_collect(args: CollectArgs) {
    let shortlist = args.shortlist.as_ref().map(|path| {
        std::fs::read_to_string(path).unwrap_or_else(|e| fail(TuneError::io(path, e)))
    });

    let collection = match collect_dir(&args.dir, shortlist.as_deref()) {
        Ok(c) => c,
        Err(e) => fail(e),
    };
    for diag in &collection.diagnostics {
        eprintln!("{}", diag);
    }
    if let Err(e) = collection.save(&args.best, &args.frequency) {
        fail(e);
    }

    eprintln!(
        "Collected {} winners ({} distinct instances) from '{}'",
        collection.winners.len(),
        collection.frequency.len(),
        args.dir.display()
    );
    eprintln!("  {}", args.best.display());
    eprintln!("  {}", args.frequency.display());
}
