use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

mod cli;

use cli::best_match::BestMatchArgs;
use cli::collect::CollectArgs;
use cli::convert::ConvertArgs;
use cli::sweep::SweepArgs;

#[derive(Parser)]
#[command(
    name = "permtune",
    version,
    about = "Sweep, collect, and convert permutation-kernel tuning results"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Path to permtune.toml (default: search the current directory upwards)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert best_instances.txt lines into lookup-table entries
    Convert(ConvertArgs),
    /// Run the tuning binary over every shape of one rank
    Sweep(SweepArgs),
    /// Print the top-ranked row of FILE_A whose label appears in FILE_B
    BestMatch(BestMatchArgs),
    /// Pick the winning instance of every sweep output file
    Collect(CollectArgs),
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };
    cli::init_logging(cli.verbose);
    let config = cli::load_config(cli.config.as_deref());

    match cli.command {
        Command::Convert(args) => cli::convert::cmd_convert(args, &config),
        Command::Sweep(args) => cli::sweep::cmd_sweep(args, &config),
        Command::BestMatch(args) => cli::best_match::cmd_best_match(args),
        Command::Collect(args) => cli::collect::cmd_collect(args),
    }
}
