use std::path::PathBuf;

use clap::Args;

use permtune::best_match::{best_match, NO_MATCH};

use super::fail;

#[derive(Args)]
pub struct BestMatchArgs {
    /// Ranked `label, score` file
    pub file_a: PathBuf,
    /// Text searched for each label, best score first
    pub file_b: PathBuf,
    /// Prefix the label with FILE_A's name (`<name>:<label>`, the converter's input shape)
    #[arg(long)]
    pub tag: bool,
}

pub fn cmd_best_match(args: BestMatchArgs) {
    let hit = match best_match(&args.file_a, &args.file_b) {
        Ok(hit) => hit,
        Err(e) => fail(e),
    };

    if let Some(row) = &hit {
        tracing::info!(
            "{} (score {}, line {} of {})",
            row.label,
            row.score,
            row.line,
            args.file_a.display()
        );
    }
    match hit {
        Some(row) if args.tag => {
            let name = args
                .file_a
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            println!("{}:{}", name, row.label);
        }
        Some(row) => println!("{}", row.label),
        None => println!("{}", NO_MATCH),
    }
}
