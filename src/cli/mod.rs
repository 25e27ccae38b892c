pub mod best_match;
pub mod collect;
pub mod convert;
pub mod sweep;

use std::path::Path;
use std::process;

use permtune::config::TuneConfig;
use permtune::TuneError;

/// Install the tracing subscriber. `RUST_LOG` wins over `-v`.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("permtune={}", level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Load the explicit config file, or the nearest permtune.toml, exiting on error.
pub fn load_config(explicit: Option<&Path>) -> TuneConfig {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => std::env::current_dir()
            .ok()
            .and_then(|dir| TuneConfig::find(&dir)),
    };
    let Some(path) = path else {
        return TuneConfig::default();
    };
    tracing::info!("using config {}", path.display());
    match TuneConfig::load(&path) {
        Ok(config) => config,
        Err(e) => fail(e),
    }
}

/// Report a fatal error and exit with status 1.
pub fn fail(err: TuneError) -> ! {
    eprintln!("error: {}", err);
    process::exit(1);
}
