//! Benchmark sweeps over permutation shapes.
//!
//! A sweep visits every permutation of `0..rank`, every geometrically spaced
//! size tuple whose element product stays under the ceiling, and every data
//! type tag, launching the tuning binary once per point with its stdout
//! redirected into `<output_dir>/<TYPE>_<sizes>_<perm>.txt`.

pub mod launch;

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Result, TuneError};

pub use launch::{LaunchError, Launcher, ProcessLauncher};

pub const MAX_RANK: usize = 8;
pub const DEFAULT_MIN_SIZE: u64 = 16;
pub const DEFAULT_MAX_SIZE: u64 = 1 << 30;
pub const DEFAULT_MAX_PRODUCT: u64 = 1 << 31;
pub const DEFAULT_DATA_TYPES: [&str; 2] = ["F32", "F16"];

/// Parameters of one sweep.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SweepConfig {
    pub rank: usize,
    /// First value of every size axis.
    pub min_size: u64,
    /// Largest value any single axis may take.
    pub max_size: u64,
    /// Points whose size product reaches this value are never launched.
    pub max_product: u64,
    /// Geometric growth factor between consecutive sizes.
    pub step: u64,
    pub data_types: Vec<String>,
    /// Tuning binary to launch.
    pub command: PathBuf,
    pub output_dir: PathBuf,
}

impl SweepConfig {
    /// Built-in parameters for a rank: `./permutation_tuning_<rank>` writing
    /// into `data<rank>/`, doubling sizes except for rank 4, which grows ×8.
    pub fn preset(rank: usize) -> Result<Self> {
        if rank == 0 || rank > MAX_RANK {
            return Err(TuneError::InvalidRank(rank));
        }
        Ok(Self {
            rank,
            min_size: DEFAULT_MIN_SIZE,
            max_size: DEFAULT_MAX_SIZE,
            max_product: DEFAULT_MAX_PRODUCT,
            step: if rank == 4 { 8 } else { 2 },
            data_types: DEFAULT_DATA_TYPES.iter().map(|s| s.to_string()).collect(),
            command: PathBuf::from(format!("./permutation_tuning_{}", rank)),
            output_dir: PathBuf::from(format!("data{}", rank)),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.rank == 0 || self.rank > MAX_RANK {
            return Err(TuneError::InvalidRank(self.rank));
        }
        if self.min_size == 0 {
            return Err(TuneError::Config("min_size must be at least 1".to_string()));
        }
        if self.step < 2 {
            return Err(TuneError::Config("step must be at least 2".to_string()));
        }
        if self.data_types.is_empty() {
            return Err(TuneError::Config("no data types to sweep".to_string()));
        }
        Ok(())
    }
}

/// One benchmark invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SweepPoint {
    pub data_type: String,
    pub sizes: Vec<u64>,
    pub perm: Vec<usize>,
}

impl SweepPoint {
    /// Positional arguments: type tag, sizes, then output axis order.
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(1 + self.sizes.len() + self.perm.len());
        args.push(self.data_type.clone());
        args.extend(self.sizes.iter().map(u64::to_string));
        args.extend(self.perm.iter().map(usize::to_string));
        args
    }

    /// Output file name, e.g. `F32_16_32_1_0.txt`.
    pub fn file_name(&self) -> String {
        let mut parts = vec![self.data_type.clone()];
        parts.extend(self.sizes.iter().map(u64::to_string));
        parts.extend(self.perm.iter().map(usize::to_string));
        format!("{}.txt", parts.join("_"))
    }

    pub fn product(&self) -> u128 {
        self.sizes.iter().map(|&s| s as u128).product()
    }

    /// Shell-like rendering of the launch, for progress output only.
    pub fn command_line(&self, command: &Path) -> String {
        let mut line = command.display().to_string();
        for arg in self.args() {
            line.push(' ');
            line.push_str(&arg);
        }
        line
    }
}

/// All permutations of `0..k` in lexicographic order.
pub fn permutations(k: usize) -> Vec<Vec<usize>> {
    let mut current: Vec<usize> = (0..k).collect();
    let mut out = vec![current.clone()];
    // next lexicographic permutation
    loop {
        let Some(i) = (1..k).rev().find(|&i| current[i - 1] < current[i]) else {
            return out;
        };
        let pivot = i - 1;
        let j = (pivot + 1..k)
            .rev()
            .find(|&j| current[j] > current[pivot])
            .unwrap_or(pivot);
        current.swap(pivot, j);
        current[pivot + 1..].reverse();
        out.push(current.clone());
    }
}

/// Geometric values of one axis: `min, min*step, ...` while `<= max`.
pub fn axis_values(config: &SweepConfig) -> Vec<u64> {
    let mut values = Vec::new();
    let mut v = config.min_size;
    while v <= config.max_size {
        values.push(v);
        match v.checked_mul(config.step) {
            Some(next) => v = next,
            None => break,
        }
    }
    values
}

/// Every size tuple with product below the ceiling, last axis fastest.
pub fn size_tuples(config: &SweepConfig) -> Vec<Vec<u64>> {
    let values = axis_values(config);
    let mut out = Vec::new();
    let mut prefix = Vec::with_capacity(config.rank);
    extend_tuples(config, &values, &mut prefix, 1, &mut out);
    out
}

fn extend_tuples(
    config: &SweepConfig,
    values: &[u64],
    prefix: &mut Vec<u64>,
    product: u128,
    out: &mut Vec<Vec<u64>>,
) {
    let remaining = (config.rank - prefix.len() - 1) as u32;
    let tail_floor = (config.min_size as u128).saturating_pow(remaining);
    for &v in values {
        let p = product.saturating_mul(v as u128);
        // Values only grow along an axis; the first one at the ceiling ends it.
        if p.saturating_mul(tail_floor) >= config.max_product as u128 {
            break;
        }
        prefix.push(v);
        if prefix.len() == config.rank {
            out.push(prefix.clone());
        } else {
            extend_tuples(config, values, prefix, p, out);
        }
        prefix.pop();
    }
}

/// Every point of the sweep in launch order.
pub fn plan(config: &SweepConfig) -> Result<Vec<SweepPoint>> {
    config.validate()?;
    let tuples = size_tuples(config);
    let mut points = Vec::new();
    for perm in permutations(config.rank) {
        for sizes in &tuples {
            for data_type in &config.data_types {
                points.push(SweepPoint {
                    data_type: data_type.clone(),
                    sizes: sizes.clone(),
                    perm: perm.clone(),
                });
            }
        }
    }
    Ok(points)
}

/// Progress notifications emitted while a sweep runs.
#[derive(Debug)]
pub enum SweepEvent<'a> {
    Running { command: &'a str },
    Failed { command: &'a str, message: &'a str },
}

#[derive(Clone, Debug, Serialize)]
pub struct SweepFailure {
    pub command: String,
    pub output: PathBuf,
    pub message: String,
}

/// Summary of a finished sweep.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SweepReport {
    pub rank: usize,
    pub planned: usize,
    pub launched: usize,
    pub succeeded: usize,
    pub dry_run: bool,
    pub failures: Vec<SweepFailure>,
}

impl SweepReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?).map_err(|e| TuneError::io(path, e))?;
        tracing::info!("saved sweep report to {}", path.display());
        Ok(())
    }
}

/// Run every point of the sweep through `launcher`.
///
/// A point that fails (unwritable output file, spawn error, non-zero exit)
/// is reported through `on_event` and recorded; the sweep moves on. Only a
/// bad config or an uncreatable output directory is fatal.
pub fn run_sweep<L, F>(
    config: &SweepConfig,
    launcher: &mut L,
    dry_run: bool,
    mut on_event: F,
) -> Result<SweepReport>
where
    L: Launcher,
    F: FnMut(SweepEvent<'_>),
{
    let points = plan(config)?;
    let mut report = SweepReport {
        rank: config.rank,
        planned: points.len(),
        dry_run,
        ..SweepReport::default()
    };

    if !dry_run {
        std::fs::create_dir_all(&config.output_dir)
            .map_err(|e| TuneError::io(&config.output_dir, e))?;
    }
    tracing::debug!(
        "sweep rank {}: {} points into {}",
        config.rank,
        points.len(),
        config.output_dir.display()
    );

    for point in &points {
        let command = point.command_line(&config.command);
        on_event(SweepEvent::Running { command: &command });
        if dry_run {
            continue;
        }

        let output = config.output_dir.join(point.file_name());
        let result = std::fs::File::create(&output)
            .map_err(|e| format!("cannot create '{}': {}", output.display(), e))
            .and_then(|file| {
                report.launched += 1;
                launcher
                    .launch(&config.command, &point.args(), file)
                    .map_err(|e| e.to_string())
            });

        match result {
            Ok(()) => report.succeeded += 1,
            Err(message) => {
                on_event(SweepEvent::Failed {
                    command: &command,
                    message: &message,
                });
                report.failures.push(SweepFailure {
                    command,
                    output,
                    message,
                });
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests;
