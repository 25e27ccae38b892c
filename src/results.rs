//! Reader for the tuning binary's per-instance output.
//!
//! A results file starts with `There are N instances.` and then holds one
//! line per kernel instance: `<type string>, <GB/s>` when the instance ran,
//! or `<type string> does not support this input tensor:` when it did not.

use std::path::Path;

use crate::error::{Result, TuneError};

/// Throughput measured for one kernel instance.
#[derive(Clone, Debug, PartialEq)]
pub struct InstanceResult {
    /// Instance type string, e.g. `2_256_64_64_4_4_0_1_4_4`.
    pub label: String,
    /// Bandwidth in GB/s.
    pub score: f64,
}

/// Parse a single `label, score` line; anything else yields `None`.
pub fn parse_result_line(line: &str) -> Option<InstanceResult> {
    let (label, score) = line.split_once(',')?;
    let label = label.trim();
    let score: f64 = score.trim().parse().ok()?;
    if label.is_empty() || score.is_nan() {
        return None;
    }
    Some(InstanceResult {
        label: label.to_string(),
        score,
    })
}

pub fn parse_results(source: &str) -> Vec<InstanceResult> {
    source.lines().filter_map(parse_result_line).collect()
}

pub fn read_results(path: &Path) -> Result<Vec<InstanceResult>> {
    let source = std::fs::read_to_string(path).map_err(|e| TuneError::io(path, e))?;
    Ok(parse_results(&source))
}

/// Highest-scoring result; the earliest one wins a tie.
pub fn best(results: &[InstanceResult]) -> Option<&InstanceResult> {
    results.iter().fold(None, |acc, r| match acc {
        Some(b) if b.score >= r.score => Some(b),
        _ => Some(r),
    })
}
