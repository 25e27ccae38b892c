//! Best shared instance between a ranked results file and a shortlist.
//!
//! File A holds `label, score` rows. Rows are ranked by score, highest
//! first, and the first label that occurs anywhere in file B wins.

use std::path::Path;

use crate::error::{Result, TuneError};

pub const NO_MATCH: &str = "No match found.";

#[derive(Clone, Debug, PartialEq)]
pub struct RankedRow {
    pub label: String,
    pub score: f64,
    /// 1-based line in the source file.
    pub line: usize,
}

/// Parse and rank the rows of `source`, highest score first.
///
/// Every line is a row: a blank line or one without a second column is an
/// error, as is a non-numeric score. `path` is only used for reporting.
pub fn rank_rows(source: &str, path: &Path) -> Result<Vec<RankedRow>> {
    let mut rows = Vec::new();
    for (i, line) in source.lines().enumerate() {
        let mut columns = line.split(',');
        let label = columns.next().unwrap_or("").trim();
        let raw_score = columns.next().ok_or_else(|| TuneError::MissingColumn {
            path: path.to_path_buf(),
            line: i + 1,
        })?;
        let score = raw_score
            .trim()
            .parse::<f64>()
            .map_err(|_| TuneError::BadScore {
                path: path.to_path_buf(),
                line: i + 1,
                value: raw_score.trim().to_string(),
            })?;
        rows.push(RankedRow {
            label: label.to_string(),
            score,
            line: i + 1,
        });
    }
    // stable: equal scores keep file order
    rows.sort_by(|a, b| b.score.total_cmp(&a.score));
    Ok(rows)
}

/// First ranked row whose label is a substring of some line of `haystack`.
pub fn find_first_shared<'a>(ranked: &'a [RankedRow], haystack: &str) -> Option<&'a RankedRow> {
    let lines: Vec<&str> = haystack.lines().collect();
    ranked
        .iter()
        .find(|row| lines.iter().any(|l| l.contains(row.label.as_str())))
}

/// Rank `ranked_path`, then search its labels in `shortlist_path`.
pub fn best_match(ranked_path: &Path, shortlist_path: &Path) -> Result<Option<RankedRow>> {
    let source =
        std::fs::read_to_string(ranked_path).map_err(|e| TuneError::io(ranked_path, e))?;
    let ranked = rank_rows(&source, ranked_path)?;
    let shortlist =
        std::fs::read_to_string(shortlist_path).map_err(|e| TuneError::io(shortlist_path, e))?;
    tracing::debug!(
        "searching {} ranked rows of {} in {}",
        ranked.len(),
        ranked_path.display(),
        shortlist_path.display()
    );
    Ok(find_first_shared(&ranked, &shortlist).cloned())
}
