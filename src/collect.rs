//! Pick the winning instance of every sweep output file.
//!
//! Produces the two files the rest of the workflow reads:
//! `best_instances.txt` (`<data file>:<instance>` lines, the converter's
//! input) and `most_frequent.txt` (`<instance>, <wins>` lines, usable as a
//! best-match shortlist).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::best_match::{find_first_shared, RankedRow};
use crate::diagnostic::Diagnostic;
use crate::error::{Result, TuneError};
use crate::results::{best, read_results};
use crate::span::Span;

pub const DEFAULT_BEST_OUTPUT: &str = "best_instances.txt";
pub const DEFAULT_FREQUENCY_OUTPUT: &str = "most_frequent.txt";

/// The instance chosen for one data file.
#[derive(Clone, Debug, PartialEq)]
pub struct Winner {
    pub file_name: String,
    pub label: String,
    pub score: f64,
}

#[derive(Debug, Default)]
pub struct Collection {
    pub winners: Vec<Winner>,
    /// `(label, wins)`, most wins first, ties by label.
    pub frequency: Vec<(String, usize)>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Collection {
    pub fn best_instances_text(&self) -> String {
        let mut out = String::new();
        for w in &self.winners {
            out.push_str(&format!("{}:{}\n", w.file_name, w.label));
        }
        out
    }

    pub fn frequency_text(&self) -> String {
        let mut out = String::new();
        for (label, wins) in &self.frequency {
            out.push_str(&format!("{}, {}\n", label, wins));
        }
        out
    }

    /// Write both output files.
    pub fn save(&self, best_path: &Path, frequency_path: &Path) -> Result<()> {
        std::fs::write(best_path, self.best_instances_text())
            .map_err(|e| TuneError::io(best_path, e))?;
        std::fs::write(frequency_path, self.frequency_text())
            .map_err(|e| TuneError::io(frequency_path, e))?;
        Ok(())
    }
}

/// Whether `name` looks like a sweep output: `<TYPE>_<n>_..._<n>.txt` with
/// at least two numeric tokens after the type tag. Rules out the files
/// `collect` itself writes.
pub fn is_data_file_name(name: &str) -> bool {
    let Some(stem) = name.strip_suffix(".txt") else {
        return false;
    };
    let mut tokens = stem.split('_');
    let tag_ok = tokens.next().is_some_and(|tag| !tag.is_empty());
    let numbers: Vec<&str> = tokens.collect();
    tag_ok
        && numbers.len() >= 2
        && numbers
            .iter()
            .all(|t| !t.is_empty() && t.bytes().all(|b| b.is_ascii_digit()))
}

/// Sweep output files directly inside `dir`, sorted by name.
pub fn data_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| TuneError::io(dir, e))?;
    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(is_data_file_name)
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Choose a winner per data file in `dir`.
///
/// Without a shortlist the top-scoring instance wins. With one, the
/// top-scoring instance that also appears in the shortlist text wins.
pub fn collect_dir(dir: &Path, shortlist: Option<&str>) -> Result<Collection> {
    let mut collection = Collection::default();
    let mut wins: HashMap<String, usize> = HashMap::new();

    for path in data_files(dir)? {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let results = match read_results(&path) {
            Ok(results) => results,
            Err(e) => {
                collection
                    .diagnostics
                    .push(Diagnostic::error(e.to_string(), Span::dummy()));
                continue;
            }
        };

        let chosen = match shortlist {
            None => best(&results).map(|r| (r.label.clone(), r.score)),
            Some(text) => {
                let mut ranked: Vec<RankedRow> = results
                    .iter()
                    .enumerate()
                    .map(|(i, r)| RankedRow {
                        label: r.label.clone(),
                        score: r.score,
                        line: i + 1,
                    })
                    .collect();
                ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
                find_first_shared(&ranked, text).map(|r| (r.label.clone(), r.score))
            }
        };

        match chosen {
            Some((label, score)) => {
                tracing::debug!("{}: {} ({} GB/s)", file_name, label, score);
                *wins.entry(label.clone()).or_default() += 1;
                collection.winners.push(Winner {
                    file_name,
                    label,
                    score,
                });
            }
            None if results.is_empty() => collection.diagnostics.push(
                Diagnostic::warning(
                    format!("no instance results in '{}'", file_name),
                    Span::dummy(),
                )
                .with_note("the tuning run may have failed or been skipped".to_string()),
            ),
            None => collection.diagnostics.push(Diagnostic::warning(
                format!("no shortlisted instance in '{}'", file_name),
                Span::dummy(),
            )),
        }
    }

    let mut frequency: Vec<(String, usize)> = wins.into_iter().collect();
    frequency.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    collection.frequency = frequency;
    Ok(collection)
}
