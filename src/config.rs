use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Result, TuneError};
use crate::sweep::SweepConfig;

pub const CONFIG_FILE: &str = "permtune.toml";

/// Optional overrides for sweep parameters.
///
/// `[sweep]` applies to every rank; `[sweep.rankN]` applies on top of it
/// for rank N only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SweepOverrides {
    pub min_size: Option<u64>,
    pub max_size: Option<u64>,
    pub max_product: Option<u64>,
    pub step: Option<u64>,
    pub data_types: Option<Vec<String>>,
    pub command: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

impl SweepOverrides {
    pub fn apply(&self, config: &mut SweepConfig) {
        if let Some(v) = self.min_size {
            config.min_size = v;
        }
        if let Some(v) = self.max_size {
            config.max_size = v;
        }
        if let Some(v) = self.max_product {
            config.max_product = v;
        }
        if let Some(v) = self.step {
            config.step = v;
        }
        if let Some(ref v) = self.data_types {
            config.data_types = v.clone();
        }
        if let Some(ref v) = self.command {
            config.command = v.clone();
        }
        if let Some(ref v) = self.output_dir {
            config.output_dir = v.clone();
        }
    }
}

/// Settings from permtune.toml. Relative paths resolve against the
/// directory holding the file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TuneConfig {
    pub convert_input: Option<PathBuf>,
    pub convert_output: Option<PathBuf>,
    pub sweep: SweepOverrides,
    pub ranks: HashMap<usize, SweepOverrides>,
}

/// Parse a minimal TOML string array: `["a", "b", "c"]` → `vec!["a", "b", "c"]`.
fn parse_string_array(s: &str) -> Option<Vec<String>> {
    let s = s.trim();
    if !s.starts_with('[') || !s.ends_with(']') {
        return None;
    }
    let inner = &s[1..s.len() - 1];
    Some(
        inner
            .split(',')
            .map(|part| part.trim().trim_matches('"').to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    )
}

fn parse_int(key: &str, value: &str, line: usize) -> Result<u64> {
    value.replace('_', "").parse().map_err(|_| {
        TuneError::Config(format!(
            "line {}: '{}' expects an integer, found '{}'",
            line, key, value
        ))
    })
}

fn set_sweep_key(
    overrides: &mut SweepOverrides,
    key: &str,
    value: &str,
    line: usize,
    root: &Path,
) -> Result<()> {
    match key {
        "min_size" => overrides.min_size = Some(parse_int(key, value, line)?),
        "max_size" => overrides.max_size = Some(parse_int(key, value, line)?),
        "max_product" => overrides.max_product = Some(parse_int(key, value, line)?),
        "step" => overrides.step = Some(parse_int(key, value, line)?),
        "data_types" => {
            let types = parse_string_array(value).ok_or_else(|| {
                TuneError::Config(format!("line {}: 'data_types' expects an array", line))
            })?;
            overrides.data_types = Some(types);
        }
        "command" => overrides.command = Some(resolve_command(root, value.trim_matches('"'))),
        "output_dir" => overrides.output_dir = Some(root.join(value.trim_matches('"'))),
        _ => tracing::debug!("ignoring unknown sweep key '{}'", key),
    }
    Ok(())
}

/// Paths with a directory component resolve against `root`; bare program
/// names are left for PATH lookup.
fn resolve_command(root: &Path, command: &str) -> PathBuf {
    let path = Path::new(command);
    if path.is_absolute() || path.components().count() == 1 {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

impl TuneConfig {
    /// Load settings from a permtune.toml file.
    pub fn load(toml_path: &Path) -> Result<TuneConfig> {
        let content =
            std::fs::read_to_string(toml_path).map_err(|e| TuneError::io(toml_path, e))?;
        let root = toml_path.parent().unwrap_or(Path::new("."));
        Self::parse(&content, root)
    }

    /// Section-aware minimal TOML parsing.
    pub fn parse(content: &str, root: &Path) -> Result<TuneConfig> {
        let mut config = TuneConfig::default();
        let mut current_section = String::new();

        for (i, line) in content.lines().enumerate() {
            let line_no = i + 1;
            let trimmed = line.trim();
            if trimmed.starts_with('#') || trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with('[') && trimmed.ends_with(']') {
                current_section = trimmed[1..trimmed.len() - 1].trim().to_string();
                continue;
            }
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(TuneError::Config(format!(
                    "line {}: expected 'key = value'",
                    line_no
                )));
            };
            let key = key.trim().trim_matches('"');
            let value = value.trim();

            if current_section == "convert" {
                let value = root.join(value.trim_matches('"'));
                match key {
                    "input" => config.convert_input = Some(value),
                    "output" => config.convert_output = Some(value),
                    _ => {}
                }
            } else if current_section == "sweep" {
                set_sweep_key(&mut config.sweep, key, value, line_no, root)?;
            } else if let Some(rank) = current_section.strip_prefix("sweep.rank") {
                let rank: usize = rank.parse().map_err(|_| {
                    TuneError::Config(format!(
                        "line {}: bad section name '[{}]'",
                        line_no, current_section
                    ))
                })?;
                let overrides = config.ranks.entry(rank).or_default();
                set_sweep_key(overrides, key, value, line_no, root)?;
            }
        }

        Ok(config)
    }

    /// Try to find a permtune.toml in the given directory or its ancestors.
    pub fn find(start_dir: &Path) -> Option<PathBuf> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.exists() {
                return Some(candidate);
            }
            if !dir.pop() {
                return None;
            }
        }
    }

    /// Rank preset with `[sweep]` and `[sweep.rankN]` applied.
    pub fn sweep_config(&self, rank: usize) -> Result<SweepConfig> {
        let mut config = SweepConfig::preset(rank)?;
        self.sweep.apply(&mut config);
        if let Some(overrides) = self.ranks.get(&rank) {
            overrides.apply(&mut config);
        }
        Ok(config)
    }
}
