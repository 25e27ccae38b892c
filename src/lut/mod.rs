//! Lookup-table conversion.
//!
//! Turns `best_instances.txt` lines of the form
//! `F32_16_16_0_1.txt:2_256_64_64_4_4_0_1_4_4` into initializer entries for
//! the static instance table:
//! `{"HIP_R_32F_16_16_0_1", {256, 64, 64, 4, 4, {0, 1}, 4, 4}},`.

use std::fmt;
use std::path::Path;

use crate::diagnostic::Diagnostic;
use crate::error::{Result, TuneError};
use crate::span::Span;

pub const DEFAULT_INPUT: &str = "best_instances.txt";
pub const DEFAULT_OUTPUT: &str = "cpp_lut_items.txt";

/// Number of integers in an instance type string.
pub const FIELD_COUNT: usize = 10;

/// One integer of an instance type string.
///
/// Held as normalized decimal text (no `+`, no leading zeros, `-0` is `0`)
/// so values wider than any machine integer pass through unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Field(String);

impl Field {
    /// Accepts surrounding whitespace and an optional sign before the digits.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        let (negative, digits) = match token.as_bytes().first()? {
            b'-' => (true, &token[1..]),
            b'+' => (false, &token[1..]),
            _ => (false, token),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let digits = digits.trim_start_matches('0');
        Some(match (negative, digits.is_empty()) {
            (_, true) => Field("0".to_string()),
            (true, false) => Field(format!("-{}", digits)),
            (false, false) => Field(digits.to_string()),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<i64> for Field {
    fn from(n: i64) -> Self {
        Field(n.to_string())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kernel parameters encoded in an instance type string, in emission order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstanceParams {
    pub num_dim: Field,
    pub block_size: Field,
    pub m0_per_block: Field,
    pub m1_per_block: Field,
    pub m0_per_thread: Field,
    pub m1_per_thread: Field,
    pub cluster_arrange_order: (Field, Field),
    pub in_scalar_per_vector: Field,
    pub out_scalar_per_vector: Field,
}

impl InstanceParams {
    pub fn from_fields(fields: [Field; FIELD_COUNT]) -> Self {
        let [
            num_dim,
            block_size,
            m0_per_block,
            m1_per_block,
            m0_per_thread,
            m1_per_thread,
            order0,
            order1,
            in_scalar_per_vector,
            out_scalar_per_vector,
        ] = fields;
        Self {
            num_dim,
            block_size,
            m0_per_block,
            m1_per_block,
            m0_per_thread,
            m1_per_thread,
            cluster_arrange_order: (order0, order1),
            in_scalar_per_vector,
            out_scalar_per_vector,
        }
    }
}

/// HIP element type named by the leading token of a data file name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HipType {
    R32F,
    R16F,
}

impl HipType {
    /// `F32` selects 32-bit floats; every other tag is treated as half.
    pub fn from_tag(tag: &str) -> Self {
        if tag == "F32" {
            HipType::R32F
        } else {
            HipType::R16F
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            HipType::R32F => "32F",
            HipType::R16F => "16F",
        }
    }
}

/// One lookup-table entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LutEntry {
    pub hip_type: HipType,
    /// Remainder of the data file name after the type tag (sizes + permutation).
    pub shape: String,
    pub params: InstanceParams,
}

impl LutEntry {
    /// Table key, e.g. `HIP_R_32F_16_16_0_1`.
    pub fn key(&self) -> String {
        format!("HIP_R_{}_{}", self.hip_type.suffix(), self.shape)
    }
}

impl fmt::Display for LutEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.params;
        write!(
            f,
            "{{\"{}\", {{{}, {}, {}, {}, {}, {{{}, {}}}, {}, {}}}}},",
            self.key(),
            p.block_size,
            p.m0_per_block,
            p.m1_per_block,
            p.m0_per_thread,
            p.m1_per_thread,
            p.cluster_arrange_order.0,
            p.cluster_arrange_order.1,
            p.in_scalar_per_vector,
            p.out_scalar_per_vector,
        )
    }
}

/// Parse one input line. `raw` is the untrimmed line, `line_no` is 1-based.
///
/// Returns `Ok(None)` for blank lines.
pub fn parse_line(raw: &str, line_no: u32) -> std::result::Result<Option<LutEntry>, Diagnostic> {
    let line = raw.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let invalid = |part: &str, message: String| {
        Diagnostic::warning(message, Span::of_subslice(line_no, raw, part))
            .with_note(format!("Invalid format in line: {}", line))
    };

    let mut halves = line.split(':');
    let (filename, numbers) = match (halves.next(), halves.next(), halves.next()) {
        (Some(f), Some(n), None) => (f, n),
        _ => {
            return Err(invalid(
                line,
                "expected exactly one ':' between file name and instance".to_string(),
            )
            .with_help("lines look like F32_16_16_0_1.txt:2_256_64_64_4_4_0_1_4_4".to_string()))
        }
    };

    let stem = filename
        .strip_suffix(".txt")
        .ok_or_else(|| invalid(filename, "file name does not end in '.txt'".to_string()))?;

    let fields = numbers
        .split('_')
        .map(|token| {
            Field::parse(token)
                .ok_or_else(|| invalid(token, format!("'{}' is not an integer", token)))
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let fields: [Field; FIELD_COUNT] = fields.try_into().map_err(|found: Vec<Field>| {
        invalid(
            numbers,
            format!(
                "expected {} instance fields, found {}",
                FIELD_COUNT,
                found.len()
            ),
        )
    })?;

    let (tag, shape) = stem.split_once('_').unwrap_or((stem, ""));

    Ok(Some(LutEntry {
        hip_type: HipType::from_tag(tag),
        shape: shape.to_string(),
        params: InstanceParams::from_fields(fields),
    }))
}

/// Entries and warnings produced from one input text.
#[derive(Debug, Default)]
pub struct Conversion {
    pub entries: Vec<LutEntry>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Conversion {
    /// Output text: one entry per line, newline-terminated.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&entry.to_string());
            out.push('\n');
        }
        out
    }
}

/// Convert every line of `source`, collecting warnings for skipped lines.
pub fn convert_source(source: &str) -> Conversion {
    let mut conversion = Conversion::default();
    for (i, raw) in source.lines().enumerate() {
        match parse_line(raw, i as u32 + 1) {
            Ok(Some(entry)) => conversion.entries.push(entry),
            Ok(None) => {}
            Err(diag) => conversion.diagnostics.push(diag),
        }
    }
    conversion
}

/// Convert `input` into `output`.
///
/// The input is read before the output is touched, so a missing input never
/// creates or truncates the output file.
pub fn convert_file(input: &Path, output: &Path) -> Result<(String, Conversion)> {
    let source = std::fs::read_to_string(input).map_err(|e| TuneError::io(input, e))?;
    let conversion = convert_source(&source);
    std::fs::write(output, conversion.render()).map_err(|e| TuneError::io(output, e))?;
    tracing::info!(
        "converted {} entries ({} skipped) into {}",
        conversion.entries.len(),
        conversion.diagnostics.len(),
        output.display()
    );
    Ok((source, conversion))
}
