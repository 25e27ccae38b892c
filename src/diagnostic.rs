use std::fmt;

use crate::span::Span;

/// A per-line problem found while reading a tuning artifact.
///
/// Diagnostics never abort an operation; the offending line is skipped and
/// the diagnostic is handed back to the caller for rendering.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub span: Span,
    pub notes: Vec<String>,
    pub help: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Diagnostic {
    pub fn error(message: String, span: Span) -> Self {
        Self {
            severity: Severity::Error,
            message,
            span,
            notes: Vec::new(),
            help: None,
        }
    }

    pub fn warning(message: String, span: Span) -> Self {
        Self {
            severity: Severity::Warning,
            message,
            span,
            notes: Vec::new(),
            help: None,
        }
    }

    pub fn with_note(mut self, note: String) -> Self {
        self.notes.push(note);
        self
    }

    pub fn with_help(mut self, help: String) -> Self {
        self.help = Some(help);
        self
    }

    /// Render the diagnostic to stderr using ariadne.
    ///
    /// `source` is the text the span points into (usually a single line).
    pub fn render(&self, filename: &str, source: &str) {
        use ariadne::{Color, Label, Report, ReportKind, Source};

        let kind = match self.severity {
            Severity::Error => ReportKind::Error,
            Severity::Warning => ReportKind::Warning,
        };

        let color = match self.severity {
            Severity::Error => Color::Red,
            Severity::Warning => Color::Yellow,
        };

        let start = (self.span.start as usize).min(source.len());
        let end = (self.span.end as usize).clamp(start, source.len());
        // Empty or out-of-range spans label the whole line.
        let (start, end) = if start < end {
            (start, end)
        } else {
            (0, source.len())
        };
        if start == end {
            eprintln!("{}", self);
            return;
        }

        let mut report = Report::build(kind, filename, start)
            .with_message(&self.message)
            .with_label(
                Label::new((filename, start..end))
                    .with_message(&self.message)
                    .with_color(color),
            );

        for note in &self.notes {
            report = report.with_note(note);
        }

        if let Some(help) = &self.help {
            report = report.with_help(help);
        }

        if let Err(e) = report.finish().eprint((filename, Source::from(source))) {
            tracing::debug!("cannot render diagnostic: {}", e);
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        if self.span.line > 0 {
            write!(f, "{} (line {}): {}", level, self.span.line, self.message)
        } else {
            write!(f, "{}: {}", level, self.message)
        }
    }
}

/// Render a list of diagnostics raised against the lines of `source`.
///
/// Each diagnostic's span line selects the line it is rendered against.
pub fn render_diagnostics(diagnostics: &[Diagnostic], filename: &str, source: &str) {
    let lines: Vec<&str> = source.lines().collect();
    for diag in diagnostics {
        let line = (diag.span.line as usize)
            .checked_sub(1)
            .and_then(|i| lines.get(i))
            .copied()
            .unwrap_or("");
        let label = format!("{}:{}", filename, diag.span.line);
        diag.render(&label, line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_construction() {
        let d = Diagnostic::warning("invalid format".to_string(), Span::new(3, 4, 9));
        assert_eq!(d.severity, Severity::Warning);
        assert_eq!(d.message, "invalid format");
        assert_eq!(d.span.start, 4);
        assert_eq!(d.span.end, 9);
        assert!(d.notes.is_empty());
        assert!(d.help.is_none());
    }

    #[test]
    fn test_chained_builders() {
        let d = Diagnostic::error("bad score".to_string(), Span::dummy())
            .with_note("note 1".to_string())
            .with_help("use a decimal number".to_string())
            .with_note("note 2".to_string());
        assert_eq!(d.severity, Severity::Error);
        assert_eq!(d.notes, vec!["note 1", "note 2"]);
        assert_eq!(d.help.as_deref(), Some("use a decimal number"));
    }

    #[test]
    fn test_display_includes_line() {
        let d = Diagnostic::warning("expected 10 fields".to_string(), Span::new(12, 0, 3));
        assert_eq!(d.to_string(), "warning (line 12): expected 10 fields");
        let d = Diagnostic::warning("no results".to_string(), Span::dummy());
        assert_eq!(d.to_string(), "warning: no results");
    }

    #[test]
    fn test_render_out_of_range_span_does_not_panic() {
        let d = Diagnostic::warning("past the end".to_string(), Span::new(1, 40, 90));
        d.render("best_instances.txt:1", "F32_16.txt:1_2");
    }

    #[test]
    fn test_render_diagnostics_multiple() {
        let source = "F32_16.txt:1_2\nF16_16.txt:a_b\n";
        let diagnostics = vec![
            Diagnostic::warning("too few fields".to_string(), Span::new(1, 11, 14)),
            Diagnostic::warning("not an integer".to_string(), Span::new(2, 11, 12)),
            Diagnostic::warning("unknown line".to_string(), Span::new(9, 0, 1)),
        ];
        render_diagnostics(&diagnostics, "best_instances.txt", source);
    }
}
