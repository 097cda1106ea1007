//! Pretty diagnostic rendering using ariadne.
//!
//! Converts [`Diagnostic`]s into ariadne [`Report`]s pointing into the
//! command line they came from. Falls back to structured JSON when the output
//! is piped or when the user explicitly requests it.

use std::io::{self, IsTerminal};

use std::ops::Range;

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use cmdtree_diagnostics::{Diagnostic, Severity, TextRange};

/// Name shown for the command line in rendered reports.
pub(crate) const SOURCE_NAME: &str = "<command>";

// ── Output format ───────────────────────────────────────────────────────

/// Output format for results and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Coloured, source-annotated output (ariadne).
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Use the explicit choice, else pretty for terminals and JSON for pipes.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            _ => {
                if io::stdout().is_terminal() {
                    Format::Pretty
                } else {
                    Format::Json
                }
            }
        }
    }
}

// ── Severity mapping ────────────────────────────────────────────────────

fn report_kind(severity: Severity) -> ReportKind<'static> {
    match severity {
        Severity::Error => ReportKind::Error,
        _ => ReportKind::Warning,
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::Warn => Color::Yellow,
        _ => Color::White,
    }
}

// ── Pretty rendering ────────────────────────────────────────────────────

/// Render diagnostics against `source` (one command line) to stderr.
///
/// Diagnostics with a range get an underlined excerpt; the rest are printed
/// as standalone messages.
pub(crate) fn render_diagnostics_pretty(source: &str, diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }

    let config = Config::default()
        .with_compact(false)
        .with_index_type(IndexType::Byte);
    let mut cache = (SOURCE_NAME, Source::from(source));

    for diag in diagnostics {
        if let Some(span) = diag.range.and_then(|range| visible_span(source, range)) {
            let (start, end) = (span.start, span.end);
            let mut builder = Report::build(report_kind(diag.severity), (SOURCE_NAME, start..end))
                .with_code(diag.id.as_ref())
                .with_message(&diag.message)
                .with_config(config);

            builder = builder.with_label(
                Label::new((SOURCE_NAME, start..end))
                    .with_message(make_label_message(diag))
                    .with_color(severity_color(diag.severity)),
            );

            if let Some(explanation) = diag.explain() {
                builder = builder.with_help(explanation);
            }

            builder.finish().eprint(&mut cache).ok();
        } else {
            eprintln!("{}[{}]: {}", diag.severity, diag.id, diag.message);
            if let Some(note) = context_note(diag) {
                eprintln!("  = note: {note}");
            }
            if let Some(explanation) = diag.explain() {
                eprintln!("  = help: {explanation}");
            }
        }
    }
}

/// Byte span to underline, clamped to `source`. Empty ranges are widened to
/// the neighbouring character so the marker stays visible; `None` for an
/// empty source.
fn visible_span(source: &str, range: TextRange) -> Option<Range<usize>> {
    let start = range.start.min(source.len());
    let end = range.end.min(source.len()).max(start);
    if start < end {
        return Some(start..end);
    }
    if let Some(c) = source[start..].chars().next() {
        return Some(start..start + c.len_utf8());
    }
    let c = source[..start].chars().next_back()?;
    Some(start - c.len_utf8()..start)
}

/// `key=value` pairs from the diagnostic context, skipping the echoed input.
fn context_note(diag: &Diagnostic) -> Option<String> {
    let ctx = diag.context.as_ref()?;
    let pairs: Vec<String> = ctx
        .iter()
        .filter(|(k, _)| k.as_str() != "input")
        .map(|(k, v)| format!("{k}={v}"))
        .collect();
    (!pairs.is_empty()).then(|| pairs.join(", "))
}

/// A concise label: the structured context when there is any, the message
/// otherwise.
fn make_label_message(diag: &Diagnostic) -> String {
    context_note(diag).unwrap_or_else(|| diag.message.clone())
}

// ── Summary line ────────────────────────────────────────────────────────

/// Print a coloured summary line such as `1 error, 2 warnings`.
pub(crate) fn print_summary(diagnostics: &[Diagnostic]) {
    use ariadne::Fmt;

    let (mut errors, mut warnings) = (0usize, 0usize);
    for d in diagnostics {
        match d.severity {
            Severity::Error => errors += 1,
            _ => warnings += 1,
        }
    }
    if errors + warnings == 0 {
        return;
    }

    let mut parts = Vec::new();
    if errors > 0 {
        let s = if errors == 1 { "" } else { "s" };
        parts.push(format!("{}", format!("{errors} error{s}").fg(Color::Red)));
    }
    if warnings > 0 {
        let s = if warnings == 1 { "" } else { "s" };
        parts.push(format!(
            "{}",
            format!("{warnings} warning{s}").fg(Color::Yellow)
        ));
    }
    eprintln!("{}", parts.join(", "));
}
