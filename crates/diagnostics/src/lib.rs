//! Diagnostics for cmdtree.
//!
//! Provides [`TextRange`], [`Severity`], and [`Diagnostic`] types used to
//! report errors and warnings from the command reader, parser, dispatcher, and
//! tree analysis. Diagnostic codes are defined in the [`codes`] module.

#![warn(missing_docs)]

/// Diagnostic ID constants.
pub mod codes;

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

// ── TextRange ───────────────────────────────────────────────────────────

/// Half-open `[start, end)` byte range into a command line.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TextRange {
    /// Byte offset of the first character (0-based).
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl TextRange {
    /// Create a range covering `[start, end)`.
    ///
    /// Panics if `end < start`.
    pub fn between(start: usize, end: usize) -> Self {
        assert!(end >= start, "TextRange end ({end}) < start ({start})");
        Self { start, end }
    }

    /// Create a zero-width range at the given position.
    pub fn at(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Smallest range containing both `a` and `b`.
    pub fn encompassing(a: TextRange, b: TextRange) -> Self {
        Self {
            start: a.start.min(b.start),
            end: a.end.max(b.end),
        }
    }

    /// Slice `text` by this range.
    ///
    /// Panics if the range is out of bounds or not on a char boundary.
    pub fn get<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }

    /// Whether the range covers no characters.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Number of bytes covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether `pos` lies inside the range, counting both ends as inside.
    pub fn touches(&self, pos: usize) -> bool {
        self.start <= pos && pos <= self.end
    }
}

impl std::fmt::Display for TextRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

// ── Severity ────────────────────────────────────────────────────────────

/// Severity level for a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Severity {
    /// The command line cannot be executed.
    Error,
    /// The command tree or input may behave unexpectedly.
    Warn,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warn => write!(f, "warn"),
        }
    }
}

// ── Diagnostic ──────────────────────────────────────────────────────────

/// A diagnostic message produced while reading, parsing, or executing a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Diagnostic code (e.g., `"CMD3001"`).
    pub id: Cow<'static, str>,
    /// Severity level.
    pub severity: Severity,
    /// Human-readable message, without positional context.
    pub message: String,
    /// Range in the command line this diagnostic points at.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<TextRange>,
    /// Machine-readable context for tooling (`"input"`, `"found"`, `"min"`, ...).
    ///
    /// `BTreeMap` keeps serialized key order deterministic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, String>>,
}

impl Diagnostic {
    /// Create a diagnostic with the given fields.
    pub fn new(
        id: impl Into<Cow<'static, str>>,
        severity: Severity,
        message: impl Into<String>,
        range: Option<TextRange>,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            message: message.into(),
            range,
            context: None,
        }
    }

    /// Shorthand for an `Error` diagnostic.
    pub fn error(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        range: Option<TextRange>,
    ) -> Self {
        Self::new(id, Severity::Error, message, range)
    }

    /// Shorthand for a `Warn` diagnostic.
    pub fn warn(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        range: Option<TextRange>,
    ) -> Self {
        Self::new(id, Severity::Warn, message, range)
    }

    /// Attach machine-readable context metadata (builder pattern).
    pub fn with_context(mut self, ctx: BTreeMap<String, String>) -> Self {
        self.context = Some(ctx);
        self
    }

    /// Returns the human-readable explanation for this diagnostic's code, if available.
    pub fn explain(&self) -> Option<&'static str> {
        explain(&self.id)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.id, self.message)
    }
}

/// Returns the human-readable explanation for a diagnostic code, if known.
pub fn explain(id: &str) -> Option<&'static str> {
    codes::explanation(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── TextRange ───────────────────────────────────────────────────────

    #[test]
    fn range_between_and_at() {
        let r = TextRange::between(2, 5);
        assert_eq!((r.start, r.end), (2, 5));
        assert_eq!(r.len(), 3);
        assert!(!r.is_empty());
        assert!(TextRange::at(4).is_empty());
    }

    #[test]
    #[should_panic(expected = "TextRange end (1) < start (3)")]
    fn range_inverted_panics() {
        TextRange::between(3, 1);
    }

    #[test]
    fn range_encompassing() {
        let a = TextRange::between(4, 6);
        let b = TextRange::between(1, 3);
        assert_eq!(TextRange::encompassing(a, b), TextRange::between(1, 6));
        assert_eq!(TextRange::encompassing(b, a), TextRange::between(1, 6));
    }

    #[test]
    fn range_get_and_touches() {
        let r = TextRange::between(5, 8);
        assert_eq!(r.get("give bob 3"), "bob");
        assert!(r.touches(5));
        assert!(r.touches(8));
        assert!(!r.touches(9));
    }

    #[test]
    fn range_display() {
        assert_eq!(TextRange::between(0, 4).to_string(), "[0, 4)");
    }

    // ── Diagnostic ──────────────────────────────────────────────────────

    #[test]
    fn diagnostic_display() {
        let d = Diagnostic::error(codes::UNKNOWN_COMMAND, "Unknown command", None);
        assert_eq!(d.to_string(), "error[CMD3001]: Unknown command");
    }

    #[test]
    fn diagnostic_warn_constructor() {
        let d = Diagnostic::warn(codes::AMBIGUOUS_INPUT, "ambiguous", Some(TextRange::at(0)));
        assert_eq!(d.severity, Severity::Warn);
        assert_eq!(d.range, Some(TextRange::at(0)));
    }

    #[test]
    fn all_codes_have_explanations() {
        for code in codes::ALL {
            assert!(
                explain(code).is_some(),
                "diagnostic code {code} has no explain() entry"
            );
        }
    }

    #[test]
    fn codes_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for code in codes::ALL {
            assert!(seen.insert(*code), "duplicate code {code}");
        }
    }

    #[test]
    fn explain_unknown_code() {
        assert!(explain("CMD9999").is_none());
    }

    #[test]
    fn diagnostic_serde_omits_none_fields() {
        let d = Diagnostic::error(codes::LITERAL_INCORRECT, "Expected literal heal", None);
        let json = serde_json::to_string(&d).unwrap();
        assert!(!json.contains("range"), "None range should be omitted: {json}");
        assert!(!json.contains("context"), "None context should be omitted: {json}");
    }

    #[test]
    fn diagnostic_context_roundtrip() {
        let d = Diagnostic::error(codes::NUMBER_TOO_HIGH, "too big", Some(TextRange::between(5, 8)))
            .with_context(BTreeMap::from([
                ("found".into(), "300".into()),
                ("max".into(), "64".into()),
            ]));
        let json = serde_json::to_string(&d).unwrap();
        let back: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(d, back);
        assert!(json.find("found").unwrap() < json.find("max").unwrap());
    }
}
