//! Completion candidates and the rules for merging them.
//!
//! A [`Suggestion`] replaces one [`TextRange`] of the input with new text.
//! Suggestions produced by different nodes may cover different ranges; before
//! they are shown together they are widened to a common range with
//! [`Suggestion::expand`], deduplicated, and sorted.

mod builder;

pub use builder::SuggestionsBuilder;

use std::cmp::Ordering;
use std::future::Future;
use std::pin::Pin;

use cmdtree_diagnostics::TextRange;
use indexmap::IndexMap;

/// A pending set of suggestions.
///
/// Built-in argument types return already-completed futures; custom types may
/// complete later (e.g. after a lookup).
pub type SuggestionFuture = Pin<Box<dyn Future<Output = Suggestions> + Send>>;

// ── Suggestion ──────────────────────────────────────────────────────────

/// One completion candidate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Suggestion {
    range: TextRange,
    text: String,
    tooltip: Option<String>,
    int_value: Option<i32>,
}

impl Suggestion {
    /// A text suggestion for `range`.
    pub fn new(range: TextRange, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
            tooltip: None,
            int_value: None,
        }
    }

    /// A numeric suggestion; sorts by value among other numeric suggestions.
    pub fn integer(range: TextRange, value: i32) -> Self {
        Self {
            range,
            text: value.to_string(),
            tooltip: None,
            int_value: Some(value),
        }
    }

    /// Attach a tooltip.
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// Range of the input this suggestion replaces.
    pub fn range(&self) -> TextRange {
        self.range
    }

    /// Replacement text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Optional hover text.
    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }

    /// Numeric value, for suggestions created with [`Suggestion::integer`].
    pub fn int_value(&self) -> Option<i32> {
        self.int_value
    }

    /// Replace this suggestion's range in `input` with its text.
    ///
    /// A range reaching past the end of `input` (or splitting a character)
    /// keeps all of `input` before the text and nothing after it.
    pub fn apply(&self, input: &str) -> String {
        if self.range.start == 0 && self.range.end == input.len() {
            return self.text.clone();
        }
        let before = input.get(..self.range.start).unwrap_or(input);
        let after = input.get(self.range.end..).unwrap_or_default();
        let mut result = String::with_capacity(before.len() + self.text.len() + after.len());
        result.push_str(before);
        result.push_str(&self.text);
        result.push_str(after);
        result
    }

    /// Widen this suggestion to `range`, copying the surrounding text of
    /// `command` into the replacement so applying it has the same effect.
    ///
    /// `range` must contain this suggestion's range. Parts of `range` that
    /// `command` does not cover contribute no text.
    pub fn expand(&self, command: &str, range: TextRange) -> Suggestion {
        if range == self.range {
            return self.clone();
        }
        let mut text = String::new();
        if range.start < self.range.start {
            text.push_str(command.get(range.start..self.range.start).unwrap_or_default());
        }
        text.push_str(&self.text);
        if range.end > self.range.end {
            text.push_str(command.get(self.range.end..range.end).unwrap_or_default());
        }
        Suggestion {
            range,
            text,
            tooltip: self.tooltip.clone(),
            int_value: None,
        }
    }

    /// Ordering used when presenting suggestions: numeric suggestions first,
    /// by value, then text case-insensitively.
    pub fn compare_ignore_case(&self, other: &Suggestion) -> Ordering {
        match (self.int_value, other.int_value) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self
                .text
                .to_lowercase()
                .cmp(&other.text.to_lowercase()),
        }
    }
}

// ── Suggestions ─────────────────────────────────────────────────────────

/// A sorted set of suggestions sharing one range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Suggestions {
    range: TextRange,
    list: Vec<Suggestion>,
}

impl Suggestions {
    /// No suggestions.
    pub fn empty() -> Self {
        Self::default()
    }

    /// An already-completed future yielding no suggestions.
    pub fn empty_future() -> SuggestionFuture {
        Box::pin(std::future::ready(Self::empty()))
    }

    /// The range every suggestion in the set covers.
    pub fn range(&self) -> TextRange {
        self.range
    }

    /// The suggestions in presentation order.
    pub fn list(&self) -> &[Suggestion] {
        &self.list
    }

    /// Whether the set has no suggestions.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Combine sets produced for the same `command`.
    pub fn merge(command: &str, input: Vec<Suggestions>) -> Suggestions {
        match input.len() {
            0 => Suggestions::empty(),
            1 => input.into_iter().next().unwrap_or_default(),
            _ => Suggestions::create(
                command,
                input.into_iter().flat_map(|suggestions| suggestions.list),
            ),
        }
    }

    /// Build a set from loose suggestions.
    ///
    /// Every suggestion is expanded to the range covering all of them,
    /// duplicates (same range and text) are dropped keeping the first, and
    /// the rest are sorted stably with [`Suggestion::compare_ignore_case`].
    pub fn create(command: &str, suggestions: impl IntoIterator<Item = Suggestion>) -> Suggestions {
        let suggestions: Vec<Suggestion> = suggestions.into_iter().collect();
        let Some(range) = suggestions
            .iter()
            .map(Suggestion::range)
            .reduce(TextRange::encompassing)
        else {
            return Suggestions::empty();
        };

        let mut unique: IndexMap<(TextRange, String), Suggestion> = IndexMap::new();
        for suggestion in &suggestions {
            let expanded = suggestion.expand(command, range);
            unique
                .entry((expanded.range, expanded.text.clone()))
                .or_insert(expanded);
        }
        let mut list: Vec<Suggestion> = unique.into_values().collect();
        list.sort_by(Suggestion::compare_ignore_case);
        Suggestions { range, list }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: usize, end: usize) -> TextRange {
        TextRange::between(start, end)
    }

    // ── apply ───────────────────────────────────────────────────────────

    #[test]
    fn apply_insertion_at_start() {
        let s = Suggestion::new(range(0, 0), "And so I said: ");
        assert_eq!(s.apply("Hello world!"), "And so I said: Hello world!");
    }

    #[test]
    fn apply_insertion_in_middle() {
        let s = Suggestion::new(range(6, 6), "small ");
        assert_eq!(s.apply("Hello world!"), "Hello small world!");
    }

    #[test]
    fn apply_replacement_at_end() {
        let s = Suggestion::new(range(6, 12), "Rust!");
        assert_eq!(s.apply("Hello world!"), "Hello Rust!");
    }

    #[test]
    fn apply_replacement_everything() {
        let s = Suggestion::new(range(0, 12), "Oh dear.");
        assert_eq!(s.apply("Hello world!"), "Oh dear.");
    }

    #[test]
    fn apply_leaves_rest_untouched() {
        let input = "give bob apple 3";
        let s = Suggestion::new(range(9, 14), "arrow");
        let out = s.apply(input);
        assert_eq!(out, "give bob arrow 3");
        assert_eq!(&out[..9], &input[..9]);
        assert_eq!(&out[14..], &input[14..]);
    }

    #[test]
    fn apply_to_shorter_input_does_not_panic() {
        let s = Suggestion::new(range(5, 9), "apple");
        assert_eq!(s.apply("give"), "giveapple");
        assert_eq!(s.apply("give ap"), "give apple");
    }

    #[test]
    fn expand_past_command_end_does_not_panic() {
        let s = Suggestion::new(range(2, 3), "b");
        let expanded = s.expand("xa", range(0, 5));
        assert_eq!(expanded.text(), "xab");
        assert_eq!(expanded.range(), range(0, 5));
    }

    // ── expand ──────────────────────────────────────────────────────────

    #[test]
    fn expand_unchanged() {
        let s = Suggestion::new(range(1, 1), "oo");
        assert_eq!(s.expand("f", range(1, 1)), s);
    }

    #[test]
    fn expand_left_and_right() {
        let s = Suggestion::new(range(2, 3), "l");
        let expanded = s.expand("hello", range(0, 5));
        assert_eq!(expanded, Suggestion::new(range(0, 5), "hello"));
        assert_eq!(expanded.apply("hello"), s.apply("hello"));
    }

    #[test]
    fn expand_keeps_tooltip() {
        let s = Suggestion::new(range(1, 1), "x").with_tooltip("tip");
        assert_eq!(s.expand("ab", range(0, 2)).tooltip(), Some("tip"));
    }

    // ── merge / create ──────────────────────────────────────────────────

    #[test]
    fn merge_empty() {
        assert!(Suggestions::merge("foo b", vec![]).is_empty());
    }

    #[test]
    fn merge_single_is_identity() {
        let s = Suggestions::create("foo b", [Suggestion::new(range(5, 5), "ar")]);
        assert_eq!(Suggestions::merge("foo b", vec![s.clone()]), s);
    }

    #[test]
    fn merge_multiple_dedups_and_sorts() {
        let a = Suggestions::create(
            "foo b",
            [
                Suggestion::new(range(5, 5), "ar"),
                Suggestion::new(range(5, 5), "az"),
                Suggestion::new(range(5, 5), "Az"),
            ],
        );
        let b = Suggestions::create(
            "foo b",
            [
                Suggestion::new(range(4, 5), "foo"),
                Suggestion::new(range(4, 5), "qux"),
                Suggestion::new(range(4, 5), "apple"),
                Suggestion::new(range(4, 5), "Bar"),
            ],
        );
        let merged = Suggestions::merge("foo b", vec![a, b]);
        assert_eq!(merged.range(), range(4, 5));
        let texts: Vec<&str> = merged.list().iter().map(Suggestion::text).collect();
        assert_eq!(texts, ["apple", "bar", "Bar", "baz", "bAz", "foo", "qux"]);
    }

    #[test]
    fn create_sorts_numbers_before_text() {
        let s = Suggestions::create(
            "",
            [
                Suggestion::new(range(0, 0), "alpha"),
                Suggestion::integer(range(0, 0), 10),
                Suggestion::integer(range(0, 0), 9),
                Suggestion::new(range(0, 0), "Beta"),
            ],
        );
        let texts: Vec<&str> = s.list().iter().map(Suggestion::text).collect();
        assert_eq!(texts, ["9", "10", "alpha", "Beta"]);
    }

    #[test]
    fn create_dedups_on_range_and_text() {
        let s = Suggestions::create(
            "x",
            [
                Suggestion::new(range(0, 1), "a"),
                Suggestion::new(range(0, 1), "a").with_tooltip("second"),
            ],
        );
        assert_eq!(s.list().len(), 1);
        assert_eq!(s.list()[0].tooltip(), None);
    }

    #[test]
    fn empty_future_is_ready() {
        let s = futures_lite::future::block_on(Suggestions::empty_future());
        assert!(s.is_empty());
    }
}
