use cmdtree_diagnostics::TextRange;

use super::{Suggestion, SuggestionFuture, Suggestions};

/// Collects suggestions for the input from `start` to the end.
///
/// Argument types and suggestion providers receive one of these, add
/// candidates, and return [`SuggestionsBuilder::build_future`].
#[derive(Debug, Clone)]
pub struct SuggestionsBuilder {
    input: String,
    start: usize,
    result: Vec<Suggestion>,
}

impl SuggestionsBuilder {
    /// Suggest replacements for `input[start..]`.
    pub fn new(input: impl Into<String>, start: usize) -> Self {
        Self {
            input: input.into(),
            start,
            result: Vec::new(),
        }
    }

    /// The (possibly truncated) input completions are computed for.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Start of the range being completed.
    pub fn start(&self) -> usize {
        self.start
    }

    /// The text being completed.
    pub fn remaining(&self) -> &str {
        &self.input[self.start..]
    }

    /// The text being completed, lowercased.
    ///
    /// Lowercasing can change the byte length of individual characters, so
    /// only the remaining text is lowercased, never the whole input.
    pub fn remaining_lower_case(&self) -> String {
        self.remaining().to_lowercase()
    }

    fn range(&self) -> TextRange {
        TextRange::between(self.start, self.input.len())
    }

    /// Suggest `text` for the remaining input. Skipped when it equals the
    /// remaining input already.
    pub fn suggest(&mut self, text: impl Into<String>) -> &mut Self {
        let text = text.into();
        if text != self.remaining() {
            self.result.push(Suggestion::new(self.range(), text));
        }
        self
    }

    /// Like [`suggest`](Self::suggest) with a tooltip.
    pub fn suggest_with_tooltip(
        &mut self,
        text: impl Into<String>,
        tooltip: impl Into<String>,
    ) -> &mut Self {
        let text = text.into();
        if text != self.remaining() {
            self.result
                .push(Suggestion::new(self.range(), text).with_tooltip(tooltip));
        }
        self
    }

    /// Suggest a number. Skipped when it equals the remaining input already.
    pub fn suggest_int(&mut self, value: i32) -> &mut Self {
        if value.to_string() != self.remaining() {
            self.result.push(Suggestion::integer(self.range(), value));
        }
        self
    }

    /// Copy every suggestion collected by `other`.
    pub fn add(&mut self, other: &SuggestionsBuilder) -> &mut Self {
        self.result.extend(other.result.iter().cloned());
        self
    }

    /// A fresh builder over the same input starting at `start`.
    pub fn create_offset(&self, start: usize) -> SuggestionsBuilder {
        SuggestionsBuilder {
            input: self.input.clone(),
            start,
            result: Vec::new(),
        }
    }

    /// A fresh builder at the same position.
    pub fn restart(&self) -> SuggestionsBuilder {
        self.create_offset(self.start)
    }

    /// Finish into a sorted, deduplicated set.
    pub fn build(&self) -> Suggestions {
        Suggestions::create(&self.input, self.result.iter().cloned())
    }

    /// Finish into an already-completed future.
    pub fn build_future(&self) -> SuggestionFuture {
        Box::pin(std::future::ready(self.build()))
    }
}
