use crate::context::CommandContext;
use crate::error::{CommandResult, SyntaxErrorKind};
use crate::reader::TextReader;
use crate::suggestion::{SuggestionFuture, SuggestionsBuilder};

use super::ArgumentType;

/// How much input a [`StringArgument`] consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StringKind {
    /// One unquoted word.
    SingleWord,
    /// A word, or a `"`/`'` quoted phrase with escapes.
    QuotablePhrase,
    /// The rest of the input, verbatim.
    GreedyPhrase,
}

/// A string argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringArgument {
    kind: StringKind,
}

impl StringArgument {
    /// A string argument of the given kind.
    pub fn new(kind: StringKind) -> Self {
        Self { kind }
    }

    /// How much input this argument consumes.
    pub fn kind(&self) -> StringKind {
        self.kind
    }
}

impl<S> ArgumentType<S> for StringArgument {
    type Value = String;

    fn parse(&self, reader: &mut TextReader<'_>) -> CommandResult<String> {
        match self.kind {
            StringKind::GreedyPhrase => {
                let text = reader.remaining().to_owned();
                reader.set_cursor(reader.total_length());
                Ok(text)
            }
            StringKind::SingleWord => Ok(reader.read_unquoted_string().to_owned()),
            StringKind::QuotablePhrase => reader.read_string(),
        }
    }

    fn examples(&self) -> Vec<String> {
        let examples: &[&str] = match self.kind {
            StringKind::SingleWord => &["word", "words_with_underscores"],
            StringKind::QuotablePhrase => &["\"quoted phrase\"", "word", "\"\""],
            StringKind::GreedyPhrase => &["word", "words with spaces", "\"and symbols\""],
        };
        examples.iter().map(|s| (*s).to_owned()).collect()
    }
}

/// Quote `input` unless every character may appear in an unquoted string.
pub fn escape_if_required(input: &str) -> String {
    if input.chars().all(TextReader::is_allowed_in_unquoted_string) {
        return input.to_owned();
    }
    let mut result = String::with_capacity(input.len() + 2);
    result.push('"');
    for c in input.chars() {
        if c == '\\' || c == '"' {
            result.push('\\');
        }
        result.push(c);
    }
    result.push('"');
    result
}

/// One unquoted word out of a fixed set of options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermArgument {
    options: Vec<String>,
}

impl TermArgument {
    /// Accept exactly the given words.
    pub fn new<I, T>(options: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    /// The accepted words, in declaration order.
    pub fn options(&self) -> &[String] {
        &self.options
    }
}

impl<S> ArgumentType<S> for TermArgument {
    type Value = String;

    fn parse(&self, reader: &mut TextReader<'_>) -> CommandResult<String> {
        let start = reader.cursor();
        let term = reader.read_unquoted_string();
        if !self.options.iter().any(|option| option == term) {
            reader.set_cursor(start);
            return Err(SyntaxErrorKind::InvalidTerm(term.to_owned()).create_with_context(reader));
        }
        Ok(term.to_owned())
    }

    fn suggestions(
        &self,
        _context: &CommandContext<S>,
        mut builder: SuggestionsBuilder,
    ) -> SuggestionFuture {
        let remaining = builder.remaining_lower_case();
        for option in &self.options {
            if option.to_lowercase().starts_with(&remaining) {
                builder.suggest(option.clone());
            }
        }
        builder.build_future()
    }

    fn examples(&self) -> Vec<String> {
        self.options.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse<T: ArgumentType<()>>(arg: &T, input: &str) -> (CommandResult<T::Value>, usize) {
        let mut reader = TextReader::new(input);
        let result = arg.parse(&mut reader);
        (result, reader.cursor())
    }

    #[test]
    fn word_stops_at_space() {
        let (value, cursor) = parse(&StringArgument::new(StringKind::SingleWord), "hello world");
        assert_eq!(value.unwrap(), "hello");
        assert_eq!(cursor, 5);
    }

    #[test]
    fn quotable_reads_quoted_phrase() {
        let (value, cursor) =
            parse(&StringArgument::new(StringKind::QuotablePhrase), "\"hello world\" x");
        assert_eq!(value.unwrap(), "hello world");
        assert_eq!(cursor, 13);
    }

    #[test]
    fn greedy_takes_everything() {
        let mut reader = TextReader::new("say Hello world! This is a test.");
        reader.set_cursor(4);
        let value =
            ArgumentType::<()>::parse(&StringArgument::new(StringKind::GreedyPhrase), &mut reader)
                .unwrap();
        assert_eq!(value, "Hello world! This is a test.");
        assert!(!reader.can_read());
    }

    #[test]
    fn escape_if_required_cases() {
        assert_eq!(escape_if_required("hello"), "hello");
        assert_eq!(escape_if_required(""), "");
        assert_eq!(escape_if_required("hello world"), "\"hello world\"");
        assert_eq!(escape_if_required("Hello \"World\""), r#""Hello \"World\"""#);
        assert_eq!(escape_if_required("\\"), r#""\\""#);
    }

    #[test]
    fn escaped_text_reads_back() {
        let original = "quote \" and slash \\";
        let escaped = escape_if_required(original);
        let mut reader = TextReader::new(&escaped);
        assert_eq!(reader.read_string().unwrap(), original);
    }

    #[test]
    fn term_accepts_options() {
        let (value, _) = parse(&TermArgument::new(["hello", "world"]), "hello");
        assert_eq!(value.unwrap(), "hello");
    }

    #[test]
    fn term_rejects_others() {
        let (value, cursor) = parse(&TermArgument::new(["hello", "world"]), "foo");
        let err = value.unwrap_err();
        assert_eq!(err.kind(), &SyntaxErrorKind::InvalidTerm("foo".into()));
        assert_eq!(cursor, 0);
    }
}
