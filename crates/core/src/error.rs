//! Typed errors for reading, parsing, building, and executing commands.

use std::collections::BTreeMap;
use std::fmt;

use cmdtree_diagnostics::{Diagnostic, TextRange, codes};

use crate::reader::TextReader;
use crate::tree::NodeId;

/// Number of input characters shown before the cursor in an error context.
const CONTEXT_AMOUNT: usize = 10;

/// Shorthand for results carrying a [`CommandSyntaxError`].
pub type CommandResult<T> = Result<T, CommandSyntaxError>;

/// What went wrong, with the values interpolated into the message.
///
/// The `Display` output is the message template with its arguments; the
/// positional context lives on [`CommandSyntaxError`].
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyntaxErrorKind {
    // -- Lexical --
    /// A quoted string was required but no opening quote was found.
    #[error("Expected quote to start a string")]
    ExpectedStartOfQuote,
    /// A quoted string ran to the end of input.
    #[error("Unclosed quoted string")]
    ExpectedEndOfQuote,
    /// A backslash escaped something other than the quote or a backslash.
    #[error("Invalid escape sequence '{0}' in quoted string")]
    InvalidEscape(char),
    /// A specific character was required at the cursor.
    #[error("Expected '{0}'")]
    ExpectedSymbol(char),

    // -- Value --
    /// No short characters at the cursor.
    #[error("Expected short")]
    ExpectedShort,
    /// Characters that do not form a valid `i16`.
    #[error("Invalid short '{0}'")]
    InvalidShort(String),
    /// No integer characters at the cursor.
    #[error("Expected integer")]
    ExpectedInteger,
    /// Integer characters that do not form a valid `i32`.
    #[error("Invalid integer '{0}'")]
    InvalidInteger(String),
    /// No long characters at the cursor.
    #[error("Expected long")]
    ExpectedLong,
    /// Characters that do not form a valid `i64`.
    #[error("Invalid long '{0}'")]
    InvalidLong(String),
    /// No float characters at the cursor.
    #[error("Expected float")]
    ExpectedFloat,
    /// Characters that do not form a valid `f32`.
    #[error("Invalid float '{0}'")]
    InvalidFloat(String),
    /// No double characters at the cursor.
    #[error("Expected double")]
    ExpectedDouble,
    /// Characters that do not form a valid `f64`.
    #[error("Invalid double '{0}'")]
    InvalidDouble(String),
    /// Nothing to read where a boolean was required.
    #[error("Expected bool")]
    ExpectedBool,
    /// A token other than `true` or `false`.
    #[error("Invalid bool, expected true or false but found '{0}'")]
    InvalidBool(String),
    /// Short below the argument's minimum.
    #[error("Short must not be less than {min}, found {found}")]
    ShortTooLow {
        /// The parsed value.
        found: i16,
        /// The configured minimum.
        min: i16,
    },
    /// Short above the argument's maximum.
    #[error("Short must not be more than {max}, found {found}")]
    ShortTooHigh {
        /// The parsed value.
        found: i16,
        /// The configured maximum.
        max: i16,
    },
    /// Integer below the argument's minimum.
    #[error("Integer must not be less than {min}, found {found}")]
    IntegerTooLow {
        /// The parsed value.
        found: i32,
        /// The configured minimum.
        min: i32,
    },
    /// Integer above the argument's maximum.
    #[error("Integer must not be more than {max}, found {found}")]
    IntegerTooHigh {
        /// The parsed value.
        found: i32,
        /// The configured maximum.
        max: i32,
    },
    /// Long below the argument's minimum.
    #[error("Long must not be less than {min}, found {found}")]
    LongTooLow {
        /// The parsed value.
        found: i64,
        /// The configured minimum.
        min: i64,
    },
    /// Long above the argument's maximum.
    #[error("Long must not be more than {max}, found {found}")]
    LongTooHigh {
        /// The parsed value.
        found: i64,
        /// The configured maximum.
        max: i64,
    },
    /// Float below the argument's minimum.
    #[error("Float must not be less than {min}, found {found}")]
    FloatTooLow {
        /// The parsed value.
        found: f32,
        /// The configured minimum.
        min: f32,
    },
    /// Float above the argument's maximum.
    #[error("Float must not be more than {max}, found {found}")]
    FloatTooHigh {
        /// The parsed value.
        found: f32,
        /// The configured maximum.
        max: f32,
    },
    /// Double below the argument's minimum.
    #[error("Double must not be less than {min}, found {found}")]
    DoubleTooLow {
        /// The parsed value.
        found: f64,
        /// The configured minimum.
        min: f64,
    },
    /// Double above the argument's maximum.
    #[error("Double must not be more than {max}, found {found}")]
    DoubleTooHigh {
        /// The parsed value.
        found: f64,
        /// The configured maximum.
        max: f64,
    },
    /// A token outside a term argument's option set.
    #[error("Invalid term '{0}'")]
    InvalidTerm(String),
    /// A token that is not a UUID.
    #[error("Invalid UUID '{0}'")]
    InvalidUuid(String),

    // -- Grammar --
    /// The token does not match the expected literal.
    #[error("Expected literal {0}")]
    LiteralIncorrect(String),

    // -- Dispatch --
    /// No node matched the first token.
    #[error("Unknown command")]
    DispatcherUnknownCommand,
    /// A command matched but trailing input remains.
    #[error("Incorrect argument for command")]
    DispatcherUnknownArgument,
    /// A value was followed directly by more characters.
    #[error("Expected whitespace to end one argument, but found trailing data")]
    DispatcherExpectedArgumentSeparator,
    /// An argument parser failed outside the syntax error channel.
    #[error("Could not parse command: {0}")]
    DispatcherParseException(String),

    // -- Execution --
    /// Free-form failure raised by an executor, modifier, or custom argument type.
    #[error("{0}")]
    Custom(String),
}

impl SyntaxErrorKind {
    /// Attach the reader's input and current cursor.
    pub fn create_with_context(self, reader: &TextReader<'_>) -> CommandSyntaxError {
        CommandSyntaxError {
            kind: self,
            input: Some(reader.string().to_owned()),
            cursor: Some(reader.cursor()),
        }
    }

    /// Create an error with no positional context.
    pub fn create(self) -> CommandSyntaxError {
        CommandSyntaxError {
            kind: self,
            input: None,
            cursor: None,
        }
    }

    /// Stable diagnostic code for this kind.
    pub fn code(&self) -> &'static str {
        use SyntaxErrorKind::*;
        match self {
            ExpectedStartOfQuote => codes::EXPECTED_START_OF_QUOTE,
            ExpectedEndOfQuote => codes::EXPECTED_END_OF_QUOTE,
            InvalidEscape(_) => codes::INVALID_ESCAPE,
            ExpectedSymbol(_) => codes::EXPECTED_SYMBOL,
            ExpectedShort | ExpectedInteger | ExpectedLong | ExpectedFloat | ExpectedDouble => {
                codes::EXPECTED_NUMBER
            }
            InvalidShort(_)
            | InvalidInteger(_)
            | InvalidLong(_)
            | InvalidFloat(_)
            | InvalidDouble(_) => codes::INVALID_NUMBER,
            ExpectedBool => codes::EXPECTED_BOOL,
            InvalidBool(_) => codes::INVALID_BOOL,
            ShortTooLow { .. }
            | IntegerTooLow { .. }
            | LongTooLow { .. }
            | FloatTooLow { .. }
            | DoubleTooLow { .. } => codes::NUMBER_TOO_LOW,
            ShortTooHigh { .. }
            | IntegerTooHigh { .. }
            | LongTooHigh { .. }
            | FloatTooHigh { .. }
            | DoubleTooHigh { .. } => codes::NUMBER_TOO_HIGH,
            InvalidTerm(_) => codes::INVALID_TERM,
            InvalidUuid(_) => codes::INVALID_UUID,
            LiteralIncorrect(_) => codes::LITERAL_INCORRECT,
            DispatcherUnknownCommand => codes::UNKNOWN_COMMAND,
            DispatcherUnknownArgument => codes::UNKNOWN_ARGUMENT,
            DispatcherExpectedArgumentSeparator => codes::EXPECTED_ARGUMENT_SEPARATOR,
            DispatcherParseException(_) => codes::PARSE_EXCEPTION,
            Custom(_) => codes::COMMAND_FAILED,
        }
    }

    /// The message arguments as key/value strings.
    pub fn arguments(&self) -> BTreeMap<String, String> {
        use SyntaxErrorKind::*;
        let pairs: Vec<(&str, String)> = match self {
            InvalidEscape(c) | ExpectedSymbol(c) => vec![("character", c.to_string())],
            InvalidShort(v) | InvalidInteger(v) | InvalidLong(v) | InvalidFloat(v)
            | InvalidDouble(v) | InvalidBool(v) | InvalidTerm(v) | InvalidUuid(v) => {
                vec![("found", v.clone())]
            }
            ShortTooLow { found, min } => vec![("found", found.to_string()), ("min", min.to_string())],
            ShortTooHigh { found, max } => vec![("found", found.to_string()), ("max", max.to_string())],
            IntegerTooLow { found, min } => vec![("found", found.to_string()), ("min", min.to_string())],
            IntegerTooHigh { found, max } => vec![("found", found.to_string()), ("max", max.to_string())],
            LongTooLow { found, min } => vec![("found", found.to_string()), ("min", min.to_string())],
            LongTooHigh { found, max } => vec![("found", found.to_string()), ("max", max.to_string())],
            FloatTooLow { found, min } => vec![("found", found.to_string()), ("min", min.to_string())],
            FloatTooHigh { found, max } => vec![("found", found.to_string()), ("max", max.to_string())],
            DoubleTooLow { found, min } => vec![("found", found.to_string()), ("min", min.to_string())],
            DoubleTooHigh { found, max } => vec![("found", found.to_string()), ("max", max.to_string())],
            LiteralIncorrect(expected) => vec![("expected", expected.clone())],
            DispatcherParseException(message) | Custom(message) => {
                vec![("message", message.clone())]
            }
            _ => Vec::new(),
        };
        pairs.into_iter().map(|(k, v)| (k.to_owned(), v)).collect()
    }

    /// Whether this is a literal mismatch, the least informative grammar error.
    pub fn is_literal_mismatch(&self) -> bool {
        matches!(self, SyntaxErrorKind::LiteralIncorrect(_))
    }
}

/// A syntax or execution failure, optionally tied to a cursor in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSyntaxError {
    kind: SyntaxErrorKind,
    input: Option<String>,
    cursor: Option<usize>,
}

impl CommandSyntaxError {
    /// A free-form failure without positional context.
    ///
    /// Executors and redirect modifiers use this to report their own errors.
    pub fn custom(message: impl Into<String>) -> Self {
        SyntaxErrorKind::Custom(message.into()).create()
    }

    /// What went wrong.
    pub fn kind(&self) -> &SyntaxErrorKind {
        &self.kind
    }

    /// The full input the error refers to, when known.
    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    /// Byte offset the error points at, when known.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// The message without positional context.
    pub fn raw_message(&self) -> String {
        self.kind.to_string()
    }

    /// Up to ten characters of input before the cursor followed by `<--[HERE]`.
    ///
    /// Prefixed with `...` when the input was truncated.
    pub fn context(&self) -> Option<String> {
        let input = self.input.as_deref()?;
        let cursor = self.cursor?.min(input.len());
        let mut start = cursor.saturating_sub(CONTEXT_AMOUNT);
        while !input.is_char_boundary(start) {
            start -= 1;
        }
        let mut out = String::new();
        if cursor > CONTEXT_AMOUNT {
            out.push_str("...");
        }
        out.push_str(&input[start..cursor]);
        out.push_str("<--[HERE]");
        Some(out)
    }

    /// Range from the cursor to the end of the token it points into.
    pub fn range(&self) -> Option<TextRange> {
        let input = self.input.as_deref()?;
        let start = self.cursor?.min(input.len());
        let end = input[start..]
            .find(' ')
            .map_or(input.len(), |offset| start + offset);
        Some(TextRange::between(start, end))
    }

    /// Convert into a structured [`Diagnostic`].
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut ctx = self.kind.arguments();
        if let Some(input) = &self.input {
            ctx.insert("input".into(), input.clone());
        }
        Diagnostic::error(self.kind.code(), self.raw_message(), self.range()).with_context(ctx)
    }
}

impl fmt::Display for CommandSyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.context(), self.cursor) {
            (Some(context), Some(cursor)) => {
                write!(f, "{} at position {}: {}", self.kind, cursor, context)
            }
            _ => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for CommandSyntaxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// Errors raised while inserting nodes into a command tree.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// A node would end up with both a redirect and children.
    #[error("node '{name}' cannot both redirect and have children")]
    RedirectWithChildren {
        /// Key of the offending node.
        name: String,
    },
    /// A literal and an argument were registered under the same key.
    #[error("node '{name}' is already a {existing} and cannot be merged with a {incoming}")]
    ConflictingKind {
        /// Key shared by both nodes.
        name: String,
        /// Kind of the node already in the tree.
        existing: &'static str,
        /// Kind of the node being registered.
        incoming: &'static str,
    },
    /// A redirect points at a node id this tree never issued.
    #[error("redirect target {0} does not exist in this tree")]
    UnknownRedirectTarget(NodeId),
    /// A parent node id this tree never issued.
    #[error("node {0} does not exist in this tree")]
    UnknownNode(NodeId),
    /// A default node was registered directly under the root.
    #[error("default node '{0}' cannot be registered as a top-level command")]
    DefaultAtRoot(String),
    /// A node would end up with two different default children.
    #[error("node '{parent}' already has default child '{existing}', cannot add '{incoming}'")]
    MultipleDefaults {
        /// Key of the parent node.
        parent: String,
        /// Key of the default child already present.
        existing: String,
        /// Key of the default child being registered.
        incoming: String,
    },
}

/// Errors raised when reading a parsed argument out of a context.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    /// No argument with this name was parsed.
    #[error("No such argument '{0}' exists on this command")]
    NotFound(String),
    /// The argument exists but holds a different type.
    #[error("Argument '{name}' is defined as {actual}, not {expected}")]
    WrongType {
        /// Argument name.
        name: String,
        /// Type name that was requested.
        expected: &'static str,
        /// Type name the argument was parsed as.
        actual: &'static str,
    },
}

impl From<ArgumentError> for CommandSyntaxError {
    fn from(err: ArgumentError) -> Self {
        CommandSyntaxError::custom(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_short_input() {
        let mut reader = TextReader::new("heal bob");
        reader.set_cursor(5);
        let err = SyntaxErrorKind::ExpectedInteger.create_with_context(&reader);
        assert_eq!(err.context().as_deref(), Some("heal <--[HERE]"));
        assert_eq!(
            err.to_string(),
            "Expected integer at position 5: heal <--[HERE]"
        );
    }

    #[test]
    fn context_truncated_input() {
        let mut reader = TextReader::new("give somebody 12x");
        reader.set_cursor(14);
        let err = SyntaxErrorKind::InvalidInteger("12x".into()).create_with_context(&reader);
        assert_eq!(err.context().as_deref(), Some("... somebody <--[HERE]"));
    }

    #[test]
    fn display_without_context() {
        let err = CommandSyntaxError::custom("target is immune");
        assert_eq!(err.to_string(), "target is immune");
        assert!(err.context().is_none());
        assert!(err.range().is_none());
    }

    #[test]
    fn range_extends_to_token_end() {
        let mut reader = TextReader::new("tp abc 10");
        reader.set_cursor(3);
        let err = SyntaxErrorKind::ExpectedInteger.create_with_context(&reader);
        assert_eq!(err.range(), Some(TextRange::between(3, 6)));
    }

    #[test]
    fn diagnostic_carries_code_and_arguments() {
        let mut reader = TextReader::new("give apple 300");
        reader.set_cursor(11);
        let err =
            SyntaxErrorKind::IntegerTooHigh { found: 300, max: 64 }.create_with_context(&reader);
        let diag = err.to_diagnostic();
        assert_eq!(diag.id, codes::NUMBER_TOO_HIGH);
        assert_eq!(diag.message, "Integer must not be more than 64, found 300");
        let ctx = diag.context.unwrap();
        assert_eq!(ctx["found"], "300");
        assert_eq!(ctx["max"], "64");
        assert_eq!(ctx["input"], "give apple 300");
    }

    #[test]
    fn argument_error_converts_to_custom() {
        let err: CommandSyntaxError = ArgumentError::NotFound("target".into()).into();
        assert_eq!(err.kind().code(), codes::COMMAND_FAILED);
        assert!(err.raw_message().contains("target"));
    }
}
