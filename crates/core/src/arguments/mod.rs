//! Argument types: strategies that turn a slice of input into a typed value.
//!
//! Implement [`ArgumentType`] for custom types. The dispatcher stores them
//! type-erased behind [`ErasedArgument`], so nodes with different value types
//! can share one tree; values are read back with
//! [`CommandContext::get_argument`](crate::CommandContext::get_argument).

mod boolean;
mod number;
mod string;
mod unique_id;

pub use boolean::BoolArgument;
pub use number::{DoubleArgument, FloatArgument, IntegerArgument, LongArgument, ShortArgument};
pub use string::{StringArgument, StringKind, TermArgument, escape_if_required};
pub use unique_id::UuidArgument;

use std::any::Any;
use std::sync::Arc;

use crate::context::CommandContext;
use crate::error::CommandResult;
use crate::reader::TextReader;
use crate::suggestion::{SuggestionFuture, SuggestionsBuilder};

/// A parsed argument value with its concrete type erased.
pub type ArgumentValue = Arc<dyn Any + Send + Sync>;

/// Parsing strategy for one argument node.
///
/// `parse` consumes as much input as the value's grammar allows. Input left
/// after a successful parse is not an error here; the dispatcher decides
/// whether a separator or end of input must follow.
pub trait ArgumentType<S>: Send + Sync + 'static {
    /// The value bound under the argument's name.
    type Value: Any + Send + Sync;

    /// Read a value from `reader`.
    fn parse(&self, reader: &mut TextReader<'_>) -> CommandResult<Self::Value>;

    /// Completion candidates for the text at `builder.start()`.
    fn suggestions(
        &self,
        _context: &CommandContext<S>,
        builder: SuggestionsBuilder,
    ) -> SuggestionFuture {
        builder.build_future()
    }

    /// Sample inputs this type accepts, used for usage text and ambiguity checks.
    fn examples(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Object-safe view of an [`ArgumentType`].
pub trait ErasedArgument<S>: Send + Sync {
    /// Parse and box the value.
    fn parse_erased(
        &self,
        reader: &mut TextReader<'_>,
    ) -> CommandResult<(ArgumentValue, &'static str)>;

    /// See [`ArgumentType::suggestions`].
    fn list_suggestions(
        &self,
        context: &CommandContext<S>,
        builder: SuggestionsBuilder,
    ) -> SuggestionFuture;

    /// See [`ArgumentType::examples`].
    fn examples(&self) -> Vec<String>;

    /// Name of the argument type, for debugging output.
    fn type_name(&self) -> &'static str;
}

impl<S, T> ErasedArgument<S> for T
where
    T: ArgumentType<S>,
{
    fn parse_erased(
        &self,
        reader: &mut TextReader<'_>,
    ) -> CommandResult<(ArgumentValue, &'static str)> {
        let value = <T as ArgumentType<S>>::parse(self, reader)?;
        Ok((
            Arc::new(value),
            std::any::type_name::<<T as ArgumentType<S>>::Value>(),
        ))
    }

    fn list_suggestions(
        &self,
        context: &CommandContext<S>,
        builder: SuggestionsBuilder,
    ) -> SuggestionFuture {
        <T as ArgumentType<S>>::suggestions(self, context, builder)
    }

    fn examples(&self) -> Vec<String> {
        <T as ArgumentType<S>>::examples(self)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

// ── Constructors ────────────────────────────────────────────────────────

/// `true` or `false`.
pub fn bool() -> BoolArgument {
    BoolArgument
}

/// Any `i16`.
pub fn short() -> ShortArgument {
    ShortArgument::new(i16::MIN, i16::MAX)
}

/// An `i16` in `min..=max`.
pub fn short_between(min: i16, max: i16) -> ShortArgument {
    ShortArgument::new(min, max)
}

/// Any `i32`.
pub fn integer() -> IntegerArgument {
    IntegerArgument::new(i32::MIN, i32::MAX)
}

/// An `i32` in `min..=max`.
pub fn integer_between(min: i32, max: i32) -> IntegerArgument {
    IntegerArgument::new(min, max)
}

/// Any `i64`.
pub fn long() -> LongArgument {
    LongArgument::new(i64::MIN, i64::MAX)
}

/// An `i64` in `min..=max`.
pub fn long_between(min: i64, max: i64) -> LongArgument {
    LongArgument::new(min, max)
}

/// Any finite `f32`.
pub fn float() -> FloatArgument {
    FloatArgument::new(f32::MIN, f32::MAX)
}

/// An `f32` in `min..=max`.
pub fn float_between(min: f32, max: f32) -> FloatArgument {
    FloatArgument::new(min, max)
}

/// Any finite `f64`.
pub fn double() -> DoubleArgument {
    DoubleArgument::new(f64::MIN, f64::MAX)
}

/// An `f64` in `min..=max`.
pub fn double_between(min: f64, max: f64) -> DoubleArgument {
    DoubleArgument::new(min, max)
}

/// A single unquoted word.
pub fn word() -> StringArgument {
    StringArgument::new(StringKind::SingleWord)
}

/// A word or a quoted phrase.
pub fn string() -> StringArgument {
    StringArgument::new(StringKind::QuotablePhrase)
}

/// Everything up to the end of input.
pub fn greedy_string() -> StringArgument {
    StringArgument::new(StringKind::GreedyPhrase)
}

/// One word out of a fixed set.
pub fn term<I, T>(options: I) -> TermArgument
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    TermArgument::new(options)
}

/// A UUID, dashed or as 32 plain hex digits.
pub fn uuid() -> UuidArgument {
    UuidArgument
}
