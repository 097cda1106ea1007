use crate::context::CommandContext;
use crate::error::CommandResult;
use crate::reader::TextReader;
use crate::suggestion::{SuggestionFuture, SuggestionsBuilder};

use super::ArgumentType;

/// `true` or `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoolArgument;

impl<S> ArgumentType<S> for BoolArgument {
    type Value = bool;

    fn parse(&self, reader: &mut TextReader<'_>) -> CommandResult<bool> {
        reader.read_boolean()
    }

    fn suggestions(
        &self,
        _context: &CommandContext<S>,
        mut builder: SuggestionsBuilder,
    ) -> SuggestionFuture {
        let remaining = builder.remaining_lower_case();
        for candidate in ["true", "false"] {
            if candidate.starts_with(&remaining) {
                builder.suggest(candidate);
            }
        }
        builder.build_future()
    }

    fn examples(&self) -> Vec<String> {
        vec!["true".to_owned(), "false".to_owned()]
    }
}
