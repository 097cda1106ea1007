use std::fmt;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::context::CommandContextBuilder;
use crate::error::{CommandSyntaxError, SyntaxErrorKind};
use crate::reader::TextReader;
use crate::tree::NodeId;

use super::{ARGUMENT_SEPARATOR, CommandDispatcher};

/// Outcome of [`CommandDispatcher::parse`].
///
/// Holds the best descent found, the reader positioned after it, and the
/// error recorded for every candidate node that failed along that descent.
pub struct ParseResults<'a, S> {
    pub(super) context: CommandContextBuilder<S>,
    pub(super) reader: TextReader<'a>,
    pub(super) exceptions: IndexMap<NodeId, CommandSyntaxError>,
}

impl<'a, S> ParseResults<'a, S> {
    /// The context built along the chosen descent.
    pub fn context(&self) -> &CommandContextBuilder<S> {
        &self.context
    }

    /// The reader after the chosen descent. Anything left unread did not
    /// match.
    pub fn reader(&self) -> &TextReader<'a> {
        &self.reader
    }

    /// Failures keyed by the node that failed to match.
    pub fn exceptions(&self) -> &IndexMap<NodeId, CommandSyntaxError> {
        &self.exceptions
    }

    /// Whether all input was consumed.
    pub fn is_complete(&self) -> bool {
        !self.reader.can_read()
    }

    /// The error execution fails with before running anything, if the input
    /// was not fully consumed.
    ///
    /// This is the most specific recorded failure; without one it is an
    /// unknown command (nothing matched) or an unknown argument (something
    /// matched but input is left over).
    pub fn syntax_error(&self) -> Option<CommandSyntaxError> {
        if !self.reader.can_read() {
            return None;
        }
        let err = match self.most_specific_error() {
            Some(err) => err.clone(),
            None if self.context.range().is_empty() => {
                SyntaxErrorKind::DispatcherUnknownCommand.create_with_context(&self.reader)
            }
            None => SyntaxErrorKind::DispatcherUnknownArgument.create_with_context(&self.reader),
        };
        Some(err)
    }

    /// The most informative recorded failure: the one reaching furthest into
    /// the input, preferring anything over a literal mismatch at the same
    /// position, and the first recorded among equals.
    pub fn most_specific_error(&self) -> Option<&CommandSyntaxError> {
        let rank = |err: &CommandSyntaxError| {
            (err.cursor().unwrap_or(0), !err.kind().is_literal_mismatch())
        };
        let mut best: Option<&CommandSyntaxError> = None;
        for err in self.exceptions.values() {
            if best.is_none_or(|current| rank(err) > rank(current)) {
                best = Some(err);
            }
        }
        best
    }
}

impl<S: fmt::Debug> fmt::Debug for ParseResults<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseResults")
            .field("context", &self.context)
            .field("reader", &self.reader)
            .field("exceptions", &self.exceptions)
            .finish()
    }
}

impl<S: Clone + 'static> CommandDispatcher<S> {
    /// Parse `input` for `sender` without executing anything.
    ///
    /// Never fails: problems are reported through the unread input and the
    /// recorded exceptions of the returned [`ParseResults`].
    pub fn parse<'a>(&self, input: &'a str, sender: S) -> ParseResults<'a, S> {
        let mut reader = TextReader::new(input);
        if let Some(prefix) = self.config.command_prefix {
            if reader.peek() == Some(prefix) {
                reader.skip();
            }
        }
        let context = CommandContextBuilder::new(sender, NodeId::ROOT, reader.cursor());
        let result = self.parse_nodes(NodeId::ROOT, &reader, &context);
        debug!(
            input,
            consumed = result.reader.cursor(),
            errors = result.exceptions.len(),
            "parsed command"
        );
        result
    }

    /// Try every relevant child of `node` at the reader's position and keep
    /// the best descent.
    ///
    /// Candidates are tried literal first. A descent that consumes all input
    /// beats one that does not, and one without errors beats one with errors;
    /// otherwise the earlier candidate wins. Matching a redirecting node
    /// commits to it immediately. A node with a default child is descended
    /// into even at the end of input, so the default can match.
    fn parse_nodes<'a>(
        &self,
        node: NodeId,
        original: &TextReader<'a>,
        builder: &CommandContextBuilder<S>,
    ) -> ParseResults<'a, S> {
        let sender = builder.sender();
        let mut errors = IndexMap::new();
        let mut potentials: Vec<ParseResults<'a, S>> = Vec::new();

        for id in self.tree.relevant_nodes(node, original) {
            let child = &self.tree[id];
            if !child.can_use(sender) {
                continue;
            }
            let mut context = builder.clone();
            let mut reader = original.clone();
            let attempt = child.parse(id, &mut reader, &mut context).and_then(|()| {
                if reader.can_read() && reader.peek() != Some(ARGUMENT_SEPARATOR) {
                    Err(SyntaxErrorKind::DispatcherExpectedArgumentSeparator
                        .create_with_context(&reader))
                } else {
                    Ok(())
                }
            });
            if let Err(err) = attempt {
                trace!(node = child.name(), error = %err, "candidate rejected");
                errors.insert(id, err);
                continue;
            }

            if child.command().is_some() || !child.is_default() {
                context.with_command(child.command().cloned());
            }
            let needed = if child.redirect().is_some() { 1 } else { 2 };
            if reader.can_read_n(needed) || child.default_node().is_some() {
                if reader.can_read() {
                    reader.skip();
                }
                if let Some(target) = child.redirect() {
                    trace!(node = child.name(), %target, "following redirect");
                    let child_builder =
                        CommandContextBuilder::new(sender.clone(), target, reader.cursor());
                    let parse = self.parse_nodes(target, &reader, &child_builder);
                    context.with_child(parse.context);
                    return ParseResults {
                        context,
                        reader: parse.reader,
                        exceptions: parse.exceptions,
                    };
                }
                potentials.push(self.parse_nodes(id, &reader, &context));
            } else {
                potentials.push(ParseResults {
                    context,
                    reader,
                    exceptions: IndexMap::new(),
                });
            }
        }

        if potentials.is_empty() {
            return ParseResults {
                context: builder.clone(),
                reader: original.clone(),
                exceptions: errors,
            };
        }
        potentials.sort_by(|a, b| {
            a.reader
                .can_read()
                .cmp(&b.reader.can_read())
                .then_with(|| (!a.exceptions.is_empty()).cmp(&!b.exceptions.is_empty()))
        });
        potentials.swap_remove(0)
    }
}
