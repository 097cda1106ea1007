use std::fmt;
use std::sync::Arc;

use cmdtree_diagnostics::TextRange;
use indexmap::IndexMap;

use crate::arguments::{ArgumentValue, ErasedArgument};
use crate::context::{CommandContext, CommandContextBuilder, ParsedArgument};
use crate::error::{CommandResult, SyntaxErrorKind};
use crate::reader::TextReader;
use crate::suggestion::{SuggestionFuture, Suggestions, SuggestionsBuilder};

use super::{Command, NodeId, RedirectModifier, Requirement, SuggestionProvider};

/// What a node matches.
pub enum NodeKind<S> {
    /// The synthetic root. Never matched against input.
    Root,
    /// An exact, case-sensitive keyword.
    Literal(String),
    /// A typed value bound under a name.
    Argument(ArgumentNode<S>),
}

impl<S> NodeKind<S> {
    /// `"root"`, `"literal"`, or `"argument"`.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Literal(_) => "literal",
            NodeKind::Argument(_) => "argument",
        }
    }
}

/// The argument half of an argument node.
pub struct ArgumentNode<S> {
    pub(super) name: String,
    pub(super) parser: Arc<dyn ErasedArgument<S>>,
    pub(super) custom_suggestions: Option<SuggestionProvider<S>>,
    pub(super) default_value: Option<(ArgumentValue, &'static str)>,
}

impl<S> ArgumentNode<S> {
    /// Name the parsed value is bound under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parsing strategy.
    pub fn parser(&self) -> &dyn ErasedArgument<S> {
        self.parser.as_ref()
    }

    /// Whether completions come from a provider instead of the argument type.
    pub fn has_custom_suggestions(&self) -> bool {
        self.custom_suggestions.is_some()
    }

    /// Value bound when a default argument is reached at the end of input.
    pub fn default_value(&self) -> Option<&ArgumentValue> {
        self.default_value.as_ref().map(|(value, _)| value)
    }
}

/// One grammar node. Lives in a [`CommandTree`](super::CommandTree) and is
/// addressed by [`NodeId`].
pub struct CommandNode<S> {
    pub(super) kind: NodeKind<S>,
    pub(super) children: IndexMap<String, NodeId>,
    pub(super) literals: IndexMap<String, NodeId>,
    pub(super) arguments: IndexMap<String, NodeId>,
    pub(super) requirement: Option<Requirement<S>>,
    pub(super) command: Option<Command<S>>,
    pub(super) redirect: Option<NodeId>,
    pub(super) modifier: Option<RedirectModifier<S>>,
    pub(super) forks: bool,
    pub(super) description: Option<String>,
    pub(super) usage: Option<String>,
    pub(super) is_default: bool,
    pub(super) default_node: Option<NodeId>,
}

impl<S> CommandNode<S> {
    pub(super) fn new(kind: NodeKind<S>) -> Self {
        Self {
            kind,
            children: IndexMap::new(),
            literals: IndexMap::new(),
            arguments: IndexMap::new(),
            requirement: None,
            command: None,
            redirect: None,
            modifier: None,
            forks: false,
            description: None,
            usage: None,
            is_default: false,
            default_node: None,
        }
    }

    pub(super) fn link_child(&mut self, key: String, id: NodeId, literal: bool) {
        if literal {
            self.literals.insert(key.clone(), id);
        } else {
            self.arguments.insert(key.clone(), id);
        }
        self.children.insert(key, id);
    }

    pub(super) fn unlink_child(&mut self, key: &str) -> Option<NodeId> {
        self.literals.shift_remove(key);
        self.arguments.shift_remove(key);
        let removed = self.children.shift_remove(key);
        if removed.is_some() && removed == self.default_node {
            self.default_node = None;
        }
        removed
    }

    // ── Accessors ───────────────────────────────────────────────────────

    /// What this node matches.
    pub fn kind(&self) -> &NodeKind<S> {
        &self.kind
    }

    /// Key under which the node is stored in its parent: the literal text or
    /// the argument name. Empty for the root.
    pub fn name(&self) -> &str {
        match &self.kind {
            NodeKind::Root => "",
            NodeKind::Literal(literal) => literal,
            NodeKind::Argument(argument) => &argument.name,
        }
    }

    /// Whether this is the root node.
    pub fn is_root(&self) -> bool {
        matches!(self.kind, NodeKind::Root)
    }

    /// Whether this is a literal node.
    pub fn is_literal(&self) -> bool {
        matches!(self.kind, NodeKind::Literal(_))
    }

    /// Children in registration order.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.values().copied()
    }

    /// Child with the given key.
    pub fn child(&self, name: &str) -> Option<NodeId> {
        self.children.get(name).copied()
    }

    /// Whether the node has any children.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Executor run when input ends at this node.
    pub fn command(&self) -> Option<&Command<S>> {
        self.command.as_ref()
    }

    /// Where parsing continues after this node, if it redirects.
    pub fn redirect(&self) -> Option<NodeId> {
        self.redirect
    }

    /// Maps the current sender to the senders used after the redirect.
    pub fn redirect_modifier(&self) -> Option<&RedirectModifier<S>> {
        self.modifier.as_ref()
    }

    /// Whether the redirect fans out, tolerating per-branch failures.
    pub fn is_fork(&self) -> bool {
        self.forks
    }

    /// Help text.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Whether this node matches at the end of input without consuming
    /// anything.
    pub fn is_default(&self) -> bool {
        self.is_default
    }

    /// The child parsing falls through to when input ends at this node.
    pub fn default_node(&self) -> Option<NodeId> {
        self.default_node
    }

    /// Whether `sender` passes this node's requirement. Nodes without a
    /// requirement accept everyone.
    pub fn can_use(&self, sender: &S) -> bool {
        self.requirement
            .as_ref()
            .is_none_or(|requirement| requirement(sender))
    }

    /// The usage override if one was set, else `literal`, `<argument>`, or
    /// the empty string for the root.
    pub fn usage_text(&self) -> String {
        if let Some(usage) = &self.usage {
            return usage.clone();
        }
        match &self.kind {
            NodeKind::Root => String::new(),
            NodeKind::Literal(literal) => literal.clone(),
            NodeKind::Argument(argument) => format!("<{}>", argument.name),
        }
    }

    /// Sample inputs this node accepts.
    pub fn examples(&self) -> Vec<String> {
        match &self.kind {
            NodeKind::Root => Vec::new(),
            NodeKind::Literal(literal) => vec![literal.clone()],
            NodeKind::Argument(argument) => argument.parser.examples(),
        }
    }

    /// Whether `input` alone would be consumed by this node up to a word
    /// boundary.
    pub fn is_valid_input(&self, input: &str) -> bool {
        let mut reader = TextReader::new(input);
        match &self.kind {
            NodeKind::Root => false,
            NodeKind::Literal(literal) => match_literal(literal, &mut reader).is_some(),
            NodeKind::Argument(argument) => {
                argument.parser.parse_erased(&mut reader).is_ok()
                    && (!reader.can_read() || reader.peek() == Some(' '))
            }
        }
    }

    // ── Parsing ─────────────────────────────────────────────────────────

    /// Match this node at the reader's cursor and record the match in `context`.
    ///
    /// A default node reached at the end of input matches with an empty
    /// range; a default argument binds its default value. On failure the
    /// reader may have moved; callers restore it from a snapshot.
    pub fn parse(
        &self,
        id: NodeId,
        reader: &mut TextReader<'_>,
        context: &mut CommandContextBuilder<S>,
    ) -> CommandResult<()> {
        let start = reader.cursor();
        match &self.kind {
            NodeKind::Root => Ok(()),
            NodeKind::Literal(literal) => match match_literal(literal, reader) {
                Some(end) => {
                    context.with_node(id, self, TextRange::between(start, end));
                    Ok(())
                }
                None if self.is_default && !reader.can_read() => {
                    context.with_node(id, self, TextRange::at(start));
                    Ok(())
                }
                None => Err(SyntaxErrorKind::LiteralIncorrect(literal.clone())
                    .create_with_context(reader)),
            },
            NodeKind::Argument(argument) => {
                let (value, type_name) = match &argument.default_value {
                    Some((value, type_name)) if self.is_default && !reader.can_read() => {
                        (Arc::clone(value), *type_name)
                    }
                    _ => argument.parser.parse_erased(reader)?,
                };
                let range = TextRange::between(start, reader.cursor());
                context.with_argument(
                    argument.name.clone(),
                    ParsedArgument::new(range, value, type_name),
                );
                context.with_node(id, self, range);
                Ok(())
            }
        }
    }

    /// Completion candidates this node offers for `builder`'s remaining text.
    pub fn list_suggestions(
        &self,
        context: &CommandContext<S>,
        mut builder: SuggestionsBuilder,
    ) -> SuggestionFuture {
        match &self.kind {
            NodeKind::Root => Suggestions::empty_future(),
            NodeKind::Literal(literal) => {
                if literal
                    .to_lowercase()
                    .starts_with(&builder.remaining_lower_case())
                {
                    builder.suggest(literal.clone());
                    builder.build_future()
                } else {
                    Suggestions::empty_future()
                }
            }
            NodeKind::Argument(argument) => match &argument.custom_suggestions {
                Some(provider) => provider(context, builder),
                None => argument.parser.list_suggestions(context, builder),
            },
        }
    }
}

/// Consume `literal` if it sits at the cursor followed by a space or the end
/// of input. Returns the end offset; leaves the reader untouched otherwise.
fn match_literal(literal: &str, reader: &mut TextReader<'_>) -> Option<usize> {
    let start = reader.cursor();
    if !reader.remaining().starts_with(literal) {
        return None;
    }
    let end = start + literal.len();
    reader.set_cursor(end);
    if reader.can_read() && reader.peek() != Some(' ') {
        reader.set_cursor(start);
        return None;
    }
    Some(end)
}

impl<S> fmt::Debug for CommandNode<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandNode")
            .field("kind", &self.kind.label())
            .field("name", &self.name())
            .field("children", &self.children)
            .field("executable", &self.command.is_some())
            .field("redirect", &self.redirect)
            .field("forks", &self.forks)
            .field("default", &self.is_default)
            .finish()
    }
}
