//! What a parse produced: bound arguments, matched nodes, and the chain of
//! contexts created by redirects.

mod builder;

pub use builder::{CommandContextBuilder, SuggestionContext};

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use cmdtree_diagnostics::TextRange;
use indexmap::IndexMap;

use crate::arguments::ArgumentValue;
use crate::error::ArgumentError;
use crate::tree::{Command, NodeId, RedirectModifier};

// ── Parsed pieces ───────────────────────────────────────────────────────

/// A value bound by an argument node, with the input range it came from.
#[derive(Clone)]
pub struct ParsedArgument {
    range: TextRange,
    value: ArgumentValue,
    type_name: &'static str,
}

impl ParsedArgument {
    /// Wrap a parsed value.
    pub fn new(range: TextRange, value: ArgumentValue, type_name: &'static str) -> Self {
        Self {
            range,
            value,
            type_name,
        }
    }

    /// Input range the value was parsed from.
    pub fn range(&self) -> TextRange {
        self.range
    }

    /// The value, if it has type `T`.
    pub fn value<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Name of the value's type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for ParsedArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParsedArgument")
            .field("range", &self.range)
            .field("type", &self.type_name)
            .finish()
    }
}

/// A node matched during parsing and the input range it consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedCommandNode {
    node: NodeId,
    range: TextRange,
}

impl ParsedCommandNode {
    /// Pair a node with its range.
    pub fn new(node: NodeId, range: TextRange) -> Self {
        Self { node, range }
    }

    /// The matched node.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Input consumed by the node.
    pub fn range(&self) -> TextRange {
        self.range
    }
}

// ── CommandContext ──────────────────────────────────────────────────────

/// Immutable result of parsing one segment of a command line.
///
/// Following a redirect starts a new segment; the segments form a chain
/// through [`child`](Self::child), walked top-down during execution.
pub struct CommandContext<S> {
    pub(crate) sender: S,
    pub(crate) input: Arc<str>,
    pub(crate) arguments: IndexMap<String, ParsedArgument>,
    pub(crate) command: Option<Command<S>>,
    pub(crate) root_node: NodeId,
    pub(crate) nodes: Vec<ParsedCommandNode>,
    pub(crate) range: TextRange,
    pub(crate) child: Option<Box<CommandContext<S>>>,
    pub(crate) modifier: Option<RedirectModifier<S>>,
    pub(crate) forks: bool,
}

impl<S: Clone> Clone for CommandContext<S> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            input: Arc::clone(&self.input),
            arguments: self.arguments.clone(),
            command: self.command.clone(),
            root_node: self.root_node,
            nodes: self.nodes.clone(),
            range: self.range,
            child: self.child.clone(),
            modifier: self.modifier.clone(),
            forks: self.forks,
        }
    }
}

impl<S> CommandContext<S> {
    /// Who issued the command (or the redirected sender for this segment).
    pub fn sender(&self) -> &S {
        &self.sender
    }

    /// The full command line.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Read the argument `name` as `T`.
    pub fn get_argument<T: Any>(&self, name: &str) -> Result<&T, ArgumentError> {
        let parsed = self
            .arguments
            .get(name)
            .ok_or_else(|| ArgumentError::NotFound(name.to_owned()))?;
        parsed.value::<T>().ok_or_else(|| ArgumentError::WrongType {
            name: name.to_owned(),
            expected: std::any::type_name::<T>(),
            actual: parsed.type_name,
        })
    }

    /// The raw parsed argument `name`.
    pub fn argument(&self, name: &str) -> Option<&ParsedArgument> {
        self.arguments.get(name)
    }

    /// Every bound argument, in parse order.
    pub fn arguments(&self) -> &IndexMap<String, ParsedArgument> {
        &self.arguments
    }

    /// Executor of the last matched node, if it has one.
    pub fn command(&self) -> Option<&Command<S>> {
        self.command.as_ref()
    }

    /// Node this segment was parsed from (the tree root or a redirect target).
    pub fn root_node(&self) -> NodeId {
        self.root_node
    }

    /// Matched nodes in order.
    pub fn nodes(&self) -> &[ParsedCommandNode] {
        &self.nodes
    }

    /// Whether any node matched in this segment.
    pub fn has_nodes(&self) -> bool {
        !self.nodes.is_empty()
    }

    /// Input covered by this segment.
    pub fn range(&self) -> TextRange {
        self.range
    }

    /// The segment after a redirect.
    pub fn child(&self) -> Option<&CommandContext<S>> {
        self.child.as_deref()
    }

    /// The last segment of the chain.
    pub fn last_child(&self) -> &CommandContext<S> {
        let mut result = self;
        while let Some(child) = result.child() {
            result = child;
        }
        result
    }

    /// Modifier of the redirect leaving this segment.
    pub fn redirect_modifier(&self) -> Option<&RedirectModifier<S>> {
        self.modifier.as_ref()
    }

    /// Whether the redirect leaving this segment forks.
    pub fn is_forked(&self) -> bool {
        self.forks
    }
}

impl<S: Clone> CommandContext<S> {
    /// This context with a different sender.
    pub fn copy_for(&self, sender: S) -> Self {
        let mut copy = self.clone();
        copy.sender = sender;
        copy
    }
}

impl<S: fmt::Debug> fmt::Debug for CommandContext<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandContext")
            .field("sender", &self.sender)
            .field("input", &self.input)
            .field("arguments", &self.arguments)
            .field("executable", &self.command.is_some())
            .field("root_node", &self.root_node)
            .field("nodes", &self.nodes)
            .field("range", &self.range)
            .field("child", &self.child)
            .field("forks", &self.forks)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_with_amount() -> CommandContext<String> {
        let mut builder = CommandContextBuilder::new("alice".to_owned(), NodeId::ROOT, 0);
        builder.with_argument(
            "amount",
            ParsedArgument::new(
                TextRange::between(5, 7),
                Arc::new(12_i32),
                std::any::type_name::<i32>(),
            ),
        );
        builder.build("heal 12")
    }

    #[test]
    fn get_argument_typed() {
        let context = context_with_amount();
        assert_eq!(context.get_argument::<i32>("amount"), Ok(&12));
        assert_eq!(context.argument("amount").unwrap().range(), TextRange::between(5, 7));
    }

    #[test]
    fn get_argument_missing() {
        let context = context_with_amount();
        assert_eq!(
            context.get_argument::<i32>("target"),
            Err(ArgumentError::NotFound("target".into()))
        );
    }

    #[test]
    fn get_argument_wrong_type() {
        let context = context_with_amount();
        let err = context.get_argument::<String>("amount").unwrap_err();
        assert!(matches!(err, ArgumentError::WrongType { actual: "i32", .. }));
    }

    #[test]
    fn copy_for_replaces_sender_only() {
        let context = context_with_amount();
        let copy = context.copy_for("bob".to_owned());
        assert_eq!(copy.sender(), "bob");
        assert_eq!(copy.input(), "heal 12");
        assert_eq!(copy.get_argument::<i32>("amount"), Ok(&12));
    }

    #[test]
    fn last_child_follows_chain() {
        let mut parent = CommandContextBuilder::new((), NodeId::ROOT, 0);
        let child = CommandContextBuilder::new((), NodeId::ROOT, 2);
        parent.with_child(child);
        let context = parent.build("r x");
        assert_eq!(context.last_child().range(), TextRange::at(2));
        assert!(context.child().is_some());
    }
}
