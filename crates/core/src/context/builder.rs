use std::fmt;
use std::sync::Arc;

use cmdtree_diagnostics::TextRange;
use indexmap::IndexMap;

use crate::tree::{Command, CommandNode, NodeId, RedirectModifier};

use super::{CommandContext, ParsedArgument, ParsedCommandNode};

/// Where completion should happen for a cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestionContext {
    /// Node whose children provide candidates.
    pub parent: NodeId,
    /// Offset the replaced text starts at.
    pub start: usize,
}

/// Mutable accumulator filled while descending the tree.
///
/// The dispatcher clones it before trying each candidate node, so a failed
/// attempt never leaks into its siblings.
pub struct CommandContextBuilder<S> {
    sender: S,
    root_node: NodeId,
    arguments: IndexMap<String, ParsedArgument>,
    nodes: Vec<ParsedCommandNode>,
    command: Option<Command<S>>,
    child: Option<Box<CommandContextBuilder<S>>>,
    range: TextRange,
    modifier: Option<RedirectModifier<S>>,
    forks: bool,
}

impl<S: Clone> Clone for CommandContextBuilder<S> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            root_node: self.root_node,
            arguments: self.arguments.clone(),
            nodes: self.nodes.clone(),
            command: self.command.clone(),
            child: self.child.clone(),
            range: self.range,
            modifier: self.modifier.clone(),
            forks: self.forks,
        }
    }
}

impl<S> CommandContextBuilder<S> {
    /// An empty builder parsing from `root_node` at offset `start`.
    pub fn new(sender: S, root_node: NodeId, start: usize) -> Self {
        Self {
            sender,
            root_node,
            arguments: IndexMap::new(),
            nodes: Vec::new(),
            command: None,
            child: None,
            range: TextRange::at(start),
            modifier: None,
            forks: false,
        }
    }

    /// Replace the sender.
    pub fn with_sender(&mut self, sender: S) -> &mut Self {
        self.sender = sender;
        self
    }

    /// The sender.
    pub fn sender(&self) -> &S {
        &self.sender
    }

    /// Node parsing started from.
    pub fn root_node(&self) -> NodeId {
        self.root_node
    }

    /// Bind a parsed argument.
    pub fn with_argument(&mut self, name: impl Into<String>, argument: ParsedArgument) -> &mut Self {
        self.arguments.insert(name.into(), argument);
        self
    }

    /// Arguments bound so far.
    pub fn arguments(&self) -> &IndexMap<String, ParsedArgument> {
        &self.arguments
    }

    /// Set the executor to run if parsing ends here.
    pub fn with_command(&mut self, command: Option<Command<S>>) -> &mut Self {
        self.command = command;
        self
    }

    /// Record a matched node.
    ///
    /// Picks up the node's redirect modifier and fork flag and widens this
    /// builder's range to cover `range`.
    pub fn with_node(&mut self, id: NodeId, node: &CommandNode<S>, range: TextRange) -> &mut Self {
        self.nodes.push(ParsedCommandNode::new(id, range));
        self.range = TextRange::encompassing(self.range, range);
        self.modifier = node.redirect_modifier().map(Arc::clone);
        self.forks = node.is_fork();
        self
    }

    /// Matched nodes so far.
    pub fn nodes(&self) -> &[ParsedCommandNode] {
        &self.nodes
    }

    /// Attach the builder for the segment after a redirect.
    pub fn with_child(&mut self, child: CommandContextBuilder<S>) -> &mut Self {
        self.child = Some(Box::new(child));
        self
    }

    /// The builder for the segment after a redirect.
    pub fn child(&self) -> Option<&CommandContextBuilder<S>> {
        self.child.as_deref()
    }

    /// The last builder of the chain.
    pub fn last_child(&self) -> &CommandContextBuilder<S> {
        let mut result = self;
        while let Some(child) = result.child() {
            result = child;
        }
        result
    }

    /// Executor set so far.
    pub fn command(&self) -> Option<&Command<S>> {
        self.command.as_ref()
    }

    /// Input covered by matched nodes.
    pub fn range(&self) -> TextRange {
        self.range
    }

    /// Find the node whose children should complete the text at `cursor`.
    ///
    /// A cursor inside a matched node's range completes that node against its
    /// siblings; a cursor past every match completes the children of the last
    /// matched node (or follows the redirect chain).
    pub fn find_suggestion_context(&self, cursor: usize) -> SuggestionContext {
        if self.range.start > cursor {
            return SuggestionContext {
                parent: self.root_node,
                start: cursor,
            };
        }
        if self.range.end < cursor {
            if let Some(child) = &self.child {
                return child.find_suggestion_context(cursor);
            }
            return match self.nodes.last() {
                Some(last) => SuggestionContext {
                    parent: last.node(),
                    start: last.range().end + 1,
                },
                None => SuggestionContext {
                    parent: self.root_node,
                    start: self.range.start,
                },
            };
        }
        let mut previous = self.root_node;
        for parsed in &self.nodes {
            if parsed.range().touches(cursor) {
                return SuggestionContext {
                    parent: previous,
                    start: parsed.range().start,
                };
            }
            previous = parsed.node();
        }
        SuggestionContext {
            parent: previous,
            start: self.range.start,
        }
    }
}

impl<S: Clone> CommandContextBuilder<S> {
    /// Freeze into a [`CommandContext`] for `input`, building the child
    /// chain as well.
    pub fn build(&self, input: &str) -> CommandContext<S> {
        self.build_shared(&Arc::from(input))
    }

    fn build_shared(&self, input: &Arc<str>) -> CommandContext<S> {
        CommandContext {
            sender: self.sender.clone(),
            input: Arc::clone(input),
            arguments: self.arguments.clone(),
            command: self.command.clone(),
            root_node: self.root_node,
            nodes: self.nodes.clone(),
            range: self.range,
            child: self
                .child
                .as_ref()
                .map(|child| Box::new(child.build_shared(input))),
            modifier: self.modifier.clone(),
            forks: self.forks,
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for CommandContextBuilder<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandContextBuilder")
            .field("sender", &self.sender)
            .field("root_node", &self.root_node)
            .field("arguments", &self.arguments)
            .field("nodes", &self.nodes)
            .field("range", &self.range)
            .field("child", &self.child)
            .field("forks", &self.forks)
            .finish()
    }
}
