//! The command grammar: an arena of nodes addressed by [`NodeId`].
//!
//! Children are owned by the tree and linked by id. Redirects are plain ids
//! as well, so a node may redirect to any node (including an ancestor or the
//! root) without creating ownership cycles.

mod builder;
mod node;

pub use builder::{ArgumentBuilder, argument, literal};
pub use node::{ArgumentNode, CommandNode, NodeKind};

use std::collections::BTreeSet;
use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::context::CommandContext;
use crate::error::{CommandResult, TreeError};
use crate::reader::TextReader;
use crate::suggestion::{SuggestionFuture, SuggestionsBuilder};

/// Executor bound to a node; returns a result value or a failure.
pub type Command<S> = Arc<dyn Fn(&CommandContext<S>) -> CommandResult<i32> + Send + Sync>;

/// Predicate deciding whether a sender may use a node.
pub type Requirement<S> = Arc<dyn Fn(&S) -> bool + Send + Sync>;

/// Maps the current context to the senders execution continues with after a
/// redirect.
pub type RedirectModifier<S> =
    Arc<dyn Fn(&CommandContext<S>) -> CommandResult<Vec<S>> + Send + Sync>;

/// Completion source overriding an argument type's own suggestions.
pub type SuggestionProvider<S> =
    Arc<dyn Fn(&CommandContext<S>, SuggestionsBuilder) -> SuggestionFuture + Send + Sync>;

/// Handle to a node in a [`CommandTree`].
///
/// Ids stay valid for the lifetime of the tree, including after the node is
/// unregistered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The root of every tree.
    pub const ROOT: NodeId = NodeId(0);

    /// Position in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Two siblings that both accept one of the first sibling's examples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ambiguity {
    /// Node owning both siblings.
    pub parent: NodeId,
    /// Node whose examples were tried.
    pub child: NodeId,
    /// Node that also accepted them.
    pub sibling: NodeId,
    /// The examples accepted by both, sorted.
    pub inputs: Vec<String>,
}

// ── CommandTree ─────────────────────────────────────────────────────────

/// Arena holding every node of a dispatcher's grammar.
pub struct CommandTree<S> {
    nodes: Vec<CommandNode<S>>,
}

impl<S> Default for CommandTree<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Index<NodeId> for CommandTree<S> {
    type Output = CommandNode<S>;

    fn index(&self, id: NodeId) -> &CommandNode<S> {
        &self.nodes[id.0]
    }
}

impl<S> CommandTree<S> {
    /// A tree holding only the root.
    pub fn new() -> Self {
        Self {
            nodes: vec![CommandNode::new(NodeKind::Root)],
        }
    }

    /// The root node's id.
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Look up a node.
    pub fn get(&self, id: NodeId) -> Option<&CommandNode<S>> {
        self.nodes.get(id.0)
    }

    /// Number of nodes ever allocated, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether only the root exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Build `builder` under `parent`, merging with any child of the same key.
    ///
    /// Merging keeps the existing node, replaces its executor, requirement,
    /// redirect, and description with the incoming ones where those are set,
    /// and merges children recursively. The whole insertion is checked before
    /// anything is changed, so a failed call leaves the tree untouched.
    pub fn insert(
        &mut self,
        parent: NodeId,
        builder: ArgumentBuilder<S>,
    ) -> Result<NodeId, TreeError> {
        if parent.0 >= self.nodes.len() {
            return Err(TreeError::UnknownNode(parent));
        }
        if builder.is_default() {
            if parent == NodeId::ROOT {
                return Err(TreeError::DefaultAtRoot(builder.key().to_owned()));
            }
            self.check_default(Some(parent), self[parent].name(), &[&builder])?;
        }
        let existing = self[parent].child(builder.key());
        self.check_merge(existing, &[&builder])?;
        Ok(self.merge_into(parent, builder))
    }

    /// Reject a second default child: every default among `children` and the
    /// default already linked under `parent` must share one key.
    fn check_default(
        &self,
        parent: Option<NodeId>,
        parent_name: &str,
        children: &[&ArgumentBuilder<S>],
    ) -> Result<(), TreeError> {
        let mut current = parent
            .and_then(|id| self[id].default_node())
            .map(|id| self[id].name().to_owned());
        for child in children.iter().filter(|child| child.is_default()) {
            match &current {
                Some(existing) if existing != child.key() => {
                    return Err(TreeError::MultipleDefaults {
                        parent: parent_name.to_owned(),
                        existing: existing.clone(),
                        incoming: child.key().to_owned(),
                    });
                }
                Some(_) => {}
                None => current = Some(child.key().to_owned()),
            }
        }
        Ok(())
    }

    /// Detach the child `name` from `parent`.
    pub fn remove_child(&mut self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.nodes.get_mut(parent.0)?.unlink_child(name)
    }

    /// Validate merging `group` (builders sharing one key under one parent)
    /// onto `existing`.
    fn check_merge(
        &self,
        existing: Option<NodeId>,
        group: &[&ArgumentBuilder<S>],
    ) -> Result<(), TreeError> {
        let Some(first) = group.first() else {
            return Ok(());
        };
        let name = first.key();
        let expected_kind = match existing {
            Some(id) => self[id].kind().label(),
            None => first.kind_label(),
        };

        let mut redirects = existing.is_some_and(|id| self[id].redirect().is_some());
        let mut has_children = existing.is_some_and(|id| self[id].has_children());
        for builder in group {
            if builder.kind_label() != expected_kind {
                return Err(TreeError::ConflictingKind {
                    name: name.to_owned(),
                    existing: expected_kind,
                    incoming: builder.kind_label(),
                });
            }
            if let Some(target) = builder.redirect_target() {
                if target.0 >= self.nodes.len() {
                    return Err(TreeError::UnknownRedirectTarget(target));
                }
                redirects = true;
            }
            has_children |= !builder.child_builders().is_empty();
        }
        if redirects && has_children {
            return Err(TreeError::RedirectWithChildren {
                name: name.to_owned(),
            });
        }

        let mut grouped: IndexMap<&str, Vec<&ArgumentBuilder<S>>> = IndexMap::new();
        for builder in group {
            for child in builder.child_builders() {
                grouped.entry(child.key()).or_default().push(child);
            }
        }
        let all_children: Vec<&ArgumentBuilder<S>> = grouped.values().flatten().copied().collect();
        self.check_default(existing, name, &all_children)?;
        for (key, children) in grouped {
            let existing_child = existing.and_then(|id| self[id].child(key));
            self.check_merge(existing_child, &children)?;
        }
        Ok(())
    }

    fn merge_into(&mut self, parent: NodeId, builder: ArgumentBuilder<S>) -> NodeId {
        let (key, incoming, children) = builder.into_node();
        let id = match self.nodes[parent.0].child(&key) {
            Some(existing) => {
                let node = &mut self.nodes[existing.0];
                if incoming.command.is_some() {
                    node.command = incoming.command;
                }
                if incoming.requirement.is_some() {
                    node.requirement = incoming.requirement;
                }
                if incoming.redirect.is_some() {
                    node.redirect = incoming.redirect;
                    node.modifier = incoming.modifier;
                    node.forks = incoming.forks;
                }
                if incoming.description.is_some() {
                    node.description = incoming.description;
                }
                if incoming.usage.is_some() {
                    node.usage = incoming.usage;
                }
                node.is_default |= incoming.is_default;
                if let (NodeKind::Argument(current), NodeKind::Argument(new)) =
                    (&mut node.kind, incoming.kind)
                {
                    if new.custom_suggestions.is_some() {
                        current.custom_suggestions = new.custom_suggestions;
                    }
                    if new.default_value.is_some() {
                        current.default_value = new.default_value;
                    }
                }
                existing
            }
            None => {
                let id = NodeId(self.nodes.len());
                let literal = incoming.is_literal();
                self.nodes.push(incoming);
                self.nodes[parent.0].link_child(key, id, literal);
                id
            }
        };
        if self.nodes[id.0].is_default {
            self.nodes[parent.0].default_node = Some(id);
        }
        for child in children {
            self.merge_into(id, child);
        }
        id
    }

    /// Whether input ending at `id` runs a command, either the node's own or
    /// one reached by falling through default children.
    pub fn is_executable(&self, id: NodeId) -> bool {
        let mut node = &self[id];
        while node.command().is_none() {
            match node.default_node() {
                Some(next) => node = &self[next],
                None => return false,
            }
        }
        true
    }

    /// Children worth trying at the reader's position: the default child at
    /// the end of input, otherwise the literal matching the next word (if
    /// any) followed by every argument child.
    pub fn relevant_nodes(&self, id: NodeId, reader: &TextReader<'_>) -> Vec<NodeId> {
        let node = &self[id];
        if let Some(default) = node.default_node().filter(|_| !reader.can_read()) {
            return vec![default];
        }
        let arguments = node.arguments.values().copied();
        if node.literals.is_empty() {
            return arguments.collect();
        }
        let remaining = reader.remaining();
        let word = remaining.find(' ').map_or(remaining, |end| &remaining[..end]);
        match node.literals.get(word) {
            Some(&literal) => std::iter::once(literal).chain(arguments).collect(),
            None => arguments.collect(),
        }
    }

    /// Report every pair of siblings where one accepts the other's examples.
    pub fn find_ambiguities(&self, consumer: &mut impl FnMut(Ambiguity)) {
        self.find_ambiguities_under(NodeId::ROOT, consumer);
    }

    fn find_ambiguities_under(&self, parent: NodeId, consumer: &mut impl FnMut(Ambiguity)) {
        let node = &self[parent];
        for child in node.children() {
            for sibling in node.children() {
                if child == sibling {
                    continue;
                }
                let inputs: BTreeSet<String> = self[child]
                    .examples()
                    .into_iter()
                    .filter(|input| self[sibling].is_valid_input(input))
                    .collect();
                if !inputs.is_empty() {
                    consumer(Ambiguity {
                        parent,
                        child,
                        sibling,
                        inputs: inputs.into_iter().collect(),
                    });
                }
            }
            self.find_ambiguities_under(child, consumer);
        }
    }
}

impl<S> fmt::Debug for CommandTree<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandTree")
            .field("nodes", &self.nodes)
            .finish()
    }
}
