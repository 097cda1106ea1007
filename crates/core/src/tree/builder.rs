use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::arguments::{ArgumentType, ArgumentValue, ErasedArgument};
use crate::context::CommandContext;
use crate::error::CommandResult;
use crate::suggestion::{SuggestionFuture, SuggestionsBuilder};

use super::node::{ArgumentNode, CommandNode, NodeKind};
use super::{Command, NodeId, RedirectModifier, Requirement, SuggestionProvider};

enum BuilderKind<S> {
    Literal(String),
    Argument {
        name: String,
        parser: Arc<dyn ErasedArgument<S>>,
        suggestions: Option<SuggestionProvider<S>>,
        default_value: Option<(ArgumentValue, &'static str)>,
    },
}

/// Fluent description of a node and its subtree, consumed by
/// [`CommandDispatcher::register`](crate::CommandDispatcher::register).
///
/// ```
/// use cmdtree_core::arguments::integer;
/// use cmdtree_core::{CommandDispatcher, argument, literal};
///
/// let mut dispatcher = CommandDispatcher::new();
/// dispatcher
///     .register(
///         literal("heal")
///             .executes(|_| Ok(1))
///             .then(argument("amount", integer()).executes(|ctx| {
///                 Ok(*ctx.get_argument::<i32>("amount")?)
///             })),
///     )
///     .unwrap();
/// assert_eq!(dispatcher.execute("heal 5", ()).unwrap(), 5);
/// ```
pub struct ArgumentBuilder<S> {
    kind: BuilderKind<S>,
    children: Vec<ArgumentBuilder<S>>,
    command: Option<Command<S>>,
    requirement: Option<Requirement<S>>,
    target: Option<NodeId>,
    modifier: Option<RedirectModifier<S>>,
    forks: bool,
    description: Option<String>,
    usage: Option<String>,
    is_default: bool,
    has_default_child: bool,
}

/// Start a literal node matching `name` exactly.
pub fn literal<S>(name: impl Into<String>) -> ArgumentBuilder<S> {
    ArgumentBuilder::with_kind(BuilderKind::Literal(name.into()))
}

/// Start an argument node binding a value parsed by `parser` under `name`.
pub fn argument<S, T>(name: impl Into<String>, parser: T) -> ArgumentBuilder<S>
where
    T: ArgumentType<S>,
{
    ArgumentBuilder::with_kind(BuilderKind::Argument {
        name: name.into(),
        parser: Arc::new(parser),
        suggestions: None,
        default_value: None,
    })
}

impl<S> ArgumentBuilder<S> {
    fn with_kind(kind: BuilderKind<S>) -> Self {
        Self {
            kind,
            children: Vec::new(),
            command: None,
            requirement: None,
            target: None,
            modifier: None,
            forks: false,
            description: None,
            usage: None,
            is_default: false,
            has_default_child: false,
        }
    }

    /// The key the built node is stored under.
    pub fn key(&self) -> &str {
        match &self.kind {
            BuilderKind::Literal(literal) => literal,
            BuilderKind::Argument { name, .. } => name,
        }
    }

    /// Builders added with [`then`](Self::then).
    pub fn child_builders(&self) -> &[ArgumentBuilder<S>] {
        &self.children
    }

    /// Redirect target, if one was set.
    pub fn redirect_target(&self) -> Option<NodeId> {
        self.target
    }

    /// Whether an executor was set.
    pub fn is_executable(&self) -> bool {
        self.command.is_some()
    }

    /// Whether the built node is its parent's default child.
    pub fn is_default(&self) -> bool {
        self.is_default
    }

    pub(super) fn kind_label(&self) -> &'static str {
        match self.kind {
            BuilderKind::Literal(_) => "literal",
            BuilderKind::Argument { .. } => "argument",
        }
    }

    /// Add a child.
    ///
    /// # Panics
    ///
    /// If a redirect was already set: a node either redirects or has children.
    /// Also if `child` is a default node and another default child was added.
    pub fn then(mut self, child: ArgumentBuilder<S>) -> Self {
        assert!(
            self.target.is_none(),
            "cannot add children to redirected node '{}'",
            self.key()
        );
        if child.is_default {
            assert!(
                !self.has_default_child,
                "node '{}' already has a default child",
                self.key()
            );
            self.has_default_child = true;
        }
        self.children.push(child);
        self
    }

    /// Attach a help description.
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Show `text` in usage listings instead of the literal or `<name>`.
    pub fn usage(mut self, text: impl Into<String>) -> Self {
        self.usage = Some(text.into());
        self
    }

    /// Make this literal match when input ends before it, so `parent`
    /// alone behaves like `parent literal`.
    ///
    /// # Panics
    ///
    /// If called on an argument builder; arguments use
    /// [`default_value`](Self::default_value).
    pub fn default_node(mut self) -> Self {
        if let BuilderKind::Argument { name, .. } = &self.kind {
            panic!("argument '{name}' needs a default value to be a default node");
        }
        self.is_default = true;
        self
    }

    /// Make this argument match when input ends before it, binding `value`.
    ///
    /// `value` should have the argument type's value type, or reading it back
    /// with [`get_argument`](crate::CommandContext::get_argument) fails.
    ///
    /// # Panics
    ///
    /// If called on a literal builder.
    pub fn default_value<V>(mut self, value: V) -> Self
    where
        V: Any + Send + Sync,
    {
        match &mut self.kind {
            BuilderKind::Argument { default_value, .. } => {
                let value: ArgumentValue = Arc::new(value);
                *default_value = Some((value, std::any::type_name::<V>()));
            }
            BuilderKind::Literal(literal) => {
                panic!("literal '{literal}' cannot take a default value")
            }
        }
        self.is_default = true;
        self
    }

    /// Redirect to `target` without changing the sender.
    ///
    /// # Panics
    ///
    /// If children were already added.
    pub fn redirect(self, target: NodeId) -> Self {
        self.forward(target, None, false)
    }

    /// Continue at `target` with the (possibly different) sender produced by
    /// `modifier`. A modifier failure aborts execution.
    pub fn redirect_with<F>(self, target: NodeId, modifier: F) -> Self
    where
        F: Fn(&CommandContext<S>) -> CommandResult<S> + Send + Sync + 'static,
        S: 'static,
    {
        let modifier: RedirectModifier<S> = Arc::new(move |context: &CommandContext<S>| {
            modifier(context).map(|sender| vec![sender])
        });
        self.forward(target, Some(modifier), false)
    }

    /// Continue at `target` once for every sender `modifier` returns. Failures
    /// in individual branches are collected instead of aborting the others.
    pub fn fork<F>(self, target: NodeId, modifier: F) -> Self
    where
        F: Fn(&CommandContext<S>) -> CommandResult<Vec<S>> + Send + Sync + 'static,
    {
        self.forward(target, Some(Arc::new(modifier)), true)
    }

    /// Set the redirect target, modifier and fork flag directly.
    ///
    /// # Panics
    ///
    /// If children were already added.
    pub fn forward(
        mut self,
        target: NodeId,
        modifier: Option<RedirectModifier<S>>,
        fork: bool,
    ) -> Self {
        assert!(
            self.children.is_empty(),
            "cannot redirect node '{}' because it has children",
            self.key()
        );
        self.target = Some(target);
        self.modifier = modifier;
        self.forks = fork;
        self
    }

    /// Run `command` when input ends at this node.
    pub fn executes<F>(mut self, command: F) -> Self
    where
        F: Fn(&CommandContext<S>) -> CommandResult<i32> + Send + Sync + 'static,
    {
        self.command = Some(Arc::new(command));
        self
    }

    /// Hide this node from senders failing `requirement`.
    pub fn requires<F>(mut self, requirement: F) -> Self
    where
        F: Fn(&S) -> bool + Send + Sync + 'static,
    {
        self.requirement = Some(Arc::new(requirement));
        self
    }

    /// Replace the argument type's completions with `provider`.
    ///
    /// # Panics
    ///
    /// If called on a literal builder.
    pub fn suggests<F>(mut self, provider: F) -> Self
    where
        F: Fn(&CommandContext<S>, SuggestionsBuilder) -> SuggestionFuture + Send + Sync + 'static,
    {
        match &mut self.kind {
            BuilderKind::Argument { suggestions, .. } => *suggestions = Some(Arc::new(provider)),
            BuilderKind::Literal(literal) => {
                panic!("literal '{literal}' cannot take a suggestion provider")
            }
        }
        self
    }

    /// Split into the node key, the node itself, and the child builders.
    pub(super) fn into_node(self) -> (String, CommandNode<S>, Vec<ArgumentBuilder<S>>) {
        let key = self.key().to_owned();
        let kind = match self.kind {
            BuilderKind::Literal(literal) => NodeKind::Literal(literal),
            BuilderKind::Argument {
                name,
                parser,
                suggestions,
                default_value,
            } => NodeKind::Argument(ArgumentNode {
                name,
                parser,
                custom_suggestions: suggestions,
                default_value,
            }),
        };
        let mut node = CommandNode::new(kind);
        node.command = self.command;
        node.requirement = self.requirement;
        node.redirect = self.target;
        node.modifier = self.modifier;
        node.forks = self.forks;
        node.description = self.description;
        node.usage = self.usage;
        node.is_default = self.is_default;
        (key, node, self.children)
    }
}

impl<S> fmt::Debug for ArgumentBuilder<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentBuilder")
            .field("kind", &self.kind_label())
            .field("key", &self.key())
            .field("children", &self.children)
            .field("executable", &self.command.is_some())
            .field("target", &self.target)
            .field("forks", &self.forks)
            .field("default", &self.is_default)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arguments::integer;

    #[test]
    fn literal_key() {
        let builder: ArgumentBuilder<()> = literal("foo");
        assert_eq!(builder.key(), "foo");
        assert!(!builder.is_executable());
    }

    #[test]
    fn then_collects_children() {
        let builder: ArgumentBuilder<()> = literal("foo")
            .then(argument("bar", integer()))
            .then(literal("baz"));
        let keys: Vec<&str> = builder.child_builders().iter().map(ArgumentBuilder::key).collect();
        assert_eq!(keys, ["bar", "baz"]);
    }

    #[test]
    fn redirect_sets_target() {
        let builder: ArgumentBuilder<()> = literal("foo").redirect(NodeId::ROOT);
        assert_eq!(builder.redirect_target(), Some(NodeId::ROOT));
    }

    #[test]
    #[should_panic(expected = "cannot add children to redirected node 'foo'")]
    fn then_after_redirect_panics() {
        let _: ArgumentBuilder<()> = literal("foo").redirect(NodeId::ROOT).then(literal("bar"));
    }

    #[test]
    #[should_panic(expected = "cannot redirect node 'foo' because it has children")]
    fn redirect_after_then_panics() {
        let _: ArgumentBuilder<()> = literal("foo").then(literal("bar")).redirect(NodeId::ROOT);
    }

    #[test]
    fn default_literal_and_argument() {
        let builder: ArgumentBuilder<()> = literal("list").default_node();
        assert!(builder.is_default());
        let (_, node, _) = argument("page", integer()).default_value(1_i32).into_node();
        assert!(node.is_default());
        let NodeKind::Argument(argument): &NodeKind<()> = node.kind() else {
            panic!("expected an argument node");
        };
        assert_eq!(argument.default_value().and_then(|v| v.downcast_ref::<i32>()), Some(&1));
    }

    #[test]
    #[should_panic(expected = "node 'show' already has a default child")]
    fn second_default_child_panics() {
        let _: ArgumentBuilder<()> = literal("show")
            .then(literal("all").default_node())
            .then(literal("mine").default_node());
    }

    #[test]
    #[should_panic(expected = "argument 'page' needs a default value to be a default node")]
    fn default_node_on_argument_panics() {
        let _: ArgumentBuilder<()> = argument("page", integer()).default_node();
    }

    #[test]
    fn into_node_copies_attributes() {
        let builder: ArgumentBuilder<()> = argument("n", integer())
            .executes(|_| Ok(1))
            .requires(|_| false)
            .description("a number")
            .usage("<n: number>")
            .then(literal("x"));
        let (key, node, children) = builder.into_node();
        assert_eq!(key, "n");
        assert!(node.command().is_some());
        assert!(!node.can_use(&()));
        assert_eq!(node.description(), Some("a number"));
        assert_eq!(node.usage_text(), "<n: number>");
        assert_eq!(children.len(), 1);
    }
}
