//! The entry point: register commands, parse input, execute, complete.

mod execute;
mod parse;
mod suggest;
mod usage;

pub use execute::ExecutionReport;
pub use parse::ParseResults;

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::config::DispatcherConfig;
use crate::context::CommandContext;
use crate::error::TreeError;
use crate::tree::{Ambiguity, ArgumentBuilder, CommandTree, NodeId};

/// Character separating one node's input from the next.
pub const ARGUMENT_SEPARATOR: char = ' ';

/// Callback told about every attempted command: the context, whether it
/// succeeded, and the value it returned (0 on failure).
pub type ResultConsumer<S> = Arc<dyn Fn(&CommandContext<S>, bool, i32) + Send + Sync>;

/// Owns the command tree and runs input against it.
pub struct CommandDispatcher<S> {
    tree: CommandTree<S>,
    config: DispatcherConfig,
    consumer: Option<ResultConsumer<S>>,
}

impl<S> Default for CommandDispatcher<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> CommandDispatcher<S> {
    /// An empty dispatcher with the default configuration.
    pub fn new() -> Self {
        Self::with_config(DispatcherConfig::default())
    }

    /// An empty dispatcher.
    pub fn with_config(config: DispatcherConfig) -> Self {
        Self {
            tree: CommandTree::new(),
            config,
            consumer: None,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// The grammar.
    pub fn tree(&self) -> &CommandTree<S> {
        &self.tree
    }

    /// Id of the root node, usable as a redirect target.
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// Install a callback run after every attempted command.
    pub fn set_consumer<F>(&mut self, consumer: F)
    where
        F: Fn(&CommandContext<S>, bool, i32) + Send + Sync + 'static,
    {
        self.consumer = Some(Arc::new(consumer));
    }

    /// Add `command` under the root, merging with an existing command of the
    /// same name.
    pub fn register(&mut self, command: ArgumentBuilder<S>) -> Result<NodeId, TreeError> {
        debug!(command = command.key(), "registering command");
        self.tree.insert(NodeId::ROOT, command)
    }

    /// Remove the top-level command `name`. Redirects pointing into it keep
    /// working.
    pub fn unregister(&mut self, name: &str) -> Option<NodeId> {
        let removed = self.tree.remove_child(NodeId::ROOT, name);
        if removed.is_some() {
            debug!(command = name, "unregistered command");
        }
        removed
    }

    /// Follow `path` (node names) down from the root.
    pub fn find_node(&self, path: &[&str]) -> Option<NodeId> {
        path.iter()
            .try_fold(NodeId::ROOT, |node, name| self.tree[node].child(name))
    }

    /// Names leading from the root to `target`; empty if it is unreachable
    /// (or is the root).
    pub fn get_path(&self, target: NodeId) -> Vec<String> {
        let mut path = Vec::new();
        if self.collect_path(NodeId::ROOT, target, &mut path) {
            path
        } else {
            Vec::new()
        }
    }

    fn collect_path(&self, current: NodeId, target: NodeId, path: &mut Vec<String>) -> bool {
        if current == target {
            return true;
        }
        for child in self.tree[current].children() {
            path.push(self.tree[child].name().to_owned());
            if self.collect_path(child, target, path) {
                return true;
            }
            path.pop();
        }
        false
    }

    /// Report sibling nodes that accept each other's example inputs.
    pub fn find_ambiguities(&self, mut consumer: impl FnMut(Ambiguity)) {
        self.tree.find_ambiguities(&mut consumer);
    }

    fn notify(&self, context: &CommandContext<S>, success: bool, result: i32) {
        if let Some(consumer) = &self.consumer {
            consumer(context, success, result);
        }
    }
}

impl<S> fmt::Debug for CommandDispatcher<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDispatcher")
            .field("tree", &self.tree)
            .field("config", &self.config)
            .field("consumer", &self.consumer.is_some())
            .finish()
    }
}
