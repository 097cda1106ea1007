//! cmdtree core library.
//!
//! A command grammar is a tree of literal and typed-argument nodes. Commands
//! are registered on a [`CommandDispatcher`] with the fluent [`literal`] and
//! [`argument`] builders; the dispatcher then parses input lines against the
//! tree ([`CommandDispatcher::parse`]), runs the matched executor
//! ([`CommandDispatcher::execute`]), and produces completion candidates
//! ([`CommandDispatcher::get_completion_suggestions`]).
//!
//! ```
//! use cmdtree_core::{CommandDispatcher, arguments::integer, argument, literal};
//!
//! let mut dispatcher: CommandDispatcher<()> = CommandDispatcher::new();
//! dispatcher
//!     .register(literal("add").then(
//!         argument("a", integer()).then(
//!             argument("b", integer()).executes(|ctx| {
//!                 Ok(ctx.get_argument::<i32>("a")? + ctx.get_argument::<i32>("b")?)
//!             }),
//!         ),
//!     ))
//!     .unwrap();
//! assert_eq!(dispatcher.execute("add 2 3", ()).unwrap(), 5);
//! ```

#![warn(missing_docs)]

/// Built-in argument types and the [`ArgumentType`](arguments::ArgumentType) trait.
pub mod arguments;
/// Dispatcher configuration.
pub mod config;
/// Parse results: bound arguments, matched nodes, and redirect chains.
pub mod context;
/// Registration, parsing, execution, completion, and usage.
pub mod dispatcher;
/// Syntax, tree, and argument errors.
pub mod error;
/// Cursor-based text reader used by every parser.
pub mod reader;
/// Minimal interface for whoever issues commands.
pub mod sender;
/// Completion candidates.
pub mod suggestion;
/// The node arena and its builders.
pub mod tree;

// ── Convenience re-exports ──────────────────────────────────────────────
// Flat imports for the most common entry points. The full module paths
// remain available for less common types.

// Dispatcher
pub use dispatcher::{
    ARGUMENT_SEPARATOR, CommandDispatcher, ExecutionReport, ParseResults, ResultConsumer,
};

// Tree
pub use tree::{Ambiguity, ArgumentBuilder, CommandNode, CommandTree, NodeId, argument, literal};

// Context
pub use context::{CommandContext, CommandContextBuilder, ParsedArgument};

// Reader
pub use reader::TextReader;

// Suggestions
pub use suggestion::{Suggestion, SuggestionFuture, Suggestions, SuggestionsBuilder};

// Errors
pub use error::{ArgumentError, CommandResult, CommandSyntaxError, SyntaxErrorKind, TreeError};

// Configuration and senders
pub use config::DispatcherConfig;
pub use sender::CommandSender;

// Ranges (re-exported from the diagnostics crate)
pub use cmdtree_diagnostics::TextRange;
