//! Dispatcher configuration.

/// Behavior switches for a [`CommandDispatcher`](crate::CommandDispatcher).
///
/// Deserializable (with the `serde` feature) so front ends can load it from a
/// file; missing fields take their defaults.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DispatcherConfig {
    /// Leading character skipped before parsing (e.g. `/` for chat-style
    /// front ends). Off by default, so input reaches the tree unchanged.
    ///
    /// Only one occurrence is skipped. Ranges and error cursors keep indexing
    /// the original input, prefix included.
    pub command_prefix: Option<char>,
    /// Only offer completions from nodes whose requirement passes for the sender.
    pub restrict_suggestions: bool,
    /// Hide nodes the sender cannot use from smart usage listings.
    pub restrict_usage: bool,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            command_prefix: None,
            restrict_suggestions: true,
            restrict_usage: true,
        }
    }
}

impl DispatcherConfig {
    /// Set or clear the command prefix.
    pub fn with_command_prefix(mut self, prefix: Option<char>) -> Self {
        self.command_prefix = prefix;
        self
    }

    /// Toggle requirement filtering for completions.
    pub fn with_restrict_suggestions(mut self, restrict: bool) -> Self {
        self.restrict_suggestions = restrict;
        self
    }

    /// Toggle requirement filtering for smart usage.
    pub fn with_restrict_usage(mut self, restrict: bool) -> Self {
        self.restrict_usage = restrict;
        self
    }
}
