use tracing::trace;

use crate::suggestion::{SuggestionFuture, Suggestions, SuggestionsBuilder};

use super::{CommandDispatcher, ParseResults};

impl<S: Clone + 'static> CommandDispatcher<S> {
    /// Completion candidates for the end of the parsed input.
    pub fn get_completion_suggestions(&self, parse: &ParseResults<'_, S>) -> SuggestionFuture {
        self.get_completion_suggestions_at(parse, parse.reader.total_length())
    }

    /// Completion candidates for the text ending at `cursor`.
    ///
    /// Only the input before the cursor is offered to the candidate nodes;
    /// the merged suggestions are expanded against the full input. A cursor
    /// past the end (or inside a multi-byte character) is moved back to the
    /// nearest valid position.
    pub fn get_completion_suggestions_at(
        &self,
        parse: &ParseResults<'_, S>,
        cursor: usize,
    ) -> SuggestionFuture {
        let full_input = parse.reader.string();
        let cursor = floor_char_boundary(full_input, cursor);
        let truncated = &full_input[..cursor];

        let context = &parse.context;
        let suggestion_context = context.find_suggestion_context(cursor);
        let start = suggestion_context.start.min(cursor);
        let built = context.build(truncated);
        let parent = &self.tree[suggestion_context.parent];

        let pending: Vec<SuggestionFuture> = parent
            .children()
            .filter(|&child| {
                !self.config.restrict_suggestions || self.tree[child].can_use(context.sender())
            })
            .map(|child| {
                self.tree[child].list_suggestions(&built, SuggestionsBuilder::new(truncated, start))
            })
            .collect();
        trace!(
            parent = %suggestion_context.parent,
            start,
            candidates = pending.len(),
            "collecting suggestions"
        );

        let full_input = full_input.to_owned();
        Box::pin(async move {
            let mut all = Vec::with_capacity(pending.len());
            for suggestions in pending {
                all.push(suggestions.await);
            }
            Suggestions::merge(&full_input, all)
        })
    }
}

fn floor_char_boundary(input: &str, cursor: usize) -> usize {
    let mut cursor = cursor.min(input.len());
    while !input.is_char_boundary(cursor) {
        cursor -= 1;
    }
    cursor
}

#[cfg(test)]
mod tests {
    use futures_lite::future::block_on;

    use super::*;
    use crate::arguments::{integer, term};
    use crate::tree::{argument, literal};

    fn texts(suggestions: &Suggestions) -> Vec<&str> {
        suggestions.list().iter().map(|s| s.text()).collect()
    }

    #[test]
    fn suggests_root_literals() {
        let mut dispatcher: CommandDispatcher<()> = CommandDispatcher::new();
        dispatcher.register(literal("foo")).unwrap();
        dispatcher.register(literal("bar")).unwrap();
        dispatcher.register(literal("baz")).unwrap();
        let parse = dispatcher.parse("ba", ());
        let suggestions = block_on(dispatcher.get_completion_suggestions(&parse));
        assert_eq!(texts(&suggestions), ["bar", "baz"]);
        assert_eq!(suggestions.range().start, 0);
    }

    #[test]
    fn suggests_argument_values_after_space() {
        let mut dispatcher: CommandDispatcher<()> = CommandDispatcher::new();
        dispatcher
            .register(literal("pick").then(argument("fruit", term(["pear", "plum", "fig"]))))
            .unwrap();
        let parse = dispatcher.parse("pick p", ());
        let suggestions = block_on(dispatcher.get_completion_suggestions(&parse));
        assert_eq!(texts(&suggestions), ["pear", "plum"]);
        assert_eq!(suggestions.range().start, 5);
        assert_eq!(suggestions.range().end, 6);
    }

    #[test]
    fn cursor_in_middle_truncates_input() {
        let mut dispatcher: CommandDispatcher<()> = CommandDispatcher::new();
        dispatcher
            .register(literal("set").then(argument("n", integer())))
            .unwrap();
        dispatcher.register(literal("say")).unwrap();
        let parse = dispatcher.parse("set 5", ());
        let suggestions = block_on(dispatcher.get_completion_suggestions_at(&parse, 1));
        assert_eq!(texts(&suggestions), ["say", "set"]);
    }

    #[test]
    fn restricted_nodes_are_hidden() {
        let mut dispatcher: CommandDispatcher<bool> = CommandDispatcher::new();
        dispatcher
            .register(literal("admin").requires(|admin: &bool| *admin))
            .unwrap();
        dispatcher.register(literal("about")).unwrap();
        let parse = dispatcher.parse("a", false);
        let suggestions = block_on(dispatcher.get_completion_suggestions(&parse));
        assert_eq!(texts(&suggestions), ["about"]);

        let parse = dispatcher.parse("a", true);
        let suggestions = block_on(dispatcher.get_completion_suggestions(&parse));
        assert_eq!(texts(&suggestions), ["about", "admin"]);
    }

    #[test]
    fn cursor_past_end_is_clamped() {
        assert_eq!(floor_char_boundary("abc", 10), 3);
        assert_eq!(floor_char_boundary("é", 1), 0);
    }
}
