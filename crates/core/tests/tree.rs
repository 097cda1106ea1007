//! Tree construction tests: merging registrations, rejected registrations,
//! usage rendering, and ambiguity detection.

mod common;

use common::{TestSender, sample_dispatcher};

use cmdtree_core::arguments::{integer, word};
use cmdtree_core::{CommandDispatcher, TreeError, argument, literal};

// ─── Merging ─────────────────────────────────────────────────────────────────

#[test]
fn same_literal_merges_children() {
    let mut dispatcher: CommandDispatcher<()> = CommandDispatcher::new();
    let first = dispatcher
        .register(literal("base").then(literal("foo").executes(|_| Ok(1))))
        .unwrap();
    let second = dispatcher
        .register(literal("base").then(literal("bar").executes(|_| Ok(2))))
        .unwrap();
    assert_eq!(first, second);

    let base = &dispatcher.tree()[first];
    let names: Vec<&str> = base
        .children()
        .map(|id| dispatcher.tree()[id].name())
        .collect();
    assert_eq!(names, ["foo", "bar"]);
    assert_eq!(dispatcher.execute("base foo", ()).unwrap(), 1);
    assert_eq!(dispatcher.execute("base bar", ()).unwrap(), 2);
}

#[test]
fn registering_twice_adds_nothing() {
    let mut dispatcher: CommandDispatcher<()> = CommandDispatcher::new();
    let build = || literal("a").then(literal("b").then(argument("n", integer())));
    dispatcher.register(build()).unwrap();
    let size = dispatcher.tree().len();
    dispatcher.register(build()).unwrap();
    assert_eq!(dispatcher.tree().len(), size);
}

#[test]
fn later_executor_replaces_earlier() {
    let mut dispatcher: CommandDispatcher<()> = CommandDispatcher::new();
    dispatcher.register(literal("x").executes(|_| Ok(1))).unwrap();
    dispatcher.register(literal("x").executes(|_| Ok(2))).unwrap();
    assert_eq!(dispatcher.execute("x", ()).unwrap(), 2);
}

// ─── Rejected registrations ──────────────────────────────────────────────────

#[test]
fn literal_and_argument_cannot_share_a_key() {
    let mut dispatcher: CommandDispatcher<()> = CommandDispatcher::new();
    dispatcher
        .register(literal("cmd").then(literal("value")))
        .unwrap();
    let size = dispatcher.tree().len();
    let err = dispatcher
        .register(literal("cmd").then(literal("other")).then(argument("value", word())))
        .unwrap_err();
    assert!(matches!(err, TreeError::ConflictingKind { ref name, .. } if name == "value"));
    assert_eq!(dispatcher.tree().len(), size, "failed registration must not change the tree");
}

#[test]
fn redirect_cannot_gain_children() {
    let mut dispatcher: CommandDispatcher<()> = CommandDispatcher::new();
    let root = dispatcher.root();
    dispatcher.register(literal("r").redirect(root)).unwrap();
    let err = dispatcher
        .register(literal("r").then(literal("child")))
        .unwrap_err();
    assert_eq!(err, TreeError::RedirectWithChildren { name: "r".into() });
}

#[test]
fn redirect_target_must_exist() {
    let mut other: CommandDispatcher<()> = CommandDispatcher::new();
    let foreign = other.register(literal("elsewhere")).unwrap();
    let mut dispatcher: CommandDispatcher<()> = CommandDispatcher::new();
    let err = dispatcher
        .register(literal("r").redirect(foreign))
        .unwrap_err();
    assert_eq!(err, TreeError::UnknownRedirectTarget(foreign));
}

#[test]
fn default_node_cannot_be_top_level() {
    let mut dispatcher: CommandDispatcher<()> = CommandDispatcher::new();
    let err = dispatcher
        .register(literal("help").default_node().executes(|_| Ok(1)))
        .unwrap_err();
    assert_eq!(err, TreeError::DefaultAtRoot("help".into()));
    assert!(dispatcher.tree().is_empty());
}

#[test]
fn second_default_child_across_registrations_is_rejected() {
    let mut dispatcher: CommandDispatcher<()> = CommandDispatcher::new();
    dispatcher
        .register(literal("list").then(literal("players").default_node().executes(|_| Ok(1))))
        .unwrap();
    let size = dispatcher.tree().len();
    let err = dispatcher
        .register(literal("list").then(literal("mobs").default_node().executes(|_| Ok(2))))
        .unwrap_err();
    assert_eq!(
        err,
        TreeError::MultipleDefaults {
            parent: "list".into(),
            existing: "players".into(),
            incoming: "mobs".into(),
        }
    );
    assert_eq!(dispatcher.tree().len(), size, "failed registration must not change the tree");

    dispatcher
        .register(literal("list").then(literal("players").default_node().executes(|_| Ok(3))))
        .unwrap();
    assert_eq!(dispatcher.execute("list", ()).unwrap(), 3);
}

#[test]
#[should_panic(expected = "cannot redirect node 'r' because it has children")]
fn builder_rejects_redirect_after_children() {
    let _: cmdtree_core::ArgumentBuilder<()> =
        literal("r").then(literal("x")).redirect(cmdtree_core::NodeId::ROOT);
}

// ─── Lookup ──────────────────────────────────────────────────────────────────

#[test]
fn find_node_and_unregister() {
    let mut dispatcher = sample_dispatcher();
    let amount = dispatcher.find_node(&["heal", "amount"]).unwrap();
    assert_eq!(dispatcher.get_path(amount), ["heal", "amount"]);
    assert!(dispatcher.unregister("heal").is_some());
    assert!(dispatcher.find_node(&["heal"]).is_none());
    assert!(dispatcher.execute("heal", TestSender::new("alice")).is_err());
}

// ─── Usage ───────────────────────────────────────────────────────────────────

#[test]
fn all_usage_for_sample_grammar() {
    let dispatcher = sample_dispatcher();
    let usage = dispatcher.get_all_usage(dispatcher.root(), &TestSender::new("alice"), true);
    assert_eq!(
        usage,
        [
            "heal",
            "heal <amount>",
            "say <message>",
            "whoami",
            "strict",
            "each ...",
            "as <name> ...",
            "r ...",
        ]
    );
}

#[test]
fn smart_usage_for_sample_grammar() {
    let dispatcher = sample_dispatcher();
    let usage = dispatcher.get_smart_usage(dispatcher.root(), &TestSender::admin("root"));
    let lines: Vec<&str> = usage.values().map(String::as_str).collect();
    assert_eq!(
        lines,
        [
            "heal [<amount>]",
            "say <message>",
            "whoami",
            "strict",
            "ban <target>",
            "each ...",
            "as <name> ...",
            "r ...",
        ]
    );
}

#[test]
fn smart_usage_below_a_node() {
    let mut dispatcher: CommandDispatcher<()> = CommandDispatcher::new();
    let give = dispatcher
        .register(
            literal("give").then(
                argument("target", word())
                    .then(literal("all").executes(|_| Ok(1)))
                    .then(argument("count", integer()).executes(|_| Ok(1))),
            ),
        )
        .unwrap();
    let usage = dispatcher.get_smart_usage(give, &());
    assert_eq!(
        usage.values().next().map(String::as_str),
        Some("<target> (all|<count>)")
    );
}

// ─── Ambiguities ─────────────────────────────────────────────────────────────

#[test]
fn literal_shadowed_by_word_argument() {
    let mut dispatcher: CommandDispatcher<()> = CommandDispatcher::new();
    let parent = dispatcher
        .register(
            literal("pick")
                .then(literal("first"))
                .then(argument("name", word())),
        )
        .unwrap();
    let mut found = Vec::new();
    dispatcher.find_ambiguities(|ambiguity| found.push(ambiguity));
    assert_eq!(found.len(), 1);
    let ambiguity = &found[0];
    assert_eq!(ambiguity.parent, parent);
    assert_eq!(dispatcher.tree()[ambiguity.child].name(), "first");
    assert_eq!(dispatcher.tree()[ambiguity.sibling].name(), "name");
    assert_eq!(ambiguity.inputs, ["first"]);
}

#[test]
fn distinct_literals_are_not_ambiguous() {
    let dispatcher = sample_dispatcher();
    let mut count = 0;
    dispatcher.find_ambiguities(|_| count += 1);
    assert_eq!(count, 0);
}
