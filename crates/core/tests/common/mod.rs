//! Shared test helpers for `cmdtree_core` integration tests.

#![allow(unreachable_pub)]

use std::sync::{Arc, Mutex};

use cmdtree_core::arguments::{greedy_string, integer, string};
use cmdtree_core::{CommandContext, CommandDispatcher, CommandSender, CommandSyntaxError, argument, literal};

// ─── Recording sender ────────────────────────────────────────────────────────

/// A sender that records every message it receives.
///
/// Copies made with [`TestSender::named`] share the same log, so messages sent
/// to forked senders can be inspected from the original.
#[derive(Debug, Clone)]
pub struct TestSender {
    name: String,
    admin: bool,
    log: Arc<Mutex<Vec<String>>>,
}

impl TestSender {
    #[allow(dead_code)]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            admin: false,
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    #[allow(dead_code)]
    pub fn admin(name: &str) -> Self {
        Self {
            admin: true,
            ..Self::new(name)
        }
    }

    /// Same log, different name.
    #[allow(dead_code)]
    pub fn named(&self, name: &str) -> Self {
        Self {
            name: name.to_owned(),
            admin: self.admin,
            log: Arc::clone(&self.log),
        }
    }

    #[allow(dead_code)]
    pub fn is_admin(&self) -> bool {
        self.admin
    }

    /// Every message delivered to this sender or its copies, in order.
    #[allow(dead_code)]
    pub fn messages(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

impl CommandSender for TestSender {
    fn name(&self) -> &str {
        &self.name
    }

    fn send_message(&self, message: &str) {
        self.log
            .lock()
            .unwrap()
            .push(format!("{}: {message}", self.name));
    }
}

// ─── Sample grammar ──────────────────────────────────────────────────────────

/// A small command set used across test files:
///
/// * `heal` / `heal <amount>`: returns 1 / the amount
/// * `say <message...>`: echoes to the sender, returns 1
/// * `whoami`: sends the sender's name, returns 1
/// * `strict`: fails for senders named `b`, returns 1 otherwise
/// * `ban <target>`: admin only
/// * `each ...`: forks to senders `a`, `b`, `c`
/// * `as <name> ...`: redirects with the sender renamed
/// * `r ...`: plain redirect to the root
#[allow(dead_code)]
pub fn sample_dispatcher() -> CommandDispatcher<TestSender> {
    let mut dispatcher = CommandDispatcher::new();
    let root = dispatcher.root();
    dispatcher
        .register(
            literal("heal")
                .executes(|_| Ok(1))
                .then(argument("amount", integer()).executes(|ctx| {
                    Ok(*ctx.get_argument::<i32>("amount")?)
                })),
        )
        .unwrap();
    dispatcher
        .register(literal("say").then(argument("message", greedy_string()).executes(|ctx: &CommandContext<TestSender>| {
            let message = ctx.get_argument::<String>("message")?;
            ctx.sender().send_message(message);
            Ok(1)
        })))
        .unwrap();
    dispatcher
        .register(literal("whoami").executes(|ctx| {
            let sender: &TestSender = ctx.sender();
            sender.send_message(sender.name());
            Ok(1)
        }))
        .unwrap();
    dispatcher
        .register(literal("strict").executes(|ctx: &CommandContext<TestSender>| {
            if ctx.sender().name() == "b" {
                return Err(CommandSyntaxError::custom("b is not allowed"));
            }
            Ok(1)
        }))
        .unwrap();
    dispatcher
        .register(
            literal("ban")
                .requires(TestSender::is_admin)
                .then(argument("target", string()).executes(|_| Ok(1))),
        )
        .unwrap();
    dispatcher
        .register(literal("each").fork(root, |ctx| {
            let sender: &TestSender = ctx.sender();
            Ok(vec![sender.named("a"), sender.named("b"), sender.named("c")])
        }))
        .unwrap();
    dispatcher
        .register(literal("as").then(argument("name", string()).redirect_with(root, |ctx: &CommandContext<TestSender>| {
            let name = ctx.get_argument::<String>("name")?;
            Ok(ctx.sender().named(name))
        })))
        .unwrap();
    dispatcher.register(literal("r").redirect(root)).unwrap();
    dispatcher
}
