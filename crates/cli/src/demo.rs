//! The demonstration command set driven by the CLI.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use cmdtree_core::arguments::{
    self, double, greedy_string, integer_between, short_between, string, term, uuid, word,
};
use cmdtree_core::{
    CommandContext, CommandDispatcher, CommandResult, CommandSender, CommandSyntaxError,
    DispatcherConfig, TreeError, argument, literal,
};
use serde::Serialize;

/// Items accepted by `give`.
pub(crate) const ITEMS: &[&str] = &["apple", "arrow", "bow", "bread", "torch"];

// ── Sender ──────────────────────────────────────────────────────────────

/// A message delivered to a sender during execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct Message {
    pub(crate) to: String,
    pub(crate) text: String,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.to, self.text)
    }
}

/// The sender commands run as. Copies made for redirects share one outbox,
/// so every message produced by one command line can be collected afterwards.
#[derive(Debug, Clone)]
pub(crate) struct ConsoleSender {
    name: String,
    admin: bool,
    outbox: Arc<Mutex<Vec<Message>>>,
}

impl ConsoleSender {
    pub(crate) fn new(name: &str, admin: bool) -> Self {
        Self {
            name: name.to_owned(),
            admin,
            outbox: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Same permissions and outbox under another name.
    pub(crate) fn named(&self, name: &str) -> Self {
        Self {
            name: name.to_owned(),
            admin: self.admin,
            outbox: Arc::clone(&self.outbox),
        }
    }

    pub(crate) fn is_admin(&self) -> bool {
        self.admin
    }

    /// Drain the messages delivered so far.
    pub(crate) fn take_messages(&self) -> Vec<Message> {
        std::mem::take(&mut *self.outbox.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl CommandSender for ConsoleSender {
    fn name(&self) -> &str {
        &self.name
    }

    fn send_message(&self, message: &str) {
        self.outbox
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Message {
                to: self.name.clone(),
                text: message.to_owned(),
            });
    }
}

// ── Commands ────────────────────────────────────────────────────────────

/// Build the demonstration grammar.
///
/// | command | result |
/// |---------|--------|
/// | `heal [amount]` | amount healed (default 1) |
/// | `give <target> <item> [count]` | items given |
/// | `tp <x> <y> <z>` | 1 |
/// | `say <message...>` | 1 |
/// | `toggle <flag>` | 1 when on, 0 when off |
/// | `whoami` | 1 |
/// | `slot [index]` | selected hotbar slot (default 0) |
/// | `lookup <uuid>` | 1 |
/// | `kill <target>` (admin) | 1 |
/// | `execute as <targets> ...` | forks once per comma-separated target |
/// | `execute run ...` | continues at the root |
pub(crate) fn demo_dispatcher(
    config: DispatcherConfig,
) -> Result<CommandDispatcher<ConsoleSender>, TreeError> {
    let mut dispatcher = CommandDispatcher::with_config(config);
    let root = dispatcher.root();

    dispatcher.register(
        literal("heal")
            .description("Restore health to yourself")
            .executes(|ctx| heal(ctx, 1))
            .then(
                argument("amount", integer_between(1, 100))
                    .executes(|ctx| heal(ctx, *ctx.get_argument::<i32>("amount")?)),
            ),
    )?;

    dispatcher.register(
        literal("give").description("Give items to a player").then(
            argument("target", word()).then(
                argument("item", term(ITEMS.iter().copied()))
                    .executes(|ctx| give(ctx, 1))
                    .then(
                        argument("count", integer_between(1, 64))
                            .executes(|ctx| give(ctx, *ctx.get_argument::<i32>("count")?)),
                    ),
            ),
        ),
    )?;

    dispatcher.register(
        literal("tp").description("Teleport to a position").then(
            argument("x", double()).then(argument("y", double()).then(
                argument("z", double()).executes(|ctx| {
                    let x = ctx.get_argument::<f64>("x")?;
                    let y = ctx.get_argument::<f64>("y")?;
                    let z = ctx.get_argument::<f64>("z")?;
                    let sender: &ConsoleSender = ctx.sender();
                    sender.send_message(&format!("teleported {} to {x} {y} {z}", sender.name()));
                    Ok(1)
                }),
            )),
        ),
    )?;

    dispatcher.register(
        literal("say")
            .description("Broadcast a message")
            .then(argument("message", greedy_string()).executes(|ctx: &CommandContext<ConsoleSender>| {
                let message = ctx.get_argument::<String>("message")?;
                ctx.sender().send_message(message);
                Ok(1)
            })),
    )?;

    dispatcher.register(
        literal("toggle")
            .description("Switch a flag on or off")
            .then(argument("flag", arguments::bool()).executes(|ctx: &CommandContext<ConsoleSender>| {
                let flag = *ctx.get_argument::<bool>("flag")?;
                let state = if flag { "on" } else { "off" };
                ctx.sender().send_message(&format!("flag is now {state}"));
                Ok(i32::from(flag))
            })),
    )?;

    dispatcher.register(
        literal("whoami")
            .description("Print the current sender")
            .executes(|ctx| {
                let sender: &ConsoleSender = ctx.sender();
                sender.send_message(sender.name());
                Ok(1)
            }),
    )?;

    dispatcher.register(
        literal("slot").description("Select a hotbar slot").then(
            argument("index", short_between(0, 8))
                .default_value(0_i16)
                .usage("<index: 0-8>")
                .executes(|ctx: &CommandContext<ConsoleSender>| {
                    let index = *ctx.get_argument::<i16>("index")?;
                    ctx.sender().send_message(&format!("selected slot {index}"));
                    Ok(i32::from(index))
                }),
        ),
    )?;

    dispatcher.register(
        literal("lookup")
            .description("Look up a player by UUID")
            .then(argument("id", uuid()).executes(|ctx: &CommandContext<ConsoleSender>| {
                let id = ctx.get_argument::<::uuid::Uuid>("id")?;
                ctx.sender().send_message(&format!("no player with id {id}"));
                Ok(1)
            })),
    )?;

    dispatcher.register(
        literal("kill")
            .description("Remove a player (admin only)")
            .requires(ConsoleSender::is_admin)
            .then(argument("target", word()).executes(|ctx: &CommandContext<ConsoleSender>| {
                let target = ctx.get_argument::<String>("target")?;
                if target == ctx.sender().name() {
                    return Err(CommandSyntaxError::custom("refusing to kill yourself"));
                }
                ctx.sender().send_message(&format!("killed {target}"));
                Ok(1)
            })),
    )?;

    let execute = dispatcher.register(
        literal("execute").description("Run a command as other senders"),
    )?;
    dispatcher.register(
        literal("execute")
            .then(literal("run").redirect(root))
            .then(literal("as").then(argument("targets", string()).fork(execute, as_targets))),
    )?;

    Ok(dispatcher)
}

fn heal(ctx: &CommandContext<ConsoleSender>, amount: i32) -> CommandResult<i32> {
    let sender = ctx.sender();
    sender.send_message(&format!("healed {} by {amount}", sender.name()));
    Ok(amount)
}

fn give(ctx: &CommandContext<ConsoleSender>, count: i32) -> CommandResult<i32> {
    let target = ctx.get_argument::<String>("target")?;
    let item = ctx.get_argument::<String>("item")?;
    ctx.sender()
        .send_message(&format!("gave {count} {item} to {target}"));
    Ok(count)
}

/// Fork to every comma-separated name in the `targets` argument.
fn as_targets(ctx: &CommandContext<ConsoleSender>) -> CommandResult<Vec<ConsoleSender>> {
    let targets = ctx.get_argument::<String>("targets")?;
    let sender = ctx.sender();
    let senders: Vec<ConsoleSender> = targets
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| sender.named(name))
        .collect();
    if senders.is_empty() {
        return Err(CommandSyntaxError::custom("no targets selected"));
    }
    Ok(senders)
}
