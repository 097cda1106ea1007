mod demo;
mod render;

use std::fs;
use std::process;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use cmdtree_core::{CommandDispatcher, DispatcherConfig, ExecutionReport, Suggestions};
use cmdtree_diagnostics::{self as diag, Diagnostic, Severity, codes};
use futures_lite::future::block_on;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::demo::{ConsoleSender, Message, demo_dispatcher};
use crate::render::{Format, print_summary, render_diagnostics_pretty};

/// Prefix skipped before console command lines.
const COMMAND_PREFIX: char = '/';

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "cmdtree",
    version,
    about = "cmdtree: run, complete, and inspect commands against a demonstration command tree"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    /// Dispatcher configuration file (JSON).
    #[arg(long, global = true)]
    config: Option<String>,

    /// Name of the sender commands run as.
    #[arg(long, global = true, default_value = "console")]
    sender: String,

    /// Run as an administrator (unlocks restricted commands).
    #[arg(long, global = true)]
    admin: bool,

    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Execute a command line (or every line of a file).
    Run {
        /// The command line to execute.
        #[arg(required_unless_present = "file", conflicts_with = "file")]
        line: Option<String>,
        /// Execute each non-empty line of this file in order.
        #[arg(long)]
        file: Option<String>,
    },

    /// Parse a command line without executing it.
    Check { line: String },

    /// List completion candidates for a command line.
    Suggest {
        line: String,
        /// Byte offset to complete at (defaults to the end of the line).
        #[arg(long)]
        cursor: Option<usize>,
    },

    /// Show usage for the command at PATH (all commands when omitted).
    Usage {
        path: Vec<String>,
        /// Condensed one-line-per-child usage.
        #[arg(long)]
        smart: bool,
    },

    /// Report sibling nodes that accept the same input.
    Ambiguities,

    /// Explain a diagnostic ID (e.g. CMD3001).
    Explain { id: String },
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    let format = Format::resolve_or_detect(cli.output.as_deref());

    if let Err(err) = init_logging(cli.verbose) {
        eprintln!("warning: {err:#}");
    }

    if let Err(err) = run(cli, format) {
        match format {
            Format::Json => {
                let out = serde_json::json!({
                    "success": false,
                    "error": "command_failed",
                    "message": format!("{err:#}"),
                });
                println!("{out:#}");
            }
            Format::Pretty => eprintln!("error: {err:#}"),
        }
        process::exit(1);
    }
}

fn run(cli: Cli, format: Format) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    debug!(?config, "loaded dispatcher configuration");
    let dispatcher = demo_dispatcher(config).context("failed to build the command tree")?;
    let sender = ConsoleSender::new(&cli.sender, cli.admin);

    match cli.cmd {
        Cmd::Run { line, file } => match (line, file) {
            (Some(line), _) => cmd_run(&dispatcher, &sender, &line, format),
            (None, Some(file)) => cmd_run_file(&dispatcher, &sender, &file, format),
            (None, None) => bail!("either a command line or --file is required"),
        },
        Cmd::Check { line } => cmd_check(&dispatcher, &sender, &line, format),
        Cmd::Suggest { line, cursor } => cmd_suggest(&dispatcher, &sender, &line, cursor, format),
        Cmd::Usage { path, smart } => cmd_usage(&dispatcher, &sender, &path, smart, format),
        Cmd::Ambiguities => cmd_ambiguities(&dispatcher, format),
        Cmd::Explain { id } => cmd_explain(&id, format),
    }
}

// ── Commands ────────────────────────────────────────────────────────────

/// Outcome of running one line, in the shape printed by `--output json`.
#[derive(Debug, serde::Serialize)]
struct RunOutcome {
    input: String,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    successes: Option<usize>,
    forked: bool,
    messages: Vec<Message>,
    diagnostics: Vec<Diagnostic>,
}

fn execute_line(
    dispatcher: &CommandDispatcher<ConsoleSender>,
    sender: &ConsoleSender,
    line: &str,
) -> RunOutcome {
    let parse = dispatcher.parse(line, sender.clone());
    let outcome = dispatcher.execute_report(&parse);
    let messages = sender.take_messages();
    match outcome {
        Ok(ExecutionReport {
            result,
            successes,
            forked,
            failures,
            ..
        }) => RunOutcome {
            input: line.to_owned(),
            success: true,
            result: Some(result),
            successes: Some(successes),
            forked,
            messages,
            diagnostics: failures.iter().map(|failure| failure.to_diagnostic()).collect(),
        },
        Err(err) => RunOutcome {
            input: line.to_owned(),
            success: false,
            result: None,
            successes: None,
            forked: false,
            messages,
            diagnostics: vec![err.to_diagnostic()],
        },
    }
}

fn print_outcome_pretty(outcome: &RunOutcome) {
    for message in &outcome.messages {
        println!("{message}");
    }
    render_diagnostics_pretty(&outcome.input, &outcome.diagnostics);
    print_summary(&outcome.diagnostics);
    if let Some(result) = outcome.result {
        eprintln!("result: {result}");
    }
}

fn cmd_run(
    dispatcher: &CommandDispatcher<ConsoleSender>,
    sender: &ConsoleSender,
    line: &str,
    format: Format,
) -> Result<()> {
    let outcome = execute_line(dispatcher, sender, line);
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        Format::Pretty => print_outcome_pretty(&outcome),
    }
    if !outcome.success {
        process::exit(1);
    }
    Ok(())
}

fn cmd_run_file(
    dispatcher: &CommandDispatcher<ConsoleSender>,
    sender: &ConsoleSender,
    file: &str,
    format: Format,
) -> Result<()> {
    let input =
        fs::read_to_string(file).with_context(|| format!("failed to read command file '{file}'"))?;
    let outcomes: Vec<RunOutcome> = input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| execute_line(dispatcher, sender, line))
        .collect();

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&outcomes)?),
        Format::Pretty => {
            for outcome in &outcomes {
                eprintln!("> {}", outcome.input);
                print_outcome_pretty(outcome);
            }
        }
    }
    if outcomes.iter().any(|outcome| !outcome.success) {
        process::exit(1);
    }
    Ok(())
}

fn cmd_check(
    dispatcher: &CommandDispatcher<ConsoleSender>,
    sender: &ConsoleSender,
    line: &str,
    format: Format,
) -> Result<()> {
    let parse = dispatcher.parse(line, sender.clone());
    let mut diagnostics: Vec<Diagnostic> = parse
        .syntax_error()
        .map(|err| err.to_diagnostic())
        .into_iter()
        .collect();
    if diagnostics.is_empty() && parse.context().last_child().command().is_none() {
        diagnostics.push(Diagnostic::warn(
            codes::UNKNOWN_COMMAND,
            "command is incomplete and cannot be executed",
            Some(cmdtree_core::TextRange::at(line.len())),
        ));
    }
    let ok = !has_errors(&diagnostics);

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "ok": ok,
                "complete": parse.is_complete(),
                "diagnostics": diagnostics,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            render_diagnostics_pretty(line, &diagnostics);
            print_summary(&diagnostics);
            if ok {
                eprintln!("syntax ok");
            }
        }
    }

    exit_on_errors(&diagnostics);
    Ok(())
}

fn cmd_suggest(
    dispatcher: &CommandDispatcher<ConsoleSender>,
    sender: &ConsoleSender,
    line: &str,
    cursor: Option<usize>,
    format: Format,
) -> Result<()> {
    let parse = dispatcher.parse(line, sender.clone());
    let pending = match cursor {
        Some(cursor) => dispatcher.get_completion_suggestions_at(&parse, cursor),
        None => dispatcher.get_completion_suggestions(&parse),
    };
    let suggestions: Suggestions = block_on(pending);

    match format {
        Format::Json => {
            let list: Vec<serde_json::Value> = suggestions
                .list()
                .iter()
                .map(|suggestion| {
                    serde_json::json!({
                        "text": suggestion.text(),
                        "range": suggestion.range(),
                        "tooltip": suggestion.tooltip(),
                        "applied": suggestion.apply(line),
                    })
                })
                .collect();
            let out = serde_json::json!({
                "input": line,
                "range": suggestions.range(),
                "suggestions": list,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            for suggestion in suggestions.list() {
                match suggestion.tooltip() {
                    Some(tooltip) => println!("{}\t{tooltip}", suggestion.text()),
                    None => println!("{}", suggestion.text()),
                }
            }
        }
    }
    Ok(())
}

fn cmd_usage(
    dispatcher: &CommandDispatcher<ConsoleSender>,
    sender: &ConsoleSender,
    path: &[String],
    smart: bool,
    format: Format,
) -> Result<()> {
    let names: Vec<&str> = path.iter().map(String::as_str).collect();
    let Some(node) = dispatcher.find_node(&names) else {
        bail!("no command at path '{}'", names.join(" "));
    };
    let prefix = names.join(" ");

    let lines: Vec<String> = if smart {
        dispatcher
            .get_smart_usage(node, sender)
            .into_values()
            .collect()
    } else {
        let restricted = dispatcher.config().restrict_usage;
        dispatcher.get_all_usage(node, sender, restricted)
    };
    let lines: Vec<String> = lines
        .into_iter()
        .map(|usage| match (prefix.is_empty(), usage.is_empty()) {
            (true, _) => usage,
            (false, true) => prefix.clone(),
            (false, false) => format!("{prefix} {usage}"),
        })
        .collect();

    match format {
        Format::Json => {
            let description = dispatcher.tree()[node].description();
            let out = serde_json::json!({
                "path": names,
                "description": description,
                "usage": lines,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            if let Some(description) = dispatcher.tree()[node].description() {
                println!("{description}");
            }
            for line in &lines {
                println!("/{line}");
            }
        }
    }
    Ok(())
}

fn cmd_ambiguities(dispatcher: &CommandDispatcher<ConsoleSender>, format: Format) -> Result<()> {
    let mut diagnostics = Vec::new();
    dispatcher.find_ambiguities(|ambiguity| {
        let child = dispatcher.get_path(ambiguity.child).join(" ");
        let sibling = dispatcher.get_path(ambiguity.sibling).join(" ");
        diagnostics.push(Diagnostic::warn(
            codes::AMBIGUOUS_INPUT,
            format!(
                "'{child}' and '{sibling}' both accept {}",
                ambiguity.inputs.join(", ")
            ),
            None,
        ));
    });

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&diagnostics)?),
        Format::Pretty => {
            render_diagnostics_pretty("", &diagnostics);
            print_summary(&diagnostics);
            if diagnostics.is_empty() {
                eprintln!("no ambiguities");
            }
        }
    }
    Ok(())
}

fn cmd_explain(id: &str, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            let out = serde_json::json!({
                "id": id,
                "explanation": diag::explain(id),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            if let Some(text) = diag::explain(id) {
                use ariadne::Fmt;
                println!("{}: {}", id.fg(ariadne::Color::Cyan), text);
            } else {
                println!("{id}: (no explanation available)");
            }
        }
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn init_logging(verbose: u8) -> Result<()> {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
        .context("failed to install the log subscriber")
}

/// Read the dispatcher configuration, or the defaults without `--config`.
///
/// The console accepts chat-style `/command` lines, so the prefix is `/`
/// unless the file sets `command_prefix` (to `null` to turn it off).
fn load_config(path: Option<&str>) -> Result<DispatcherConfig> {
    let Some(path) = path else {
        return Ok(DispatcherConfig::default().with_command_prefix(Some(COMMAND_PREFIX)));
    };
    let json =
        fs::read_to_string(path).with_context(|| format!("failed to read config file '{path}'"))?;
    let mut value: serde_json::Value = serde_json::from_str(&json)
        .with_context(|| format!("failed to parse config file '{path}'"))?;
    if let Some(fields) = value.as_object_mut() {
        fields
            .entry("command_prefix")
            .or_insert_with(|| COMMAND_PREFIX.to_string().into());
    }
    serde_json::from_value(value).with_context(|| format!("failed to parse config file '{path}'"))
}

fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics
        .iter()
        .any(|d| matches!(d.severity, Severity::Error))
}

/// Exit with code 1 if any diagnostic is an error. Warnings do not fail.
fn exit_on_errors(diagnostics: &[Diagnostic]) {
    if has_errors(diagnostics) {
        process::exit(1);
    }
}
