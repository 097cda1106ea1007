//! Lightweight parse/execute/complete benchmark harness for local baselines.
//!
//! Run from repository root:
//! `cargo run -p cmdtree_core --example parse_benchmark --release`

use std::time::Instant;

use cmdtree_core::arguments::{greedy_string, integer, term, word};
use cmdtree_core::{CommandDispatcher, TreeError, argument, literal};
use futures_lite::future::block_on;

fn build_dispatcher(width: usize) -> Result<CommandDispatcher<()>, TreeError> {
    let mut dispatcher = CommandDispatcher::new();
    let root = dispatcher.root();
    for i in 0..width {
        dispatcher.register(
            literal(format!("cmd{i}"))
                .executes(|_| Ok(1))
                .then(
                    argument("target", word())
                        .then(argument("amount", integer()).executes(|ctx| {
                            Ok(*ctx.get_argument::<i32>("amount")?)
                        }))
                        .then(
                            argument("mode", term(["add", "set", "remove"]))
                                .executes(|_| Ok(1)),
                        ),
                ),
        )?;
    }
    dispatcher.register(
        literal("say").then(argument("message", greedy_string()).executes(|_| Ok(1))),
    )?;
    dispatcher.register(literal("each").fork(root, |_| Ok(vec![(); 8])))?;
    Ok(dispatcher)
}

fn per_iter_ms(elapsed: std::time::Duration, iterations: usize) -> f64 {
    elapsed.as_secs_f64() * 1000.0 / iterations as f64
}

fn run_benchmark(label: &str, input: &str, dispatcher: &CommandDispatcher<()>, iterations: usize) {
    let parse_start = Instant::now();
    for _ in 0..iterations {
        let _ = dispatcher.parse(input, ());
    }
    let parse_elapsed = parse_start.elapsed();

    let parse_once = dispatcher.parse(input, ());

    let execute_start = Instant::now();
    for _ in 0..iterations {
        let _ = dispatcher.execute_parsed(&parse_once);
    }
    let execute_elapsed = execute_start.elapsed();

    let suggest_start = Instant::now();
    for _ in 0..iterations {
        let _ = block_on(dispatcher.get_completion_suggestions(&parse_once));
    }
    let suggest_elapsed = suggest_start.elapsed();

    println!("Benchmark: {label}");
    println!("  input_bytes: {}", input.len());
    println!(
        "  parse:    total={:?}, per_iter={:.4} ms",
        parse_elapsed,
        per_iter_ms(parse_elapsed, iterations)
    );
    println!(
        "  execute:  total={:?}, per_iter={:.4} ms",
        execute_elapsed,
        per_iter_ms(execute_elapsed, iterations)
    );
    println!(
        "  suggest:  total={:?}, per_iter={:.4} ms",
        suggest_elapsed,
        per_iter_ms(suggest_elapsed, iterations)
    );
}

fn main() -> Result<(), TreeError> {
    let iterations = std::env::var("CMDTREE_BENCH_ITERS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(10_000);
    let dispatcher = build_dispatcher(200)?;

    let cases = [
        ("literal_only", "cmd150"),
        ("argument_chain", "cmd199 steve 42"),
        ("term_argument", "cmd3 alex set"),
        ("greedy", "say the quick brown fox jumps over the lazy dog"),
        ("fork", "each each cmd7 steve 1"),
        ("partial_for_completion", "cmd42 steve "),
    ];
    for (label, input) in cases {
        run_benchmark(label, input, &dispatcher, iterations);
    }
    Ok(())
}
