use tracing::{debug, trace, warn};

use crate::error::{CommandResult, CommandSyntaxError, SyntaxErrorKind};

use super::{CommandDispatcher, ParseResults};

/// Detailed outcome of one execution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionReport {
    /// Sum of the executors' return values, or, when a fork was crossed, the
    /// number of branches that succeeded.
    pub result: i32,
    /// Number of executor calls that succeeded.
    pub successes: usize,
    /// Whether execution crossed a forking redirect.
    pub forked: bool,
    /// Failures from forked branches. Failures outside a fork are returned as
    /// errors instead.
    pub failures: Vec<CommandSyntaxError>,
}

impl<S: Clone + 'static> CommandDispatcher<S> {
    /// Parse and execute `input` as `sender`.
    pub fn execute(&self, input: &str, sender: S) -> CommandResult<i32> {
        let parse = self.parse(input, sender);
        self.execute_parsed(&parse)
    }

    /// Execute an earlier parse and return its result value.
    pub fn execute_parsed(&self, parse: &ParseResults<'_, S>) -> CommandResult<i32> {
        self.execute_report(parse).map(|report| report.result)
    }

    /// Execute an earlier parse and report every branch outcome.
    ///
    /// Input left unparsed fails with the most specific recorded error, or
    /// with an unknown command/argument error when nothing was recorded.
    /// Redirects are followed segment by segment; a redirect modifier maps
    /// the current sender to the senders the next segment runs for. Outside
    /// a fork the first failure aborts execution; inside one, failures are
    /// collected in [`ExecutionReport::failures`] and the other branches keep
    /// running.
    pub fn execute_report(&self, parse: &ParseResults<'_, S>) -> CommandResult<ExecutionReport> {
        if let Some(err) = parse.syntax_error() {
            debug!(error = %err, "command did not parse");
            return Err(err);
        }

        let original = parse.context.build(parse.reader.string());
        let mut report = ExecutionReport::default();
        let mut found_command = false;
        let mut contexts = vec![original.clone()];

        while !contexts.is_empty() {
            let mut next = Vec::new();
            for context in &contexts {
                if let Some(child) = context.child() {
                    report.forked |= context.is_forked();
                    if !child.has_nodes() {
                        continue;
                    }
                    found_command = true;
                    let Some(modifier) = context.redirect_modifier() else {
                        next.push(child.copy_for(context.sender().clone()));
                        continue;
                    };
                    match modifier(context) {
                        Ok(senders) => {
                            trace!(branches = senders.len(), fork = context.is_forked(), "redirecting");
                            next.extend(senders.into_iter().map(|sender| child.copy_for(sender)));
                        }
                        Err(err) => {
                            self.notify(context, false, 0);
                            self.branch_failed(&mut report, err)?;
                        }
                    }
                } else if let Some(command) = context.command() {
                    found_command = true;
                    match command(context) {
                        Ok(value) => {
                            report.result = report.result.saturating_add(value);
                            report.successes += 1;
                            self.notify(context, true, value);
                        }
                        Err(err) => {
                            self.notify(context, false, 0);
                            self.branch_failed(&mut report, err)?;
                        }
                    }
                }
            }
            contexts = next;
        }

        if !found_command {
            self.notify(&original, false, 0);
            return Err(SyntaxErrorKind::DispatcherUnknownCommand.create_with_context(&parse.reader));
        }
        if report.forked {
            report.result = i32::try_from(report.successes).unwrap_or(i32::MAX);
        }
        debug!(
            result = report.result,
            successes = report.successes,
            failures = report.failures.len(),
            "executed command"
        );
        Ok(report)
    }

    /// Record a failure inside a fork, or propagate it outside one.
    fn branch_failed(
        &self,
        report: &mut ExecutionReport,
        err: CommandSyntaxError,
    ) -> CommandResult<()> {
        if !report.forked {
            return Err(err);
        }
        warn!(error = %err, "forked command branch failed");
        report.failures.push(err);
        Ok(())
    }
}
