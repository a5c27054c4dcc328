use std::time::Duration;

use tracing::{debug, info, warn};

use crate::remote::SqlExecutor;
use crate::report::{MigrationReport, StatementOutcome};

/// Execution policy for one migration run.
#[derive(Debug, Clone)]
pub struct RunnerOptions {
    /// Pause between consecutive statements, as backpressure against the
    /// remote endpoint's rate limiting.
    pub delay: Duration,
    /// Halt at the first failed statement instead of continuing.
    pub stop_on_error: bool,
    /// Log per-statement progress at debug instead of info.
    pub quiet: bool,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(250),
            stop_on_error: false,
            quiet: false,
        }
    }
}

/// Drives an ordered statement sequence against a remote SQL endpoint.
pub struct MigrationRunner<E> {
    executor: E,
    options: RunnerOptions,
}

impl<E: SqlExecutor> MigrationRunner<E> {
    pub fn new(executor: E, options: RunnerOptions) -> Self {
        Self { executor, options }
    }

    /// Execute every statement in order and collect the aggregate report.
    ///
    /// Later statements may depend on schema objects created by earlier
    /// ones, so execution is strictly sequential and never reordered. A
    /// failed statement is recorded and the run continues, unless
    /// `stop_on_error` is set, in which case the remaining statements are
    /// left unattempted and the report's counts stay short of `total`.
    pub async fn run(&self, statements: &[String]) -> MigrationReport {
        let mut report = MigrationReport {
            total: statements.len(),
            ..Default::default()
        };

        for (position, statement) in statements.iter().enumerate() {
            let index = position + 1;
            let trimmed = statement.trim();

            // The splitter never emits these; re-check so a hand-built
            // statement list cannot move the counters.
            if trimmed.is_empty() || trimmed.starts_with("--") {
                continue;
            }

            if self.options.quiet {
                debug!("executing statement {index}/{}", report.total);
            } else {
                info!("executing statement {index}/{}", report.total);
            }

            match self.executor.execute(statement).await {
                Ok(payload) => {
                    report.succeeded += 1;
                    report
                        .outcomes
                        .push(StatementOutcome::Success { index, payload });
                }
                Err(e) => {
                    let detail = e.to_string();
                    warn!(
                        "statement {index} failed: {}",
                        truncate_for_log(&detail, 200)
                    );
                    report.failed += 1;
                    report.errors.push(format!("Statement {index}: {detail}"));
                    report
                        .outcomes
                        .push(StatementOutcome::Failure { index, detail });

                    if self.options.stop_on_error {
                        warn!(
                            "stopping after first error, {} statement(s) not attempted",
                            report.total - index
                        );
                        break;
                    }
                }
            }

            if index < report.total {
                tokio::time::sleep(self.options.delay).await;
            }
        }

        report
    }
}

/// Shorten long error bodies for log lines. The report keeps the full text.
fn truncate_for_log(detail: &str, max_chars: usize) -> String {
    if detail.chars().count() <= max_chars {
        detail.to_string()
    } else {
        let cut: String = detail.chars().take(max_chars).collect();
        format!("{cut}...")
    }
}
