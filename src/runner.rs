use std::future::Future;
use std::time::Duration;

use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::probe;
use crate::report;
use crate::types::{ProbeConfig, ProbeResult, ProbeTarget, RunSummary, DEFAULT_INTERVAL};

/// How each attempt is written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub interval: Duration,
    /// Stop after this many attempts; `None` runs until cancelled.
    pub max_iterations: Option<u64>,
    pub format: OutputFormat,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            max_iterations: None,
            format: OutputFormat::Text,
        }
    }
}

/// Progress notifications from `run_loop`.
#[derive(Debug)]
pub enum RunEvent<'a> {
    /// About to start attempt number `n` (1-based).
    Attempting(u64),
    Finished(&'a ProbeResult),
    /// Sleeping before the next attempt.
    Waiting(Duration),
}

/// Probe `target` until `cancel` fires (or `max_iterations` is reached), printing
/// a report for every attempt.
pub async fn run_forever(
    target: &ProbeTarget,
    config: &ProbeConfig,
    opts: &RunOptions,
    cancel: CancellationToken,
) -> RunSummary {
    let format = opts.format;
    run_loop(
        move || probe::probe_once(target, config),
        move |event| print_event(target, format, event),
        opts.interval,
        opts.max_iterations,
        cancel,
    )
    .await
}

/// Drive `probe` once per iteration, sleeping `interval` between iterations.
///
/// Cancellation is checked before each attempt and interrupts the sleep; an
/// attempt already in flight runs to completion. No sleep follows the last
/// bounded iteration.
pub async fn run_loop<P, Fut, S>(
    mut probe: P,
    mut sink: S,
    interval: Duration,
    max_iterations: Option<u64>,
    cancel: CancellationToken,
) -> RunSummary
where
    P: FnMut() -> Fut,
    Fut: Future<Output = ProbeResult>,
    S: FnMut(RunEvent<'_>),
{
    let mut summary = RunSummary::default();
    loop {
        if cancel.is_cancelled() {
            break;
        }

        sink(RunEvent::Attempting(summary.attempts + 1));
        let result = probe().await;
        summary.record(&result.outcome);
        sink(RunEvent::Finished(&result));

        if max_iterations.is_some_and(|n| summary.attempts >= n) {
            break;
        }

        sink(RunEvent::Waiting(interval));
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = time::sleep(interval) => {}
        }
    }
    summary
}

fn print_event(target: &ProbeTarget, format: OutputFormat, event: RunEvent<'_>) {
    match (format, event) {
        (OutputFormat::Text, RunEvent::Attempting(_)) => {
            println!("{}", report::render_connecting(target));
        }
        (OutputFormat::Text, RunEvent::Finished(result)) => {
            for line in report::render_result(result) {
                println!("{line}");
            }
        }
        (OutputFormat::Text, RunEvent::Waiting(interval)) => {
            println!("\n{}", report::render_wait(interval));
        }
        (OutputFormat::Json, RunEvent::Finished(result)) => match report::render_json(result) {
            Ok(line) => println!("{line}"),
            Err(e) => eprintln!("Failed to encode result as JSON: {e}"),
        },
        (OutputFormat::Json, _) => {}
    }
}
