use std::time::Duration;

use tcp_probe_rs::runner::{self, OutputFormat, RunOptions};
use tcp_probe_rs::target::{DEFAULT_HOST, DEFAULT_PORT};
use tcp_probe_rs::types::{ProbeConfig, ProbeTarget, DEFAULT_PAYLOAD};
use tcp_probe_rs::{report, target};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;

/// tcp-probe-rs — Repeatedly probe one TCP endpoint and report connect latency.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "tcp-probe-rs",
    version,
    about = "Repeatedly probe one TCP endpoint and report connect latency.",
    long_about = None
)]
struct Cli {
    /// Target as host:port or [ipv6]:port.
    #[arg(long, default_value_t = format!("{DEFAULT_HOST}:{DEFAULT_PORT}"))]
    target: String,

    /// Socket connect timeout in milliseconds.
    #[arg(long = "timeout-ms", default_value_t = 5000)]
    timeout_ms: u64,

    /// Delay between attempts in milliseconds.
    #[arg(long = "interval-ms", default_value_t = 5000)]
    interval_ms: u64,

    /// Stop after this many attempts (default: run until Ctrl+C).
    #[arg(long)]
    count: Option<u64>,

    /// Skip writing the probe payload after connecting.
    #[arg(long = "no-send", default_value_t = false)]
    no_send: bool,

    /// Print one JSON object per attempt instead of status lines.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let target: ProbeTarget = target::parse_target(&cli.target)
        .with_context(|| format!("bad --target value: {}", cli.target))?;
    if cli.timeout_ms == 0 {
        bail!("--timeout-ms must be greater than 0");
    }
    if cli.count == Some(0) {
        bail!("--count must be greater than 0");
    }

    let config = ProbeConfig {
        timeout: Duration::from_millis(cli.timeout_ms),
        payload: (!cli.no_send).then(|| DEFAULT_PAYLOAD.to_vec()),
    };
    let opts = RunOptions {
        interval: Duration::from_millis(cli.interval_ms),
        max_iterations: cli.count,
        format: if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        },
    };

    if !cli.json {
        println!("tcp-probe-rs configuration:");
        println!("  target       : {}", target);
        println!("  timeout_ms   : {}", cli.timeout_ms);
        println!("  interval_ms  : {}", cli.interval_ms);
        println!(
            "  count        : {}",
            cli.count
                .map(|n| n.to_string())
                .unwrap_or_else(|| "<until Ctrl+C>".to_string())
        );
        println!("  send payload : {}", !cli.no_send);
        println!();
    }

    // Ctrl+C stops the loop between attempts or during the wait.
    let cancel = CancellationToken::new();
    let cancel_ctrlc = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_ctrlc.cancel();
        }
    });

    let summary = runner::run_forever(&target, &config, &opts, cancel).await;

    if cli.json {
        eprintln!("{}", report::render_summary(&summary));
    } else {
        println!("\n{}", report::render_summary(&summary));
    }
    Ok(())
}
