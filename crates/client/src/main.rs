// crates/client/src/main.rs
//! Terminal viewer: follows a signal-view server and prints what a chart
//! would draw.

use anyhow::Result;
use clap::Parser;
use signal_view_client::{Poller, TerminalSink};
use signal_view_core::ClientConfig;
use tracing_subscriber::EnvFilter;

/// Follow the live signal served by a signal-view server.
#[derive(Debug, Parser)]
#[command(name = "signal-view-watch", version)]
struct Args {
    /// Server root URL.
    #[arg(long, env = "SIGNAL_VIEW_URL", default_value = "http://127.0.0.1:5000")]
    url: String,

    /// Poll interval in milliseconds.
    #[arg(long, default_value_t = 500)]
    poll_ms: u64,

    /// Samples kept in the rendered window.
    #[arg(long, default_value_t = 1000)]
    max_window: usize,

    /// Per-request timeout in milliseconds.
    #[arg(long, default_value_t = 5000)]
    timeout_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,signal_view_client=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = ClientConfig {
        poll_interval_ms: args.poll_ms,
        max_window: args.max_window,
        request_timeout_ms: args.timeout_ms,
    };
    config.validate()?;

    let poller = Poller::new(&args.url, config, TerminalSink::new(std::io::stdout()))?;
    tracing::info!(url = %args.url, "Following live signal");

    poller
        .run(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await;

    Ok(())
}
