// crates/server/src/main.rs
//! Signal-view server binary.
//!
//! Binds the first free port in the configured range, logs the watched
//! directory's candidates, and serves the live data endpoint until ctrl-c.

use std::net::IpAddr;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use signal_view_core::{list_candidates, ClientConfig, PortRange, SourceConfig};
use signal_view_server::{bind_first_free, create_app, init_metrics, local_ip, AppState};
use tracing_subscriber::EnvFilter;

/// Serve the most recently modified signal file to live pollers.
#[derive(Debug, Parser)]
#[command(name = "signal-view", version)]
struct Args {
    /// Directory the producer writes signal files into.
    #[arg(long, env = "SIGNAL_VIEW_DIR", default_value = "Plots")]
    dir: PathBuf,

    /// Extension of candidate files (without the dot).
    #[arg(long, env = "SIGNAL_VIEW_EXT", default_value = "txt")]
    ext: String,

    /// Address to listen on.
    #[arg(long, env = "SIGNAL_VIEW_HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Pin a single port instead of scanning the range.
    #[arg(long, env = "SIGNAL_VIEW_PORT")]
    port: Option<u16>,

    /// First port scanned.
    #[arg(long, env = "SIGNAL_VIEW_PORT_START", default_value_t = 5000)]
    port_start: u16,

    /// Scan stops before this port.
    #[arg(long, env = "SIGNAL_VIEW_PORT_END", default_value_t = 5100)]
    port_end: u16,

    /// Browser poll interval in milliseconds.
    #[arg(long, default_value_t = 500)]
    poll_ms: u64,

    /// Samples kept visible in the browser plot.
    #[arg(long, default_value_t = 1000)]
    max_window: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,signal_view_server=info,signal_view_core=info".into()),
        )
        .init();

    let args = Args::parse();

    init_metrics();

    let root = if args.dir.is_absolute() {
        args.dir
    } else {
        std::env::current_dir()?.join(args.dir)
    };
    let source = SourceConfig::new(root, args.ext);
    source.validate()?;

    log_candidates(&source).await;

    let client = ClientConfig {
        poll_interval_ms: args.poll_ms,
        max_window: args.max_window,
        ..ClientConfig::default()
    };
    client.validate()?;

    let range = match args.port {
        Some(port) => PortRange::single(port),
        None => PortRange {
            start: args.port_start,
            end: args.port_end,
        },
    };
    let listener = bind_first_free(args.host, range).await?;
    let port = listener.local_addr()?.port();

    let app = create_app(AppState::new(source, client));

    tracing::info!("Starting server at http://{}:{}", local_ip(), port);
    eprintln!("\n  \u{2192} http://{}:{}\n", local_ip(), port);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}

/// Log the working directory and every candidate currently in the root.
async fn log_candidates(source: &SourceConfig) {
    if let Ok(cwd) = std::env::current_dir() {
        tracing::info!(cwd = %cwd.display(), "Current working directory");
    }
    match list_candidates(source).await {
        Ok(candidates) if candidates.is_empty() => {
            tracing::info!(
                root = %source.root.display(),
                "No .{} files found",
                source.extension
            );
        }
        Ok(candidates) => {
            tracing::info!(
                root = %source.root.display(),
                count = candidates.len(),
                "Listing .{} files",
                source.extension
            );
            for c in candidates {
                tracing::info!(file = %c.name, bytes = c.size, " - candidate");
            }
        }
        Err(e) => {
            tracing::warn!(root = %source.root.display(), error = %e, "Cannot list watched directory");
        }
    }
}
