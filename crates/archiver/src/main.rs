// crates/archiver/src/main.rs
//! Watches an upload directory and archives finished recordings.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use signal_view_archiver::{Archiver, ArchiverConfig, ArchiverState, LpPrinter, SvgRenderer};
use signal_view_core::ReadinessConfig;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

/// Plot, print and archive recordings once they stop growing.
#[derive(Debug, Parser)]
#[command(name = "signal-view-archiver", version)]
struct Args {
    /// Directory recordings are uploaded into.
    #[arg(long, env = "SIGNAL_VIEW_WATCH_DIR")]
    watch_dir: PathBuf,

    /// Finished recordings are moved here.
    #[arg(long, env = "SIGNAL_VIEW_DATA_DIR")]
    data_dir: PathBuf,

    /// Plots are written here.
    #[arg(long, env = "SIGNAL_VIEW_PLOTS_DIR")]
    plots_dir: PathBuf,

    #[arg(long, env = "SIGNAL_VIEW_EXT", default_value = "txt")]
    ext: String,

    /// Seconds between directory scans.
    #[arg(long, default_value_t = 5.0)]
    scan_interval: f64,

    /// Seconds a file's size must hold still before it is archived.
    #[arg(long, default_value_t = 5.0)]
    settle: f64,

    /// Size sampling interval within the settle window, in seconds.
    #[arg(long, default_value_t = 0.5)]
    sample_interval: f64,

    /// CUPS printer to send plots to. Printing is skipped when unset.
    #[arg(long, env = "SIGNAL_VIEW_PRINTER")]
    printer: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,signal_view_archiver=info,signal_view_core=info".into()),
        )
        .init();

    let args = Args::parse();

    let config = ArchiverConfig {
        watch_dir: args.watch_dir,
        data_dir: args.data_dir,
        plots_dir: args.plots_dir,
        extension: args.ext.trim_start_matches('.').to_string(),
        scan_interval_seconds: args.scan_interval,
        printer: args.printer,
        readiness: ReadinessConfig {
            settle_seconds: args.settle,
            poll_interval_seconds: args.sample_interval,
        },
    };
    config.validate()?;

    let mut archiver = Archiver::new(config, SvgRenderer);
    if archiver.config().printer.is_some() {
        archiver = archiver.with_printer(LpPrinter::new());
    }
    archiver.prepare().await?;

    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("Stopping after the current file");
        let _ = stop_tx.send(true);
    });

    let mut state = ArchiverState::new();
    archiver.run(&mut state, stop_rx).await;
    Ok(())
}
