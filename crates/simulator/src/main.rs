// crates/simulator/src/main.rs
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use signal_view_simulator::{append_sine, generate, write_table, BatchParams};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "signal-view-sim", version, about = "Write synthetic signal files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Append `sinewave_<user>.txt` one sample at a time until ctrl-c.
    Live {
        #[arg(long)]
        user_id: String,
        #[arg(long, env = "SIGNAL_VIEW_DIR")]
        dir: PathBuf,
        /// Samples per second.
        #[arg(long, default_value_t = 30)]
        rate: u32,
    },
    /// Write a complete `sine_waves_<user>.txt` recording in one go.
    Batch {
        #[arg(long)]
        user_id: String,
        #[arg(long, env = "SIGNAL_VIEW_WATCH_DIR")]
        dir: PathBuf,
        #[arg(long, default_value_t = 2.0)]
        minutes: f64,
        #[arg(long, default_value_t = 6)]
        channels: usize,
        /// Samples per second.
        #[arg(long, default_value_t = 100)]
        rate: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,signal_view_simulator=info".into()),
        )
        .init();

    match Cli::parse().command {
        Command::Live { user_id, dir, rate } => {
            anyhow::ensure!(rate > 0, "--rate must be positive");
            tokio::fs::create_dir_all(&dir)
                .await
                .with_context(|| format!("creating {}", dir.display()))?;
            let path = dir.join(format!("sinewave_{}.txt", user_id.trim()));
            let written = append_sine(&path, rate, None, async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await
            .with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(samples = written, "Stopped by user");
        }
        Command::Batch {
            user_id,
            dir,
            minutes,
            channels,
            rate,
        } => {
            anyhow::ensure!(rate > 0 && channels > 0, "--rate and --channels must be positive");
            tokio::fs::create_dir_all(&dir)
                .await
                .with_context(|| format!("creating {}", dir.display()))?;
            let path = dir.join(format!("sine_waves_{}.txt", user_id.trim()));
            let params = BatchParams {
                minutes,
                channels,
                rate,
            };
            let start = chrono::Utc::now().timestamp_millis() as f64 / 1000.0;
            let rows = generate(&params, start, &mut rand::thread_rng());
            write_table(&path, channels, &rows)
                .await
                .with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(file = %path.display(), rows = rows.len(), "Sine waves saved");
        }
    }
    Ok(())
}
