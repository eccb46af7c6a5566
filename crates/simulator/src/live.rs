// crates/simulator/src/live.rs
//! Live producer: appends one value per line at a fixed rate, forcing each
//! line to disk so pollers on a network share see it promptly.

use std::f64::consts::TAU;
use std::future::Future;
use std::path::Path;
use std::time::Duration;

use rand::Rng;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// One second of a sine at `freq` Hz, sampled `rate` times.
pub fn one_second(freq: f64, amplitude: f64, rate: u32) -> Vec<f64> {
    (0..rate)
        .map(|i| amplitude * (TAU * freq * i as f64 / rate as f64).sin())
        .collect()
}

/// Append samples to `path` until `shutdown` resolves or `limit` samples
/// have been written. Frequency (0.5..5 Hz) and amplitude (0.5..2) are
/// re-drawn every second. Returns the number of samples written.
pub async fn append_sine(
    path: &Path,
    rate: u32,
    limit: Option<u64>,
    shutdown: impl Future<Output = ()>,
) -> std::io::Result<u64> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    info!(file = %path.display(), rate, "Writing sinewave");

    let mut tick = tokio::time::interval(Duration::from_secs_f64(1.0 / rate as f64));
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    let mut written = 0u64;
    loop {
        let (freq, amplitude) = {
            let mut rng = rand::thread_rng();
            (rng.gen_range(0.5..5.0), rng.gen_range(0.5..2.0))
        };
        debug!(freq, amplitude, "new segment");

        for value in one_second(freq, amplitude, rate) {
            if limit.is_some_and(|max| written >= max) {
                return Ok(written);
            }
            tokio::select! {
                biased;
                _ = &mut shutdown => return Ok(written),
                _ = tick.tick() => {}
            }
            file.write_all(format!("{value:.5}\n").as_bytes()).await?;
            file.flush().await?;
            file.sync_data().await?;
            written += 1;
        }
    }
}
