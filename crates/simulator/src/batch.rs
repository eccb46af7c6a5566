// crates/simulator/src/batch.rs
//! Whole-recording generator: a TSV of noisy sine channels plus epoch time.

use std::f64::consts::TAU;
use std::path::Path;

use rand::Rng;
use rand_distr::StandardNormal;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::info;

/// Rows written per flush.
pub const CHUNK_ROWS: usize = 1000;

const SPIKE_PROBABILITY: f64 = 0.05;
const FLAT_PROBABILITY: f64 = 0.15;
/// Background noise is N(0, 0.1).
const NOISE_STD_DEV: f64 = 0.1;
/// Spike heights are N(5, 2).
const SPIKE_MEAN: f64 = 5.0;
const SPIKE_STD_DEV: f64 = 2.0;

/// One draw from N(mean, std_dev).
fn gaussian(rng: &mut impl Rng, mean: f64, std_dev: f64) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    mean + std_dev * z
}

#[derive(Debug, Clone)]
pub struct BatchParams {
    pub minutes: f64,
    pub channels: usize,
    /// Samples per second.
    pub rate: u32,
}

impl Default for BatchParams {
    fn default() -> Self {
        Self {
            minutes: 2.0,
            channels: 6,
            rate: 100,
        }
    }
}

impl BatchParams {
    pub fn rows(&self) -> usize {
        (self.minutes * 60.0 * self.rate as f64).round() as usize
    }
}

/// Header line: `Sine Wave 1 .. Sine Wave N` then `Epoch Time`.
pub fn header(channels: usize) -> String {
    let mut cols: Vec<String> = (1..=channels).map(|i| format!("Sine Wave {i}")).collect();
    cols.push("Epoch Time".to_string());
    cols.join("\t")
}

/// Per-channel waveform parameters, fixed for a whole recording.
#[derive(Debug, Clone, Copy)]
struct Wave {
    freq: f64,
    amplitude: f64,
}

/// Generate every row. Each row holds one sample per channel followed by
/// its epoch timestamp.
pub fn generate(params: &BatchParams, start_epoch: f64, rng: &mut impl Rng) -> Vec<Vec<f64>> {
    let waves: Vec<Wave> = (0..params.channels)
        .map(|_| Wave {
            freq: rng.gen_range(0.1..2.0),
            amplitude: rng.gen_range(0.5..1.5),
        })
        .collect();
    let step = 1.0 / params.rate as f64;

    (0..params.rows())
        .map(|i| {
            let t = i as f64 * step;
            let mut row: Vec<f64> = waves
                .iter()
                .map(|w| {
                    if rng.gen_bool(FLAT_PROBABILITY) {
                        return 0.0;
                    }
                    let mut v = (TAU * w.freq * t).sin() * w.amplitude;
                    v += gaussian(rng, 0.0, NOISE_STD_DEV);
                    if rng.gen_bool(SPIKE_PROBABILITY) {
                        v += gaussian(rng, SPIKE_MEAN, SPIKE_STD_DEV);
                    }
                    v
                })
                .collect();
            row.push(start_epoch + t);
            row
        })
        .collect()
}

fn format_row(row: &[f64]) -> String {
    let (epoch, samples) = row.split_last().unwrap_or((&0.0, &[]));
    let mut cells: Vec<String> = samples.iter().map(|v| format!("{v:.6}")).collect();
    cells.push(format!("{epoch:.3}"));
    cells.join("\t")
}

/// Write `rows` to `path` in chunks of [`CHUNK_ROWS`], logging progress.
pub async fn write_table(path: &Path, channels: usize, rows: &[Vec<f64>]) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path).await?);
    out.write_all(header(channels).as_bytes()).await?;
    out.write_all(b"\n").await?;

    let chunks = rows.len().div_ceil(CHUNK_ROWS).max(1);
    for (n, chunk) in rows.chunks(CHUNK_ROWS).enumerate() {
        let mut text = String::new();
        for row in chunk {
            text.push_str(&format_row(row));
            text.push('\n');
        }
        out.write_all(text.as_bytes()).await?;
        out.flush().await?;
        info!(chunk = n + 1, of = chunks, "Saving");
    }

    out.flush().await?;
    out.get_ref().sync_all().await?;
    Ok(())
}
