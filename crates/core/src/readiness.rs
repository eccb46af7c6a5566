// crates/core/src/readiness.rs
//! Size-polling liveness test for files that are still being written.
//!
//! No locking primitive is available on the network share the producer
//! writes to, so the only signal is the byte size. A file is considered
//! finished once its size holds still for a whole settle window.
//!
//! Known limitation: a producer that pauses for longer than the settle
//! window is indistinguishable from one that has finished, and such a file
//! will be reported [`Readiness::Ready`] early. Closing that gap needs a
//! completion marker from the producer.

use std::io;
use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, trace};

use crate::config::ReadinessConfig;

/// Outcome of a settle-window observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// Size held constant for the whole window.
    Ready,
    /// Size changed at least once. Retry on a later cycle.
    Pending,
}

impl Readiness {
    pub fn is_ready(self) -> bool {
        matches!(self, Readiness::Ready)
    }
}

/// Source of byte-size observations.
#[async_trait]
pub trait SizeProbe: Send + Sync {
    async fn size(&self, path: &Path) -> io::Result<u64>;
}

/// Reads sizes from filesystem metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

#[async_trait]
impl SizeProbe for FsProbe {
    async fn size(&self, path: &Path) -> io::Result<u64> {
        Ok(tokio::fs::metadata(path).await?.len())
    }
}

/// Observes a file's size across a settle window.
#[derive(Debug, Clone)]
pub struct ReadinessDetector<P = FsProbe> {
    config: ReadinessConfig,
    probe: P,
}

impl ReadinessDetector<FsProbe> {
    pub fn new(config: ReadinessConfig) -> Self {
        Self::with_probe(config, FsProbe)
    }
}

impl<P: SizeProbe> ReadinessDetector<P> {
    pub fn with_probe(config: ReadinessConfig, probe: P) -> Self {
        Self { config, probe }
    }

    pub fn config(&self) -> &ReadinessConfig {
        &self.config
    }

    /// Sample the size, wait `settle_seconds`, then take
    /// [`ReadinessConfig::sub_samples`] more samples spaced
    /// `poll_interval_seconds` apart. The first of those is taken right
    /// after the wait, so they span `(sub_samples - 1) * poll_interval`
    /// (4.5 s with the defaults).
    ///
    /// Returns `Pending` as soon as any sample differs from the previous
    /// one; `Ready` only if every sample matched. An I/O error (typically
    /// the file vanished mid-observation) is returned to the caller, which
    /// should treat it like `Pending` and move on.
    pub async fn check(&self, path: &Path) -> io::Result<Readiness> {
        let mut last = self.probe.size(path).await?;
        trace!(path = %path.display(), size = last, "initial size sample");

        tokio::time::sleep(self.config.settle()).await;

        for sample in 0..self.config.sub_samples() {
            if sample > 0 {
                tokio::time::sleep(self.config.poll_interval()).await;
            }
            let size = self.probe.size(path).await?;
            if size != last {
                debug!(
                    path = %path.display(),
                    previous = last,
                    current = size,
                    "size changed during settle window"
                );
                return Ok(Readiness::Pending);
            }
            last = size;
        }

        debug!(path = %path.display(), size = last, "size stable across settle window");
        Ok(Readiness::Ready)
    }
}
