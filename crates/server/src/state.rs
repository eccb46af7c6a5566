// crates/server/src/state.rs
//! Shared, read-only server state.
//!
//! `/data` shares nothing between requests except the filesystem, so
//! handlers hold no locks.

use std::sync::Arc;
use std::time::{Duration, Instant};

use signal_view_core::{ClientConfig, SourceConfig};

pub struct AppState {
    started: Instant,
    /// Watched directory and extension filter.
    pub source: SourceConfig,
    /// Poll interval and window size handed to the browser shell.
    pub client: ClientConfig,
}

impl AppState {
    pub fn new(source: SourceConfig, client: ClientConfig) -> Arc<Self> {
        Arc::new(Self {
            started: Instant::now(),
            source,
            client,
        })
    }

    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }
}
