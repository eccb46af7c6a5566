// crates/server/src/metrics.rs
//! Prometheus counters and histograms for the data endpoint.
//!
//! Recording is a no-op until [`init_metrics`] installs the global recorder,
//! so library users and tests that never call it pay nothing.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Instant;

static PROMETHEUS: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Only the first call does anything;
/// later calls return `false`.
pub fn init_metrics() -> bool {
    if PROMETHEUS.get().is_some() {
        return false;
    }
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    let installed = metrics::set_global_recorder(recorder).is_ok();
    if !publish_handle(&PROMETHEUS, handle, installed) {
        return false;
    }
    describe_metrics();
    tracing::debug!("metrics recorder installed");
    true
}

/// Store `handle` for `/metrics` only if its recorder actually became the
/// global one; otherwise `/metrics` keeps answering 503.
fn publish_handle(slot: &OnceLock<PrometheusHandle>, handle: PrometheusHandle, installed: bool) -> bool {
    if !installed {
        tracing::warn!("another metrics recorder is already installed");
        return false;
    }
    slot.set(handle).is_ok()
}

fn describe_metrics() {
    describe_counter!(
        "signal_data_requests_total",
        "Total number of /data requests, by outcome"
    );
    describe_histogram!(
        "signal_data_request_duration_seconds",
        "Time to resolve, read and parse the current file"
    );
    describe_histogram!(
        "signal_data_samples",
        "Number of samples returned per /data request"
    );
}

/// Prometheus exposition text, or `None` before [`init_metrics`].
pub fn render_metrics() -> Option<String> {
    PROMETHEUS.get().map(PrometheusHandle::render)
}

/// Outcome label for a `/data` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOutcome {
    File,
    NoFile,
    ReadError,
}

impl DataOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            DataOutcome::File => "file",
            DataOutcome::NoFile => "no_file",
            DataOutcome::ReadError => "read_error",
        }
    }
}

/// Times one `/data` request.
pub struct RequestTimer {
    start: Instant,
}

impl RequestTimer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn finish(self, outcome: DataOutcome, samples: usize) {
        counter!("signal_data_requests_total", "outcome" => outcome.as_str()).increment(1);
        histogram!("signal_data_request_duration_seconds").record(self.start.elapsed().as_secs_f64());
        histogram!("signal_data_samples").record(samples as f64);
    }
}

impl Default for RequestTimer {
    fn default() -> Self {
        Self::new()
    }
}
