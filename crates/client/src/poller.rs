// crates/client/src/poller.rs
//! Fixed-interval poll loop over `GET /data`.
//!
//! One request is in flight at a time: the next tick is only awaited after
//! the previous poll has completed or failed, and responses are applied in
//! the order they were requested. A stale response can therefore never
//! overwrite state derived from a fresher one.

use std::future::Future;

use reqwest::Client;
use signal_view_core::{ClientConfig, CursorUpdate, SignalSnapshot, StreamCursor};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::error::PollError;
use crate::sink::PlotSink;

/// Polls a data endpoint and drives a [`PlotSink`] with only the new samples.
pub struct Poller<S> {
    http: Client,
    url: String,
    config: ClientConfig,
    cursor: StreamCursor,
    sink: S,
}

impl<S: PlotSink> Poller<S> {
    /// `base_url` is the server root, e.g. `http://10.0.0.5:5000`.
    pub fn new(base_url: &str, config: ClientConfig, sink: S) -> Result<Self, PollError> {
        config.validate()?;
        let http = Client::builder().timeout(config.request_timeout()).build()?;
        Ok(Self {
            http,
            url: format!("{}/data", base_url.trim_end_matches('/')),
            cursor: StreamCursor::new(config.max_window),
            config,
            sink,
        })
    }

    pub fn cursor(&self) -> &StreamCursor {
        &self.cursor
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    async fn fetch(&self) -> Result<SignalSnapshot, PollError> {
        let response = self.http.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PollError::Status {
                status: status.as_u16(),
            });
        }
        Ok(response.json::<SignalSnapshot>().await?)
    }

    /// Fold a snapshot into the cursor and forward the effect to the sink.
    pub fn ingest(&mut self, snapshot: &SignalSnapshot) -> CursorUpdate {
        let update = self.cursor.apply(snapshot);
        if update.reset {
            info!(label = %snapshot.filename, "stream reset");
            self.sink.reset(&snapshot.filename);
        }
        if !update.appended.is_empty() {
            self.sink
                .extend(update.appended.start, &snapshot.values[update.appended.clone()]);
            let (x_min, x_max) = self.cursor.x_range();
            self.sink.relayout(x_min, x_max);
        }
        update
    }

    /// Fetch once and ingest. Errors leave the cursor untouched.
    pub async fn poll_once(&mut self) -> Result<CursorUpdate, PollError> {
        let snapshot = self.fetch().await?;
        Ok(self.ingest(&snapshot))
    }

    /// Poll every `poll_interval_ms` until `shutdown` resolves.
    pub async fn run(mut self, shutdown: impl Future<Output = ()>) -> S {
        let mut interval = tokio::time::interval(self.config.poll_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = interval.tick() => {}
            }
            match self.poll_once().await {
                Ok(update) if update.is_noop() => {}
                Ok(update) => debug!(
                    reset = update.reset,
                    appended = update.appended.len(),
                    next_index = self.cursor.next_index(),
                    "poll applied"
                ),
                Err(e) => warn!(url = %self.url, error = %e, "poll failed; retrying next tick"),
            }
        }

        self.sink
    }
}
