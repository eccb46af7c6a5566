// crates/client/src/error.rs
use thiserror::Error;

/// A poll that produced no snapshot. The loop logs these and skips the
/// cycle; they never touch cursor state. `Config` is only returned by
/// [`crate::Poller::new`].
#[derive(Debug, Error)]
pub enum PollError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server returned HTTP {status}")]
    Status { status: u16 },

    #[error("Invalid poll configuration: {0}")]
    Config(#[from] signal_view_core::ConfigError),
}
