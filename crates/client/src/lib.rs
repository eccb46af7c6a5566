// crates/client/src/lib.rs
//! Incremental poller for the signal-view data endpoint.

pub mod error;
pub mod poller;
pub mod sink;

pub use error::PollError;
pub use poller::Poller;
pub use sink::{PlotSink, TerminalSink};
