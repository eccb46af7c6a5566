// crates/simulator/src/lib.rs
//! Synthetic producers for exercising the viewer and the archiver without
//! acquisition hardware.

pub mod batch;
pub mod live;

pub use batch::{generate, header, write_table, BatchParams};
pub use live::{append_sine, one_second};
