// crates/core/src/lib.rs
pub mod config;
pub mod cursor;
pub mod error;
pub mod readiness;
pub mod selector;
pub mod store;
pub mod table;
pub mod types;

pub use config::*;
pub use cursor::*;
pub use error::*;
pub use readiness::*;
pub use selector::*;
pub use store::*;
pub use table::*;
pub use types::*;
