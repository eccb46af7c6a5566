// crates/archiver/src/lib.rs
pub mod archiver;
pub mod capability;
pub mod error;
pub mod printer;
pub mod render;

pub use archiver::{move_file, Archived, Archiver, ArchiverConfig, ArchiverState, ScanReport};
pub use capability::{Printer, Renderer};
pub use error::ArchiveError;
pub use printer::LpPrinter;
pub use render::SvgRenderer;
