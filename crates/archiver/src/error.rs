// crates/archiver/src/error.rs
use std::path::PathBuf;

use signal_view_core::TableError;
use thiserror::Error;

/// Failures while archiving one recording. None of these stop the watch
/// loop; the file is left where it is and retried on the next scan.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error("Failed to render {path}: {source}")]
    Render {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Printer not found: {0}")]
    PrinterNotFound(String),

    #[error("Print failed: {0}")]
    Print(String),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ArchiveError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
