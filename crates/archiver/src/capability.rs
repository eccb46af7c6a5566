// crates/archiver/src/capability.rs
//! Side-effecting steps of the archive pipeline, kept behind traits so the
//! watch loop can run without a display backend or a printer.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use signal_view_core::SignalTable;

use crate::error::ArchiveError;

/// Turns a finished recording into a plot artifact on disk.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Write the artifact for `source` into `out_dir` and return its path.
    /// The artifact must be complete on disk when this returns.
    async fn render(
        &self,
        source: &Path,
        table: &SignalTable,
        out_dir: &Path,
    ) -> Result<PathBuf, ArchiveError>;
}

/// Sends an artifact to a named printer.
#[async_trait]
pub trait Printer: Send + Sync {
    /// Returns the spooler's job id.
    async fn print(&self, artifact: &Path, printer: &str) -> Result<String, ArchiveError>;
}
