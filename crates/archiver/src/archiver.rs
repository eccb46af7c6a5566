// crates/archiver/src/archiver.rs
//! Polling watch loop that archives finished recordings.
//!
//! Each scan lists the watch directory, skips anything already archived,
//! asks the readiness detector whether each remaining file has stopped
//! growing, and runs finished files through parse, render, optional print
//! and move. The plot is complete on disk before the source is moved, and
//! the move is a single rename, so stopping between files never leaves a
//! half-archived recording behind.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use signal_view_core::{
    list_candidates, ConfigError, FsProbe, ReadinessConfig, ReadinessDetector, SignalTable,
    SizeProbe, SourceConfig,
};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::capability::{Printer, Renderer};
use crate::error::ArchiveError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiverConfig {
    /// Where the producer uploads recordings.
    pub watch_dir: PathBuf,
    /// Finished recordings are moved here.
    pub data_dir: PathBuf,
    /// Plot artifacts are written here.
    pub plots_dir: PathBuf,
    pub extension: String,
    /// Sleep between directory scans.
    pub scan_interval_seconds: f64,
    /// Printer name; `None` disables printing.
    pub printer: Option<String>,
    pub readiness: ReadinessConfig,
}

impl Default for ArchiverConfig {
    fn default() -> Self {
        Self {
            watch_dir: PathBuf::from("incoming"),
            data_dir: PathBuf::from("data"),
            plots_dir: PathBuf::from("plots"),
            extension: "txt".to_string(),
            scan_interval_seconds: 5.0,
            printer: None,
            readiness: ReadinessConfig::default(),
        }
    }
}

impl ArchiverConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.scan_interval_seconds.is_finite() && self.scan_interval_seconds > 0.0) {
            return Err(ConfigError::NonPositive {
                field: "scan_interval_seconds",
                value: self.scan_interval_seconds,
            });
        }
        self.readiness.validate()?;
        self.source().validate()
    }

    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs_f64(self.scan_interval_seconds)
    }

    fn source(&self) -> SourceConfig {
        SourceConfig::new(self.watch_dir.clone(), self.extension.clone())
    }
}

/// Names of files already archived by this process.
///
/// In-memory only. After a restart nothing is lost because archived files
/// have already left the watch directory.
#[derive(Debug, Default, Clone)]
pub struct ArchiverState {
    processed: HashSet<String>,
}

impl ArchiverState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_processed(&self, name: &str) -> bool {
        self.processed.contains(name)
    }

    pub fn mark_processed(&mut self, name: impl Into<String>) {
        self.processed.insert(name.into());
    }

    pub fn len(&self) -> usize {
        self.processed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processed.is_empty()
    }
}

/// What one directory scan did, by file name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanReport {
    pub archived: Vec<String>,
    pub pending: Vec<String>,
    pub failed: Vec<String>,
}

/// Result of archiving one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archived {
    pub artifact: PathBuf,
    pub destination: PathBuf,
    pub print_job: Option<String>,
}

pub struct Archiver<P = FsProbe> {
    config: ArchiverConfig,
    detector: ReadinessDetector<P>,
    renderer: Box<dyn Renderer>,
    printer: Option<Box<dyn Printer>>,
}

impl Archiver<FsProbe> {
    pub fn new(config: ArchiverConfig, renderer: impl Renderer + 'static) -> Self {
        Self::with_probe(config, FsProbe, renderer)
    }
}

impl<P: SizeProbe> Archiver<P> {
    pub fn with_probe(config: ArchiverConfig, probe: P, renderer: impl Renderer + 'static) -> Self {
        Self {
            detector: ReadinessDetector::with_probe(config.readiness.clone(), probe),
            config,
            renderer: Box::new(renderer),
            printer: None,
        }
    }

    /// Printing only happens when a printer is attached here and
    /// `config.printer` names a destination.
    pub fn with_printer(mut self, printer: impl Printer + 'static) -> Self {
        self.printer = Some(Box::new(printer));
        self
    }

    pub fn config(&self) -> &ArchiverConfig {
        &self.config
    }

    /// Create the output directories.
    pub async fn prepare(&self) -> Result<(), ArchiveError> {
        for dir in [&self.config.data_dir, &self.config.plots_dir] {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| ArchiveError::io(dir, e))?;
        }
        Ok(())
    }

    /// One pass over the watch directory.
    ///
    /// Stops early, between files, once `stop` reads `true`.
    pub async fn scan_once(
        &self,
        state: &mut ArchiverState,
        stop: &watch::Receiver<bool>,
    ) -> Result<ScanReport, ArchiveError> {
        let source = self.config.source();
        let candidates = list_candidates(&source)
            .await
            .map_err(|e| ArchiveError::io(&source.root, e))?;

        let mut report = ScanReport::default();
        for candidate in candidates {
            if *stop.borrow() {
                debug!("stop requested; ending scan early");
                break;
            }
            if state.is_processed(&candidate.name) {
                continue;
            }

            match self.detector.check(&candidate.path).await {
                Ok(readiness) if readiness.is_ready() => {}
                Ok(_) => {
                    info!(file = %candidate.name, "File is still being uploaded");
                    report.pending.push(candidate.name);
                    continue;
                }
                Err(e) => {
                    debug!(file = %candidate.name, error = %e, "File disappeared during readiness check");
                    report.pending.push(candidate.name);
                    continue;
                }
            }

            info!(file = %candidate.name, "New file detected");
            match self.process_file(&candidate.path).await {
                Ok(archived) => {
                    info!(
                        file = %candidate.name,
                        plot = %archived.artifact.display(),
                        moved_to = %archived.destination.display(),
                        "File archived"
                    );
                    state.mark_processed(candidate.name.clone());
                    report.archived.push(candidate.name);
                }
                Err(e) => {
                    error!(file = %candidate.name, error = %e, "Failed to archive; will retry");
                    report.failed.push(candidate.name);
                }
            }
        }
        Ok(report)
    }

    /// Parse, render, print, then move `path` into `data_dir`.
    pub async fn process_file(&self, path: &Path) -> Result<Archived, ArchiveError> {
        let table = SignalTable::read(path).await?;
        debug!(
            file = %path.display(),
            rows = table.rows(),
            channels = table.channels.len(),
            "table parsed"
        );

        let artifact = self
            .renderer
            .render(path, &table, &self.config.plots_dir)
            .await?;

        let print_job = match (&self.printer, &self.config.printer) {
            (Some(printer), Some(name)) => match printer.print(&artifact, name).await {
                Ok(job) => Some(job),
                Err(e) => {
                    warn!(printer = %name, error = %e, "Printing failed; archiving anyway");
                    None
                }
            },
            _ => None,
        };

        let destination = move_file(path, &self.config.data_dir).await?;
        Ok(Archived {
            artifact,
            destination,
            print_job,
        })
    }

    /// Scan every `scan_interval_seconds` until `stop` flips to `true`.
    pub async fn run(&self, state: &mut ArchiverState, mut stop: watch::Receiver<bool>) {
        info!(
            watch_dir = %self.config.watch_dir.display(),
            extension = %self.config.extension,
            "Watching for finished recordings"
        );
        loop {
            if *stop.borrow() {
                break;
            }
            match self.scan_once(state, &stop).await {
                Ok(report) if report == ScanReport::default() => {}
                Ok(report) => debug!(
                    archived = report.archived.len(),
                    pending = report.pending.len(),
                    failed = report.failed.len(),
                    "scan complete"
                ),
                Err(e) => warn!(error = %e, "Scan failed"),
            }

            tokio::select! {
                _ = tokio::time::sleep(self.config.scan_interval()) => {}
                changed = stop.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
        info!(archived = state.len(), "Watcher stopped");
    }
}

/// Move `path` into `dir`, keeping its file name.
///
/// A plain rename when both sides share a filesystem. Otherwise the bytes
/// are copied to a `.partial` name in `dir`, renamed into place, and only
/// then is the source removed.
pub async fn move_file(path: &Path, dir: &Path) -> Result<PathBuf, ArchiveError> {
    let name = path
        .file_name()
        .ok_or_else(|| ArchiveError::io(path, io::Error::from(io::ErrorKind::InvalidInput)))?;
    let destination = dir.join(name);

    match tokio::fs::rename(path, &destination).await {
        Ok(()) => return Ok(destination),
        Err(e) => debug!(error = %e, "rename failed; falling back to copy"),
    }

    let mut partial = destination.clone().into_os_string();
    partial.push(".partial");
    let partial = PathBuf::from(partial);

    tokio::fs::copy(path, &partial)
        .await
        .map_err(|e| ArchiveError::io(path, e))?;
    tokio::fs::rename(&partial, &destination)
        .await
        .map_err(|e| ArchiveError::io(&destination, e))?;
    tokio::fs::remove_file(path)
        .await
        .map_err(|e| ArchiveError::io(path, e))?;
    Ok(destination)
}
