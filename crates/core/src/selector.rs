// crates/core/src/selector.rs
//! Picks the "current" signal file: the newest matching file in a directory.
//!
//! Stateless by construction. Every call re-lists the directory, so a
//! rotated file is picked up on the next poll without any invalidation.

use std::cmp::Ordering;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tokio::fs;
use tracing::debug;

use crate::config::SourceConfig;

/// A matching file together with the metadata used to rank it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub name: String,
    pub modified: SystemTime,
    pub size: u64,
}

impl Candidate {
    /// Ranking used for selection: newest mtime first, ties broken by the
    /// lexicographically greatest file name.
    fn rank(&self, other: &Self) -> Ordering {
        self.modified
            .cmp(&other.modified)
            .then_with(|| self.name.cmp(&other.name))
    }
}

/// Whether `path` carries the configured extension.
pub fn matches_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(extension)
}

/// List every regular file in `source.root` whose extension matches.
///
/// A missing directory yields an empty list rather than an error: "nothing
/// to show yet" is not a failure. Entries that vanish between listing and
/// `stat` (e.g. moved away by the archiver) are skipped.
pub async fn list_candidates(source: &SourceConfig) -> io::Result<Vec<Candidate>> {
    let mut read_dir = match fs::read_dir(&source.root).await {
        Ok(rd) => rd,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(root = %source.root.display(), "watched directory does not exist");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    };

    let mut candidates = Vec::new();
    while let Some(entry) = read_dir.next_entry().await? {
        let path = entry.path();
        if !matches_extension(&path, &source.extension) {
            continue;
        }
        let metadata = match fs::metadata(&path).await {
            Ok(m) => m,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "skipping unreadable candidate");
                continue;
            }
        };
        if !metadata.is_file() {
            continue;
        }
        let Ok(modified) = metadata.modified() else {
            continue;
        };
        let name = entry.file_name().to_string_lossy().into_owned();
        candidates.push(Candidate {
            path,
            name,
            modified,
            size: metadata.len(),
        });
    }

    candidates.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(candidates)
}

/// Return the candidate with the greatest modification time, or `None`.
pub async fn select_current(source: &SourceConfig) -> io::Result<Option<Candidate>> {
    let candidates = list_candidates(source).await?;
    Ok(newest(candidates))
}

fn newest(candidates: Vec<Candidate>) -> Option<Candidate> {
    candidates.into_iter().max_by(|a, b| a.rank(b))
}
