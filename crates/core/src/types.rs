// crates/core/src/types.rs
//! Wire types exchanged between the data endpoint and its pollers.

use serde::{Deserialize, Serialize};

/// Label served when the watched directory holds no matching file.
pub const NO_FILE_FOUND: &str = "no file found";
/// Label served when the current file could not be read or parsed.
pub const ERROR_READING_FILE: &str = "error reading file";

/// Older spellings still emitted by some deployments. Pollers must treat
/// them exactly like the canonical sentinels.
const LEGACY_SENTINELS: &[&str] = &["Error reading file", "Error fetching data"];

/// Response body of `GET /data`.
///
/// `values` is always the full sequence from the start of the current
/// file; computing the new suffix is the poller's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSnapshot {
    pub values: Vec<f64>,
    pub filename: String,
}

impl SignalSnapshot {
    pub fn file(filename: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            values,
            filename: filename.into(),
        }
    }

    pub fn no_file() -> Self {
        Self {
            values: Vec::new(),
            filename: NO_FILE_FOUND.to_string(),
        }
    }

    pub fn read_error() -> Self {
        Self {
            values: Vec::new(),
            filename: ERROR_READING_FILE.to_string(),
        }
    }

    /// Whether this snapshot carries data that can be plotted.
    pub fn is_renderable(&self) -> bool {
        !is_sentinel(&self.filename)
    }
}

/// Returns true for every reserved label that means "no renderable data".
///
/// Recognises the canonical sentinels, the legacy capitalised spellings,
/// and the extension-specific `No .<ext> files found` form.
pub fn is_sentinel(label: &str) -> bool {
    if label == NO_FILE_FOUND || label == ERROR_READING_FILE || LEGACY_SENTINELS.contains(&label) {
        return true;
    }
    label
        .strip_prefix("No .")
        .and_then(|rest| rest.strip_suffix(" files found"))
        .is_some_and(|ext| !ext.is_empty() && !ext.contains(char::is_whitespace))
}
