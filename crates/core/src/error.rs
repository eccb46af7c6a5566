// crates/core/src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when reading a one-value-per-line signal file
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Signal file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Permission denied reading file: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid UTF-8 in file {path}")]
    InvalidUtf8 { path: PathBuf },

    #[error("Malformed sample at line {line} in {path}: {content:?}")]
    Malformed {
        path: PathBuf,
        line: usize,
        content: String,
    },
}

impl StoreError {
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::InvalidData => Self::InvalidUtf8 { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Errors that can occur when parsing a tab-separated batch recording
#[derive(Debug, Error)]
pub enum TableError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Empty recording: {path}")]
    EmptyFile { path: PathBuf },

    #[error("Recording {path} has no `Epoch Time` column")]
    MissingEpochColumn { path: PathBuf },

    #[error("Recording {path} has no signal columns besides `Epoch Time`")]
    NoSignalColumns { path: PathBuf },

    #[error("Row {line} in {path} has {found} cells, expected {expected}")]
    RaggedRow {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Bad value {value:?} in column {column:?} at line {line} in {path}")]
    BadValue {
        path: PathBuf,
        line: usize,
        column: String,
        value: String,
    },
}

impl TableError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Rejected configuration values
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be positive and finite (got {value})")]
    NonPositive { field: &'static str, value: f64 },

    #[error("poll_interval_seconds ({interval}) must not exceed settle_seconds ({settle})")]
    IntervalExceedsSettle { interval: f64, settle: f64 },

    #[error("port range {start}..{end} is empty")]
    EmptyPortRange { start: u16, end: u16 },

    #[error("extension filter must not be empty")]
    EmptyExtension,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::not_found("/path/to/s.txt");
        assert!(err.to_string().contains("/path/to/s.txt"));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_store_error_io_classification() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = StoreError::io("/test/path", io_err);
        assert!(matches!(err, StoreError::NotFound { .. }));

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = StoreError::io("/test/path", io_err);
        assert!(matches!(err, StoreError::PermissionDenied { .. }));

        let io_err = std::io::Error::new(std::io::ErrorKind::InvalidData, "stream did not contain valid UTF-8");
        let err = StoreError::io("/test/path", io_err);
        assert!(matches!(err, StoreError::InvalidUtf8 { .. }));
    }

    #[test]
    fn test_store_error_io_other() {
        let io_err = std::io::Error::new(std::io::ErrorKind::TimedOut, "timeout");
        let err = StoreError::io("/test/path", io_err);
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[test]
    fn test_malformed_display_quotes_content() {
        let err = StoreError::Malformed {
            path: PathBuf::from("/data/s.txt"),
            line: 3,
            content: "0.1x".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("line 3"));
        assert!(msg.contains("\"0.1x\""));
    }

    #[test]
    fn test_table_error_display() {
        let err = TableError::RaggedRow {
            path: PathBuf::from("/data/rec.txt"),
            line: 7,
            expected: 3,
            found: 2,
        };
        assert_eq!(
            err.to_string(),
            "Row 7 in /data/rec.txt has 2 cells, expected 3"
        );
    }
}
