// crates/core/src/store.rs
//! One-value-per-line signal files.
//!
//! Each read re-parses the whole file from the start. There is no cache and
//! no seek-resume: files are human-timescale sized and re-reading keeps the
//! endpoint stateless.

use std::path::Path;

use tracing::{debug, warn};

use crate::config::SourceConfig;
use crate::error::StoreError;
use crate::selector::select_current;
use crate::types::SignalSnapshot;

/// Parse signal text: trim each line, skip blank lines, and parse the rest
/// as finite `f64` values.
///
/// A single bad line fails the whole parse. Non-finite values (`NaN`,
/// `inf`) are rejected because they have no JSON representation.
pub fn parse_signal(path: &Path, text: &str) -> Result<Vec<f64>, StoreError> {
    let mut values = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        match line.parse::<f64>() {
            Ok(v) if v.is_finite() => values.push(v),
            _ => {
                return Err(StoreError::Malformed {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    content: line.to_string(),
                })
            }
        }
    }
    Ok(values)
}

/// Read and parse a signal file.
pub async fn read_signal(path: &Path) -> Result<Vec<f64>, StoreError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| StoreError::io(path, e))?;
    parse_signal(path, &text)
}

/// Resolve the current file under `source` and return its full sequence.
///
/// Never fails: a missing file degrades to the "no file found" sentinel and
/// any read or parse failure degrades to "error reading file", so a partial
/// write mid-line can never take the live endpoint down.
pub async fn current_snapshot(source: &SourceConfig) -> SignalSnapshot {
    let current = match select_current(source).await {
        Ok(Some(c)) => c,
        Ok(None) => {
            debug!(root = %source.root.display(), "no candidate files");
            return SignalSnapshot::no_file();
        }
        Err(e) => {
            warn!(root = %source.root.display(), error = %e, "failed to list watched directory");
            return SignalSnapshot::read_error();
        }
    };

    match read_signal(&current.path).await {
        Ok(values) => SignalSnapshot::file(current.name, values),
        Err(StoreError::NotFound { path }) => {
            // Moved away between selection and read.
            debug!(path = %path.display(), "current file vanished before read");
            SignalSnapshot::read_error()
        }
        Err(e) => {
            warn!(file = %current.name, error = %e, "error reading file");
            SignalSnapshot::read_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_parse_trims_and_skips_blank_lines() {
        let text = "  1.5\n\n-2\t\n   \n3e2\n";
        let values = parse_signal(Path::new("s.txt"), text).unwrap();
        assert_eq!(values, vec![1.5, -2.0, 300.0]);
    }

    #[test]
    fn test_parse_handles_crlf_and_missing_trailing_newline() {
        let values = parse_signal(Path::new("s.txt"), "0.1\r\n0.2\r\n0.3").unwrap();
        assert_eq!(values, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_parse_empty_text() {
        assert!(parse_signal(Path::new("s.txt"), "").unwrap().is_empty());
        assert!(parse_signal(Path::new("s.txt"), "\n\n  \n").unwrap().is_empty());
    }

    #[test]
    fn test_single_bad_line_fails_whole_parse() {
        let err = parse_signal(Path::new("s.txt"), "1.0\n2.0\nabc\n4.0\n").unwrap_err();
        match err {
            StoreError::Malformed { line, content, .. } => {
                assert_eq!(line, 3);
                assert_eq!(content, "abc");
            }
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(parse_signal(Path::new("s.txt"), "1.0\nNaN\n").is_err());
        assert!(parse_signal(Path::new("s.txt"), "inf\n").is_err());
    }

    #[tokio::test]
    async fn test_read_signal_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = read_signal(&dir.path().join("missing.txt")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_read_signal_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bin.txt");
        std::fs::write(&path, [0x31, 0x0a, 0xff, 0xfe, 0x0a]).unwrap();
        let err = read_signal(&path).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidUtf8 { .. }));
    }

    #[tokio::test]
    async fn test_snapshot_no_file() {
        let dir = TempDir::new().unwrap();
        let source = SourceConfig::new(dir.path(), "txt");
        assert_eq!(current_snapshot(&source).await, SignalSnapshot::no_file());
    }

    #[tokio::test]
    async fn test_snapshot_current_file() {
        let dir = TempDir::new().unwrap();
        let mut f = std::fs::File::create(dir.path().join("s.txt")).unwrap();
        writeln!(f, "1.0\n2.0\n3.0").unwrap();

        let source = SourceConfig::new(dir.path(), "txt");
        assert_eq!(
            current_snapshot(&source).await,
            SignalSnapshot::file("s.txt", vec![1.0, 2.0, 3.0])
        );
    }

    #[tokio::test]
    async fn test_snapshot_malformed_degrades() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("s.txt"), "1.0\n2.0\n0.12.\n").unwrap();

        let source = SourceConfig::new(dir.path(), "txt");
        assert_eq!(current_snapshot(&source).await, SignalSnapshot::read_error());
    }

    proptest::proptest! {
        #[test]
        fn prop_parse_round_trip(values in proptest::collection::vec(-1.0e12f64..1.0e12, 0..200)) {
            let mut text = String::new();
            for v in &values {
                text.push_str(&format!("{v}\n"));
            }
            let parsed = parse_signal(Path::new("s.txt"), &text).unwrap();
            proptest::prop_assert_eq!(parsed, values);
        }

        #[test]
        fn prop_one_bad_line_poisons_everything(
            values in proptest::collection::vec(-1.0e6f64..1.0e6, 1..50),
            bad_at in 0usize..50,
        ) {
            let mut lines: Vec<String> = values.iter().map(|v| v.to_string()).collect();
            let at = bad_at % (lines.len() + 1);
            lines.insert(at, "not-a-number".to_string());
            let text = lines.join("\n");
            let err = parse_signal(Path::new("s.txt"), &text).unwrap_err();
            let is_malformed = matches!(err, StoreError::Malformed { .. });
            proptest::prop_assert!(is_malformed);
        }
    }
}
