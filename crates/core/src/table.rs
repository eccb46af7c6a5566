// crates/core/src/table.rs
//! Tab-separated batch recordings.
//!
//! Layout: one header row naming the columns, then one row per sample. A
//! column named `Epoch Time` (seconds since the Unix epoch) is mandatory;
//! every other column is a signal channel. Recordings are consumed whole,
//! once the readiness check says the writer has finished.

use std::path::Path;

use crate::error::TableError;

/// Name of the mandatory timestamp column.
pub const EPOCH_COLUMN: &str = "Epoch Time";

/// One named signal column.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    pub name: String,
    pub samples: Vec<f64>,
}

/// A parsed batch recording.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalTable {
    pub epoch: Vec<f64>,
    pub channels: Vec<Channel>,
}

impl SignalTable {
    pub fn rows(&self) -> usize {
        self.epoch.len()
    }

    /// Seconds between the first and last timestamp (0 for fewer than two rows).
    pub fn duration(&self) -> f64 {
        match (self.epoch.first(), self.epoch.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }

    /// Timestamps shifted so the first row sits at zero.
    pub fn normalized_time(&self) -> Vec<f64> {
        let origin = self.epoch.first().copied().unwrap_or(0.0);
        self.epoch.iter().map(|t| t - origin).collect()
    }

    /// Parse recording text. `path` is only used in error messages.
    pub fn parse(path: &Path, text: &str) -> Result<Self, TableError> {
        let mut lines = text
            .lines()
            .enumerate()
            .filter(|(_, l)| !l.trim().is_empty());

        let (_, header) = lines.next().ok_or_else(|| TableError::EmptyFile {
            path: path.to_path_buf(),
        })?;
        let columns: Vec<String> = header.split('\t').map(|c| c.trim().to_string()).collect();

        let epoch_idx = columns
            .iter()
            .position(|c| c == EPOCH_COLUMN)
            .ok_or_else(|| TableError::MissingEpochColumn {
                path: path.to_path_buf(),
            })?;
        if columns.len() < 2 {
            return Err(TableError::NoSignalColumns {
                path: path.to_path_buf(),
            });
        }

        let mut epoch = Vec::new();
        let mut channels: Vec<Channel> = columns
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != epoch_idx)
            .map(|(_, name)| Channel {
                name: name.clone(),
                samples: Vec::new(),
            })
            .collect();

        for (idx, row) in lines {
            let line = idx + 1;
            let cells: Vec<&str> = row.split('\t').map(str::trim).collect();
            if cells.len() != columns.len() {
                return Err(TableError::RaggedRow {
                    path: path.to_path_buf(),
                    line,
                    expected: columns.len(),
                    found: cells.len(),
                });
            }

            let mut channel = 0;
            for (col, cell) in cells.iter().enumerate() {
                let value = cell.parse::<f64>().map_err(|_| TableError::BadValue {
                    path: path.to_path_buf(),
                    line,
                    column: columns[col].clone(),
                    value: cell.to_string(),
                })?;
                if col == epoch_idx {
                    epoch.push(value);
                } else {
                    channels[channel].samples.push(value);
                    channel += 1;
                }
            }
        }

        Ok(Self { epoch, channels })
    }

    /// Read and parse a recording from disk.
    pub async fn read(path: &Path) -> Result<Self, TableError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| TableError::io(path, e))?;
        Self::parse(path, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RECORDING: &str = "Sine Wave 1\tSine Wave 2\tEpoch Time\n\
                             0.5\t-1.0\t1700000000.0\n\
                             0.6\t-0.9\t1700000000.5\n\
                             0.7\t-0.8\t1700000001.5\n";

    #[test]
    fn test_parse_recording() {
        let table = SignalTable::parse(Path::new("rec.txt"), RECORDING).unwrap();
        assert_eq!(table.rows(), 3);
        assert_eq!(table.channels.len(), 2);
        assert_eq!(table.channels[0].name, "Sine Wave 1");
        assert_eq!(table.channels[1].samples, vec![-1.0, -0.9, -0.8]);
        assert_eq!(table.duration(), 1.5);
        assert_eq!(table.normalized_time(), vec![0.0, 0.5, 1.5]);
    }

    #[test]
    fn test_epoch_column_may_be_first_and_cells_are_trimmed() {
        let text = " Epoch Time \t Pressure \n 10 \t 1.25 \n 12 \t 1.5 \n";
        let table = SignalTable::parse(Path::new("rec.txt"), text).unwrap();
        assert_eq!(table.epoch, vec![10.0, 12.0]);
        assert_eq!(table.channels[0].name, "Pressure");
        assert_eq!(table.channels[0].samples, vec![1.25, 1.5]);
    }

    #[test]
    fn test_missing_epoch_column() {
        let err = SignalTable::parse(Path::new("rec.txt"), "a\tb\n1\t2\n").unwrap_err();
        assert!(matches!(err, TableError::MissingEpochColumn { .. }));
    }

    #[test]
    fn test_epoch_only_has_no_signals() {
        let err = SignalTable::parse(Path::new("rec.txt"), "Epoch Time\n1\n").unwrap_err();
        assert!(matches!(err, TableError::NoSignalColumns { .. }));
    }

    #[test]
    fn test_empty_recording() {
        let err = SignalTable::parse(Path::new("rec.txt"), "\n\n").unwrap_err();
        assert!(matches!(err, TableError::EmptyFile { .. }));
    }

    #[test]
    fn test_ragged_row() {
        let text = "s\tEpoch Time\n1\t2\n3\n";
        let err = SignalTable::parse(Path::new("rec.txt"), text).unwrap_err();
        match err {
            TableError::RaggedRow { line, expected, found, .. } => {
                assert_eq!((line, expected, found), (3, 2, 1));
            }
            other => panic!("expected RaggedRow, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_value_names_column() {
        let text = "s\tEpoch Time\n1\t2\nx\t3\n";
        let err = SignalTable::parse(Path::new("rec.txt"), text).unwrap_err();
        match err {
            TableError::BadValue { column, value, line, .. } => {
                assert_eq!(column, "s");
                assert_eq!(value, "x");
                assert_eq!(line, 3);
            }
            other => panic!("expected BadValue, got {other:?}"),
        }
    }

    #[test]
    fn test_header_only_is_empty_table() {
        let table = SignalTable::parse(Path::new("rec.txt"), "s\tEpoch Time\n").unwrap();
        assert_eq!(table.rows(), 0);
        assert_eq!(table.duration(), 0.0);
    }
}
