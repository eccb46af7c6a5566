// crates/core/src/config.rs
//! Configuration shared by the server, the poller and the archiver.
//!
//! Every struct deserializes with serde defaults so a partial config
//! (or none at all) yields the values the field notes below describe.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Settle-window parameters for [`crate::readiness::ReadinessDetector`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessConfig {
    /// Total observation time, in seconds.
    pub settle_seconds: f64,
    /// Sampling granularity within the settle window, in seconds.
    pub poll_interval_seconds: f64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            settle_seconds: 5.0,
            poll_interval_seconds: 0.5,
        }
    }
}

impl ReadinessConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("settle_seconds", self.settle_seconds)?;
        positive("poll_interval_seconds", self.poll_interval_seconds)?;
        if self.poll_interval_seconds > self.settle_seconds {
            return Err(ConfigError::IntervalExceedsSettle {
                interval: self.poll_interval_seconds,
                settle: self.settle_seconds,
            });
        }
        Ok(())
    }

    pub fn settle(&self) -> Duration {
        Duration::from_secs_f64(self.settle_seconds)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs_f64(self.poll_interval_seconds)
    }

    /// Number of sub-samples taken after the initial settle wait.
    pub fn sub_samples(&self) -> usize {
        (self.settle_seconds / self.poll_interval_seconds).floor().max(1.0) as usize
    }
}

/// Where signal files live and which of them count as candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub root: PathBuf,
    /// Extension without the leading dot, matched case-sensitively.
    pub extension: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("Plots"),
            extension: "txt".to_string(),
        }
    }
}

impl SourceConfig {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        Self {
            root: root.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extension.is_empty() {
            return Err(ConfigError::EmptyExtension);
        }
        Ok(())
    }
}

/// Ports scanned upward for the first free one. `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortRange {
    pub start: u16,
    pub end: u16,
}

impl Default for PortRange {
    fn default() -> Self {
        Self {
            start: 5000,
            end: 5100,
        }
    }
}

impl PortRange {
    pub fn single(port: u16) -> Self {
        Self {
            start: port,
            end: port.saturating_add(1),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start >= self.end {
            return Err(ConfigError::EmptyPortRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    pub fn ports(&self) -> std::ops::Range<u16> {
        self.start..self.end
    }
}

/// Poll loop parameters for the incremental client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub poll_interval_ms: u64,
    /// Maximum number of samples kept in the rendered window.
    pub max_window: usize,
    pub request_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            max_window: 1000,
            request_timeout_ms: 5000,
        }
    }
}

impl ClientConfig {
    /// A zero interval would turn the poll loop (and the browser shell's
    /// `setTimeout` loop) into a busy loop; a zero window renders nothing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("poll_interval_ms", self.poll_interval_ms as f64)?;
        positive("max_window", self.max_window as f64)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readiness_defaults() {
        let cfg = ReadinessConfig::default();
        assert_eq!(cfg.settle(), Duration::from_secs(5));
        assert_eq!(cfg.poll_interval(), Duration::from_millis(500));
        assert_eq!(cfg.sub_samples(), 10);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_readiness_rejects_bad_values() {
        let cfg = ReadinessConfig {
            settle_seconds: 0.0,
            poll_interval_seconds: 0.5,
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::NonPositive {
                field: "settle_seconds",
                value: 0.0
            })
        );

        let cfg = ReadinessConfig {
            settle_seconds: 1.0,
            poll_interval_seconds: 2.0,
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::IntervalExceedsSettle { .. })
        ));
    }

    #[test]
    fn test_readiness_partial_json_uses_defaults() {
        let cfg: ReadinessConfig = serde_json::from_str(r#"{"settle_seconds": 2.0}"#).unwrap();
        assert_eq!(cfg.settle_seconds, 2.0);
        assert_eq!(cfg.poll_interval_seconds, 0.5);
        assert_eq!(cfg.sub_samples(), 4);
    }

    #[test]
    fn test_source_config_strips_leading_dot() {
        let cfg = SourceConfig::new("/data", ".txt");
        assert_eq!(cfg.extension, "txt");
        assert!(SourceConfig::new("/data", "").validate().is_err());
    }

    #[test]
    fn test_port_range() {
        let range = PortRange::default();
        assert_eq!(range.ports().len(), 100);
        assert_eq!(PortRange::single(8080).ports().collect::<Vec<_>>(), vec![8080]);
        assert!(PortRange { start: 10, end: 10 }.validate().is_err());
    }

    #[test]
    fn test_client_config_rejects_zero_interval_and_window() {
        assert!(ClientConfig::default().validate().is_ok());

        let cfg = ClientConfig {
            poll_interval_ms: 0,
            ..ClientConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::NonPositive {
                field: "poll_interval_ms",
                value: 0.0
            })
        );

        let cfg = ClientConfig {
            max_window: 0,
            ..ClientConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::NonPositive {
                field: "max_window",
                value: 0.0
            })
        );
    }
}
