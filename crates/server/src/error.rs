// crates/server/src/error.rs
use thiserror::Error;

/// Fatal startup errors. Everything that can go wrong while serving `/data`
/// degrades to a sentinel label instead.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("No free port in range {start}..{end}")]
    NoFreePort { start: u16, end: u16 },

    #[error("Invalid configuration: {0}")]
    Config(#[from] signal_view_core::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for server startup
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_display() {
        let err = ServerError::NoFreePort {
            start: 5000,
            end: 5100,
        };
        assert_eq!(err.to_string(), "No free port in range 5000..5100");
    }

    #[test]
    fn test_server_error_from_config_error() {
        let err: ServerError = signal_view_core::ConfigError::EmptyExtension.into();
        assert!(matches!(err, ServerError::Config(_)));
        assert!(err.to_string().contains("extension"));
    }
}
