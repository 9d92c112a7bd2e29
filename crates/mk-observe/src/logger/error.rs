use thiserror::Error;

/// Failures while installing the global log subscriber.
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("unknown log format {0:?} (expected text, json or journald)")]
    UnknownFormat(String),
    #[error("journald logging needs linux and the `journald` feature")]
    JournaldUnavailable,
    #[error("invalid log filter {0:?}")]
    InvalidFilter(String),
    #[error("a global logger is already installed")]
    AlreadyInstalled,
    #[error("logger setup failed: {0}")]
    Setup(String),
}
