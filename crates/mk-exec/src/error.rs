use std::{io, path::PathBuf, time::Duration};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("cancelled while waiting for an execution slot")]
    AdmissionCancelled,
    #[error("executor is shutting down; no new executions are admitted")]
    GateClosed,
    #[error("failed to start {}: {source}", program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("make execution timed out after {}s", timeout.as_secs_f64())]
    Timeout { timeout: Duration },
    #[error("make execution cancelled by caller")]
    Cancelled,
    #[error("make exited with non-zero code {code}")]
    NonZeroExit { code: i32 },
    #[error("make terminated by signal {}", signal.map_or_else(|| "unknown".to_string(), |s| s.to_string()))]
    Signaled { signal: Option<i32> },
    #[error("failed to wait for make: {0}")]
    Wait(#[source] io::Error),
    #[error("invalid executor config: {0}")]
    InvalidConfig(String),
}

/// Machine-readable class of an [`ExecError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    AdmissionCancelled,
    GateClosed,
    Launch,
    Timeout,
    Cancelled,
    NonZeroExit,
    Signaled,
    Wait,
    InvalidConfig,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::AdmissionCancelled => "admission_cancelled",
            FailureKind::GateClosed => "gate_closed",
            FailureKind::Launch => "launch",
            FailureKind::Timeout => "timeout",
            FailureKind::Cancelled => "cancelled",
            FailureKind::NonZeroExit => "non_zero_exit",
            FailureKind::Signaled => "signaled",
            FailureKind::Wait => "wait",
            FailureKind::InvalidConfig => "invalid_config",
        }
    }
}

impl ExecError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ExecError::AdmissionCancelled => FailureKind::AdmissionCancelled,
            ExecError::GateClosed => FailureKind::GateClosed,
            ExecError::Launch { .. } => FailureKind::Launch,
            ExecError::Timeout { .. } => FailureKind::Timeout,
            ExecError::Cancelled => FailureKind::Cancelled,
            ExecError::NonZeroExit { .. } => FailureKind::NonZeroExit,
            ExecError::Signaled { .. } => FailureKind::Signaled,
            ExecError::Wait(_) => FailureKind::Wait,
            ExecError::InvalidConfig(_) => FailureKind::InvalidConfig,
        }
    }

    /// Exit code to report alongside this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ExecError::NonZeroExit { code } => *code,
            _ => mk_model::EXIT_CODE_NONE,
        }
    }

    /// `true` when no process was ever started for the invocation.
    pub fn is_admission(&self) -> bool {
        matches!(self, ExecError::AdmissionCancelled | ExecError::GateClosed)
    }
}
