use std::{path::PathBuf, time::Duration};

use crate::error::ExecError;

/// Construction-time executor settings; read-only afterwards.
#[derive(Clone, Debug)]
pub struct ExecutorConfig {
    /// Build tool binary, resolved through `PATH` when not absolute.
    pub program: PathBuf,
    /// Working directory used when a request does not name one.
    pub workdir: PathBuf,
    /// Fixed per-invocation timeout.
    pub timeout: Duration,
    /// Maximum number of simultaneous invocations.
    pub max_concurrent: usize,
    /// Time between SIGTERM and SIGKILL when a run is cut off.
    pub kill_grace: Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("make"),
            workdir: PathBuf::from("."),
            timeout: Duration::from_secs(120),
            max_concurrent: 4,
            kill_grace: Duration::from_millis(200),
        }
    }
}

impl ExecutorConfig {
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_workdir(mut self, workdir: impl Into<PathBuf>) -> Self {
        self.workdir = workdir.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    pub fn validate(&self) -> Result<(), ExecError> {
        if self.program.as_os_str().is_empty() {
            return Err(ExecError::InvalidConfig("program is empty".into()));
        }
        if self.timeout.is_zero() {
            return Err(ExecError::InvalidConfig("timeout must be positive".into()));
        }
        if self.max_concurrent == 0 {
            return Err(ExecError::InvalidConfig(
                "max_concurrent must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = ExecutorConfig::default();
        assert_eq!(cfg.program, PathBuf::from("make"));
        assert_eq!(cfg.workdir, PathBuf::from("."));
        assert_eq!(cfg.timeout, Duration::from_secs(120));
        assert_eq!(cfg.max_concurrent, 4);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_zero_capacity_and_timeout() {
        let cfg = ExecutorConfig::default().with_max_concurrent(0);
        assert!(matches!(cfg.validate(), Err(ExecError::InvalidConfig(_))));

        let cfg = ExecutorConfig::default().with_timeout(Duration::ZERO);
        assert!(matches!(cfg.validate(), Err(ExecError::InvalidConfig(_))));

        let cfg = ExecutorConfig::default().with_program("");
        assert!(matches!(cfg.validate(), Err(ExecError::InvalidConfig(_))));
    }
}
