use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Exit code reported when the process never produced a real one.
pub const EXIT_CODE_NONE: i32 = -1;

/// Outcome of one invocation.
///
/// Always fully populated, including for failed, timed-out and cancelled runs.
/// `error` is empty if and only if `exit_code` is `0`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MakeResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Real exit code, or [`EXIT_CODE_NONE`] for timeout/cancel/launch failure.
    pub exit_code: i32,
    /// Wall-clock duration of the run in milliseconds.
    pub duration_ms: u64,
    /// Description of the terminal condition; empty on success.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
}

impl MakeResult {
    /// Result for an invocation that never launched a process.
    pub fn not_run(reason: impl Into<String>) -> Self {
        Self {
            exit_code: EXIT_CODE_NONE,
            error: reason.into(),
            ..Default::default()
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.exit_code == 0 && self.error.is_empty()
    }

    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
