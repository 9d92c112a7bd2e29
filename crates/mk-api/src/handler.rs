use async_trait::async_trait;
use mk_exec::{CancellationToken, Execution};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Front-end request shape: `target` is required, the rest optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MakeRequest {
    #[serde(default)]
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workdir: Option<String>,
}

/// Make execution API handler.
///
/// Transports (HTTP, MCP) call through this trait so the backend can be swapped
/// or wrapped (auth, rate limiting, fakes in tests).
#[async_trait]
pub trait ApiHandler: Send + Sync + 'static {
    /// Validate and run one invocation.
    ///
    /// Cancelling `cancel` stops the wait for a slot or the running process.
    /// `Ok` carries the structured result even when the invocation failed;
    /// `Err` means nothing was run.
    async fn make(
        &self,
        request: MakeRequest,
        cancel: CancellationToken,
    ) -> Result<Execution, ApiError>;
}
