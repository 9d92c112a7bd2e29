//! MCP tool front-end.
//!
//! Exposes a single `make` tool over any rmcp transport (stdio in the server binary).

use std::sync::Arc;

use mk_exec::CancellationToken;
use mk_model::MakeResult;
use rmcp::ErrorData as McpError;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    SetLevelRequestParam,
};
use rmcp::schemars::{self, JsonSchema};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{tool, tool_handler, tool_router};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    error::ApiError,
    handler::{ApiHandler, MakeRequest},
};

/// `make` tool input schema.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MakeInput {
    /// Make target to execute.
    #[schemars(description = "Make target to execute")]
    pub target: String,

    /// Path to the Makefile.
    #[schemars(description = "Path to Makefile (optional)")]
    pub file: Option<String>,

    /// Working directory.
    #[schemars(description = "Working directory for make execution (optional)")]
    pub workdir: Option<String>,
}

impl From<MakeInput> for MakeRequest {
    fn from(input: MakeInput) -> Self {
        Self {
            target: input.target,
            file: input.file,
            workdir: input.workdir,
        }
    }
}

/// MCP server handler exposing the `make` tool.
#[derive(Clone)]
pub struct MakeServerHandler {
    handler: Arc<dyn ApiHandler>,
    tool_router: ToolRouter<Self>,
}

impl MakeServerHandler {
    pub fn new(handler: Arc<dyn ApiHandler>) -> Self {
        Self {
            handler,
            tool_router: Self::tool_router(),
        }
    }

    /// Run one `make` call; `cancel` is the client's per-request token.
    async fn run(
        &self,
        input: MakeInput,
        cancel: CancellationToken,
    ) -> Result<CallToolResult, McpError> {
        debug!(?input, "make tool called");

        if input.target.is_empty() {
            return Err(McpError::invalid_params("target parameter is required", None));
        }

        match self.handler.make(MakeRequest::from(input), cancel).await {
            Ok(run) => tool_result(&run.result, run.is_success()),
            Err(ApiError::Unavailable(reason)) => tool_result(&MakeResult::not_run(reason), false),
            Err(err) => Err(err.into()),
        }
    }
}

#[tool_router]
impl MakeServerHandler {
    /// Run one make target and return the JSON-encoded result.
    #[tool(description = "Execute make command on a Makefile")]
    async fn make(
        &self,
        input: Parameters<MakeInput>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.run(input.0, context.ct).await
    }
}

/// Encode `result` as text content; failures are flagged `is_error`.
fn tool_result(result: &MakeResult, ok: bool) -> Result<CallToolResult, McpError> {
    let json = result
        .to_json_pretty()
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;

    if ok {
        Ok(CallToolResult::success(vec![Content::text(json)]))
    } else {
        Ok(CallToolResult::error(vec![Content::text(json)]))
    }
}

#[tool_handler]
impl rmcp::ServerHandler for MakeServerHandler {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_logging()
                .build(),
            server_info: Implementation {
                name: "mcp-server-make".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Implementation::from_build_env()
            },
            instructions: Some(
                "Runs make targets with bounded concurrency and a fixed timeout.\n\n\
                 Tool:\n\
                 • make: target (required), file (Makefile path, optional), workdir (optional)\n\n\
                 The result is JSON with stdout, stderr, exit_code, duration_ms and error."
                    .to_string(),
            ),
        }
    }

    async fn set_level(
        &self,
        request: SetLevelRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<(), McpError> {
        info!(level = ?request.level, "client requested log level");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use mk_exec::{ExecError, Execution};
    use rmcp::model::RawContent;

    use super::*;

    struct Scripted;

    #[async_trait]
    impl ApiHandler for Scripted {
        async fn make(
            &self,
            request: MakeRequest,
            cancel: CancellationToken,
        ) -> Result<Execution, ApiError> {
            match request.target.as_str() {
                "closed" => Err(ExecError::GateClosed.into()),
                "watch" => {
                    cancel.cancelled().await;
                    Ok(Execution {
                        result: MakeResult::not_run(ExecError::Cancelled.to_string()),
                        error: Some(ExecError::Cancelled),
                    })
                }
                "slow" => Ok(Execution {
                    result: MakeResult {
                        exit_code: -1,
                        duration_ms: 120_000,
                        error: "make execution timed out after 120s".into(),
                        ..Default::default()
                    },
                    error: Some(ExecError::Timeout {
                        timeout: std::time::Duration::from_secs(120),
                    }),
                }),
                _ => Ok(Execution {
                    result: MakeResult {
                        stdout: "ok\n".into(),
                        duration_ms: 3,
                        ..Default::default()
                    },
                    error: None,
                }),
            }
        }
    }

    fn handler() -> MakeServerHandler {
        MakeServerHandler::new(Arc::new(Scripted))
    }

    fn input(target: &str) -> MakeInput {
        MakeInput {
            target: target.to_string(),
            file: None,
            workdir: None,
        }
    }

    async fn call(target: &str) -> Result<CallToolResult, McpError> {
        handler().run(input(target), CancellationToken::new()).await
    }

    fn text(result: &CallToolResult) -> serde_json::Value {
        if let RawContent::Text(text) = &result.content[0].raw {
            serde_json::from_str(&text.text).unwrap()
        } else {
            panic!("Expected text content");
        }
    }

    #[test]
    fn test_get_info() {
        use rmcp::ServerHandler;

        let info = handler().get_info();
        assert_eq!(info.server_info.name, "mcp-server-make");
        assert!(info.instructions.unwrap().contains("make"));
    }

    #[tokio::test]
    async fn success_is_plain_result() {
        let result = call("all").await.unwrap();
        assert!(!result.is_error.unwrap_or(false));

        let json = text(&result);
        assert_eq!(json["stdout"], "ok\n");
        assert_eq!(json["exit_code"], 0);
    }

    #[tokio::test]
    async fn timeout_is_flagged_error_with_result() {
        let result = call("slow").await.unwrap();
        assert_eq!(result.is_error, Some(true));

        let json = text(&result);
        assert_eq!(json["exit_code"], -1);
        assert_eq!(json["error"], "make execution timed out after 120s");
    }

    #[tokio::test]
    async fn empty_target_is_invalid_params() {
        let err = call("").await.unwrap_err();
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn whitespace_target_reaches_handler() {
        let result = call("   ").await.unwrap();
        assert!(!result.is_error.unwrap_or(false));
    }

    #[tokio::test]
    async fn request_token_reaches_handler() {
        let cancel = CancellationToken::new();
        let call = {
            let cancel = cancel.clone();
            tokio::spawn(async move { handler().run(input("watch"), cancel).await })
        };
        cancel.cancel();

        let result = call.await.unwrap().unwrap();
        assert_eq!(result.is_error, Some(true));
        assert_eq!(text(&result)["error"], "make execution cancelled by caller");
    }

    #[test]
    fn logging_capability_is_advertised() {
        use rmcp::ServerHandler;

        assert!(handler().get_info().capabilities.logging.is_some());
    }

    #[tokio::test]
    async fn admission_failure_returns_not_run_result() {
        let result = call("closed").await.unwrap();
        assert_eq!(result.is_error, Some(true));

        let json = text(&result);
        assert_eq!(json["exit_code"], -1);
        assert!(json["error"].as_str().unwrap().contains("shutting down"));
    }
}
