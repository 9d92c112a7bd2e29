use std::sync::Arc;

use async_trait::async_trait;
use mk_exec::{CancellationToken, ExecError, Execution, Executor};
use mk_model::MakeParams;
use tracing::{debug, error};

use crate::{
    error::ApiError,
    handler::{ApiHandler, MakeRequest},
};

/// Adapter that bridges [`Executor`] to [`ApiHandler`].
///
/// Each call is cancelled by whichever fires first: the caller's token or the
/// server-wide `shutdown` token.
pub struct ExecutorAdapter {
    executor: Arc<Executor>,
    shutdown: CancellationToken,
}

impl ExecutorAdapter {
    pub fn new(executor: Arc<Executor>, shutdown: CancellationToken) -> Self {
        Self { executor, shutdown }
    }

    pub fn executor(&self) -> &Arc<Executor> {
        &self.executor
    }

    /// Run `params` under a child of `shutdown`, forwarding `caller` into it.
    async fn execute(
        &self,
        params: &MakeParams,
        caller: &CancellationToken,
    ) -> Result<Execution, ExecError> {
        let cancel = self.shutdown.child_token();
        let run = self.executor.execute(params, &cancel);
        tokio::pin!(run);

        tokio::select! {
            biased;
            res = &mut run => res,
            _ = caller.cancelled() => {
                cancel.cancel();
                run.await
            }
        }
    }
}

#[async_trait]
impl ApiHandler for ExecutorAdapter {
    async fn make(
        &self,
        request: MakeRequest,
        cancel: CancellationToken,
    ) -> Result<Execution, ApiError> {
        debug!(?request, "make requested");
        let params = MakeParams::from_parts(request.target, request.file, request.workdir)?;

        let run = self.execute(&params, &cancel).await?;

        if let Some(err) = &run.error {
            error!(error = %err, kind = err.kind().as_str(), "make execution failed");
        }
        Ok(run)
    }
}
