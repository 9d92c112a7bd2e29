use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use mk_exec::CancellationToken;
use mk_model::MakeResult;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::debug;

use crate::{
    error::ApiError,
    handler::{ApiHandler, MakeRequest},
};

/// HTTP API service builder.
pub struct HttpApi<H> {
    handler: Arc<H>,
}

impl<H> HttpApi<H>
where
    H: ApiHandler,
{
    /// Create new HTTP API with the given handler.
    pub fn new(handler: Arc<H>) -> Self {
        Self { handler }
    }

    /// Build axum router with mounted endpoints.
    ///
    /// Routes:
    /// - GET /health - Liveness probe
    /// - POST /api/v1/make - Run a make target
    ///
    /// Every request is traced; a panicking handler answers 500 instead of
    /// dropping the connection.
    pub fn router(self) -> Router {
        Router::new()
            .route("/health", get(health))
            .route("/api/v1/make", post(make::<H>))
            .with_state(self.handler)
            .layer(TraceLayer::new_for_http())
            .layer(CatchPanicLayer::new())
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health
async fn health() -> &'static str {
    "OK"
}

/// POST /api/v1/make
///
/// Failed invocations still answer 200 with the populated result; only
/// rejected requests map to an error status. A client that disconnects drops
/// this future, which kills the running process.
async fn make<H>(
    State(handler): State<Arc<H>>,
    Json(req): Json<MakeRequest>,
) -> Result<Json<MakeResult>, ApiError>
where
    H: ApiHandler,
{
    debug!(make_target = %req.target, "http: make requested");
    let run = handler.make(req, CancellationToken::new()).await?;
    Ok(Json(run.result))
}
