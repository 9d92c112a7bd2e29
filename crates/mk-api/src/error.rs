use mk_exec::ExecError;
use mk_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("unavailable: {0}")]
    Unavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ModelError> for ApiError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::EmptyTarget => ApiError::InvalidRequest(err.to_string()),
            ModelError::Serialize(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<ExecError> for ApiError {
    fn from(err: ExecError) -> Self {
        if err.is_admission() {
            ApiError::Unavailable(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

#[cfg(feature = "http")]
impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let status = match &self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(feature = "mcp")]
impl From<ApiError> for rmcp::ErrorData {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::InvalidRequest(msg) => rmcp::ErrorData::invalid_params(msg, None),
            ApiError::Unavailable(msg) | ApiError::Internal(msg) => {
                rmcp::ErrorData::internal_error(msg, None)
            }
        }
    }
}
