use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("target parameter is required")]
    EmptyTarget,

    #[error("failed to serialize result: {0}")]
    Serialize(#[from] serde_json::Error),
}
