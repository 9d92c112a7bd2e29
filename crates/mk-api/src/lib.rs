mod error;
pub use error::ApiError;

mod handler;
pub use handler::{ApiHandler, MakeRequest};

mod adapter;
pub use adapter::ExecutorAdapter;

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::HttpApi;

#[cfg(feature = "http")]
pub use axum;

#[cfg(feature = "mcp")]
mod mcp;

#[cfg(feature = "mcp")]
pub use mcp::{MakeInput, MakeServerHandler};

#[cfg(feature = "mcp")]
pub use rmcp;
