use async_trait::async_trait;
use axum::{extract::Request, response::Response};

mod http_proxy;

pub use http_proxy::HttpObjectProxy;

use crate::domain::value_objects::BackendTarget;

/// Error types for proxy operations
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("Invalid backend target: {url}")]
    InvalidTarget { url: String },

    #[error("Failed to build object storage client: {message}")]
    Client { message: String },

    #[error("Object storage request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Failed to build proxied response: {message}")]
    Response { message: String },
}

/// Pass-through access to the object store
#[async_trait]
pub trait ObjectProxy: Send + Sync {
    /// Forward `request` to `target` and stream the backend response back
    async fn forward(&self, target: &BackendTarget, request: Request) -> Result<Response, ProxyError>;
}
