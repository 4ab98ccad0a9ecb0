use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Failure modes of a single remote call. A failed call never tears down
/// the caller; the calling workflow step decides what to do with it.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("gateway returned error: {0}")]
    Remote(String),
    #[error("gateway call timed out")]
    Timeout,
    #[error("gateway channel closed")]
    ChannelClosed,
    #[error("transport error: {0}")]
    Transport(String),
}

/// Request/response calls over the shared gateway channel. One request per
/// call, one response per call, correlated by the transport.
#[async_trait]
pub trait GatewayRpc: Send + Sync {
    async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError>;
}
