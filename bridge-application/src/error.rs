use thiserror::Error;

use bridge_domain::RpcError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("gateway call failed: {0}")]
    Rpc(#[from] RpcError),
    #[error("malformed gateway response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
