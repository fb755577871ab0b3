use std::time::Duration;

use alloy_primitives::B256;
use godwoken_lib::error::ValidationError;
use jsonrpsee::types::ErrorObjectOwned;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure, malformed response or an error object returned by the node. Node side
    /// rejections (bad nonce, duplicate transaction, insufficient balance) arrive here verbatim.
    #[error("RPC call {method} failed: {source}")]
    Rpc {
        method: &'static str,
        #[source]
        source: jsonrpsee::core::ClientError,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("No account registered for script hash {script_hash}")]
    AccountNotFound { script_hash: B256 },

    #[error("Transaction {tx_hash} not settled after {attempts} attempts in {waited:?}")]
    Timeout {
        tx_hash: B256,
        attempts: u32,
        waited: Duration,
    },

    #[error("Invalid RPC endpoint: {0}")]
    InvalidEndpoint(String),
}

impl ClientError {
    pub(crate) fn rpc(method: &'static str) -> impl FnOnce(jsonrpsee::core::ClientError) -> Self {
        move |source| Self::Rpc { method, source }
    }

    /// Error object returned by the node, if the call reached it and was rejected.
    pub fn rpc_error_object(&self) -> Option<&ErrorObjectOwned> {
        match self {
            Self::Rpc {
                source: jsonrpsee::core::ClientError::Call(object),
                ..
            } => Some(object),
            _ => None,
        }
    }
}
