use core_config::ConfigError;
use grpc_client::{CallError, DecodeError, GrpcError};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum VectorError {
    /// Transport, deadline, cancellation, server or decode failure
    #[error(transparent)]
    Call(#[from] CallError),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type VectorResult<T> = Result<T, VectorError>;

impl VectorError {
    /// The underlying call error, unwrapping retry exhaustion
    pub fn call_error(&self) -> Option<&CallError> {
        match self {
            VectorError::Call(CallError::Exhausted { last, .. }) => Some(last),
            VectorError::Call(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DecodeError> for VectorError {
    fn from(err: DecodeError) -> Self {
        VectorError::Call(CallError::Decode(err))
    }
}

impl From<GrpcError> for VectorError {
    fn from(err: GrpcError) -> Self {
        VectorError::Call(err.into())
    }
}

impl From<ConfigError> for VectorError {
    fn from(err: ConfigError) -> Self {
        VectorError::Config(err.to_string())
    }
}
