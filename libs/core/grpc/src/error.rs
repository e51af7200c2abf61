use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub type GrpcResult<T> = Result<T, GrpcError>;

/// Errors that can occur while building or opening a channel
#[derive(Error, Debug)]
pub enum GrpcError {
  /// Invalid URI handed to tonic
  #[error("Invalid URI: {0}")]
  InvalidUri(#[from] tonic::transport::Error),

  /// Endpoint could not be parsed from the configured address
  #[error("Invalid endpoint '{address}': {reason}")]
  InvalidEndpoint { address: String, reason: String },

  /// Failed to establish connection
  #[error("Connection failed: {0}")]
  ConnectionFailed(tonic::transport::Error),

  /// Connection timeout
  #[error("Connection timeout after {0:?}")]
  ConnectionTimeout(Duration),

  /// TLS could not be configured for a secure endpoint
  #[error("TLS configuration failed: {0}")]
  Tls(tonic::transport::Error),

  /// Invalid configuration
  #[error("Invalid configuration: {0}")]
  InvalidConfig(String),
}

/// Failure modes of a connection as seen by a single call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionKind {
  /// Server unreachable or connection dropped; transient
  Unavailable,
  /// The client's channel was closed locally
  Closed,
  InvalidEndpoint,
  Tls,
}

impl fmt::Display for ConnectionKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      ConnectionKind::Unavailable => "unavailable",
      ConnectionKind::Closed => "closed",
      ConnectionKind::InvalidEndpoint => "invalid endpoint",
      ConnectionKind::Tls => "tls",
    };
    f.write_str(name)
  }
}

/// Errors produced while turning wire bytes into typed values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
  /// Bytes are not a valid protobuf message
  #[error("malformed message: {0}")]
  Malformed(String),

  /// A field required by the typed model was absent
  #[error("missing field '{0}'")]
  MissingField(&'static str),

  /// A field was present but held a value the typed model rejects
  #[error("invalid value for '{field}': {details}")]
  InvalidValue { field: &'static str, details: String },

  /// The message uses a layout the configured schema version does not read
  #[error("schema version mismatch: {0}")]
  VersionMismatch(String),
}

impl From<prost::DecodeError> for DecodeError {
  fn from(err: prost::DecodeError) -> Self {
    DecodeError::Malformed(err.to_string())
  }
}

/// Error taxonomy for a single logical call
#[derive(Error, Debug, Clone)]
pub enum CallError {
  #[error("connection {kind}: {message}")]
  Connection { kind: ConnectionKind, message: String },

  #[error("deadline exceeded")]
  Timeout,

  #[error("call cancelled")]
  Cancelled,

  #[error(transparent)]
  Decode(#[from] DecodeError),

  #[error("rpc failed ({code:?}): {message}")]
  Rpc { code: tonic::Code, message: String },

  #[error("gave up after {attempts} attempts: {last}")]
  Exhausted { attempts: u32, last: Box<CallError> },
}

pub type CallResult<T> = Result<T, CallError>;

impl CallError {
  pub fn unavailable(message: impl Into<String>) -> Self {
    CallError::Connection {
      kind: ConnectionKind::Unavailable,
      message: message.into(),
    }
  }

  pub fn closed() -> Self {
    CallError::Connection {
      kind: ConnectionKind::Closed,
      message: "channel has been closed".to_string(),
    }
  }

  /// Only timeouts and unavailable connections are worth another attempt
  pub fn is_transient(&self) -> bool {
    matches!(
      self,
      CallError::Timeout
        | CallError::Connection {
          kind: ConnectionKind::Unavailable,
          ..
        }
    )
  }

  /// The gRPC status code this error corresponds to
  pub fn code(&self) -> tonic::Code {
    match self {
      CallError::Connection { .. } => tonic::Code::Unavailable,
      CallError::Timeout => tonic::Code::DeadlineExceeded,
      CallError::Cancelled => tonic::Code::Cancelled,
      CallError::Decode(_) => tonic::Code::Internal,
      CallError::Rpc { code, .. } => *code,
      CallError::Exhausted { last, .. } => last.code(),
    }
  }
}

impl From<tonic::Status> for CallError {
  fn from(status: tonic::Status) -> Self {
    match status.code() {
      tonic::Code::Unavailable => CallError::unavailable(status.message()),
      tonic::Code::DeadlineExceeded => CallError::Timeout,
      code => CallError::Rpc {
        code,
        message: status.message().to_string(),
      },
    }
  }
}

impl From<GrpcError> for CallError {
  fn from(err: GrpcError) -> Self {
    let kind = match err {
      GrpcError::InvalidUri(_) | GrpcError::InvalidEndpoint { .. } | GrpcError::InvalidConfig(_) => {
        ConnectionKind::InvalidEndpoint
      }
      GrpcError::ConnectionFailed(_) | GrpcError::ConnectionTimeout(_) => {
        ConnectionKind::Unavailable
      }
      GrpcError::Tls(_) => ConnectionKind::Tls,
    };
    CallError::Connection {
      kind,
      message: err.to_string(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_transient_classification() {
    assert!(CallError::Timeout.is_transient());
    assert!(CallError::unavailable("refused").is_transient());
    assert!(!CallError::closed().is_transient());
    assert!(!CallError::Cancelled.is_transient());
    assert!(
      !CallError::Rpc {
        code: tonic::Code::InvalidArgument,
        message: "bad".into()
      }
      .is_transient()
    );
    assert!(!CallError::Decode(DecodeError::MissingField("id")).is_transient());
  }

  #[test]
  fn test_status_mapping() {
    let err: CallError = tonic::Status::unavailable("connection reset").into();
    assert!(matches!(
      err,
      CallError::Connection {
        kind: ConnectionKind::Unavailable,
        ..
      }
    ));

    let err: CallError = tonic::Status::deadline_exceeded("slow").into();
    assert!(matches!(err, CallError::Timeout));

    let err: CallError = tonic::Status::not_found("no collection").into();
    match err {
      CallError::Rpc { code, message } => {
        assert_eq!(code, tonic::Code::NotFound);
        assert_eq!(message, "no collection");
      }
      other => panic!("unexpected error: {other:?}"),
    }
  }

  #[test]
  fn test_grpc_error_mapping() {
    let err: CallError = GrpcError::InvalidEndpoint {
      address: "nope".into(),
      reason: "missing port".into(),
    }
    .into();
    assert!(matches!(
      err,
      CallError::Connection {
        kind: ConnectionKind::InvalidEndpoint,
        ..
      }
    ));
    assert!(!err.is_transient());

    let err: CallError = GrpcError::ConnectionTimeout(Duration::from_secs(5)).into();
    assert!(err.is_transient());
  }

  #[test]
  fn test_exhausted_reports_last_code() {
    let err = CallError::Exhausted {
      attempts: 4,
      last: Box::new(CallError::unavailable("down")),
    };
    assert_eq!(err.code(), tonic::Code::Unavailable);
    assert!(!err.is_transient());
    assert!(err.to_string().contains("4 attempts"));
  }
}
