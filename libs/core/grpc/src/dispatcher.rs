//! Single-call execution with deadlines and cancellation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{CallError, CallResult};

/// Full gRPC path of a method plus whether repeating it is harmless
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodDescriptor {
  pub path: &'static str,
  pub idempotent: bool,
}

impl MethodDescriptor {
  pub const fn idempotent(path: &'static str) -> Self {
    Self {
      path,
      idempotent: true,
    }
  }

  pub const fn non_idempotent(path: &'static str) -> Self {
    Self {
      path,
      idempotent: false,
    }
  }
}

/// Per-call overrides supplied by the caller
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
  /// Replaces the dispatcher's default timeout for each attempt
  pub timeout: Option<Duration>,
  pub cancel: Option<CancellationToken>,
  /// Allow retries even when the method is not idempotent
  pub retry_unsafe: bool,
}

impl CallOptions {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = Some(timeout);
    self
  }

  pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
    self.cancel = Some(token);
    self
  }

  pub fn retry_unsafe(mut self) -> Self {
    self.retry_unsafe = true;
    self
  }
}

/// One invocation: what to call, with which bytes, until when
#[derive(Debug, Clone)]
pub struct Call {
  pub method: MethodDescriptor,
  pub payload: Bytes,
  pub deadline: Instant,
  pub cancel: CancellationToken,
}

impl Call {
  pub fn new(method: MethodDescriptor, payload: Bytes, timeout: Duration) -> Self {
    Self {
      method,
      payload,
      deadline: Instant::now() + timeout,
      cancel: CancellationToken::new(),
    }
  }

  pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
    self.cancel = token;
    self
  }
}

/// Moves serialized request bytes to the server and back.
///
/// `timeout` is the time left before the call's deadline; implementations
/// forward it to the server.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
  async fn unary(
    &self,
    method: &MethodDescriptor,
    payload: Bytes,
    timeout: Option<Duration>,
  ) -> CallResult<Bytes>;

  /// Release the underlying connection. Returns whether this call did it.
  fn close(&self) -> bool;

  fn is_closed(&self) -> bool;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
  async fn unary(
    &self,
    method: &MethodDescriptor,
    payload: Bytes,
    timeout: Option<Duration>,
  ) -> CallResult<Bytes> {
    (**self).unary(method, payload, timeout).await
  }

  fn close(&self) -> bool {
    (**self).close()
  }

  fn is_closed(&self) -> bool {
    (**self).is_closed()
  }
}

/// Runs calls against a transport, enforcing deadline and cancellation locally
#[derive(Debug, Clone)]
pub struct CallDispatcher<T> {
  transport: T,
  default_timeout: Duration,
}

impl<T: Transport> CallDispatcher<T> {
  pub fn new(transport: T, default_timeout: Duration) -> Self {
    Self {
      transport,
      default_timeout,
    }
  }

  pub fn transport(&self) -> &T {
    &self.transport
  }

  pub fn default_timeout(&self) -> Duration {
    self.default_timeout
  }

  /// Build a [`Call`] from options and invoke it
  pub async fn call(
    &self,
    method: MethodDescriptor,
    payload: Bytes,
    options: &CallOptions,
  ) -> CallResult<Bytes> {
    let timeout = options.timeout.unwrap_or(self.default_timeout);
    let mut call = Call::new(method, payload, timeout);
    if let Some(token) = &options.cancel {
      call = call.with_cancellation(token.clone());
    }
    self.invoke(&call).await
  }

  /// Execute one call.
  ///
  /// Cancellation wins over everything, then the deadline. A response that
  /// lands after either is dropped.
  pub async fn invoke(&self, call: &Call) -> CallResult<Bytes> {
    if call.cancel.is_cancelled() {
      return Err(CallError::Cancelled);
    }
    let now = Instant::now();
    if now >= call.deadline {
      return Err(CallError::Timeout);
    }
    if self.transport.is_closed() {
      return Err(CallError::closed());
    }

    let remaining = call.deadline - now;
    tracing::trace!(
      target: "grpc_client",
      method = call.method.path,
      bytes = call.payload.len(),
      timeout_ms = remaining.as_millis() as u64,
      "Dispatching call"
    );

    let response = self
      .transport
      .unary(&call.method, call.payload.clone(), Some(remaining));

    let result = tokio::select! {
      biased;
      _ = call.cancel.cancelled() => Err(CallError::Cancelled),
      _ = tokio::time::sleep_until(call.deadline) => Err(CallError::Timeout),
      result = response => result,
    };

    match result {
      Ok(_) if call.cancel.is_cancelled() => Err(CallError::Cancelled),
      Ok(_) if Instant::now() >= call.deadline => {
        tracing::debug!(
          target: "grpc_client",
          method = call.method.path,
          "Discarding response that arrived after the deadline"
        );
        Err(CallError::Timeout)
      }
      Err(CallError::Timeout) => {
        tracing::debug!(target: "grpc_client", method = call.method.path, "Call timed out");
        Err(CallError::Timeout)
      }
      other => other,
    }
  }

  pub fn close(&self) -> bool {
    self.transport.close()
  }
}
