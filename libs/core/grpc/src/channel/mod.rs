pub mod config;
pub mod endpoint;

pub use config::ChannelConfig;
pub use endpoint::{Endpoint, TransportSecurity};

use std::sync::{PoisonError, RwLock};

use crate::error::{CallError, GrpcError, GrpcResult};
use crate::retry::RetryConfig;
use tonic::transport::{Channel, ClientTlsConfig};

/// The one HTTP/2 channel a client owns.
///
/// HTTP/2 multiplexes concurrent calls over a single connection, so there is
/// no pool. After [`close`](Self::close) every new call fails with
/// `Connection(Closed)`; calls already in flight keep their clone of the
/// channel and finish normally.
#[derive(Debug)]
pub struct ManagedChannel {
  endpoint: Endpoint,
  inner: RwLock<Option<Channel>>,
}

impl ManagedChannel {
  /// Connect to `endpoint`, or return immediately when `config.lazy` is set
  ///
  /// ## Example
  /// ```ignore
  /// use grpc_client::{ChannelConfig, Endpoint, ManagedChannel};
  ///
  /// let endpoint = Endpoint::parse("http://localhost:6334")?;
  /// let channel = ManagedChannel::open(endpoint, ChannelConfig::default()).await?;
  /// ```
  pub async fn open(endpoint: Endpoint, config: ChannelConfig) -> GrpcResult<Self> {
    let tonic_endpoint = build_endpoint(&endpoint, &config)?;

    let channel = if config.lazy {
      tracing::debug!(
        target: "grpc_client",
        addr = %endpoint,
        "Creating lazy gRPC channel (connects on first request)"
      );
      tonic_endpoint.connect_lazy()
    } else {
      tracing::debug!(target: "grpc_client", addr = %endpoint, "Creating gRPC channel");
      match tokio::time::timeout(config.connect_timeout, tonic_endpoint.connect()).await {
        Ok(Ok(channel)) => channel,
        Ok(Err(e)) => {
          tracing::error!(
            target: "grpc_client",
            addr = %endpoint,
            error = ?e,
            "Failed to connect to gRPC service"
          );
          return Err(GrpcError::ConnectionFailed(e));
        }
        Err(_) => {
          tracing::error!(target: "grpc_client", addr = %endpoint, "Connection attempt timed out");
          return Err(GrpcError::ConnectionTimeout(config.connect_timeout));
        }
      }
    };

    Ok(Self::from_channel(endpoint, channel))
  }

  /// Open with exponential backoff
  ///
  /// `None` uses the default retry configuration (3 retries).
  pub async fn open_with_retry(
    endpoint: Endpoint,
    config: ChannelConfig,
    retry_config: Option<RetryConfig>,
  ) -> GrpcResult<Self> {
    let attempt = || {
      let endpoint = endpoint.clone();
      let config = config.clone();
      async move { Self::open(endpoint, config).await }
    };

    match retry_config {
      Some(retry_config) => crate::retry::retry_with_backoff(attempt, retry_config).await,
      None => crate::retry::retry(attempt).await,
    }
  }

  /// Wrap an already built tonic channel
  pub fn from_channel(endpoint: Endpoint, channel: Channel) -> Self {
    Self {
      endpoint,
      inner: RwLock::new(Some(channel)),
    }
  }

  pub fn endpoint(&self) -> &Endpoint {
    &self.endpoint
  }

  /// A handle for one call, or `Connection(Closed)` after close
  pub fn channel(&self) -> Result<Channel, CallError> {
    self
      .inner
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .clone()
      .ok_or_else(CallError::closed)
  }

  /// Release the channel. Returns `true` only for the call that closed it.
  pub fn close(&self) -> bool {
    let closed = self
      .inner
      .write()
      .unwrap_or_else(PoisonError::into_inner)
      .take()
      .is_some();
    if closed {
      tracing::debug!(target: "grpc_client", addr = %self.endpoint, "Channel closed");
    }
    closed
  }

  pub fn is_closed(&self) -> bool {
    self
      .inner
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .is_none()
  }
}

fn build_endpoint(
  endpoint: &Endpoint,
  config: &ChannelConfig,
) -> GrpcResult<tonic::transport::Endpoint> {
  let uri = endpoint.uri();
  let tonic_endpoint = tonic::transport::Endpoint::from_shared(uri.clone()).map_err(|e| {
    tracing::error!(target: "grpc_client", addr = %uri, error = ?e, "Invalid URI");
    GrpcError::InvalidUri(e)
  })?;

  let tonic_endpoint = config.apply_to_endpoint(tonic_endpoint);

  if endpoint.is_secure() {
    let tls = ClientTlsConfig::new()
      .with_enabled_roots()
      .domain_name(endpoint.domain_name());
    tonic_endpoint.tls_config(tls).map_err(GrpcError::Tls)
  } else {
    Ok(tonic_endpoint)
  }
}
