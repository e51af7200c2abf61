use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::uri::PathAndQuery;
use tonic::client::Grpc;
use tonic::service::interceptor::InterceptedService;

use crate::channel::{ChannelConfig, Endpoint, ManagedChannel};
use crate::client::ClientOptions;
use crate::codec::RawCodec;
use crate::dispatcher::{MethodDescriptor, Transport};
use crate::error::{CallError, CallResult, GrpcResult};
use crate::interceptors::{
  AuthInterceptor, ClientInterceptor, MetricsInterceptor, TracingInterceptor, client_interceptor,
};

/// [`Transport`] over a real tonic channel
///
/// Every call clones the channel handle, wraps it in the interceptor stack
/// and sends the raw payload through [`RawCodec`].
#[derive(Debug)]
pub struct GrpcTransport {
  channel: ManagedChannel,
  interceptor: ClientInterceptor,
  metrics: MetricsInterceptor,
  options: ClientOptions,
}

impl GrpcTransport {
  pub fn new(channel: ManagedChannel, auth: AuthInterceptor, options: ClientOptions) -> Self {
    let metrics = MetricsInterceptor::new();
    let interceptor = client_interceptor(auth, TracingInterceptor::new(), metrics.clone());
    Self {
      channel,
      interceptor,
      metrics,
      options,
    }
  }

  /// Open a channel to `endpoint` and wrap it
  pub async fn connect(
    endpoint: Endpoint,
    config: ChannelConfig,
    auth: AuthInterceptor,
    options: ClientOptions,
  ) -> GrpcResult<Self> {
    let channel = ManagedChannel::open(endpoint, config).await?;
    Ok(Self::new(channel, auth, options))
  }

  pub fn endpoint(&self) -> &Endpoint {
    self.channel.endpoint()
  }

  /// Requests that made it through the interceptor stack
  pub fn requests_sent(&self) -> u64 {
    self.metrics.total_requests()
  }
}

#[async_trait]
impl Transport for GrpcTransport {
  async fn unary(
    &self,
    method: &MethodDescriptor,
    payload: Bytes,
    timeout: Option<Duration>,
  ) -> CallResult<Bytes> {
    let channel = self.channel.channel()?;
    let service = InterceptedService::new(channel, self.interceptor.clone());
    let mut grpc = self.options.apply(Grpc::new(service));

    grpc.ready().await.map_err(|e| {
      let err: tonic::codegen::StdError = e.into();
      CallError::unavailable(format!("service was not ready: {err}"))
    })?;

    let mut request = tonic::Request::new(payload);
    if let Some(timeout) = timeout {
      request.set_timeout(timeout);
    }

    let path = PathAndQuery::from_static(method.path);
    let response = grpc.unary(request, path, RawCodec).await?;
    Ok(response.into_inner())
  }

  fn close(&self) -> bool {
    self.channel.close()
  }

  fn is_closed(&self) -> bool {
    self.channel.is_closed()
  }
}
