use tonic::service::Interceptor;
use tonic::{Request, Status};

use super::{AuthInterceptor, MetricsInterceptor, TracingInterceptor};

/// Two interceptors run back to back
///
/// `first` sees the request before `next`; if `first` rejects it, `next`
/// never runs. Build one with [`InterceptorExt::then`].
#[derive(Clone, Debug)]
pub struct Chain<A, B> {
  first: A,
  next: B,
}

impl<A: Interceptor, B: Interceptor> Interceptor for Chain<A, B> {
  fn call(&mut self, request: Request<()>) -> Result<Request<()>, Status> {
    let request = self.first.call(request)?;
    self.next.call(request)
  }
}

/// `then` combinator for any tonic interceptor
pub trait InterceptorExt: Interceptor + Sized {
  fn then<B: Interceptor>(self, next: B) -> Chain<Self, B> {
    Chain { first: self, next }
  }
}

impl<T: Interceptor> InterceptorExt for T {}

/// Stack every transport call runs through: auth, then request id, then counting
pub type ClientInterceptor = Chain<AuthInterceptor, Chain<TracingInterceptor, MetricsInterceptor>>;

pub fn client_interceptor(
  auth: AuthInterceptor,
  tracing: TracingInterceptor,
  metrics: MetricsInterceptor,
) -> ClientInterceptor {
  auth.then(tracing.then(metrics))
}
