use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tonic::{Request, Status};

/// Counts outgoing requests
///
/// Clones share one counter, so the count survives tonic cloning the
/// interceptor for every call.
///
/// # Example
/// ```ignore
/// use grpc_client::interceptors::MetricsInterceptor;
///
/// let metrics = MetricsInterceptor::new();
/// let transport = GrpcTransport::new(channel, auth, metrics.clone(), options);
///
/// // Later, check metrics
/// println!("Total requests: {}", metrics.total_requests());
/// ```
#[derive(Debug, Default, Clone)]
pub struct MetricsInterceptor {
    total_requests: Arc<AtomicU64>,
}

impl MetricsInterceptor {
    /// Create a new metrics interceptor
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the total number of requests processed
    pub fn total_requests(&self) -> u64 {
        self.total_requests.load(Ordering::Relaxed)
    }
}

impl tonic::service::Interceptor for MetricsInterceptor {
    fn call(&mut self, request: Request<()>) -> Result<Request<()>, Status> {
        let count = self.total_requests.fetch_add(1, Ordering::Relaxed) + 1;

        tracing::trace!(
            target: "grpc_client",
            count,
            "gRPC request metrics"
        );

        Ok(request)
    }
}
