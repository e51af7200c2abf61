use tonic::{Request, Status};

/// Interceptor that tags every outgoing request with an `x-request-id`
///
/// The id is logged so client and server logs for one call can be joined.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingInterceptor;

impl TracingInterceptor {
    /// Create a new tracing interceptor
    pub fn new() -> Self {
        Self
    }
}

impl tonic::service::Interceptor for TracingInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        let request_id = uuid::Uuid::new_v4().to_string();

        request.metadata_mut().insert(
            "x-request-id",
            request_id
                .parse()
                .map_err(|_| Status::internal("Failed to create request ID"))?,
        );

        tracing::debug!(
            target: "grpc_client",
            request_id = %request_id,
            "Outgoing gRPC request"
        );

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::service::Interceptor;

    #[test]
    fn test_tracing_interceptor() {
        let mut tracing = TracingInterceptor::new();
        let req = tracing.call(Request::new(())).unwrap();
        let id_str = req.metadata().get("x-request-id").unwrap().to_str().unwrap();
        assert!(uuid::Uuid::parse_str(id_str).is_ok());
    }

    #[test]
    fn test_ids_are_unique_per_request() {
        let mut tracing = TracingInterceptor::new();
        let first = tracing.call(Request::new(())).unwrap();
        let second = tracing.call(Request::new(())).unwrap();
        assert_ne!(
            first.metadata().get("x-request-id"),
            second.metadata().get("x-request-id")
        );
    }
}
