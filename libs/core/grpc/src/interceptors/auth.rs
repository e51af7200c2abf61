use tonic::metadata::{AsciiMetadataKey, AsciiMetadataValue};
use tonic::{Request, Status};

/// Interceptor for injecting authentication headers
///
/// Qdrant expects its key in an `api-key` header; other deployments sit
/// behind a proxy that wants `authorization: Bearer ...`. Both are covered,
/// and an anonymous interceptor leaves requests untouched.
///
/// # Example
/// ```ignore
/// use grpc_client::interceptors::AuthInterceptor;
///
/// let auth = AuthInterceptor::api_key("my-api-key-12345")?;
/// ```
#[derive(Clone, Debug, Default)]
pub struct AuthInterceptor {
    credentials: Option<(AsciiMetadataKey, AsciiMetadataValue)>,
}

impl AuthInterceptor {
    /// No credentials attached
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Send the key in the `api-key` header
    pub fn api_key(key: impl AsRef<str>) -> Result<Self, Status> {
        Self::header("api-key", key.as_ref())
    }

    /// Create an interceptor with a Bearer token (OAuth 2.0 / JWT)
    pub fn bearer(token: impl AsRef<str>) -> Result<Self, Status> {
        Self::header("authorization", &format!("Bearer {}", token.as_ref()))
    }

    /// `api_key` when a key is configured, otherwise anonymous
    pub fn from_optional_api_key(key: Option<&str>) -> Result<Self, Status> {
        match key {
            Some(key) if !key.is_empty() => Self::api_key(key),
            _ => Ok(Self::anonymous()),
        }
    }

    fn header(name: &'static str, value: &str) -> Result<Self, Status> {
        let value = value
            .parse()
            .map_err(|_| Status::invalid_argument("Invalid auth header value"))?;
        Ok(Self {
            credentials: Some((AsciiMetadataKey::from_static(name), value)),
        })
    }

    pub fn is_anonymous(&self) -> bool {
        self.credentials.is_none()
    }
}

impl tonic::service::Interceptor for AuthInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        if let Some((name, value)) = &self.credentials {
            request.metadata_mut().insert(name.clone(), value.clone());
        }
        Ok(request)
    }
}
