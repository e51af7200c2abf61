use std::str::FromStr;
use std::time::Duration;

use core_config::{ConfigError, FromEnv, env_flag, env_or_default, env_parse};
use grpc_client::{
    AuthInterceptor, ChannelConfig, ClientOptions, Compression, Endpoint, RetryConfig, TransportSecurity,
};

use crate::codec::SchemaVersion;
use crate::error::{VectorError, VectorResult};

pub const DEFAULT_URL: &str = "http://localhost:6334";
pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const DEFAULT_SOFT_DELETE_THRESHOLD: u64 = 500;

/// How the api key is presented to the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthScheme {
    /// `api-key: <key>`, what Qdrant itself expects
    #[default]
    ApiKey,
    /// `authorization: Bearer <key>`, for deployments behind an auth proxy
    Bearer,
}

impl FromStr for AuthScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "api-key" | "api_key" | "apikey" => Ok(AuthScheme::ApiKey),
            "bearer" => Ok(AuthScheme::Bearer),
            other => Err(format!("unknown auth scheme '{other}' (expected api-key or bearer)")),
        }
    }
}

/// Qdrant connection configuration
#[derive(Debug, Clone, PartialEq)]
pub struct QdrantConfig {
    pub url: String,
    /// Force TLS even when the URL scheme is `http`
    pub secure: bool,
    pub api_key: Option<String>,
    pub auth_scheme: AuthScheme,
    /// Per-attempt deadline
    pub timeout_ms: u64,
    pub connect_timeout_ms: u64,
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub schema_version: SchemaVersion,
    /// Points per upsert call in batch uploads
    pub batch_size: usize,
    /// Soft-deleted points tolerated before they are purged
    pub soft_delete_threshold: u64,
    pub compression: Compression,
    pub lazy_connect: bool,
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            secure: false,
            api_key: None,
            auth_scheme: AuthScheme::ApiKey,
            timeout_ms: 30_000,
            connect_timeout_ms: 5_000,
            max_retries: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 5_000,
            schema_version: SchemaVersion::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            soft_delete_threshold: DEFAULT_SOFT_DELETE_THRESHOLD,
            compression: Compression::None,
            lazy_connect: false,
        }
    }
}

impl QdrantConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_auth_scheme(mut self, scheme: AuthScheme) -> Self {
        self.auth_scheme = scheme;
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_backoff(mut self, initial_ms: u64, max_ms: u64) -> Self {
        self.initial_backoff_ms = initial_ms;
        self.max_backoff_ms = max_ms;
        self
    }

    pub fn with_schema_version(mut self, schema: SchemaVersion) -> Self {
        self.schema_version = schema;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_soft_delete_threshold(mut self, threshold: u64) -> Self {
        self.soft_delete_threshold = threshold;
        self
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Defer connecting until the first call
    pub fn lazy(mut self) -> Self {
        self.lazy_connect = true;
        self
    }

    pub fn validate(&self) -> VectorResult<()> {
        if self.timeout_ms == 0 {
            return Err(VectorError::Config("timeout must be greater than zero".into()));
        }
        if self.batch_size == 0 {
            return Err(VectorError::Config("batch size must be greater than zero".into()));
        }
        if self.initial_backoff_ms > self.max_backoff_ms {
            return Err(VectorError::Config(format!(
                "initial backoff ({}ms) exceeds max backoff ({}ms)",
                self.initial_backoff_ms, self.max_backoff_ms
            )));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn endpoint(&self) -> VectorResult<Endpoint> {
        let endpoint = Endpoint::parse(&self.url)?;
        Ok(if self.secure {
            endpoint.with_security(TransportSecurity::Tls)
        } else {
            endpoint
        })
    }

    pub fn channel_config(&self) -> ChannelConfig {
        let config = ChannelConfig::new().with_connect_timeout(Duration::from_millis(self.connect_timeout_ms));
        if self.lazy_connect { config.lazy() } else { config }
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::new()
            .with_max_retries(self.max_retries)
            .with_initial_delay(self.initial_backoff_ms)
            .with_max_delay(self.max_backoff_ms)
    }

    /// Interceptor carrying the api key, anonymous when none is set
    pub fn auth_interceptor(&self) -> VectorResult<AuthInterceptor> {
        let auth = match (self.api_key.as_deref(), self.auth_scheme) {
            (None, _) => Ok(AuthInterceptor::anonymous()),
            (Some(key), AuthScheme::ApiKey) => AuthInterceptor::from_optional_api_key(Some(key)),
            (Some(key), AuthScheme::Bearer) => AuthInterceptor::bearer(key),
        };
        auth.map_err(|status| VectorError::Config(format!("invalid api key: {}", status.message())))
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions::new().with_compression(self.compression)
    }
}

impl FromEnv for QdrantConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_key = std::env::var("QDRANT_API_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        Ok(Self {
            url: env_or_default("QDRANT_URL", DEFAULT_URL),
            secure: env_flag("QDRANT_SECURE")?.unwrap_or(defaults.secure),
            api_key,
            auth_scheme: env_parse("QDRANT_AUTH", defaults.auth_scheme)?,
            timeout_ms: env_parse("QDRANT_TIMEOUT_MS", defaults.timeout_ms)?,
            connect_timeout_ms: env_parse("QDRANT_CONNECT_TIMEOUT_MS", defaults.connect_timeout_ms)?,
            max_retries: env_parse("QDRANT_MAX_RETRIES", defaults.max_retries)?,
            initial_backoff_ms: env_parse("QDRANT_INITIAL_BACKOFF_MS", defaults.initial_backoff_ms)?,
            max_backoff_ms: env_parse("QDRANT_MAX_BACKOFF_MS", defaults.max_backoff_ms)?,
            schema_version: env_parse("QDRANT_SCHEMA_VERSION", defaults.schema_version)?,
            batch_size: env_parse("QDRANT_BATCH_SIZE", defaults.batch_size)?,
            soft_delete_threshold: env_parse(
                "QDRANT_SOFT_DELETE_THRESHOLD",
                defaults.soft_delete_threshold,
            )?,
            compression: env_parse("QDRANT_COMPRESSION", defaults.compression)?,
            lazy_connect: env_flag("QDRANT_LAZY_CONNECT")?.unwrap_or(defaults.lazy_connect),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 14] = [
        "QDRANT_URL",
        "QDRANT_SECURE",
        "QDRANT_API_KEY",
        "QDRANT_AUTH",
        "QDRANT_TIMEOUT_MS",
        "QDRANT_CONNECT_TIMEOUT_MS",
        "QDRANT_MAX_RETRIES",
        "QDRANT_INITIAL_BACKOFF_MS",
        "QDRANT_MAX_BACKOFF_MS",
        "QDRANT_SCHEMA_VERSION",
        "QDRANT_BATCH_SIZE",
        "QDRANT_SOFT_DELETE_THRESHOLD",
        "QDRANT_COMPRESSION",
        "QDRANT_LAZY_CONNECT",
    ];

    #[test]
    fn test_defaults_without_env() {
        temp_env::with_vars_unset(VARS, || {
            let config = QdrantConfig::from_env().unwrap();
            assert_eq!(config, QdrantConfig::default());
            assert_eq!(config.soft_delete_threshold, 500);
            assert_eq!(config.schema_version, SchemaVersion::Current);
        });
    }

    #[test]
    fn test_reads_env() {
        temp_env::with_vars(
            [
                ("QDRANT_URL", Some("http://qdrant.internal:6334")),
                ("QDRANT_SECURE", Some("true")),
                ("QDRANT_API_KEY", Some("secret")),
                ("QDRANT_TIMEOUT_MS", Some("1500")),
                ("QDRANT_MAX_RETRIES", Some("5")),
                ("QDRANT_SCHEMA_VERSION", Some("legacy")),
                ("QDRANT_BATCH_SIZE", Some("64")),
                ("QDRANT_SOFT_DELETE_THRESHOLD", Some("10")),
                ("QDRANT_COMPRESSION", Some("zstd")),
            ],
            || {
                let config = QdrantConfig::from_env().unwrap();
                assert_eq!(config.url, "http://qdrant.internal:6334");
                assert!(config.secure);
                assert_eq!(config.api_key.as_deref(), Some("secret"));
                assert_eq!(config.timeout(), Duration::from_millis(1500));
                assert_eq!(config.max_retries, 5);
                assert_eq!(config.schema_version, SchemaVersion::Legacy);
                assert_eq!(config.batch_size, 64);
                assert_eq!(config.soft_delete_threshold, 10);
                assert_eq!(config.compression, Compression::Zstd);

                let endpoint = config.endpoint().unwrap();
                assert!(endpoint.is_secure());
                assert_eq!(endpoint.port(), 6334);
            },
        );
    }

    #[test]
    fn test_blank_api_key_is_none() {
        temp_env::with_var("QDRANT_API_KEY", Some("  "), || {
            assert!(QdrantConfig::from_env().unwrap().api_key.is_none());
        });
    }

    #[test]
    fn test_auth_scheme() {
        use tonic::service::Interceptor;

        temp_env::with_vars([("QDRANT_API_KEY", Some("token")), ("QDRANT_AUTH", Some("bearer"))], || {
            let config = QdrantConfig::from_env().unwrap();
            assert_eq!(config.auth_scheme, AuthScheme::Bearer);

            let req = config.auth_interceptor().unwrap().call(tonic::Request::new(())).unwrap();
            assert_eq!(req.metadata().get("authorization").unwrap(), "Bearer token");
            assert!(req.metadata().get("api-key").is_none());
        });

        let req = QdrantConfig::default()
            .with_api_key("key")
            .auth_interceptor()
            .unwrap()
            .call(tonic::Request::new(()))
            .unwrap();
        assert_eq!(req.metadata().get("api-key").unwrap(), "key");

        assert!(QdrantConfig::default().auth_interceptor().unwrap().is_anonymous());
        assert!("basic".parse::<AuthScheme>().is_err());
    }

    #[test]
    fn test_unparsable_value_is_error() {
        temp_env::with_var("QDRANT_TIMEOUT_MS", Some("soon"), || {
            assert!(matches!(
                QdrantConfig::from_env(),
                Err(ConfigError::ParseError { .. })
            ));
        });
        temp_env::with_var("QDRANT_SCHEMA_VERSION", Some("v9"), || {
            assert!(QdrantConfig::from_env().is_err());
        });
    }

    #[test]
    fn test_validate() {
        assert!(QdrantConfig::default().validate().is_ok());
        assert!(QdrantConfig::default().with_batch_size(0).validate().is_err());
        assert!(
            QdrantConfig::default()
                .with_timeout(Duration::ZERO)
                .validate()
                .is_err()
        );
        assert!(QdrantConfig::default().with_backoff(500, 100).validate().is_err());
    }

    #[test]
    fn test_derived_configs() {
        let config = QdrantConfig::new("http://localhost:6334")
            .with_max_retries(2)
            .with_backoff(50, 400)
            .with_compression(Compression::Gzip)
            .lazy();

        let retry = config.retry_config();
        assert_eq!(retry.max_retries, 2);
        assert_eq!(retry.initial_delay_ms, 50);
        assert_eq!(retry.max_delay_ms, 400);
        assert!(config.channel_config().lazy);
        assert_eq!(config.client_options().compression, Compression::Gzip);
        assert!(!config.endpoint().unwrap().is_secure());
    }

    #[test]
    fn test_endpoint_requires_port() {
        assert!(QdrantConfig::new("http://localhost").endpoint().is_err());
    }
}
