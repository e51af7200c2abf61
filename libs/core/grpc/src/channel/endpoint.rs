use std::fmt;

use crate::error::{GrpcError, GrpcResult};

/// Whether the channel runs over TLS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportSecurity {
  #[default]
  Plaintext,
  Tls,
}

/// Server address a channel connects to. Immutable once a channel is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
  host: String,
  port: u16,
  security: TransportSecurity,
}

impl Endpoint {
  pub fn new(host: impl Into<String>, port: u16, security: TransportSecurity) -> Self {
    Self {
      host: host.into(),
      port,
      security,
    }
  }

  /// Parse `http://host:port` (plaintext) or `https://host:port` (TLS).
  ///
  /// The port is required; gRPC servers rarely listen on 80/443.
  pub fn parse(address: &str) -> GrpcResult<Self> {
    let invalid = |reason: &str| GrpcError::InvalidEndpoint {
      address: address.to_string(),
      reason: reason.to_string(),
    };

    let uri: http::Uri = address
      .trim()
      .parse()
      .map_err(|e: http::uri::InvalidUri| invalid(&e.to_string()))?;

    let security = match uri.scheme_str() {
      Some("http") => TransportSecurity::Plaintext,
      Some("https") => TransportSecurity::Tls,
      Some(other) => return Err(invalid(&format!("unsupported scheme '{other}'"))),
      None => return Err(invalid("missing scheme (expected http:// or https://)")),
    };

    let host = uri
      .host()
      .filter(|h| !h.is_empty())
      .ok_or_else(|| invalid("missing host"))?;
    let port = uri.port_u16().ok_or_else(|| invalid("missing port"))?;

    Ok(Self::new(host, port, security))
  }

  /// Override the security derived from the scheme
  pub fn with_security(mut self, security: TransportSecurity) -> Self {
    self.security = security;
    self
  }

  pub fn host(&self) -> &str {
    &self.host
  }

  pub fn port(&self) -> u16 {
    self.port
  }

  pub fn security(&self) -> TransportSecurity {
    self.security
  }

  pub fn is_secure(&self) -> bool {
    self.security == TransportSecurity::Tls
  }

  /// Host name for TLS verification (IPv6 literals lose their brackets)
  pub fn domain_name(&self) -> &str {
    self.host.trim_start_matches('[').trim_end_matches(']')
  }

  /// URI handed to tonic
  pub fn uri(&self) -> String {
    let scheme = match self.security {
      TransportSecurity::Plaintext => "http",
      TransportSecurity::Tls => "https",
    };
    format!("{scheme}://{}:{}", self.host, self.port)
  }
}

impl fmt::Display for Endpoint {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.uri())
  }
}
