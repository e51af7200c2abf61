use std::str::FromStr;

use tonic::codec::CompressionEncoding;

/// Default message size limit in both directions
pub const DEFAULT_MESSAGE_LIMIT: usize = 8 * 1024 * 1024; // 8MB

/// Trait for configurable gRPC clients
///
/// Satisfied by tonic-generated clients and by the raw
/// `tonic::client::Grpc` the transport drives directly.
pub trait ConfigurableClient: Sized {
    /// Accept compressed responses
    fn accept_compressed(self, encoding: CompressionEncoding) -> Self;

    /// Send compressed requests
    fn send_compressed(self, encoding: CompressionEncoding) -> Self;

    /// Set maximum size for incoming messages
    fn max_decoding_message_size(self, limit: usize) -> Self;

    /// Set maximum size for outgoing messages
    fn max_encoding_message_size(self, limit: usize) -> Self;
}

impl<T> ConfigurableClient for tonic::client::Grpc<T> {
    fn accept_compressed(self, encoding: CompressionEncoding) -> Self {
        tonic::client::Grpc::accept_compressed(self, encoding)
    }

    fn send_compressed(self, encoding: CompressionEncoding) -> Self {
        tonic::client::Grpc::send_compressed(self, encoding)
    }

    fn max_decoding_message_size(self, limit: usize) -> Self {
        tonic::client::Grpc::max_decoding_message_size(self, limit)
    }

    fn max_encoding_message_size(self, limit: usize) -> Self {
        tonic::client::Grpc::max_encoding_message_size(self, limit)
    }
}

/// Request/response compression negotiated with the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    #[default]
    None,
    Gzip,
    /// 3-5x faster than gzip at a similar ratio
    Zstd,
}

impl Compression {
    pub fn encoding(self) -> Option<CompressionEncoding> {
        match self {
            Compression::None => None,
            Compression::Gzip => Some(CompressionEncoding::Gzip),
            Compression::Zstd => Some(CompressionEncoding::Zstd),
        }
    }
}

impl FromStr for Compression {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "off" => Ok(Compression::None),
            "gzip" => Ok(Compression::Gzip),
            "zstd" => Ok(Compression::Zstd),
            other => Err(format!("unknown compression '{other}' (expected none, gzip or zstd)")),
        }
    }
}

/// Per-client codec settings applied to every call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientOptions {
    pub compression: Compression,
    pub max_decoding_message_size: usize,
    pub max_encoding_message_size: usize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            compression: Compression::None,
            max_decoding_message_size: DEFAULT_MESSAGE_LIMIT,
            max_encoding_message_size: DEFAULT_MESSAGE_LIMIT,
        }
    }
}

impl ClientOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_limits(mut self, max_decoding: usize, max_encoding: usize) -> Self {
        self.max_decoding_message_size = max_decoding;
        self.max_encoding_message_size = max_encoding;
        self
    }

    /// Apply these options to any configurable client
    pub fn apply<T: ConfigurableClient>(&self, client: T) -> T {
        let client = with_limits(
            client,
            self.max_decoding_message_size,
            self.max_encoding_message_size,
        );
        match self.compression.encoding() {
            Some(encoding) => with_compression(client, encoding),
            None => client,
        }
    }
}

/// Apply compression configuration to any tonic client
pub fn with_compression<T>(client: T, encoding: CompressionEncoding) -> T
where
    T: ConfigurableClient,
{
    client.accept_compressed(encoding).send_compressed(encoding)
}

/// Apply message size limits to any tonic client
pub fn with_limits<T>(client: T, max_decoding: usize, max_encoding: usize) -> T
where
    T: ConfigurableClient,
{
    client
        .max_decoding_message_size(max_decoding)
        .max_encoding_message_size(max_encoding)
}
