//! # gRPC Client Library
//!
//! Transport plumbing for typed gRPC clients: one managed HTTP/2 channel,
//! byte-level codecs, a dispatcher that enforces deadlines and cancellation,
//! and a retry policy with exponential backoff.
//!
//! ## Layers
//!
//! ```text
//! RetryPolicy ──► CallDispatcher ──► Transport (GrpcTransport) ──► ManagedChannel
//!     │                 │                     │
//!  backoff,        deadline and        interceptors (auth,
//!  eligibility     cancellation        request id, metrics),
//!                                      RawCodec, compression
//! ```
//!
//! Typed request/response mapping lives in the domain crates; by the time a
//! call reaches this crate it is just a method descriptor and `Bytes`.
//!
//! ## Quick Start
//!
//! ```ignore
//! use grpc_client::*;
//! use std::time::Duration;
//!
//! let endpoint = Endpoint::parse("http://localhost:6334")?;
//! let transport = GrpcTransport::connect(
//!     endpoint,
//!     ChannelConfig::default(),
//!     AuthInterceptor::api_key("secret")?,
//!     ClientOptions::default(),
//! )
//! .await?;
//!
//! let dispatcher = CallDispatcher::new(transport, Duration::from_secs(30));
//! let policy = RetryPolicy::new(RetryConfig::new().with_max_retries(3));
//!
//! const HEALTH: MethodDescriptor = MethodDescriptor::idempotent("/qdrant.Qdrant/HealthCheck");
//! let options = CallOptions::default();
//! let reply = policy
//!     .execute(&HEALTH, &options, || dispatcher.call(HEALTH, payload.clone(), &options))
//!     .await?;
//! ```

pub mod channel;
pub mod client;
pub mod codec;
pub mod dispatcher;
pub mod error;
pub mod interceptors;
pub mod retry;
pub mod transport;

// Re-export main types and functions for convenience
pub use channel::{ChannelConfig, Endpoint, ManagedChannel, TransportSecurity};
pub use client::{
    ClientOptions, Compression, ConfigurableClient, with_compression, with_limits,
};
pub use codec::{RawCodec, decode_message, encode_message};
pub use dispatcher::{Call, CallDispatcher, CallOptions, MethodDescriptor, Transport};
pub use error::{CallError, CallResult, ConnectionKind, DecodeError, GrpcError, GrpcResult};
pub use retry::{RetryConfig, RetryOutcome, RetryPhase, RetryPolicy, RetryState, retry, retry_with_backoff};
pub use transport::GrpcTransport;

// Re-export interceptors for convenience
pub use interceptors::{
    AuthInterceptor, Chain, ClientInterceptor, InterceptorExt, MetricsInterceptor,
    TracingInterceptor, client_interceptor,
};

// Callers hold cancellation tokens without a direct tokio-util dependency
pub use tokio_util::sync::CancellationToken;
