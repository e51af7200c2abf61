//! Vector Domain Library
//!
//! Typed client for the Qdrant gRPC API plus a service layer with soft
//! deletion.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  VectorService  │  ← soft delete, filtered reads
//! └────────┬────────┘
//!          │
//! ┌────────▼────────┐
//! │ VectorRepository│
//! │   (trait)       │
//! └────────┬────────┘
//!          │
//! ┌────────▼────────┐     ┌─────────────────┐
//! │  QdrantClient   │────►│   WireCodec     │  typed ops ↔ protobuf
//! └────────┬────────┘     └─────────────────┘
//!          │
//! ┌────────▼────────┐
//! │  grpc-client    │  dispatcher, retry, channel
//! └─────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use core_config::FromEnv;
//! use domain_vector::{Point, QdrantClient, QdrantConfig, SearchPoints, VectorConfig, VectorService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = QdrantConfig::from_env()?;
//! let client = QdrantClient::connect(config).await?;
//!
//! client.create_collection("documents", VectorConfig::new(4)).await?;
//! client
//!     .upsert("documents", vec![Point::new(1u64, vec![0.1, 0.2, 0.3, 0.4])], true)
//!     .await?;
//!
//! let service = VectorService::new(client);
//! let hits = service
//!     .search(SearchPoints::new("documents", vec![0.1, 0.2, 0.3, 0.4], 10))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod error;
pub mod models;
pub mod operations;
pub mod qdrant;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use codec::{SchemaVersion, WireCodec};
pub use error::{VectorError, VectorResult};
pub use models::{
    BatchItem, BatchReport, CollectionInfo, CollectionStatus, Condition, DistanceMetric, Filter,
    HealthInfo, HnswConfig, MatchValue, Payload, Point, PointId, PointsSelector, RetrievedPoint,
    SOFT_DELETE_FIELD, ScoredPoint, SoftDeleteReport, UpdateResult, UpdateStatus, VectorConfig,
    validate_payload,
};
pub use operations::{
    CountPoints, CreateCollection, DeleteCollection, DeletePoints, GetCollection, GetPoints,
    HealthCheck, ListCollections, Operation, SearchPoints, SetPayload, UpsertPoints,
};
pub use qdrant::{AuthScheme, QdrantClient, QdrantConfig};
pub use repository::VectorRepository;
pub use service::VectorService;

// Call-level knobs callers need without depending on grpc-client directly
pub use grpc_client::{CallError, CallOptions, CancellationToken, Compression};
