//! Qdrant wire schema
//!
//! Prost bindings for the subset of the Qdrant gRPC API that the client
//! speaks (`qdrant.Points`, `qdrant.Collections`, `qdrant.Qdrant`). Every
//! protobuf `map` is generated as a `BTreeMap` so that encoding is
//! deterministic.

pub mod qdrant {
    include!("generated/qdrant/qdrant.rs");
}

/// Fully-qualified gRPC method paths
pub mod methods {
    pub const POINTS_UPSERT: &str = "/qdrant.Points/Upsert";
    pub const POINTS_DELETE: &str = "/qdrant.Points/Delete";
    pub const POINTS_GET: &str = "/qdrant.Points/Get";
    pub const POINTS_SET_PAYLOAD: &str = "/qdrant.Points/SetPayload";
    pub const POINTS_SEARCH: &str = "/qdrant.Points/Search";
    pub const POINTS_COUNT: &str = "/qdrant.Points/Count";

    pub const COLLECTIONS_CREATE: &str = "/qdrant.Collections/Create";
    pub const COLLECTIONS_DELETE: &str = "/qdrant.Collections/Delete";
    pub const COLLECTIONS_GET: &str = "/qdrant.Collections/Get";
    pub const COLLECTIONS_LIST: &str = "/qdrant.Collections/List";

    pub const QDRANT_HEALTH_CHECK: &str = "/qdrant.Qdrant/HealthCheck";
}
