use async_trait::async_trait;

use crate::error::VectorResult;
use crate::models::{
    BatchReport, CollectionInfo, Filter, Payload, Point, PointId, PointsSelector, RetrievedPoint,
    ScoredPoint, UpdateResult, VectorConfig,
};
use crate::operations::SearchPoints;

/// Repository trait for vector storage operations
///
/// This trait abstracts the underlying vector database (Qdrant).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VectorRepository: Send + Sync {
    // ===== Collection Management =====

    /// Create a new collection with the given configuration
    async fn create_collection(&self, name: &str, config: VectorConfig) -> VectorResult<bool>;

    async fn delete_collection(&self, name: &str) -> VectorResult<bool>;

    /// `None` when the collection does not exist
    async fn get_collection(&self, name: &str) -> VectorResult<Option<CollectionInfo>>;

    async fn list_collections(&self) -> VectorResult<Vec<String>>;

    // ===== Point Operations =====

    async fn upsert(
        &self,
        collection: &str,
        points: Vec<Point>,
        wait: bool,
    ) -> VectorResult<UpdateResult>;

    /// Non-atomic chunked upsert with one outcome per point
    async fn upsert_batch(&self, collection: &str, points: Vec<Point>) -> VectorResult<BatchReport>;

    async fn search(&self, query: SearchPoints) -> VectorResult<Vec<ScoredPoint>>;

    async fn get(
        &self,
        collection: &str,
        ids: Vec<PointId>,
        with_vectors: bool,
    ) -> VectorResult<Vec<RetrievedPoint>>;

    async fn count(&self, collection: &str, filter: Option<Filter>, exact: bool) -> VectorResult<u64>;

    async fn set_payload(
        &self,
        collection: &str,
        payload: Payload,
        selector: PointsSelector,
        wait: bool,
    ) -> VectorResult<UpdateResult>;

    /// Hard delete
    async fn delete(
        &self,
        collection: &str,
        selector: PointsSelector,
        wait: bool,
    ) -> VectorResult<UpdateResult>;
}
