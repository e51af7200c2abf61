use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, instrument};

use crate::error::{VectorError, VectorResult};
use crate::models::{
    BatchReport, CollectionInfo, Condition, Filter, Payload, Point, PointId, PointsSelector,
    RetrievedPoint, SOFT_DELETE_FIELD, ScoredPoint, SoftDeleteReport, UpdateResult, VectorConfig,
};
use crate::operations::SearchPoints;
use crate::qdrant::DEFAULT_SOFT_DELETE_THRESHOLD;
use crate::repository::VectorRepository;

/// Vector service providing high-level operations
///
/// Adds soft deletion on top of a repository: deleted points are first
/// marked with [`SOFT_DELETE_FIELD`] and hidden from reads, then purged in
/// bulk once more than `soft_delete_threshold` of them have piled up.
pub struct VectorService<R: VectorRepository> {
    repository: Arc<R>,
    soft_delete_threshold: u64,
}

impl<R: VectorRepository> Clone for VectorService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            soft_delete_threshold: self.soft_delete_threshold,
        }
    }
}

impl<R: VectorRepository> VectorService<R> {
    pub fn new(repository: R) -> Self {
        Self::from_arc(Arc::new(repository))
    }

    pub fn from_arc(repository: Arc<R>) -> Self {
        Self {
            repository,
            soft_delete_threshold: DEFAULT_SOFT_DELETE_THRESHOLD,
        }
    }

    pub fn with_soft_delete_threshold(mut self, threshold: u64) -> Self {
        self.soft_delete_threshold = threshold;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    // ===== Collection Management =====

    pub async fn create_collection(&self, name: &str, config: VectorConfig) -> VectorResult<bool> {
        self.repository.create_collection(name, config).await
    }

    pub async fn delete_collection(&self, name: &str) -> VectorResult<bool> {
        self.repository.delete_collection(name).await
    }

    pub async fn get_collection(&self, name: &str) -> VectorResult<CollectionInfo> {
        self.repository
            .get_collection(name)
            .await?
            .ok_or_else(|| VectorError::NotFound(format!("collection '{name}'")))
    }

    pub async fn list_collections(&self) -> VectorResult<Vec<String>> {
        self.repository.list_collections().await
    }

    // ===== Point Operations =====

    pub async fn upsert(
        &self,
        collection: &str,
        points: Vec<Point>,
        wait: bool,
    ) -> VectorResult<UpdateResult> {
        self.repository.upsert(collection, points, wait).await
    }

    pub async fn upsert_batch(&self, collection: &str, points: Vec<Point>) -> VectorResult<BatchReport> {
        self.repository.upsert_batch(collection, points).await
    }

    /// Search that never returns soft-deleted points
    #[instrument(skip(self, query), fields(collection = %query.collection))]
    pub async fn search(&self, mut query: SearchPoints) -> VectorResult<Vec<ScoredPoint>> {
        query.filter = Some(exclude_soft_deleted(query.filter.take()));
        self.repository.search(query).await
    }

    /// Fetch points by id, dropping soft-deleted ones
    pub async fn get(
        &self,
        collection: &str,
        ids: Vec<PointId>,
        with_vectors: bool,
    ) -> VectorResult<Vec<RetrievedPoint>> {
        let points = self.repository.get(collection, ids, with_vectors).await?;
        Ok(points
            .into_iter()
            .filter(|point| !is_soft_deleted(&point.payload))
            .collect())
    }

    /// Count live (not soft-deleted) points
    pub async fn count(&self, collection: &str, filter: Option<Filter>) -> VectorResult<u64> {
        self.repository
            .count(collection, Some(exclude_soft_deleted(filter)), true)
            .await
    }

    pub async fn set_payload(
        &self,
        collection: &str,
        payload: Payload,
        selector: PointsSelector,
        wait: bool,
    ) -> VectorResult<UpdateResult> {
        self.repository
            .set_payload(collection, payload, selector, wait)
            .await
    }

    /// Mark points as deleted; purge all marked points once the threshold is exceeded
    #[instrument(skip(self, ids), fields(collection = %collection, ids = ids.len()))]
    pub async fn soft_delete(
        &self,
        collection: &str,
        ids: Vec<PointId>,
        wait: bool,
    ) -> VectorResult<SoftDeleteReport> {
        if ids.is_empty() {
            return Err(VectorError::Validation("no point ids to delete".into()));
        }

        let marked = self
            .repository
            .set_payload(collection, soft_delete_marker(), PointsSelector::Ids(ids), wait)
            .await?;

        let soft_deleted = self
            .repository
            .count(collection, Some(Filter::soft_deleted()), true)
            .await?;
        debug!(soft_deleted, threshold = self.soft_delete_threshold, "Soft delete applied");

        let purged = if soft_deleted > self.soft_delete_threshold {
            info!(soft_deleted, "Soft-delete threshold exceeded, purging marked points");
            let result = self
                .repository
                .delete(collection, PointsSelector::Filter(Filter::soft_deleted()), false)
                .await?;
            Some(result)
        } else {
            None
        };

        Ok(SoftDeleteReport {
            marked,
            soft_deleted,
            purged,
        })
    }

    pub async fn hard_delete(
        &self,
        collection: &str,
        selector: PointsSelector,
        wait: bool,
    ) -> VectorResult<UpdateResult> {
        self.repository.delete(collection, selector, wait).await
    }
}

fn soft_delete_marker() -> Payload {
    let mut payload = Payload::new();
    payload.insert(SOFT_DELETE_FIELD.to_string(), json!(true));
    payload
}

fn is_soft_deleted(payload: &Payload) -> bool {
    payload.get(SOFT_DELETE_FIELD) == Some(&json!(true))
}

fn exclude_soft_deleted(filter: Option<Filter>) -> Filter {
    filter
        .unwrap_or_default()
        .and_must_not(Condition::matches(SOFT_DELETE_FIELD, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UpdateStatus;
    use crate::repository::MockVectorRepository;
    use mockall::predicate::eq;

    fn completed(operation_id: u64) -> UpdateResult {
        UpdateResult {
            operation_id: Some(operation_id),
            status: UpdateStatus::Completed,
        }
    }

    fn expect_marking(mock: &mut MockVectorRepository) {
        mock.expect_set_payload()
            .withf(|collection, payload, selector, wait| {
                collection == "docs"
                    && payload.get(SOFT_DELETE_FIELD) == Some(&json!(true))
                    && *selector == PointsSelector::Ids(vec![PointId::Num(1), PointId::Num(2)])
                    && *wait
            })
            .times(1)
            .returning(|_, _, _, _| Ok(completed(1)));
    }

    #[tokio::test]
    async fn test_soft_delete_under_threshold_keeps_points() {
        let mut mock_repo = MockVectorRepository::new();
        expect_marking(&mut mock_repo);
        mock_repo
            .expect_count()
            .with(eq("docs"), eq(Some(Filter::soft_deleted())), eq(true))
            .returning(|_, _, _| Ok(500));
        mock_repo.expect_delete().times(0);

        let service = VectorService::new(mock_repo);
        let report = service
            .soft_delete("docs", vec![PointId::Num(1), PointId::Num(2)], true)
            .await
            .unwrap();

        assert_eq!(report.marked, completed(1));
        assert_eq!(report.soft_deleted, 500);
        assert!(report.purged.is_none(), "500 marked points should not trigger a purge");
    }

    #[tokio::test]
    async fn test_soft_delete_over_threshold_purges() {
        let mut mock_repo = MockVectorRepository::new();
        expect_marking(&mut mock_repo);
        mock_repo.expect_count().returning(|_, _, _| Ok(501));
        mock_repo
            .expect_delete()
            .with(
                eq("docs"),
                eq(PointsSelector::Filter(Filter::soft_deleted())),
                eq(false),
            )
            .times(1)
            .returning(|_, _, _| Ok(completed(2)));

        let service = VectorService::new(mock_repo);
        let report = service
            .soft_delete("docs", vec![PointId::Num(1), PointId::Num(2)], true)
            .await
            .unwrap();

        assert_eq!(report.purged, Some(completed(2)));
    }

    #[tokio::test]
    async fn test_custom_threshold() {
        let mut mock_repo = MockVectorRepository::new();
        mock_repo
            .expect_set_payload()
            .returning(|_, _, _, _| Ok(completed(1)));
        mock_repo.expect_count().returning(|_, _, _| Ok(3));
        mock_repo
            .expect_delete()
            .times(1)
            .returning(|_, _, _| Ok(completed(2)));

        let service = VectorService::new(mock_repo).with_soft_delete_threshold(2);
        let report = service
            .soft_delete("docs", vec![PointId::Num(9)], false)
            .await
            .unwrap();
        assert!(report.purged.is_some());
    }

    #[tokio::test]
    async fn test_soft_delete_requires_ids() {
        let service = VectorService::new(MockVectorRepository::new());
        let err = service.soft_delete("docs", vec![], true).await.unwrap_err();
        assert!(matches!(err, VectorError::Validation(_)));
    }

    #[tokio::test]
    async fn test_soft_delete_propagates_marking_failure() {
        let mut mock_repo = MockVectorRepository::new();
        mock_repo
            .expect_set_payload()
            .returning(|_, _, _, _| Err(VectorError::Call(grpc_client::CallError::Timeout)));
        mock_repo.expect_count().times(0);

        let service = VectorService::new(mock_repo);
        let err = service
            .soft_delete("docs", vec![PointId::Num(1)], true)
            .await
            .unwrap_err();
        assert!(matches!(err.call_error(), Some(grpc_client::CallError::Timeout)));
    }

    #[tokio::test]
    async fn test_search_excludes_soft_deleted() {
        let mut mock_repo = MockVectorRepository::new();
        mock_repo
            .expect_search()
            .withf(|query| {
                let Some(filter) = &query.filter else {
                    return false;
                };
                filter.must == vec![Condition::matches("lang", "en")]
                    && filter.must_not == vec![Condition::matches(SOFT_DELETE_FIELD, true)]
            })
            .times(1)
            .returning(|_| Ok(vec![]));

        let service = VectorService::new(mock_repo);
        let query = SearchPoints::new("docs", vec![1.0, 0.0], 5)
            .with_filter(Filter::must([Condition::matches("lang", "en")]));
        assert!(service.search(query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_drops_soft_deleted() {
        let mut mock_repo = MockVectorRepository::new();
        mock_repo.expect_get().returning(|_, ids, _| {
            Ok(ids
                .into_iter()
                .map(|id| {
                    let payload = if id == PointId::Num(2) {
                        soft_delete_marker()
                    } else {
                        Payload::new()
                    };
                    RetrievedPoint {
                        id,
                        payload,
                        vector: None,
                    }
                })
                .collect())
        });

        let service = VectorService::new(mock_repo);
        let points = service
            .get("docs", vec![PointId::Num(1), PointId::Num(2)], false)
            .await
            .unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].id, PointId::Num(1));
    }

    #[tokio::test]
    async fn test_missing_collection() {
        let mut mock_repo = MockVectorRepository::new();
        mock_repo
            .expect_get_collection()
            .with(eq("gone"))
            .returning(|_| Ok(None));

        let service = VectorService::new(mock_repo);
        let err = service.get_collection("gone").await.unwrap_err();
        assert!(matches!(err, VectorError::NotFound(_)));
    }
}
