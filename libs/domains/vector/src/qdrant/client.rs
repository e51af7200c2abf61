use async_trait::async_trait;
use grpc_client::{
    CallDispatcher, CallError, CallOptions, GrpcTransport, ManagedChannel,
    RetryPolicy, Transport,
};
use tracing::{debug, info, instrument, warn};

use super::QdrantConfig;
use crate::codec::WireCodec;
use crate::error::{VectorError, VectorResult};
use crate::models::{
    BatchItem, BatchReport, CollectionInfo, Filter, HealthInfo, Payload, Point, PointId,
    PointsSelector, RetrievedPoint, ScoredPoint, UpdateResult, VectorConfig, validate_payload,
};
use crate::operations::{
    CountPoints, CreateCollection, DeleteCollection, DeletePoints, GetCollection, GetPoints,
    HealthCheck, ListCollections, Operation, SearchPoints, SetPayload, UpsertPoints,
};
use crate::repository::VectorRepository;

/// Typed Qdrant client
///
/// Every operation is encoded with the configured schema version, sent
/// through the dispatcher under the retry policy, and decoded back into
/// domain types. Cheap to share behind an `Arc`.
#[derive(Debug)]
pub struct QdrantClient<T: Transport = GrpcTransport> {
    dispatcher: CallDispatcher<T>,
    retry: RetryPolicy,
    codec: WireCodec,
    batch_size: usize,
    default_options: CallOptions,
}

impl QdrantClient<GrpcTransport> {
    /// Open a channel to the configured server
    #[instrument(skip(config), fields(url = %config.url))]
    pub async fn connect(config: QdrantConfig) -> VectorResult<Self> {
        config.validate()?;
        let endpoint = config.endpoint()?;
        let auth = config.auth_interceptor()?;

        let channel = ManagedChannel::open_with_retry(
            endpoint,
            config.channel_config(),
            Some(config.retry_config()),
        )
        .await?;
        info!(
            endpoint = %channel.endpoint(),
            schema = %config.schema_version,
            "Connected to Qdrant"
        );

        let transport = GrpcTransport::new(channel, auth, config.client_options());
        Self::with_transport(transport, config)
    }
}

impl<T: Transport> QdrantClient<T> {
    /// Build a client over any transport
    pub fn with_transport(transport: T, config: QdrantConfig) -> VectorResult<Self> {
        config.validate()?;
        Ok(Self {
            dispatcher: CallDispatcher::new(transport, config.timeout()),
            retry: RetryPolicy::new(config.retry_config()),
            codec: WireCodec::new(config.schema_version),
            batch_size: config.batch_size,
            default_options: CallOptions::default(),
        })
    }

    /// Options used by the convenience methods (everything except [`call`](Self::call))
    pub fn with_default_options(mut self, options: CallOptions) -> Self {
        self.default_options = options;
        self
    }

    pub fn codec(&self) -> WireCodec {
        self.codec
    }

    pub fn transport(&self) -> &T {
        self.dispatcher.transport()
    }

    /// Release the channel. In-flight calls finish; new calls fail with `Closed`.
    pub fn close(&self) -> bool {
        let closed = self.dispatcher.close();
        if closed {
            info!("Qdrant client closed");
        }
        closed
    }

    /// Execute any typed operation
    pub async fn call<O: Operation>(
        &self,
        operation: O,
        options: &CallOptions,
    ) -> VectorResult<O::Output> {
        let method = O::METHOD;
        let payload = self.codec.encode_request(&operation);

        let bytes = self
            .retry
            .execute(&method, options, || {
                self.dispatcher.call(method, payload.clone(), options)
            })
            .await?;

        Ok(self.codec.decode_response(&operation, bytes)?)
    }

    // ===== Points =====

    #[instrument(skip(self, points), fields(collection = %collection, points = points.len()))]
    pub async fn upsert(
        &self,
        collection: &str,
        points: Vec<Point>,
        wait: bool,
    ) -> VectorResult<UpdateResult> {
        if points.is_empty() {
            return Err(VectorError::Validation("no points to upsert".into()));
        }
        for point in &points {
            point.validate()?;
        }

        let op = UpsertPoints::new(collection, points).wait(wait);
        self.call(op, &self.default_options).await
    }

    /// Upsert in chunks of `batch_size`.
    ///
    /// Not atomic: a failed chunk does not stop the others, and the report
    /// carries one outcome per input point in input order.
    #[instrument(skip(self, points), fields(collection = %collection, points = points.len()))]
    pub async fn upsert_batch(&self, collection: &str, points: Vec<Point>) -> BatchReport {
        let mut outcomes: Vec<Option<Result<UpdateResult, VectorError>>> = Vec::with_capacity(points.len());
        let mut ids = Vec::with_capacity(points.len());
        let mut valid = Vec::new();

        for (index, point) in points.into_iter().enumerate() {
            ids.push(point.id.clone());
            match point.validate() {
                Ok(()) => {
                    outcomes.push(None);
                    valid.push((index, point));
                }
                Err(err) => outcomes.push(Some(Err(err))),
            }
        }

        let mut remaining = valid.into_iter().peekable();
        let mut chunk_no = 0usize;
        while remaining.peek().is_some() {
            let (indices, chunk): (Vec<usize>, Vec<Point>) =
                remaining.by_ref().take(self.batch_size).unzip();
            chunk_no += 1;

            let op = UpsertPoints::new(collection, chunk).wait(true);
            let result = self.call(op, &self.default_options).await;
            match &result {
                Ok(_) => debug!(chunk = chunk_no, points = indices.len(), "Chunk upserted"),
                Err(err) => warn!(chunk = chunk_no, points = indices.len(), error = %err, "Chunk failed"),
            }

            for index in indices {
                outcomes[index] = Some(result.clone());
            }
        }

        let items = ids
            .into_iter()
            .zip(outcomes)
            .map(|(id, outcome)| BatchItem {
                id,
                // every index was either rejected locally or sent in a chunk
                outcome: outcome.unwrap_or_else(|| {
                    Err(VectorError::Validation("point was not sent".into()))
                }),
            })
            .collect();
        BatchReport { items }
    }

    #[instrument(skip(self, query), fields(collection = %query.collection, limit = query.limit))]
    pub async fn search(&self, query: SearchPoints) -> VectorResult<Vec<ScoredPoint>> {
        if query.vector.is_empty() {
            return Err(VectorError::Validation("search vector is empty".into()));
        }
        self.call(query, &self.default_options).await
    }

    #[instrument(skip(self, ids), fields(collection = %collection, ids = ids.len()))]
    pub async fn get(
        &self,
        collection: &str,
        ids: Vec<PointId>,
        with_vectors: bool,
    ) -> VectorResult<Vec<RetrievedPoint>> {
        let op = GetPoints::new(collection, ids).with_vectors(with_vectors);
        self.call(op, &self.default_options).await
    }

    #[instrument(skip(self, filter), fields(collection = %collection))]
    pub async fn count(
        &self,
        collection: &str,
        filter: Option<Filter>,
        exact: bool,
    ) -> VectorResult<u64> {
        let mut op = CountPoints::new(collection).exact(exact);
        op.filter = filter;
        self.call(op, &self.default_options).await
    }

    #[instrument(skip(self, payload, selector), fields(collection = %collection))]
    pub async fn set_payload(
        &self,
        collection: &str,
        payload: Payload,
        selector: PointsSelector,
        wait: bool,
    ) -> VectorResult<UpdateResult> {
        validate_payload(&payload)?;
        let op = SetPayload::new(collection, payload, selector).wait(wait);
        self.call(op, &self.default_options).await
    }

    /// Hard delete by ids or filter
    #[instrument(skip(self, selector), fields(collection = %collection))]
    pub async fn delete(
        &self,
        collection: &str,
        selector: PointsSelector,
        wait: bool,
    ) -> VectorResult<UpdateResult> {
        let op = DeletePoints::new(collection, selector).wait(wait);
        self.call(op, &self.default_options).await
    }

    // ===== Collections =====

    #[instrument(skip(self, config), fields(collection = %name, dimension = config.dimension))]
    pub async fn create_collection(&self, name: &str, config: VectorConfig) -> VectorResult<bool> {
        if config.dimension == 0 {
            return Err(VectorError::Validation("vector dimension must be positive".into()));
        }
        self.call(CreateCollection::new(name, config), &self.default_options)
            .await
    }

    #[instrument(skip(self), fields(collection = %name))]
    pub async fn delete_collection(&self, name: &str) -> VectorResult<bool> {
        self.call(DeleteCollection::new(name), &self.default_options)
            .await
    }

    /// Fails with [`VectorError::NotFound`] when the collection does not exist
    #[instrument(skip(self), fields(collection = %name))]
    pub async fn get_collection(&self, name: &str) -> VectorResult<CollectionInfo> {
        self.call(GetCollection::new(name), &self.default_options)
            .await
            .map_err(|err| match err {
                VectorError::Call(CallError::Rpc {
                    code: tonic::Code::NotFound,
                    ..
                }) => VectorError::NotFound(format!("collection '{name}'")),
                other => other,
            })
    }

    #[instrument(skip(self))]
    pub async fn list_collections(&self) -> VectorResult<Vec<String>> {
        self.call(ListCollections, &self.default_options).await
    }

    // ===== Service =====

    #[instrument(skip(self))]
    pub async fn health_check(&self) -> VectorResult<HealthInfo> {
        self.call(HealthCheck, &self.default_options).await
    }
}

#[async_trait]
impl<T: Transport> VectorRepository for QdrantClient<T> {
    async fn create_collection(&self, name: &str, config: VectorConfig) -> VectorResult<bool> {
        QdrantClient::create_collection(self, name, config).await
    }

    async fn delete_collection(&self, name: &str) -> VectorResult<bool> {
        QdrantClient::delete_collection(self, name).await
    }

    async fn get_collection(&self, name: &str) -> VectorResult<Option<CollectionInfo>> {
        match QdrantClient::get_collection(self, name).await {
            Ok(info) => Ok(Some(info)),
            Err(VectorError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn list_collections(&self) -> VectorResult<Vec<String>> {
        QdrantClient::list_collections(self).await
    }

    async fn upsert(
        &self,
        collection: &str,
        points: Vec<Point>,
        wait: bool,
    ) -> VectorResult<UpdateResult> {
        QdrantClient::upsert(self, collection, points, wait).await
    }

    async fn upsert_batch(&self, collection: &str, points: Vec<Point>) -> VectorResult<BatchReport> {
        Ok(QdrantClient::upsert_batch(self, collection, points).await)
    }

    async fn search(&self, query: SearchPoints) -> VectorResult<Vec<ScoredPoint>> {
        QdrantClient::search(self, query).await
    }

    async fn get(
        &self,
        collection: &str,
        ids: Vec<PointId>,
        with_vectors: bool,
    ) -> VectorResult<Vec<RetrievedPoint>> {
        QdrantClient::get(self, collection, ids, with_vectors).await
    }

    async fn count(&self, collection: &str, filter: Option<Filter>, exact: bool) -> VectorResult<u64> {
        QdrantClient::count(self, collection, filter, exact).await
    }

    async fn set_payload(
        &self,
        collection: &str,
        payload: Payload,
        selector: PointsSelector,
        wait: bool,
    ) -> VectorResult<UpdateResult> {
        QdrantClient::set_payload(self, collection, payload, selector, wait).await
    }

    async fn delete(
        &self,
        collection: &str,
        selector: PointsSelector,
        wait: bool,
    ) -> VectorResult<UpdateResult> {
        QdrantClient::delete(self, collection, selector, wait).await
    }
}
