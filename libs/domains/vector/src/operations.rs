//! Typed requests, one per Qdrant RPC the client speaks.
//!
//! Each operation knows its method descriptor, how to turn itself into the
//! wire request, how to read itself back from one, and how to interpret the
//! wire response.

use grpc_client::{DecodeError, MethodDescriptor};
use protos::methods;
use protos::qdrant as pb;

use crate::codec::{
    SchemaVersion, collection_status_from_wire, filter_from_wire, filter_to_wire, hnsw_from_wire,
    payload_from_wire, payload_to_wire, point_id_from_wire, point_id_to_wire, point_ids_from_wire,
    selector_from_wire, selector_to_wire, update_result_from_wire, vectors_config_from_wire,
    vectors_config_to_wire,
};
use crate::models::{
    CollectionInfo, Filter, HealthInfo, Payload, Point, PointId, PointsSelector, RetrievedPoint,
    ScoredPoint, UpdateResult, VectorConfig,
};

pub trait Operation: Sized + Send + Sync {
    type Request: prost::Message + Default;
    type Response: prost::Message + Default;
    type Output: Send;

    const METHOD: MethodDescriptor;

    fn to_wire(&self, schema: SchemaVersion) -> Self::Request;

    fn from_wire(request: Self::Request, schema: SchemaVersion) -> Result<Self, DecodeError>;

    /// Interpret the server's reply to this request
    fn output(
        &self,
        response: Self::Response,
        schema: SchemaVersion,
    ) -> Result<Self::Output, DecodeError>;
}

fn with_payload_selector(enable: bool) -> Option<pb::WithPayloadSelector> {
    Some(pb::WithPayloadSelector {
        selector_options: Some(pb::with_payload_selector::SelectorOptions::Enable(enable)),
    })
}

fn with_vectors_selector(enable: bool) -> Option<pb::WithVectorsSelector> {
    Some(pb::WithVectorsSelector {
        selector_options: Some(pb::with_vectors_selector::SelectorOptions::Enable(enable)),
    })
}

fn payload_enabled(selector: Option<pb::WithPayloadSelector>) -> bool {
    matches!(
        selector.and_then(|s| s.selector_options),
        Some(pb::with_payload_selector::SelectorOptions::Enable(true))
    )
}

fn vectors_enabled(selector: Option<pb::WithVectorsSelector>) -> bool {
    matches!(
        selector.and_then(|s| s.selector_options),
        Some(pb::with_vectors_selector::SelectorOptions::Enable(true))
    )
}

fn vectors_output(
    vectors: Option<pb::VectorsOutput>,
    schema: SchemaVersion,
) -> Result<Option<Vec<f32>>, DecodeError> {
    match vectors.and_then(|v| v.vectors_options) {
        Some(pb::vectors_output::VectorsOptions::Vector(vector)) => {
            schema.vector_output_from_wire(vector).map(Some)
        }
        None => Ok(None),
    }
}

fn point_to_wire(point: &Point, schema: SchemaVersion) -> pb::PointStruct {
    pb::PointStruct {
        id: Some(point_id_to_wire(&point.id)),
        payload: payload_to_wire(&point.payload),
        vectors: Some(pb::Vectors {
            vectors_options: Some(pb::vectors::VectorsOptions::Vector(
                schema.vector_to_wire(&point.vector),
            )),
        }),
    }
}

fn point_from_wire(point: pb::PointStruct, schema: SchemaVersion) -> Result<Point, DecodeError> {
    let id = point_id_from_wire(point.id)?;
    let vector = match point.vectors.and_then(|v| v.vectors_options) {
        Some(pb::vectors::VectorsOptions::Vector(vector)) => schema.vector_from_wire(vector)?,
        None => return Err(DecodeError::MissingField("vectors")),
    };
    if vector.is_empty() {
        return Err(DecodeError::MissingField("vectors"));
    }
    Ok(Point {
        id,
        vector,
        payload: payload_from_wire(point.payload),
    })
}

// ---------------------------------------------------------------------------
// points
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct UpsertPoints {
    pub collection: String,
    pub points: Vec<Point>,
    pub wait: bool,
}

impl UpsertPoints {
    pub fn new(collection: impl Into<String>, points: Vec<Point>) -> Self {
        Self {
            collection: collection.into(),
            points,
            wait: true,
        }
    }

    pub fn wait(mut self, wait: bool) -> Self {
        self.wait = wait;
        self
    }
}

impl Operation for UpsertPoints {
    type Request = pb::UpsertPoints;
    type Response = pb::PointsOperationResponse;
    type Output = UpdateResult;

    const METHOD: MethodDescriptor = MethodDescriptor::non_idempotent(methods::POINTS_UPSERT);

    fn to_wire(&self, schema: SchemaVersion) -> Self::Request {
        pb::UpsertPoints {
            collection_name: self.collection.clone(),
            wait: Some(self.wait),
            points: self.points.iter().map(|p| point_to_wire(p, schema)).collect(),
        }
    }

    fn from_wire(request: Self::Request, schema: SchemaVersion) -> Result<Self, DecodeError> {
        let points = request
            .points
            .into_iter()
            .map(|p| point_from_wire(p, schema))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            collection: request.collection_name,
            points,
            wait: request.wait.unwrap_or(false),
        })
    }

    fn output(&self, response: Self::Response, _: SchemaVersion) -> Result<UpdateResult, DecodeError> {
        update_result_from_wire(response.result)
    }
}

/// Hard delete by ids or filter
#[derive(Debug, Clone, PartialEq)]
pub struct DeletePoints {
    pub collection: String,
    pub selector: PointsSelector,
    pub wait: bool,
}

impl DeletePoints {
    pub fn new(collection: impl Into<String>, selector: impl Into<PointsSelector>) -> Self {
        Self {
            collection: collection.into(),
            selector: selector.into(),
            wait: true,
        }
    }

    pub fn wait(mut self, wait: bool) -> Self {
        self.wait = wait;
        self
    }
}

impl Operation for DeletePoints {
    type Request = pb::DeletePoints;
    type Response = pb::PointsOperationResponse;
    type Output = UpdateResult;

    const METHOD: MethodDescriptor = MethodDescriptor::non_idempotent(methods::POINTS_DELETE);

    fn to_wire(&self, _: SchemaVersion) -> Self::Request {
        pb::DeletePoints {
            collection_name: self.collection.clone(),
            wait: Some(self.wait),
            points: Some(selector_to_wire(&self.selector)),
        }
    }

    fn from_wire(request: Self::Request, _: SchemaVersion) -> Result<Self, DecodeError> {
        Ok(Self {
            collection: request.collection_name,
            selector: selector_from_wire(request.points)?,
            wait: request.wait.unwrap_or(false),
        })
    }

    fn output(&self, response: Self::Response, _: SchemaVersion) -> Result<UpdateResult, DecodeError> {
        update_result_from_wire(response.result)
    }
}

/// Merge `payload` into the payload of the selected points
#[derive(Debug, Clone, PartialEq)]
pub struct SetPayload {
    pub collection: String,
    pub payload: Payload,
    pub selector: PointsSelector,
    pub wait: bool,
}

impl SetPayload {
    pub fn new(
        collection: impl Into<String>,
        payload: Payload,
        selector: impl Into<PointsSelector>,
    ) -> Self {
        Self {
            collection: collection.into(),
            payload,
            selector: selector.into(),
            wait: true,
        }
    }

    pub fn wait(mut self, wait: bool) -> Self {
        self.wait = wait;
        self
    }
}

impl Operation for SetPayload {
    type Request = pb::SetPayloadPoints;
    type Response = pb::PointsOperationResponse;
    type Output = UpdateResult;

    const METHOD: MethodDescriptor = MethodDescriptor::non_idempotent(methods::POINTS_SET_PAYLOAD);

    fn to_wire(&self, _: SchemaVersion) -> Self::Request {
        pb::SetPayloadPoints {
            collection_name: self.collection.clone(),
            wait: Some(self.wait),
            payload: payload_to_wire(&self.payload),
            points_selector: Some(selector_to_wire(&self.selector)),
        }
    }

    fn from_wire(request: Self::Request, _: SchemaVersion) -> Result<Self, DecodeError> {
        Ok(Self {
            collection: request.collection_name,
            payload: payload_from_wire(request.payload),
            selector: selector_from_wire(request.points_selector)?,
            wait: request.wait.unwrap_or(false),
        })
    }

    fn output(&self, response: Self::Response, _: SchemaVersion) -> Result<UpdateResult, DecodeError> {
        update_result_from_wire(response.result)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GetPoints {
    pub collection: String,
    pub ids: Vec<PointId>,
    pub with_payload: bool,
    pub with_vectors: bool,
}

impl GetPoints {
    pub fn new(collection: impl Into<String>, ids: Vec<PointId>) -> Self {
        Self {
            collection: collection.into(),
            ids,
            with_payload: true,
            with_vectors: false,
        }
    }

    pub fn with_payload(mut self, enable: bool) -> Self {
        self.with_payload = enable;
        self
    }

    pub fn with_vectors(mut self, enable: bool) -> Self {
        self.with_vectors = enable;
        self
    }
}

impl Operation for GetPoints {
    type Request = pb::GetPoints;
    type Response = pb::GetResponse;
    type Output = Vec<RetrievedPoint>;

    const METHOD: MethodDescriptor = MethodDescriptor::idempotent(methods::POINTS_GET);

    fn to_wire(&self, _: SchemaVersion) -> Self::Request {
        pb::GetPoints {
            collection_name: self.collection.clone(),
            ids: self.ids.iter().map(point_id_to_wire).collect(),
            with_payload: with_payload_selector(self.with_payload),
            with_vectors: with_vectors_selector(self.with_vectors),
        }
    }

    fn from_wire(request: Self::Request, _: SchemaVersion) -> Result<Self, DecodeError> {
        Ok(Self {
            collection: request.collection_name,
            ids: point_ids_from_wire(request.ids)?,
            with_payload: payload_enabled(request.with_payload),
            with_vectors: vectors_enabled(request.with_vectors),
        })
    }

    fn output(
        &self,
        response: Self::Response,
        schema: SchemaVersion,
    ) -> Result<Vec<RetrievedPoint>, DecodeError> {
        response
            .result
            .into_iter()
            .map(|point| {
                Ok(RetrievedPoint {
                    id: point_id_from_wire(point.id)?,
                    payload: payload_from_wire(point.payload),
                    vector: vectors_output(point.vectors, schema)?,
                })
            })
            .collect()
    }
}

/// Nearest-neighbour search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPoints {
    pub collection: String,
    pub vector: Vec<f32>,
    pub limit: u64,
    pub filter: Option<Filter>,
    pub score_threshold: Option<f32>,
    pub offset: Option<u64>,
    pub with_payload: bool,
    pub with_vectors: bool,
    pub hnsw_ef: Option<u64>,
    pub exact: Option<bool>,
}

impl SearchPoints {
    pub fn new(collection: impl Into<String>, vector: Vec<f32>, limit: u64) -> Self {
        Self {
            collection: collection.into(),
            vector,
            limit,
            filter: None,
            score_threshold: None,
            offset: None,
            with_payload: true,
            with_vectors: false,
            hnsw_ef: None,
            exact: None,
        }
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_score_threshold(mut self, threshold: f32) -> Self {
        self.score_threshold = Some(threshold);
        self
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_payload(mut self, enable: bool) -> Self {
        self.with_payload = enable;
        self
    }

    pub fn with_vectors(mut self, enable: bool) -> Self {
        self.with_vectors = enable;
        self
    }

    pub fn with_hnsw_ef(mut self, ef: u64) -> Self {
        self.hnsw_ef = Some(ef);
        self
    }

    /// Bypass the index and scan every point
    pub fn exact(mut self, exact: bool) -> Self {
        self.exact = Some(exact);
        self
    }
}

impl Operation for SearchPoints {
    type Request = pb::SearchPoints;
    type Response = pb::SearchResponse;
    type Output = Vec<ScoredPoint>;

    const METHOD: MethodDescriptor = MethodDescriptor::idempotent(methods::POINTS_SEARCH);

    fn to_wire(&self, _: SchemaVersion) -> Self::Request {
        let params = (self.hnsw_ef.is_some() || self.exact.is_some()).then_some(pb::SearchParams {
            hnsw_ef: self.hnsw_ef,
            exact: self.exact,
        });
        pb::SearchPoints {
            collection_name: self.collection.clone(),
            vector: self.vector.clone(),
            filter: self.filter.as_ref().map(filter_to_wire),
            limit: self.limit,
            with_payload: with_payload_selector(self.with_payload),
            params,
            score_threshold: self.score_threshold,
            offset: self.offset,
            vector_name: None,
            with_vectors: with_vectors_selector(self.with_vectors),
            timeout: None,
        }
    }

    fn from_wire(request: Self::Request, _: SchemaVersion) -> Result<Self, DecodeError> {
        if request.vector.is_empty() {
            return Err(DecodeError::MissingField("vector"));
        }
        let params = request.params.unwrap_or_default();
        Ok(Self {
            collection: request.collection_name,
            vector: request.vector,
            limit: request.limit,
            filter: request.filter.map(filter_from_wire).transpose()?,
            score_threshold: request.score_threshold,
            offset: request.offset,
            with_payload: payload_enabled(request.with_payload),
            with_vectors: vectors_enabled(request.with_vectors),
            hnsw_ef: params.hnsw_ef,
            exact: params.exact,
        })
    }

    fn output(
        &self,
        response: Self::Response,
        schema: SchemaVersion,
    ) -> Result<Vec<ScoredPoint>, DecodeError> {
        response
            .result
            .into_iter()
            .map(|point| {
                Ok(ScoredPoint {
                    id: point_id_from_wire(point.id)?,
                    score: point.score,
                    version: point.version,
                    payload: payload_from_wire(point.payload),
                    vector: vectors_output(point.vectors, schema)?,
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountPoints {
    pub collection: String,
    pub filter: Option<Filter>,
    pub exact: bool,
}

impl CountPoints {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            filter: None,
            exact: true,
        }
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn exact(mut self, exact: bool) -> Self {
        self.exact = exact;
        self
    }
}

impl Operation for CountPoints {
    type Request = pb::CountPoints;
    type Response = pb::CountResponse;
    type Output = u64;

    const METHOD: MethodDescriptor = MethodDescriptor::idempotent(methods::POINTS_COUNT);

    fn to_wire(&self, _: SchemaVersion) -> Self::Request {
        pb::CountPoints {
            collection_name: self.collection.clone(),
            filter: self.filter.as_ref().map(filter_to_wire),
            exact: Some(self.exact),
        }
    }

    fn from_wire(request: Self::Request, _: SchemaVersion) -> Result<Self, DecodeError> {
        Ok(Self {
            collection: request.collection_name,
            filter: request.filter.map(filter_from_wire).transpose()?,
            exact: request.exact.unwrap_or(false),
        })
    }

    fn output(&self, response: Self::Response, _: SchemaVersion) -> Result<u64, DecodeError> {
        response
            .result
            .map(|r| r.count)
            .ok_or(DecodeError::MissingField("result"))
    }
}

// ---------------------------------------------------------------------------
// collections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CreateCollection {
    pub name: String,
    pub config: VectorConfig,
}

impl CreateCollection {
    pub fn new(name: impl Into<String>, config: VectorConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }
}

impl Operation for CreateCollection {
    type Request = pb::CreateCollection;
    type Response = pb::CollectionOperationResponse;
    type Output = bool;

    const METHOD: MethodDescriptor = MethodDescriptor::non_idempotent(methods::COLLECTIONS_CREATE);

    fn to_wire(&self, _: SchemaVersion) -> Self::Request {
        pb::CreateCollection {
            collection_name: self.name.clone(),
            vectors_config: Some(vectors_config_to_wire(&self.config)),
            ..Default::default()
        }
    }

    fn from_wire(request: Self::Request, _: SchemaVersion) -> Result<Self, DecodeError> {
        let config = request
            .vectors_config
            .ok_or(DecodeError::MissingField("vectors_config"))?;
        Ok(Self {
            name: request.collection_name,
            config: vectors_config_from_wire(config)?,
        })
    }

    fn output(&self, response: Self::Response, _: SchemaVersion) -> Result<bool, DecodeError> {
        Ok(response.result)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteCollection {
    pub name: String,
}

impl DeleteCollection {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Operation for DeleteCollection {
    type Request = pb::DeleteCollection;
    type Response = pb::CollectionOperationResponse;
    type Output = bool;

    const METHOD: MethodDescriptor = MethodDescriptor::non_idempotent(methods::COLLECTIONS_DELETE);

    fn to_wire(&self, _: SchemaVersion) -> Self::Request {
        pb::DeleteCollection {
            collection_name: self.name.clone(),
            timeout: None,
        }
    }

    fn from_wire(request: Self::Request, _: SchemaVersion) -> Result<Self, DecodeError> {
        Ok(Self {
            name: request.collection_name,
        })
    }

    fn output(&self, response: Self::Response, _: SchemaVersion) -> Result<bool, DecodeError> {
        Ok(response.result)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetCollection {
    pub name: String,
}

impl GetCollection {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Operation for GetCollection {
    type Request = pb::GetCollectionInfoRequest;
    type Response = pb::GetCollectionInfoResponse;
    type Output = CollectionInfo;

    const METHOD: MethodDescriptor = MethodDescriptor::idempotent(methods::COLLECTIONS_GET);

    fn to_wire(&self, _: SchemaVersion) -> Self::Request {
        pb::GetCollectionInfoRequest {
            collection_name: self.name.clone(),
        }
    }

    fn from_wire(request: Self::Request, _: SchemaVersion) -> Result<Self, DecodeError> {
        Ok(Self {
            name: request.collection_name,
        })
    }

    fn output(&self, response: Self::Response, _: SchemaVersion) -> Result<CollectionInfo, DecodeError> {
        let info = response.result.ok_or(DecodeError::MissingField("result"))?;
        let config = match info.config {
            Some(config) => {
                let collection_hnsw = config.hnsw_config.map(hnsw_from_wire);
                match config.params.and_then(|p| p.vectors_config) {
                    Some(vectors) => {
                        let mut vectors = vectors_config_from_wire(vectors)?;
                        // Per-vector HNSW settings override the collection-wide ones
                        vectors.hnsw = vectors.hnsw.or(collection_hnsw);
                        Some(vectors)
                    }
                    None => None,
                }
            }
            None => None,
        };
        Ok(CollectionInfo {
            name: self.name.clone(),
            status: collection_status_from_wire(info.status)?,
            points_count: info.points_count.unwrap_or_default(),
            indexed_vectors_count: info.indexed_vectors_count.unwrap_or_default(),
            segments_count: info.segments_count,
            config,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListCollections;

impl Operation for ListCollections {
    type Request = pb::ListCollectionsRequest;
    type Response = pb::ListCollectionsResponse;
    type Output = Vec<String>;

    const METHOD: MethodDescriptor = MethodDescriptor::idempotent(methods::COLLECTIONS_LIST);

    fn to_wire(&self, _: SchemaVersion) -> Self::Request {
        pb::ListCollectionsRequest {}
    }

    fn from_wire(_: Self::Request, _: SchemaVersion) -> Result<Self, DecodeError> {
        Ok(ListCollections)
    }

    fn output(&self, response: Self::Response, _: SchemaVersion) -> Result<Vec<String>, DecodeError> {
        Ok(response.collections.into_iter().map(|c| c.name).collect())
    }
}

// ---------------------------------------------------------------------------
// service
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HealthCheck;

impl Operation for HealthCheck {
    type Request = pb::HealthCheckRequest;
    type Response = pb::HealthCheckReply;
    type Output = HealthInfo;

    const METHOD: MethodDescriptor = MethodDescriptor::idempotent(methods::QDRANT_HEALTH_CHECK);

    fn to_wire(&self, _: SchemaVersion) -> Self::Request {
        pb::HealthCheckRequest {}
    }

    fn from_wire(_: Self::Request, _: SchemaVersion) -> Result<Self, DecodeError> {
        Ok(HealthCheck)
    }

    fn output(&self, response: Self::Response, _: SchemaVersion) -> Result<HealthInfo, DecodeError> {
        Ok(HealthInfo {
            title: response.title,
            version: response.version,
            commit: response.commit,
        })
    }
}
