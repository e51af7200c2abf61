//! End-to-end tests of the typed client against an in-memory Qdrant that
//! speaks the real protobuf messages.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use domain_vector::{
    CallError, CallOptions, CancellationToken, Condition, DistanceMetric, Filter, HealthCheck,
    Payload, Point, PointId, PointsSelector, QdrantClient, QdrantConfig, SchemaVersion,
    SearchPoints, VectorConfig, VectorError, VectorService,
};
use grpc_client::{CallResult, DecodeError, MethodDescriptor, Transport, decode_message, encode_message};
use protos::methods;
use protos::qdrant as pb;
use serde_json::json;

#[derive(Clone)]
struct StoredPoint {
    vector: Vec<f32>,
    payload: BTreeMap<String, pb::Value>,
}

struct Collection {
    dimension: u64,
    points: BTreeMap<u64, StoredPoint>,
}

#[derive(Default)]
struct InMemoryQdrant {
    collections: Mutex<BTreeMap<String, Collection>>,
    delay: Mutex<Option<Duration>>,
    calls: AtomicU32,
}

fn invalid(message: impl Into<String>) -> CallError {
    CallError::Rpc {
        code: tonic::Code::InvalidArgument,
        message: message.into(),
    }
}

fn not_found(collection: &str) -> CallError {
    CallError::Rpc {
        code: tonic::Code::NotFound,
        message: format!("Collection `{collection}` doesn't exist!"),
    }
}

fn bad_request(err: DecodeError) -> CallError {
    invalid(err.to_string())
}

fn num_id(id: &pb::PointId) -> Result<u64, CallError> {
    match id.point_id_options {
        Some(pb::point_id::PointIdOptions::Num(n)) => Ok(n),
        _ => Err(invalid("only numeric ids are supported")),
    }
}

fn wire_id(id: u64) -> Option<pb::PointId> {
    Some(pb::PointId {
        point_id_options: Some(pb::point_id::PointIdOptions::Num(id)),
    })
}

#[allow(deprecated)]
fn read_vector(vectors: Option<pb::Vectors>) -> Result<Vec<f32>, CallError> {
    match vectors.and_then(|v| v.vectors_options) {
        Some(pb::vectors::VectorsOptions::Vector(vector)) => Ok(match vector.vector {
            Some(pb::vector::Vector::Dense(dense)) => dense.data,
            None => vector.data,
        }),
        None => Err(invalid("point has no vector")),
    }
}

// replies always use the dense layout, like a current server
#[allow(deprecated)]
fn vector_output(vector: &[f32]) -> pb::VectorsOutput {
    pb::VectorsOutput {
        vectors_options: Some(pb::vectors_output::VectorsOptions::Vector(pb::VectorOutput {
            data: Vec::new(),
            vector: Some(pb::vector_output::Vector::Dense(pb::DenseVector {
                data: vector.to_vec(),
            })),
        })),
    }
}

fn enabled(selector: Option<pb::WithVectorsSelector>) -> bool {
    matches!(
        selector.and_then(|s| s.selector_options),
        Some(pb::with_vectors_selector::SelectorOptions::Enable(true))
    )
}

fn condition_matches(condition: &pb::Condition, id: u64, point: &StoredPoint) -> bool {
    use pb::condition::ConditionOneOf;
    use pb::r#match::MatchValue;
    use pb::value::Kind;

    match &condition.condition_one_of {
        Some(ConditionOneOf::Field(field)) => {
            let Some(value) = point.payload.get(&field.key) else {
                return false;
            };
            let wanted = field.r#match.as_ref().and_then(|m| m.match_value.as_ref());
            match (wanted, &value.kind) {
                (Some(MatchValue::Keyword(k)), Some(Kind::StringValue(s))) => k == s,
                (Some(MatchValue::Integer(i)), Some(Kind::IntegerValue(v))) => i == v,
                (Some(MatchValue::Boolean(b)), Some(Kind::BoolValue(v))) => b == v,
                _ => false,
            }
        }
        Some(ConditionOneOf::HasId(has_id)) => has_id
            .has_id
            .iter()
            .any(|pid| matches!(pid.point_id_options, Some(pb::point_id::PointIdOptions::Num(n)) if n == id)),
        Some(ConditionOneOf::Filter(filter)) => filter_matches(filter, id, point),
        None => false,
    }
}

fn filter_matches(filter: &pb::Filter, id: u64, point: &StoredPoint) -> bool {
    filter.must.iter().all(|c| condition_matches(c, id, point))
        && !filter.must_not.iter().any(|c| condition_matches(c, id, point))
        && (filter.should.is_empty() || filter.should.iter().any(|c| condition_matches(c, id, point)))
}

fn completed() -> Bytes {
    encode_message(&pb::PointsOperationResponse {
        result: Some(pb::UpdateResult {
            operation_id: Some(0),
            status: pb::UpdateStatus::Completed as i32,
        }),
        time: 0.0,
    })
}

impl InMemoryQdrant {
    fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    fn point_ids(&self, collection: &str) -> Vec<u64> {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .map(|c| c.points.keys().copied().collect())
            .unwrap_or_default()
    }

    fn with_collection<R>(
        &self,
        name: &str,
        f: impl FnOnce(&mut Collection) -> Result<R, CallError>,
    ) -> Result<R, CallError> {
        let mut collections = self.collections.lock().unwrap();
        let collection = collections.get_mut(name).ok_or_else(|| not_found(name))?;
        f(collection)
    }

    fn selected(collection: &Collection, selector: Option<pb::PointsSelector>) -> Result<Vec<u64>, CallError> {
        use pb::points_selector::PointsSelectorOneOf;

        match selector.and_then(|s| s.points_selector_one_of) {
            Some(PointsSelectorOneOf::Points(list)) => list.ids.iter().map(num_id).collect(),
            Some(PointsSelectorOneOf::Filter(filter)) => Ok(collection
                .points
                .iter()
                .filter(|(id, point)| filter_matches(&filter, **id, point))
                .map(|(id, _)| *id)
                .collect()),
            None => Err(invalid("missing selector")),
        }
    }

    fn handle(&self, path: &str, payload: Bytes) -> CallResult<Bytes> {
        match path {
            methods::QDRANT_HEALTH_CHECK => Ok(encode_message(&pb::HealthCheckReply {
                title: "qdrant - vector search engine".into(),
                version: "1.13.0".into(),
                commit: None,
            })),
            methods::COLLECTIONS_CREATE => {
                let request: pb::CreateCollection = decode_message(payload).map_err(bad_request)?;
                let Some(pb::vectors_config::Config::Params(params)) =
                    request.vectors_config.and_then(|c| c.config)
                else {
                    return Err(invalid("missing vectors config"));
                };
                let mut collections = self.collections.lock().unwrap();
                let created = !collections.contains_key(&request.collection_name);
                collections.entry(request.collection_name).or_insert(Collection {
                    dimension: params.size,
                    points: BTreeMap::new(),
                });
                Ok(encode_message(&pb::CollectionOperationResponse {
                    result: created,
                    time: 0.0,
                }))
            }
            methods::COLLECTIONS_LIST => {
                let collections = self.collections.lock().unwrap();
                Ok(encode_message(&pb::ListCollectionsResponse {
                    collections: collections
                        .keys()
                        .map(|name| pb::CollectionDescription { name: name.clone() })
                        .collect(),
                    time: 0.0,
                }))
            }
            methods::COLLECTIONS_GET => {
                let request: pb::GetCollectionInfoRequest =
                    decode_message(payload).map_err(bad_request)?;
                self.with_collection(&request.collection_name, |c| {
                    Ok(encode_message(&pb::GetCollectionInfoResponse {
                        result: Some(pb::CollectionInfo {
                            status: pb::CollectionStatus::Green as i32,
                            segments_count: 1,
                            points_count: Some(c.points.len() as u64),
                            config: Some(pb::CollectionConfig {
                                params: Some(pb::CollectionParams {
                                    vectors_config: Some(pb::VectorsConfig {
                                        config: Some(pb::vectors_config::Config::Params(
                                            pb::VectorParams {
                                                size: c.dimension,
                                                distance: pb::Distance::Cosine as i32,
                                                ..Default::default()
                                            },
                                        )),
                                    }),
                                    ..Default::default()
                                }),
                                hnsw_config: None,
                            }),
                            ..Default::default()
                        }),
                        time: 0.0,
                    }))
                })
            }
            methods::POINTS_UPSERT => {
                let request: pb::UpsertPoints = decode_message(payload).map_err(bad_request)?;
                self.with_collection(&request.collection_name, |c| {
                    let mut staged = Vec::new();
                    for point in request.points {
                        let id = num_id(&point.id.ok_or_else(|| invalid("point without id"))?)?;
                        let vector = read_vector(point.vectors)?;
                        if vector.len() as u64 != c.dimension {
                            return Err(invalid(format!(
                                "Wrong input: Vector dimension error: expected dim: {}, got {}",
                                c.dimension,
                                vector.len()
                            )));
                        }
                        staged.push((id, StoredPoint { vector, payload: point.payload }));
                    }
                    c.points.extend(staged);
                    Ok(completed())
                })
            }
            methods::POINTS_SET_PAYLOAD => {
                let request: pb::SetPayloadPoints = decode_message(payload).map_err(bad_request)?;
                self.with_collection(&request.collection_name, |c| {
                    for id in Self::selected(c, request.points_selector)? {
                        if let Some(point) = c.points.get_mut(&id) {
                            point.payload.extend(request.payload.clone());
                        }
                    }
                    Ok(completed())
                })
            }
            methods::POINTS_DELETE => {
                let request: pb::DeletePoints = decode_message(payload).map_err(bad_request)?;
                self.with_collection(&request.collection_name, |c| {
                    for id in Self::selected(c, request.points)? {
                        c.points.remove(&id);
                    }
                    Ok(completed())
                })
            }
            methods::POINTS_COUNT => {
                let request: pb::CountPoints = decode_message(payload).map_err(bad_request)?;
                self.with_collection(&request.collection_name, |c| {
                    let count = c
                        .points
                        .iter()
                        .filter(|(id, p)| request.filter.as_ref().is_none_or(|f| filter_matches(f, **id, p)))
                        .count();
                    Ok(encode_message(&pb::CountResponse {
                        result: Some(pb::CountResult { count: count as u64 }),
                        time: 0.0,
                    }))
                })
            }
            methods::POINTS_GET => {
                let request: pb::GetPoints = decode_message(payload).map_err(bad_request)?;
                let with_vectors = enabled(request.with_vectors);
                self.with_collection(&request.collection_name, |c| {
                    let mut result = Vec::new();
                    for id in &request.ids {
                        let id = num_id(id)?;
                        if let Some(point) = c.points.get(&id) {
                            result.push(pb::RetrievedPoint {
                                id: wire_id(id),
                                payload: point.payload.clone(),
                                vectors: with_vectors.then(|| vector_output(&point.vector)),
                            });
                        }
                    }
                    Ok(encode_message(&pb::GetResponse { result, time: 0.0 }))
                })
            }
            methods::POINTS_SEARCH => {
                let request: pb::SearchPoints = decode_message(payload).map_err(bad_request)?;
                let with_vectors = enabled(request.with_vectors);
                self.with_collection(&request.collection_name, |c| {
                    let mut hits: Vec<pb::ScoredPoint> = c
                        .points
                        .iter()
                        .filter(|(id, p)| request.filter.as_ref().is_none_or(|f| filter_matches(f, **id, p)))
                        .map(|(id, p)| pb::ScoredPoint {
                            id: wire_id(*id),
                            payload: p.payload.clone(),
                            score: p.vector.iter().zip(&request.vector).map(|(a, b)| a * b).sum(),
                            version: 0,
                            vectors: with_vectors.then(|| vector_output(&p.vector)),
                        })
                        .collect();
                    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
                    hits.truncate(request.limit as usize);
                    Ok(encode_message(&pb::SearchResponse { result: hits, time: 0.0 }))
                })
            }
            other => Err(CallError::Rpc {
                code: tonic::Code::Unimplemented,
                message: format!("unknown method {other}"),
            }),
        }
    }
}

#[async_trait]
impl Transport for InMemoryQdrant {
    async fn unary(
        &self,
        method: &MethodDescriptor,
        payload: Bytes,
        _timeout: Option<Duration>,
    ) -> CallResult<Bytes> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.handle(method.path, payload)
    }

    fn close(&self) -> bool {
        false
    }

    fn is_closed(&self) -> bool {
        false
    }
}

fn config() -> QdrantConfig {
    QdrantConfig::default().with_backoff(10, 100)
}

fn client_with(config: QdrantConfig) -> (Arc<InMemoryQdrant>, QdrantClient<Arc<InMemoryQdrant>>) {
    let server = Arc::new(InMemoryQdrant::default());
    let client = QdrantClient::with_transport(Arc::clone(&server), config).unwrap();
    (server, client)
}

fn payload(value: serde_json::Value) -> Payload {
    value.as_object().cloned().unwrap_or_default()
}

fn sample_points() -> Vec<Point> {
    vec![
        Point::new(1u64, vec![1.0, 0.0]).with_payload(payload(json!({"lang": "en", "i": 1}))),
        Point::new(2u64, vec![0.8, 0.6]).with_payload(payload(json!({"lang": "de", "i": 2}))),
        Point::new(3u64, vec![0.0, 1.0]).with_payload(payload(json!({"lang": "en", "i": 3}))),
    ]
}

async fn seeded(config: QdrantConfig) -> (Arc<InMemoryQdrant>, QdrantClient<Arc<InMemoryQdrant>>) {
    let (server, client) = client_with(config);
    assert!(
        client
            .create_collection("docs", VectorConfig::new(2).with_distance(DistanceMetric::Cosine))
            .await
            .unwrap()
    );
    client.upsert("docs", sample_points(), true).await.unwrap();
    (server, client)
}

#[tokio::test]
async fn test_points_round_trip() {
    let (_server, client) = seeded(config()).await;

    let health = client.health_check().await.unwrap();
    assert_eq!(health.version, "1.13.0");

    let hits = client
        .search(SearchPoints::new("docs", vec![1.0, 0.0], 2))
        .await
        .unwrap();
    let ids: Vec<_> = hits.iter().map(|h| h.id.clone()).collect();
    assert_eq!(ids, vec![PointId::Num(1), PointId::Num(2)]);
    assert_eq!(hits[0].payload["lang"], json!("en"));
    assert!(hits[0].vector.is_none());

    let filtered = client
        .search(
            SearchPoints::new("docs", vec![1.0, 0.0], 10)
                .with_filter(Filter::must([Condition::matches("lang", "en")]))
                .with_vectors(true),
        )
        .await
        .unwrap();
    assert_eq!(filtered.len(), 2);
    assert_eq!(filtered[1].vector.as_deref(), Some(&[0.0, 1.0][..]));

    assert_eq!(client.count("docs", None, true).await.unwrap(), 3);

    let fetched = client
        .get("docs", vec![PointId::Num(3), PointId::Num(42)], false)
        .await
        .unwrap();
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].payload["i"], json!(3));

    client
        .delete("docs", PointsSelector::Ids(vec![PointId::Num(2)]), true)
        .await
        .unwrap();
    assert_eq!(client.count("docs", None, true).await.unwrap(), 2);
}

#[tokio::test]
async fn test_collections() {
    let (_server, client) = seeded(config()).await;

    assert_eq!(client.list_collections().await.unwrap(), vec!["docs".to_string()]);

    let info = client.get_collection("docs").await.unwrap();
    assert_eq!(info.points_count, 3);
    assert_eq!(info.config.map(|c| c.dimension), Some(2));

    let err = client.get_collection("missing").await.unwrap_err();
    assert!(matches!(err, VectorError::NotFound(_)));
}

#[tokio::test]
async fn test_soft_delete_hides_then_purges() {
    let (server, client) = seeded(config()).await;
    let service = VectorService::new(client).with_soft_delete_threshold(1);

    let first = service
        .soft_delete("docs", vec![PointId::Num(1)], true)
        .await
        .unwrap();
    assert_eq!(first.soft_deleted, 1);
    assert!(first.purged.is_none());
    assert_eq!(server.point_ids("docs"), vec![1, 2, 3]);

    let hits = service
        .search(SearchPoints::new("docs", vec![1.0, 0.0], 10))
        .await
        .unwrap();
    assert!(hits.iter().all(|h| h.id != PointId::Num(1)));
    assert_eq!(service.count("docs", None).await.unwrap(), 2);

    let second = service
        .soft_delete("docs", vec![PointId::Num(2)], true)
        .await
        .unwrap();
    assert_eq!(second.soft_deleted, 2);
    assert!(second.purged.is_some());
    assert_eq!(server.point_ids("docs"), vec![3]);
}

#[tokio::test]
async fn test_batch_upsert_is_per_point() {
    let (server, client) = client_with(config().with_batch_size(2));
    client
        .create_collection("docs", VectorConfig::new(2))
        .await
        .unwrap();

    let points = vec![
        Point::new(1u64, vec![1.0, 0.0]),
        Point::new(2u64, vec![0.0, 1.0]),
        Point::new(3u64, vec![1.0, 1.0, 1.0]),
        Point::new(4u64, vec![0.5, 0.5]),
        Point::new(5u64, vec![0.2, 0.8]),
    ];
    let report = client.upsert_batch("docs", points).await;

    assert_eq!(report.len(), 5);
    assert_eq!(report.succeeded(), 3);
    let failed: Vec<_> = report.failed().map(|item| item.id.clone()).collect();
    assert_eq!(failed, vec![PointId::Num(3), PointId::Num(4)]);
    assert_eq!(server.point_ids("docs"), vec![1, 2, 5]);
}

#[tokio::test]
async fn test_legacy_schema_cannot_read_dense_replies() {
    let (_server, client) = seeded(config().with_schema_version(SchemaVersion::Legacy)).await;

    // payload-only reads carry no vectors and still work
    let hits = client
        .search(SearchPoints::new("docs", vec![1.0, 0.0], 1))
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);

    let err = client
        .search(SearchPoints::new("docs", vec![1.0, 0.0], 1).with_vectors(true))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        VectorError::Call(CallError::Decode(DecodeError::VersionMismatch(_)))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_wins_over_slow_server() {
    let (server, client) = client_with(config());
    server.set_delay(Duration::from_secs(10));

    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let options = CallOptions::new().with_cancellation(token);
    let err = client.call(HealthCheck, &options).await.unwrap_err();
    assert!(matches!(err, VectorError::Call(CallError::Cancelled)));
    assert_eq!(server.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_exhausts_retries() {
    let (server, client) = client_with(config().with_max_retries(2));
    server.set_delay(Duration::from_secs(5));

    let options = CallOptions::new().with_timeout(Duration::from_millis(100));
    let err = client.call(HealthCheck, &options).await.unwrap_err();

    assert!(matches!(
        err,
        VectorError::Call(CallError::Exhausted { attempts: 3, .. })
    ));
    assert!(matches!(err.call_error(), Some(CallError::Timeout)));
    assert_eq!(server.calls.load(Ordering::SeqCst), 3);
}
