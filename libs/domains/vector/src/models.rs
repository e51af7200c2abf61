use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::VectorError;

/// Point payload. `serde_json::Map` is ordered by key, which keeps encoding deterministic.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Payload key that marks a point as soft-deleted
pub const SOFT_DELETE_FIELD: &str = "__soft_deleted";

/// Reject payload numbers the wire cannot carry exactly
///
/// Qdrant integers are `i64`; an unsigned value above `i64::MAX` would
/// silently become a double.
pub fn validate_payload(payload: &Payload) -> Result<(), VectorError> {
    fn check(key: &str, value: &serde_json::Value) -> Result<(), VectorError> {
        match value {
            serde_json::Value::Number(n) if n.is_u64() && !n.is_i64() => Err(VectorError::Validation(
                format!("payload field '{key}' holds {n}, which does not fit in a signed 64-bit integer"),
            )),
            serde_json::Value::Array(items) => items.iter().try_for_each(|item| check(key, item)),
            serde_json::Value::Object(map) => map.iter().try_for_each(|(k, v)| check(k, v)),
            _ => Ok(()),
        }
    }
    payload.iter().try_for_each(|(key, value)| check(key, value))
}

/// Point identifier: Qdrant accepts unsigned integers or UUIDs
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointId {
    Num(u64),
    Uuid(Uuid),
}

impl From<u64> for PointId {
    fn from(id: u64) -> Self {
        PointId::Num(id)
    }
}

impl From<Uuid> for PointId {
    fn from(id: Uuid) -> Self {
        PointId::Uuid(id)
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointId::Num(id) => write!(f, "{id}"),
            PointId::Uuid(id) => write!(f, "{id}"),
        }
    }
}

/// A point to store: id, dense vector and payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: PointId,
    pub vector: Vec<f32>,
    #[serde(default)]
    pub payload: Payload,
}

impl Point {
    pub fn new(id: impl Into<PointId>, vector: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            vector,
            payload: Payload::new(),
        }
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    /// Reject vectors the server would refuse anyway
    pub fn validate(&self) -> Result<(), VectorError> {
        if self.vector.is_empty() {
            return Err(VectorError::Validation(format!(
                "point {} has an empty vector",
                self.id
            )));
        }
        if let Some(pos) = self.vector.iter().position(|v| !v.is_finite()) {
            return Err(VectorError::Validation(format!(
                "point {} has a non-finite value at index {pos}",
                self.id
            )));
        }
        validate_payload(&self.payload)
    }
}

/// Distance metric for similarity calculations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DistanceMetric {
    #[default]
    Cosine,
    Euclidean,
    DotProduct,
    Manhattan,
}

/// HNSW index configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HnswConfig {
    pub m: Option<u64>,
    pub ef_construct: Option<u64>,
    pub full_scan_threshold: Option<u64>,
}

impl Default for HnswConfig {
    fn default() -> Self {
        Self {
            m: Some(16),
            ef_construct: Some(100),
            full_scan_threshold: None,
        }
    }
}

/// Vector collection configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorConfig {
    pub dimension: u64,
    pub distance: DistanceMetric,
    pub hnsw: Option<HnswConfig>,
    pub on_disk: Option<bool>,
}

impl VectorConfig {
    pub fn new(dimension: u64) -> Self {
        Self {
            dimension,
            distance: DistanceMetric::default(),
            hnsw: None,
            on_disk: None,
        }
    }

    pub fn with_distance(mut self, distance: DistanceMetric) -> Self {
        self.distance = distance;
        self
    }

    pub fn with_hnsw(mut self, hnsw: HnswConfig) -> Self {
        self.hnsw = Some(hnsw);
        self
    }

    pub fn on_disk(mut self, on_disk: bool) -> Self {
        self.on_disk = Some(on_disk);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionStatus {
    Green,
    Yellow,
    Red,
    Grey,
}

impl CollectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionStatus::Green => "green",
            CollectionStatus::Yellow => "yellow",
            CollectionStatus::Red => "red",
            CollectionStatus::Grey => "grey",
        }
    }
}

/// Collection information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub name: String,
    pub status: CollectionStatus,
    pub points_count: u64,
    pub indexed_vectors_count: u64,
    pub segments_count: u64,
    /// Absent when the server reports a multi-vector layout
    pub config: Option<VectorConfig>,
}

/// Value a payload field is compared against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchValue {
    Keyword(String),
    Integer(i64),
    Bool(bool),
    /// Full-text match (requires a text index)
    Text(String),
}

impl From<bool> for MatchValue {
    fn from(value: bool) -> Self {
        MatchValue::Bool(value)
    }
}

impl From<i64> for MatchValue {
    fn from(value: i64) -> Self {
        MatchValue::Integer(value)
    }
}

impl From<&str> for MatchValue {
    fn from(value: &str) -> Self {
        MatchValue::Keyword(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    Match { key: String, value: MatchValue },
    HasId(Vec<PointId>),
    Nested(Filter),
}

impl Condition {
    pub fn matches(key: impl Into<String>, value: impl Into<MatchValue>) -> Self {
        Condition::Match {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn has_id(ids: impl IntoIterator<Item = PointId>) -> Self {
        Condition::HasId(ids.into_iter().collect())
    }
}

/// Boolean combination of conditions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub must: Vec<Condition>,
    pub should: Vec<Condition>,
    pub must_not: Vec<Condition>,
}

impl Filter {
    pub fn must(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Self {
            must: conditions.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn should(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Self {
            should: conditions.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn must_not(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Self {
            must_not: conditions.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn and_must_not(mut self, condition: Condition) -> Self {
        self.must_not.push(condition);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.must.is_empty() && self.should.is_empty() && self.must_not.is_empty()
    }

    /// Points carrying the soft-delete marker
    pub fn soft_deleted() -> Self {
        Self::must([Condition::matches(SOFT_DELETE_FIELD, true)])
    }
}

/// Which points an update or delete applies to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointsSelector {
    Ids(Vec<PointId>),
    Filter(Filter),
}

impl From<Vec<PointId>> for PointsSelector {
    fn from(ids: Vec<PointId>) -> Self {
        PointsSelector::Ids(ids)
    }
}

impl From<Filter> for PointsSelector {
    fn from(filter: Filter) -> Self {
        PointsSelector::Filter(filter)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateStatus {
    Unknown,
    /// Received, not yet applied
    Acknowledged,
    /// Applied and visible to search
    Completed,
    ClockRejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResult {
    pub operation_id: Option<u64>,
    pub status: UpdateStatus,
}

/// Search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPoint {
    pub id: PointId,
    pub score: f32,
    pub version: u64,
    pub payload: Payload,
    pub vector: Option<Vec<f32>>,
}

/// Point fetched by id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedPoint {
    pub id: PointId,
    pub payload: Payload,
    pub vector: Option<Vec<f32>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthInfo {
    pub title: String,
    pub version: String,
    pub commit: Option<String>,
}

/// Outcome of one point in a batch upsert
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub id: PointId,
    pub outcome: Result<UpdateResult, VectorError>,
}

/// Per-point results of a non-atomic batch upsert, in input order
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub items: Vec<BatchItem>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|item| item.outcome.is_ok()).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &BatchItem> {
        self.items.iter().filter(|item| item.outcome.is_err())
    }

    pub fn is_complete(&self) -> bool {
        self.items.iter().all(|item| item.outcome.is_ok())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// What a soft delete did
#[derive(Debug, Clone, PartialEq)]
pub struct SoftDeleteReport {
    pub marked: UpdateResult,
    /// Soft-deleted points in the collection after marking
    pub soft_deleted: u64,
    /// Present when the threshold was exceeded and the marked points were purged
    pub purged: Option<UpdateResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_id_serde_untagged() {
        let num: PointId = serde_json::from_str("7").unwrap();
        assert_eq!(num, PointId::Num(7));

        let uuid: PointId = serde_json::from_str("\"67e55044-10b1-426f-9247-bb680e5fe0c8\"").unwrap();
        assert!(matches!(uuid, PointId::Uuid(_)));
        assert_eq!(uuid.to_string(), "67e55044-10b1-426f-9247-bb680e5fe0c8");
    }

    #[test]
    fn test_point_validation() {
        assert!(Point::new(1u64, vec![0.1, 0.2]).validate().is_ok());
        assert!(matches!(
            Point::new(1u64, vec![]).validate(),
            Err(VectorError::Validation(_))
        ));
        let err = Point::new(2u64, vec![0.1, f32::NAN]).validate().unwrap_err();
        assert!(err.to_string().contains("index 1"));
    }

    #[test]
    fn test_payload_integers_must_fit_i64() {
        let mut payload = Payload::new();
        payload.insert("max".into(), serde_json::json!(i64::MAX));
        payload.insert("min".into(), serde_json::json!(i64::MIN));
        payload.insert("ratio".into(), serde_json::json!(0.5));
        assert!(validate_payload(&payload).is_ok());

        payload.insert("nested".into(), serde_json::json!({"ids": [1, u64::MAX]}));
        let err = Point::new(1u64, vec![0.1]).with_payload(payload).validate().unwrap_err();
        assert!(matches!(err, VectorError::Validation(_)));
        assert!(err.to_string().contains("'ids'"), "{err}");
    }

    #[test]
    fn test_soft_deleted_filter() {
        let filter = Filter::soft_deleted();
        assert_eq!(
            filter.must,
            vec![Condition::Match {
                key: SOFT_DELETE_FIELD.to_string(),
                value: MatchValue::Bool(true),
            }]
        );
        assert!(filter.must_not.is_empty());
        assert!(!filter.is_empty());
        assert!(Filter::default().is_empty());
    }

    #[test]
    fn test_point_deserializes_without_payload() {
        let point: Point = serde_json::from_str(r#"{"id": 3, "vector": [1.0, 0.0]}"#).unwrap();
        assert_eq!(point.id, PointId::Num(3));
        assert!(point.payload.is_empty());
    }

    #[test]
    fn test_batch_report_counts() {
        let ok = UpdateResult {
            operation_id: Some(1),
            status: UpdateStatus::Completed,
        };
        let report = BatchReport {
            items: vec![
                BatchItem { id: 1u64.into(), outcome: Ok(ok) },
                BatchItem {
                    id: 2u64.into(),
                    outcome: Err(VectorError::Validation("empty".into())),
                },
            ],
        };
        assert_eq!(report.len(), 2);
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed().count(), 1);
        assert!(!report.is_complete());
    }
}
