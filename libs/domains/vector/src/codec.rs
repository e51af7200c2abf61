//! Typed model <-> Qdrant wire messages.
//!
//! Everything here is pure and deterministic: payload maps are ordered, so
//! the same typed request always serializes to the same bytes.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use grpc_client::{DecodeError, decode_message, encode_message};
use protos::qdrant as pb;
use serde::{Deserialize, Serialize};

use crate::models::{
    CollectionStatus, Condition, DistanceMetric, Filter, HnswConfig, MatchValue, Payload, PointId,
    PointsSelector, UpdateResult, UpdateStatus, VectorConfig,
};
use crate::operations::Operation;

/// Which wire layout dense vectors use
///
/// `Legacy` servers only understand the flat `Vector.data` field; `Current`
/// servers use the typed `Vector.dense` oneof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SchemaVersion {
    Legacy,
    #[default]
    Current,
}

impl FromStr for SchemaVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" | "v1" => Ok(SchemaVersion::Legacy),
            "current" | "v2" => Ok(SchemaVersion::Current),
            other => Err(format!("unknown schema version '{other}' (expected legacy or current)")),
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaVersion::Legacy => f.write_str("legacy"),
            SchemaVersion::Current => f.write_str("current"),
        }
    }
}

impl SchemaVersion {
    #[allow(deprecated)]
    pub(crate) fn vector_to_wire(self, values: &[f32]) -> pb::Vector {
        match self {
            SchemaVersion::Legacy => pb::Vector {
                data: values.to_vec(),
                vector: None,
            },
            SchemaVersion::Current => pb::Vector {
                data: Vec::new(),
                vector: Some(pb::vector::Vector::Dense(pb::DenseVector {
                    data: values.to_vec(),
                })),
            },
        }
    }

    #[allow(deprecated)]
    pub(crate) fn vector_from_wire(self, vector: pb::Vector) -> Result<Vec<f32>, DecodeError> {
        let dense = vector.vector.map(|pb::vector::Vector::Dense(d)| d.data);
        self.read_dense(vector.data, dense)
    }

    #[allow(deprecated)]
    pub(crate) fn vector_output_from_wire(
        self,
        vector: pb::VectorOutput,
    ) -> Result<Vec<f32>, DecodeError> {
        let dense = vector.vector.map(|pb::vector_output::Vector::Dense(d)| d.data);
        self.read_dense(vector.data, dense)
    }

    fn read_dense(self, data: Vec<f32>, dense: Option<Vec<f32>>) -> Result<Vec<f32>, DecodeError> {
        match (self, dense) {
            (SchemaVersion::Current, Some(dense)) => Ok(dense),
            (SchemaVersion::Legacy, Some(_)) if data.is_empty() => Err(DecodeError::VersionMismatch(
                "dense vector layout is not readable with the legacy schema".to_string(),
            )),
            _ => Ok(data),
        }
    }
}

/// Encodes typed operations and decodes their replies for one schema version
#[derive(Debug, Clone, Copy, Default)]
pub struct WireCodec {
    schema: SchemaVersion,
}

impl WireCodec {
    pub fn new(schema: SchemaVersion) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> SchemaVersion {
        self.schema
    }

    pub fn encode_request<O: Operation>(&self, operation: &O) -> Bytes {
        encode_message(&operation.to_wire(self.schema))
    }

    pub fn decode_request<O: Operation>(&self, bytes: Bytes) -> Result<O, DecodeError> {
        O::from_wire(decode_message(bytes)?, self.schema)
    }

    /// Decode the reply to `operation`
    pub fn decode_response<O: Operation>(
        &self,
        operation: &O,
        bytes: Bytes,
    ) -> Result<O::Output, DecodeError> {
        operation.output(decode_message(bytes)?, self.schema)
    }
}

// ---------------------------------------------------------------------------
// ids
// ---------------------------------------------------------------------------

pub(crate) fn point_id_to_wire(id: &PointId) -> pb::PointId {
    let options = match id {
        PointId::Num(num) => pb::point_id::PointIdOptions::Num(*num),
        PointId::Uuid(uuid) => pb::point_id::PointIdOptions::Uuid(uuid.to_string()),
    };
    pb::PointId {
        point_id_options: Some(options),
    }
}

pub(crate) fn point_id_from_wire(id: Option<pb::PointId>) -> Result<PointId, DecodeError> {
    match id.and_then(|id| id.point_id_options) {
        Some(pb::point_id::PointIdOptions::Num(num)) => Ok(PointId::Num(num)),
        Some(pb::point_id::PointIdOptions::Uuid(raw)) => uuid::Uuid::parse_str(&raw)
            .map(PointId::Uuid)
            .map_err(|e| DecodeError::InvalidValue {
                field: "id",
                details: format!("'{raw}' is not a UUID: {e}"),
            }),
        None => Err(DecodeError::MissingField("id")),
    }
}

pub(crate) fn point_ids_from_wire(ids: Vec<pb::PointId>) -> Result<Vec<PointId>, DecodeError> {
    ids.into_iter().map(|id| point_id_from_wire(Some(id))).collect()
}

// ---------------------------------------------------------------------------
// payload
// ---------------------------------------------------------------------------

pub(crate) fn json_to_value(value: &serde_json::Value) -> pb::Value {
    use pb::value::Kind;

    let kind = match value {
        serde_json::Value::Null => Kind::NullValue(pb::NullValue::NullValue as i32),
        serde_json::Value::Bool(b) => Kind::BoolValue(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Kind::IntegerValue(i),
            None => Kind::DoubleValue(n.as_f64().unwrap_or_default()),
        },
        serde_json::Value::String(s) => Kind::StringValue(s.clone()),
        serde_json::Value::Array(items) => Kind::ListValue(pb::ListValue {
            values: items.iter().map(json_to_value).collect(),
        }),
        serde_json::Value::Object(map) => Kind::StructValue(pb::Struct {
            fields: payload_to_wire(map),
        }),
    };
    pb::Value { kind: Some(kind) }
}

pub(crate) fn value_to_json(value: pb::Value) -> serde_json::Value {
    use pb::value::Kind;

    match value.kind {
        None | Some(Kind::NullValue(_)) => serde_json::Value::Null,
        Some(Kind::BoolValue(b)) => serde_json::Value::Bool(b),
        Some(Kind::IntegerValue(i)) => serde_json::Value::Number(i.into()),
        // NaN and infinities have no JSON form
        Some(Kind::DoubleValue(f)) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Some(Kind::StringValue(s)) => serde_json::Value::String(s),
        Some(Kind::ListValue(list)) => {
            serde_json::Value::Array(list.values.into_iter().map(value_to_json).collect())
        }
        Some(Kind::StructValue(s)) => serde_json::Value::Object(payload_from_wire(s.fields)),
    }
}

pub(crate) fn payload_to_wire(payload: &Payload) -> BTreeMap<String, pb::Value> {
    payload
        .iter()
        .map(|(key, value)| (key.clone(), json_to_value(value)))
        .collect()
}

pub(crate) fn payload_from_wire(payload: BTreeMap<String, pb::Value>) -> Payload {
    payload
        .into_iter()
        .map(|(key, value)| (key, value_to_json(value)))
        .collect()
}

// ---------------------------------------------------------------------------
// filters and selectors
// ---------------------------------------------------------------------------

pub(crate) fn filter_to_wire(filter: &Filter) -> pb::Filter {
    let conditions = |list: &[Condition]| list.iter().map(condition_to_wire).collect();
    pb::Filter {
        should: conditions(&filter.should),
        must: conditions(&filter.must),
        must_not: conditions(&filter.must_not),
    }
}

pub(crate) fn filter_from_wire(filter: pb::Filter) -> Result<Filter, DecodeError> {
    let conditions = |list: Vec<pb::Condition>| {
        list.into_iter()
            .map(condition_from_wire)
            .collect::<Result<Vec<_>, _>>()
    };
    Ok(Filter {
        must: conditions(filter.must)?,
        should: conditions(filter.should)?,
        must_not: conditions(filter.must_not)?,
    })
}

fn condition_to_wire(condition: &Condition) -> pb::Condition {
    use pb::condition::ConditionOneOf;

    let inner = match condition {
        Condition::Match { key, value } => ConditionOneOf::Field(pb::FieldCondition {
            key: key.clone(),
            r#match: Some(match_to_wire(value)),
        }),
        Condition::HasId(ids) => ConditionOneOf::HasId(pb::HasIdCondition {
            has_id: ids.iter().map(point_id_to_wire).collect(),
        }),
        Condition::Nested(filter) => ConditionOneOf::Filter(filter_to_wire(filter)),
    };
    pb::Condition {
        condition_one_of: Some(inner),
    }
}

fn condition_from_wire(condition: pb::Condition) -> Result<Condition, DecodeError> {
    use pb::condition::ConditionOneOf;

    match condition.condition_one_of {
        Some(ConditionOneOf::Field(field)) => {
            let value = field
                .r#match
                .and_then(|m| m.match_value)
                .ok_or(DecodeError::MissingField("match"))?;
            Ok(Condition::Match {
                key: field.key,
                value: match_from_wire(value),
            })
        }
        Some(ConditionOneOf::HasId(has_id)) => Ok(Condition::HasId(point_ids_from_wire(has_id.has_id)?)),
        Some(ConditionOneOf::Filter(filter)) => Ok(Condition::Nested(filter_from_wire(filter)?)),
        None => Err(DecodeError::MissingField("condition")),
    }
}

fn match_to_wire(value: &MatchValue) -> pb::Match {
    use pb::r#match::MatchValue as Wire;

    let value = match value {
        MatchValue::Keyword(s) => Wire::Keyword(s.clone()),
        MatchValue::Integer(i) => Wire::Integer(*i),
        MatchValue::Bool(b) => Wire::Boolean(*b),
        MatchValue::Text(s) => Wire::Text(s.clone()),
    };
    pb::Match {
        match_value: Some(value),
    }
}

fn match_from_wire(value: pb::r#match::MatchValue) -> MatchValue {
    use pb::r#match::MatchValue as Wire;

    match value {
        Wire::Keyword(s) => MatchValue::Keyword(s),
        Wire::Integer(i) => MatchValue::Integer(i),
        Wire::Boolean(b) => MatchValue::Bool(b),
        Wire::Text(s) => MatchValue::Text(s),
    }
}

pub(crate) fn selector_to_wire(selector: &PointsSelector) -> pb::PointsSelector {
    use pb::points_selector::PointsSelectorOneOf;

    let inner = match selector {
        PointsSelector::Ids(ids) => PointsSelectorOneOf::Points(pb::PointsIdsList {
            ids: ids.iter().map(point_id_to_wire).collect(),
        }),
        PointsSelector::Filter(filter) => PointsSelectorOneOf::Filter(filter_to_wire(filter)),
    };
    pb::PointsSelector {
        points_selector_one_of: Some(inner),
    }
}

pub(crate) fn selector_from_wire(
    selector: Option<pb::PointsSelector>,
) -> Result<PointsSelector, DecodeError> {
    use pb::points_selector::PointsSelectorOneOf;

    match selector.and_then(|s| s.points_selector_one_of) {
        Some(PointsSelectorOneOf::Points(list)) => Ok(PointsSelector::Ids(point_ids_from_wire(list.ids)?)),
        Some(PointsSelectorOneOf::Filter(filter)) => Ok(PointsSelector::Filter(filter_from_wire(filter)?)),
        None => Err(DecodeError::MissingField("points_selector")),
    }
}

// ---------------------------------------------------------------------------
// collections
// ---------------------------------------------------------------------------

pub(crate) fn distance_to_wire(distance: DistanceMetric) -> pb::Distance {
    match distance {
        DistanceMetric::Cosine => pb::Distance::Cosine,
        DistanceMetric::Euclidean => pb::Distance::Euclid,
        DistanceMetric::DotProduct => pb::Distance::Dot,
        DistanceMetric::Manhattan => pb::Distance::Manhattan,
    }
}

pub(crate) fn distance_from_wire(raw: i32) -> Result<DistanceMetric, DecodeError> {
    match pb::Distance::try_from(raw) {
        Ok(pb::Distance::Cosine) => Ok(DistanceMetric::Cosine),
        Ok(pb::Distance::Euclid) => Ok(DistanceMetric::Euclidean),
        Ok(pb::Distance::Dot) => Ok(DistanceMetric::DotProduct),
        Ok(pb::Distance::Manhattan) => Ok(DistanceMetric::Manhattan),
        Ok(pb::Distance::UnknownDistance) | Err(_) => Err(DecodeError::InvalidValue {
            field: "distance",
            details: format!("unsupported distance {raw}"),
        }),
    }
}

pub(crate) fn hnsw_to_wire(hnsw: &HnswConfig) -> pb::HnswConfigDiff {
    pb::HnswConfigDiff {
        m: hnsw.m,
        ef_construct: hnsw.ef_construct,
        full_scan_threshold: hnsw.full_scan_threshold,
        ..Default::default()
    }
}

pub(crate) fn hnsw_from_wire(hnsw: pb::HnswConfigDiff) -> HnswConfig {
    HnswConfig {
        m: hnsw.m,
        ef_construct: hnsw.ef_construct,
        full_scan_threshold: hnsw.full_scan_threshold,
    }
}

pub(crate) fn vectors_config_to_wire(config: &VectorConfig) -> pb::VectorsConfig {
    pb::VectorsConfig {
        config: Some(pb::vectors_config::Config::Params(pb::VectorParams {
            size: config.dimension,
            distance: distance_to_wire(config.distance) as i32,
            hnsw_config: config.hnsw.as_ref().map(hnsw_to_wire),
            on_disk: config.on_disk,
        })),
    }
}

pub(crate) fn vectors_config_from_wire(
    config: pb::VectorsConfig,
) -> Result<VectorConfig, DecodeError> {
    let pb::vectors_config::Config::Params(params) =
        config.config.ok_or(DecodeError::MissingField("vectors_config"))?;
    Ok(VectorConfig {
        dimension: params.size,
        distance: distance_from_wire(params.distance)?,
        hnsw: params.hnsw_config.map(hnsw_from_wire),
        on_disk: params.on_disk,
    })
}

pub(crate) fn collection_status_from_wire(raw: i32) -> Result<CollectionStatus, DecodeError> {
    match pb::CollectionStatus::try_from(raw) {
        Ok(pb::CollectionStatus::Green) => Ok(CollectionStatus::Green),
        Ok(pb::CollectionStatus::Yellow) => Ok(CollectionStatus::Yellow),
        Ok(pb::CollectionStatus::Red) => Ok(CollectionStatus::Red),
        Ok(pb::CollectionStatus::Grey) => Ok(CollectionStatus::Grey),
        Ok(pb::CollectionStatus::UnknownCollectionStatus) | Err(_) => {
            Err(DecodeError::InvalidValue {
                field: "status",
                details: format!("unknown collection status {raw}"),
            })
        }
    }
}

pub(crate) fn update_result_from_wire(
    result: Option<pb::UpdateResult>,
) -> Result<UpdateResult, DecodeError> {
    let result = result.ok_or(DecodeError::MissingField("result"))?;
    let status = match pb::UpdateStatus::try_from(result.status) {
        Ok(pb::UpdateStatus::Acknowledged) => UpdateStatus::Acknowledged,
        Ok(pb::UpdateStatus::Completed) => UpdateStatus::Completed,
        Ok(pb::UpdateStatus::ClockRejected) => UpdateStatus::ClockRejected,
        Ok(pb::UpdateStatus::UnknownUpdateStatus) | Err(_) => UpdateStatus::Unknown,
    };
    Ok(UpdateResult {
        operation_id: result.operation_id,
        status,
    })
}
