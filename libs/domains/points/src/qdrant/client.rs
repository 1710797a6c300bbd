use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    self, Condition, DeletePointsBuilder, Distance, Filter, GetPointsBuilder, PointId, PointStruct,
    SearchPointsBuilder, UpsertPointsBuilder, Value as QdrantValue,
};

use super::QdrantConfig;
use crate::error::{PointError, PointResult};
use crate::models::{CollectionInfo, DistanceMetric, Point, PointQuery, ScoredPoint};
use crate::repository::VectorStore;

/// Qdrant-backed implementation of VectorStore
pub struct QdrantStore {
    client: Qdrant,
}

impl QdrantStore {
    pub async fn new(config: QdrantConfig) -> PointResult<Self> {
        let mut builder = Qdrant::from_url(&config.url);

        if let Some(api_key) = config.api_key {
            builder = builder.api_key(api_key);
        }

        builder = builder.timeout(Duration::from_secs(config.timeout_secs));

        let client = builder
            .build()
            .map_err(|e| PointError::Store(format!("Failed to build client: {}", e)))?;

        Ok(Self { client })
    }

    pub fn from_client(client: Qdrant) -> Self {
        Self { client }
    }

    fn from_qdrant_distance(distance: Distance) -> DistanceMetric {
        match distance {
            Distance::Cosine => DistanceMetric::Cosine,
            Distance::Euclid => DistanceMetric::Euclidean,
            Distance::Dot => DistanceMetric::DotProduct,
            Distance::Manhattan => DistanceMetric::Manhattan,
            _ => DistanceMetric::Cosine,
        }
    }

    fn point_id_to_string(point_id: &PointId) -> PointResult<String> {
        match &point_id.point_id_options {
            Some(qdrant::point_id::PointIdOptions::Uuid(id)) => Ok(id.clone()),
            Some(qdrant::point_id::PointIdOptions::Num(num)) => Ok(num.to_string()),
            None => Err(PointError::Store("Missing point ID".to_string())),
        }
    }

    fn metadata_to_qdrant(
        metadata: serde_json::Map<String, serde_json::Value>,
    ) -> HashMap<String, QdrantValue> {
        metadata
            .into_iter()
            .filter_map(|(key, val)| json_to_qdrant_value(val).map(|v| (key, v)))
            .collect()
    }

    fn qdrant_to_metadata(
        payload: HashMap<String, QdrantValue>,
    ) -> serde_json::Map<String, serde_json::Value> {
        payload
            .into_iter()
            .filter_map(|(key, val)| qdrant_value_to_json(val).map(|v| (key, v)))
            .collect()
    }

    /// Translate the caller's opaque metadata filter into a conjunction of
    /// exact-match conditions; non-scalar values are skipped
    fn filter_to_qdrant(filter: Option<serde_json::Value>) -> Option<Filter> {
        let serde_json::Value::Object(map) = filter? else {
            return None;
        };

        let conditions: Vec<Condition> = map
            .into_iter()
            .filter_map(|(key, val)| match val {
                serde_json::Value::String(s) => Some(Condition::matches(key, s)),
                serde_json::Value::Bool(b) => Some(Condition::matches(key, b)),
                serde_json::Value::Number(n) => n.as_i64().map(|i| Condition::matches(key, i)),
                _ => None,
            })
            .collect();

        if conditions.is_empty() {
            None
        } else {
            Some(Filter::must(conditions))
        }
    }

    #[allow(deprecated)]
    fn extract_vector_from_output(vectors: &Option<qdrant::VectorsOutput>) -> Option<Vec<f32>> {
        match vectors {
            Some(qdrant::VectorsOutput {
                vectors_options: Some(opts),
            }) => match opts {
                qdrant::vectors_output::VectorsOptions::Vector(v) => Some(v.data.clone()),
                qdrant::vectors_output::VectorsOptions::Vectors(map) => {
                    map.vectors.values().next().map(|v| v.data.clone())
                }
            },
            _ => None,
        }
    }

    fn extract_dimension(config: &Option<qdrant::CollectionConfig>) -> (u32, DistanceMetric) {
        let params = config
            .as_ref()
            .and_then(|c| c.params.as_ref())
            .and_then(|p| p.vectors_config.as_ref())
            .and_then(|vc| vc.config.as_ref());

        match params {
            Some(qdrant::vectors_config::Config::Params(p)) => {
                (p.size as u32, Self::from_qdrant_distance(p.distance()))
            }
            Some(qdrant::vectors_config::Config::ParamsMap(map)) => map
                .map
                .values()
                .next()
                .map(|p| (p.size as u32, Self::from_qdrant_distance(p.distance())))
                .unwrap_or((0, DistanceMetric::Cosine)),
            None => (0, DistanceMetric::Cosine),
        }
    }
}

fn json_to_qdrant_value(val: serde_json::Value) -> Option<QdrantValue> {
    use qdrant::value::Kind;

    match val {
        serde_json::Value::Null => None,
        serde_json::Value::Bool(b) => Some(QdrantValue::from(b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(QdrantValue::from(i))
            } else {
                n.as_f64().map(QdrantValue::from)
            }
        }
        serde_json::Value::String(s) => Some(QdrantValue::from(s)),
        serde_json::Value::Array(items) => {
            let values = items.into_iter().filter_map(json_to_qdrant_value).collect();
            Some(QdrantValue {
                kind: Some(Kind::ListValue(qdrant::ListValue { values })),
            })
        }
        serde_json::Value::Object(map) => {
            let fields = map
                .into_iter()
                .filter_map(|(key, val)| json_to_qdrant_value(val).map(|v| (key, v)))
                .collect();
            Some(QdrantValue {
                kind: Some(Kind::StructValue(qdrant::Struct { fields })),
            })
        }
    }
}

fn qdrant_value_to_json(val: QdrantValue) -> Option<serde_json::Value> {
    use qdrant::value::Kind;

    match val.kind {
        Some(Kind::NullValue(_)) => Some(serde_json::Value::Null),
        Some(Kind::BoolValue(b)) => Some(serde_json::Value::Bool(b)),
        Some(Kind::IntegerValue(i)) => Some(serde_json::Value::Number(i.into())),
        Some(Kind::DoubleValue(f)) => {
            serde_json::Number::from_f64(f).map(serde_json::Value::Number)
        }
        Some(Kind::StringValue(s)) => Some(serde_json::Value::String(s)),
        Some(Kind::ListValue(list)) => Some(serde_json::Value::Array(
            list.values
                .into_iter()
                .filter_map(qdrant_value_to_json)
                .collect(),
        )),
        Some(Kind::StructValue(fields)) => Some(serde_json::Value::Object(
            fields
                .fields
                .into_iter()
                .filter_map(|(key, val)| qdrant_value_to_json(val).map(|v| (key, v)))
                .collect(),
        )),
        None => None,
    }
}

#[async_trait]
impl VectorStore for QdrantStore {
    async fn get_collection(&self, name: &str) -> PointResult<Option<CollectionInfo>> {
        let info = match self.client.collection_info(name).await {
            Ok(info) => info,
            Err(_) => return Ok(None),
        };

        let result = info
            .result
            .ok_or_else(|| PointError::Store("Collection info missing result".to_string()))?;

        let (dimension, distance) = Self::extract_dimension(&result.config);

        Ok(Some(CollectionInfo {
            name: name.to_string(),
            dimension,
            distance,
            points_count: result.points_count.unwrap_or(0),
        }))
    }

    async fn upsert(&self, collection_name: &str, point: Point) -> PointResult<()> {
        let point = PointStruct::new(
            PointId::from(point.id),
            point.embedding,
            Self::metadata_to_qdrant(point.metadata),
        );

        // wait(true) so a subsequent read observes the write
        let builder = UpsertPointsBuilder::new(collection_name, vec![point]).wait(true);
        self.client.upsert_points(builder).await?;

        Ok(())
    }

    async fn get(&self, collection_name: &str, id: &str) -> PointResult<Option<Point>> {
        let builder = GetPointsBuilder::new(collection_name, vec![PointId::from(id.to_string())])
            .with_vectors(true)
            .with_payload(true);

        let results = self.client.get_points(builder).await?;

        let Some(point) = results.result.into_iter().next() else {
            return Ok(None);
        };

        let id = point
            .id
            .as_ref()
            .map(Self::point_id_to_string)
            .transpose()?
            .ok_or_else(|| PointError::Store("Missing point ID".to_string()))?;

        let embedding = Self::extract_vector_from_output(&point.vectors).unwrap_or_default();

        Ok(Some(Point {
            id,
            embedding,
            metadata: Self::qdrant_to_metadata(point.payload),
        }))
    }

    async fn delete(&self, collection_name: &str, id: &str) -> PointResult<()> {
        let builder = DeletePointsBuilder::new(collection_name)
            .points(vec![PointId::from(id.to_string())])
            .wait(true);

        self.client.delete_points(builder).await?;

        Ok(())
    }

    async fn query(
        &self,
        collection_name: &str,
        query: PointQuery,
    ) -> PointResult<Vec<ScoredPoint>> {
        let mut builder =
            SearchPointsBuilder::new(collection_name, query.vector, query.limit as u64)
                .with_payload(true);

        if let Some(filter) = Self::filter_to_qdrant(query.filter) {
            builder = builder.filter(filter);
        }

        let results = self.client.search_points(builder).await?;

        results
            .result
            .into_iter()
            .map(|point| {
                let id = point
                    .id
                    .as_ref()
                    .map(Self::point_id_to_string)
                    .transpose()?
                    .ok_or_else(|| PointError::Store("Missing point ID".to_string()))?;

                Ok(ScoredPoint {
                    id,
                    score: point.score,
                    metadata: Self::qdrant_to_metadata(point.payload),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metadata_round_trips_through_qdrant_values() {
        let mut metadata = serde_json::Map::new();
        metadata.insert("title".to_string(), json!("release notes"));
        metadata.insert("year".to_string(), json!(2024));
        metadata.insert("draft".to_string(), json!(false));
        metadata.insert("tags".to_string(), json!(["a", "b"]));
        metadata.insert("nested".to_string(), json!({"depth": 2}));

        let qdrant = QdrantStore::metadata_to_qdrant(metadata.clone());
        let back = QdrantStore::qdrant_to_metadata(qdrant);

        assert_eq!(back, metadata);
    }

    #[test]
    fn test_null_metadata_values_are_dropped() {
        let mut metadata = serde_json::Map::new();
        metadata.insert("kept".to_string(), json!("yes"));
        metadata.insert("dropped".to_string(), serde_json::Value::Null);

        let qdrant = QdrantStore::metadata_to_qdrant(metadata);
        assert_eq!(qdrant.len(), 1);
        assert!(qdrant.contains_key("kept"));
    }

    #[test]
    fn test_filter_builds_conjunction_of_scalar_matches() {
        let filter = QdrantStore::filter_to_qdrant(Some(json!({
            "source": "docs",
            "year": 2024,
            "draft": false,
            "skipped": [1, 2],
        })));

        let filter = filter.unwrap();
        assert_eq!(filter.must.len(), 3);
    }

    #[test]
    fn test_empty_or_non_object_filter_is_none() {
        assert!(QdrantStore::filter_to_qdrant(None).is_none());
        assert!(QdrantStore::filter_to_qdrant(Some(json!({}))).is_none());
        assert!(QdrantStore::filter_to_qdrant(Some(json!("not an object"))).is_none());
    }

    #[test]
    fn test_point_id_to_string() {
        let uuid_id = PointId::from("6ba7b810-9dad-11d1-80b4-00c04fd430c8".to_string());
        assert_eq!(
            QdrantStore::point_id_to_string(&uuid_id).unwrap(),
            "6ba7b810-9dad-11d1-80b4-00c04fd430c8"
        );

        let num_id = PointId::from(42u64);
        assert_eq!(QdrantStore::point_id_to_string(&num_id).unwrap(), "42");
    }
}
