//! In-memory test doubles for the points domain
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use domain_points::{
    CollectionInfo, DistanceMetric, Embedder, KeywordExtractor, Point, PointError, PointQuery,
    PointResult, ScoredPoint, VectorStore,
};

/// In-memory VectorStore scoring by dot product
///
/// Holds a fixed set of collections; points live behind an RwLock so
/// concurrent upserts exercise the same interleavings the real backend sees.
pub struct MemoryStore {
    collections: HashMap<String, CollectionInfo>,
    points: RwLock<HashMap<String, HashMap<String, Point>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            collections: HashMap::new(),
            points: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_collection(mut self, name: &str, dimension: u32) -> Self {
        self.collections.insert(
            name.to_string(),
            CollectionInfo {
                name: name.to_string(),
                dimension,
                distance: DistanceMetric::DotProduct,
                points_count: 0,
            },
        );
        self
    }

    fn matches_filter(point: &Point, filter: &Option<Value>) -> bool {
        let Some(Value::Object(conditions)) = filter else {
            return true;
        };
        conditions
            .iter()
            .all(|(key, expected)| point.metadata.get(key) == Some(expected))
    }

    fn dot(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }
}

#[async_trait]
impl VectorStore for MemoryStore {
    async fn get_collection(&self, name: &str) -> PointResult<Option<CollectionInfo>> {
        let mut info = match self.collections.get(name) {
            Some(info) => info.clone(),
            None => return Ok(None),
        };
        let points = self.points.read().map_err(poisoned)?;
        info.points_count = points.get(name).map(|p| p.len() as u64).unwrap_or(0);
        Ok(Some(info))
    }

    async fn upsert(&self, collection_name: &str, point: Point) -> PointResult<()> {
        let mut points = self.points.write().map_err(poisoned)?;
        points
            .entry(collection_name.to_string())
            .or_default()
            .insert(point.id.clone(), point);
        Ok(())
    }

    async fn delete(&self, collection_name: &str, id: &str) -> PointResult<()> {
        let mut points = self.points.write().map_err(poisoned)?;
        if let Some(collection) = points.get_mut(collection_name) {
            collection.remove(id);
        }
        Ok(())
    }

    async fn get(&self, collection_name: &str, id: &str) -> PointResult<Option<Point>> {
        let points = self.points.read().map_err(poisoned)?;
        Ok(points
            .get(collection_name)
            .and_then(|collection| collection.get(id))
            .cloned())
    }

    async fn query(
        &self,
        collection_name: &str,
        query: PointQuery,
    ) -> PointResult<Vec<ScoredPoint>> {
        let points = self.points.read().map_err(poisoned)?;
        let mut results: Vec<ScoredPoint> = points
            .get(collection_name)
            .map(|collection| {
                collection
                    .values()
                    .filter(|point| Self::matches_filter(point, &query.filter))
                    .map(|point| ScoredPoint {
                        id: point.id.clone(),
                        score: Self::dot(&point.embedding, &query.vector),
                        metadata: point.metadata.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        results.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
        results.truncate(query.limit as usize);
        Ok(results)
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> PointError {
    PointError::Store("memory store lock poisoned".to_string())
}

/// Embedder returning the same vector for every input
pub struct StaticEmbedder {
    model: String,
    vector: Vec<f32>,
}

impl StaticEmbedder {
    pub fn new(model: &str, vector: Vec<f32>) -> Self {
        Self {
            model: model.to_string(),
            vector,
        }
    }
}

#[async_trait]
impl Embedder for StaticEmbedder {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> u32 {
        self.vector.len() as u32
    }

    async fn encode(&self, _text: &str) -> PointResult<Vec<f32>> {
        Ok(self.vector.clone())
    }
}

/// Extractor that wraps the input so tests can observe the stage ran
pub struct EchoExtractor;

#[async_trait]
impl KeywordExtractor for EchoExtractor {
    async fn extract(&self, text: &str) -> PointResult<String> {
        Ok(format!("extracted:{}", text))
    }
}

/// Extractor that always fails, for exercising the fallback policy
pub struct FailingExtractor;

#[async_trait]
impl KeywordExtractor for FailingExtractor {
    async fn extract(&self, _text: &str) -> PointResult<String> {
        Err(PointError::Extraction("extractor offline".to_string()))
    }
}
