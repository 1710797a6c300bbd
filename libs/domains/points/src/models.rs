use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Model used to derive embeddings when a request does not name one.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Number of results a query returns when `top_k` is unset.
pub const DEFAULT_TOP_K: u32 = 10;

/// Distance metric for similarity calculations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum DistanceMetric {
    #[default]
    Cosine,
    Euclidean,
    DotProduct,
    Manhattan,
}

/// Collection information resolved from the vector store.
///
/// Collections are created by an administrative path and only looked up
/// here; `dimension` is fixed at creation and every point in the collection
/// must carry a vector of exactly that length.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CollectionInfo {
    pub name: String,
    pub dimension: u32,
    pub distance: DistanceMetric,
    pub points_count: u64,
}

/// A stored point: id, embedding vector, and verbatim metadata
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Point {
    pub id: String,
    pub embedding: Vec<f32>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub metadata: Map<String, Value>,
}

impl Point {
    pub fn new(id: String, embedding: Vec<f32>) -> Self {
        Self {
            id,
            embedding,
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }
}

/// One row of a similarity-search result.
///
/// Ordering of a result list is the backend's responsibility (descending
/// similarity by convention) and is passed through unmodified.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScoredPoint {
    pub id: String,
    pub score: f32,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub metadata: Map<String, Value>,
}

/// Store-level nearest-neighbor query
#[derive(Debug, Clone)]
pub struct PointQuery {
    pub vector: Vec<f32>,
    pub limit: u32,
    /// Opaque metadata predicate, interpreted by the backend only
    pub filter: Option<Value>,
}

/// Input for upserting a point.
///
/// At least one of `embedding` or `input` must be supplied; when only
/// `input` is given the service derives the embedding via `model`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpsertPoint {
    /// Point id; generated server-side when omitted
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub input: Option<String>,
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub metadata: Map<String, Value>,
    #[serde(default = "default_model")]
    pub model: String,
}

/// Input for querying with a caller-supplied vector
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QueryPoints {
    pub query: Vec<f32>,
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub filter: Option<Value>,
}

/// Input for text-driven search with best-match selection
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchPoints {
    pub input: String,
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub filter: Option<Value>,
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_model() -> String {
    DEFAULT_EMBEDDING_MODEL.to_string()
}

fn default_top_k() -> u32 {
    DEFAULT_TOP_K
}

/// Select the single best-matching id from a ranked result list.
///
/// Scans for the maximum similarity score; on ties the first occurrence in
/// the backend's returned order wins, so the selection is deterministic
/// given a deterministic backend ordering. Returns `None` on an empty list.
pub fn highest_score_id(results: &[ScoredPoint]) -> Option<&str> {
    let mut best: Option<&ScoredPoint> = None;
    for point in results {
        match best {
            Some(current) if point.score <= current.score => {}
            _ => best = Some(point),
        }
    }
    best.map(|point| point.id.as_str())
}
