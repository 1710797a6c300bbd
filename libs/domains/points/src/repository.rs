use async_trait::async_trait;

use crate::error::PointResult;
use crate::models::{CollectionInfo, Point, PointQuery, ScoredPoint};

/// Repository trait for vector storage operations
///
/// Abstracts the underlying vector database (Qdrant). Implementations own
/// the collection's on-disk format, indexing, and distance computation; a
/// query's result ordering is theirs to define. The connection must
/// tolerate concurrent use.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Look up a collection by name, `None` if it does not exist
    async fn get_collection(&self, name: &str) -> PointResult<Option<CollectionInfo>>;

    /// Insert or replace a point; a prior point with the same id is
    /// overwritten atomically from the caller's point of view
    async fn upsert(&self, collection_name: &str, point: Point) -> PointResult<()>;

    /// Remove a point by id; removing an absent id is not an error
    async fn delete(&self, collection_name: &str, id: &str) -> PointResult<()>;

    /// Fetch a point by id with its vector and metadata
    async fn get(&self, collection_name: &str, id: &str) -> PointResult<Option<Point>>;

    /// Nearest-neighbor search returning ranked (id, score, metadata) rows
    async fn query(&self, collection_name: &str, query: PointQuery)
    -> PointResult<Vec<ScoredPoint>>;
}
