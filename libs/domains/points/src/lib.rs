//! Points Domain Library
//!
//! Domain implementation for point storage and semantic search over a vector
//! collection backend, with embedding derivation and an optional
//! keyword-extraction stage for text inputs.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │   PointService   │  ← Orchestration: extraction, embedding, validation
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐   ┌──────────────────┐   ┌──────────────────┐
//! │   VectorStore    │   │     Embedder     │   │ KeywordExtractor │
//! │     (trait)      │   │     (trait)      │   │     (trait)      │
//! └────────┬─────────┘   └────────┬─────────┘   └────────┬─────────┘
//! ┌────────▼─────────┐   ┌────────▼─────────┐   ┌────────▼─────────┐
//! │   QdrantStore    │   │  OpenAiEmbedder  │   │ OpenAiKeyword-   │
//! │                  │   │                  │   │ Extractor        │
//! └──────────────────┘   └──────────────────┘   └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_points::{
//!     PointService, QdrantConfig, QdrantStore, UpsertPoint,
//!     models::DEFAULT_EMBEDDING_MODEL,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = QdrantConfig::from_env()?;
//! let store = QdrantStore::new(config).await?;
//! let service = PointService::new(store);
//!
//! let input = UpsertPoint {
//!     id: Some("doc-1".to_string()),
//!     input: None,
//!     embedding: Some(vec![0.1; 1536]),
//!     metadata: serde_json::Map::new(),
//!     model: DEFAULT_EMBEDDING_MODEL.to_string(),
//! };
//! service.upsert_direct("documents", input).await?;
//! # Ok(())
//! # }
//! ```

pub mod embedding;
pub mod error;
pub mod extraction;
pub mod handlers;
pub mod models;
pub mod qdrant;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use embedding::{
    Embedder, EmbedderRegistry, EmbeddingModel, OpenAiConfig, OpenAiEmbedder, openai_registry,
};
pub use error::{PointError, PointResult};
pub use extraction::{ExtractionPolicy, KeywordExtractor, OpenAiKeywordExtractor};
pub use handlers::PointsApiDoc;
pub use models::{
    CollectionInfo, DistanceMetric, Point, PointQuery, QueryPoints, ScoredPoint, SearchPoints,
    UpsertPoint, highest_score_id,
};
pub use qdrant::{QdrantConfig, QdrantStore};
pub use repository::VectorStore;
pub use service::PointService;
