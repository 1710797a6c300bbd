use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::embedding::EmbedderRegistry;
use crate::error::{PointError, PointResult};
use crate::extraction::{ExtractionPolicy, KeywordExtractor};
use crate::models::{
    CollectionInfo, Point, PointQuery, QueryPoints, ScoredPoint, SearchPoints, UpsertPoint,
    highest_score_id,
};
use crate::repository::VectorStore;

/// Point service driving the upsert/query orchestration pipeline
///
/// Resolves collections in the store, derives embeddings from text when a
/// request carries no vector (optionally pre-processing the text through a
/// keyword-extraction stage), enforces dimension contracts, and delegates
/// persistence and similarity search to the [`VectorStore`].
pub struct PointService<S: VectorStore> {
    store: Arc<S>,
    embedders: Arc<EmbedderRegistry>,
    extractor: Option<Arc<dyn KeywordExtractor>>,
    extraction_policy: ExtractionPolicy,
}

impl<S: VectorStore> Clone for PointService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            embedders: Arc::clone(&self.embedders),
            extractor: self.extractor.clone(),
            extraction_policy: self.extraction_policy,
        }
    }
}

impl<S: VectorStore> PointService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
            embedders: Arc::new(EmbedderRegistry::new()),
            extractor: None,
            extraction_policy: ExtractionPolicy::default(),
        }
    }

    pub fn with_embedders(mut self, embedders: EmbedderRegistry) -> Self {
        self.embedders = Arc::new(embedders);
        self
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn KeywordExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn with_extraction_policy(mut self, policy: ExtractionPolicy) -> Self {
        self.extraction_policy = policy;
        self
    }

    /// Upsert a point, pre-processing derived-embedding text through the
    /// keyword-extraction stage
    pub async fn upsert_with_extraction(
        &self,
        collection_name: &str,
        input: UpsertPoint,
    ) -> PointResult<Point> {
        self.upsert_inner(collection_name, input, true).await
    }

    /// Upsert a point, skipping the keyword-extraction stage entirely
    pub async fn upsert_direct(
        &self,
        collection_name: &str,
        input: UpsertPoint,
    ) -> PointResult<Point> {
        self.upsert_inner(collection_name, input, false).await
    }

    async fn upsert_inner(
        &self,
        collection_name: &str,
        input: UpsertPoint,
        use_extraction: bool,
    ) -> PointResult<Point> {
        let collection = self.resolve_collection(collection_name).await?;

        let embedding = match input.embedding {
            Some(embedding) => embedding,
            None => {
                let text = input.input.ok_or_else(|| {
                    PointError::InvalidRequest(
                        "must provide either embedding or input".to_string(),
                    )
                })?;
                let text = if use_extraction {
                    self.apply_extraction(text).await?
                } else {
                    text
                };
                let embedder = self.embedders.get(&input.model)?;
                embedder.encode(&text).await?
            }
        };

        // Dimension contract enforced before any write reaches the store
        if embedding.len() as u32 != collection.dimension {
            return Err(PointError::DimensionMismatch(format!(
                "embedding dimension {} does not match collection dimension {}",
                embedding.len(),
                collection.dimension
            )));
        }

        let id = input
            .id
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let point = Point {
            id,
            embedding,
            metadata: input.metadata,
        };

        debug!("Upserting point {}", point.id);
        self.store.upsert(collection_name, point.clone()).await?;

        Ok(point)
    }

    /// Fetch a stored point by id
    pub async fn get(&self, collection_name: &str, id: &str) -> PointResult<Point> {
        self.resolve_collection(collection_name).await?;

        debug!("Getting collection point {}", id);
        self.store
            .get(collection_name, id)
            .await?
            .ok_or_else(|| PointError::PointNotFound(id.to_string()))
    }

    /// Delete a point by id; idempotent at the protocol boundary
    pub async fn delete(&self, collection_name: &str, id: &str) -> PointResult<()> {
        self.resolve_collection(collection_name).await?;

        debug!("Deleting point {}", id);
        self.store.delete(collection_name, id).await
    }

    /// Query with a caller-supplied vector, returning the backend's ranked
    /// list unmodified
    pub async fn query(
        &self,
        collection_name: &str,
        request: QueryPoints,
    ) -> PointResult<Vec<ScoredPoint>> {
        self.resolve_collection(collection_name).await?;

        if request.top_k == 0 {
            return Err(PointError::InvalidRequest(
                "top_k must be a positive integer".to_string(),
            ));
        }

        debug!("Searching {} embeddings for query", request.top_k);
        self.store
            .query(
                collection_name,
                PointQuery {
                    vector: request.query,
                    limit: request.top_k,
                    filter: request.filter,
                },
            )
            .await
    }

    /// Text-driven search collapsing the ranked list to the single
    /// best-matching id
    ///
    /// Runs the keyword-extraction stage, resolves the embedder, and checks
    /// the embedder's dimension against the collection's before the encode
    /// call so a mismatch fails fast. On ties the first result in the
    /// backend's order wins.
    pub async fn search(
        &self,
        collection_name: &str,
        request: SearchPoints,
    ) -> PointResult<String> {
        let collection = self.resolve_collection(collection_name).await?;

        if request.top_k == 0 {
            return Err(PointError::InvalidRequest(
                "top_k must be a positive integer".to_string(),
            ));
        }

        let text = self.apply_extraction(request.input).await?;
        let embedder = self.embedders.get(&request.model)?;

        if embedder.dimension() != collection.dimension {
            return Err(PointError::DimensionMismatch(format!(
                "embedder dimension {} does not match collection dimension {}",
                embedder.dimension(),
                collection.dimension
            )));
        }

        let vector = embedder.encode(&text).await?;

        debug!("Searching {} embeddings for query", request.top_k);
        let results = self
            .store
            .query(
                collection_name,
                PointQuery {
                    vector,
                    limit: request.top_k,
                    filter: request.filter,
                },
            )
            .await?;

        highest_score_id(&results)
            .map(str::to_string)
            .ok_or(PointError::NoMatch)
    }

    async fn resolve_collection(&self, name: &str) -> PointResult<CollectionInfo> {
        self.store
            .get_collection(name)
            .await?
            .ok_or_else(|| PointError::CollectionNotFound(name.to_string()))
    }

    async fn apply_extraction(&self, text: String) -> PointResult<String> {
        let Some(extractor) = &self.extractor else {
            return Ok(text);
        };

        match extractor.extract(&text).await {
            Ok(keywords) => Ok(keywords),
            Err(err) => match self.extraction_policy {
                ExtractionPolicy::FallbackToInput => {
                    warn!("Keyword extraction failed, falling back to input: {}", err);
                    Ok(text)
                }
                ExtractionPolicy::Fail => Err(PointError::Extraction(err.to_string())),
            },
        }
    }
}
