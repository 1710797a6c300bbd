use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{Embedder, EmbedderRegistry};
use crate::error::{PointError, PointResult};

/// OpenAI API configuration, shared by the embedders and the keyword
/// extractor. Built once at startup, never read from ambient env state
/// inside request handling.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
}

impl OpenAiConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn from_env() -> PointResult<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| PointError::Embedding("OPENAI_API_KEY not set".to_string()))?;

        let base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());

        Ok(Self { api_key, base_url })
    }
}

/// OpenAI embedding model selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingModel {
    /// text-embedding-3-small (1536 dimensions)
    TextEmbedding3Small,
    /// text-embedding-3-large (3072 dimensions)
    TextEmbedding3Large,
    /// text-embedding-ada-002 (1536 dimensions, legacy)
    TextEmbeddingAda002,
}

impl EmbeddingModel {
    pub const ALL: [EmbeddingModel; 3] = [
        EmbeddingModel::TextEmbedding3Small,
        EmbeddingModel::TextEmbedding3Large,
        EmbeddingModel::TextEmbeddingAda002,
    ];

    pub fn dimension(&self) -> u32 {
        match self {
            EmbeddingModel::TextEmbedding3Small => 1536,
            EmbeddingModel::TextEmbedding3Large => 3072,
            EmbeddingModel::TextEmbeddingAda002 => 1536,
        }
    }

    pub fn model_name(&self) -> &'static str {
        match self {
            EmbeddingModel::TextEmbedding3Small => "text-embedding-3-small",
            EmbeddingModel::TextEmbedding3Large => "text-embedding-3-large",
            EmbeddingModel::TextEmbeddingAda002 => "text-embedding-ada-002",
        }
    }
}

/// OpenAI embedder for a single model
pub struct OpenAiEmbedder {
    client: Client,
    config: OpenAiConfig,
    model: EmbeddingModel,
}

impl OpenAiEmbedder {
    pub fn new(config: OpenAiConfig, model: EmbeddingModel) -> Self {
        Self {
            client: Client::new(),
            config,
            model,
        }
    }
}

/// Build a registry holding every supported OpenAI embedding model
pub fn openai_registry(config: OpenAiConfig) -> EmbedderRegistry {
    let mut registry = EmbedderRegistry::new();
    for model in EmbeddingModel::ALL {
        registry.register(Arc::new(OpenAiEmbedder::new(config.clone(), model)));
    }
    registry
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    fn model_name(&self) -> &str {
        self.model.model_name()
    }

    fn dimension(&self) -> u32 {
        self.model.dimension()
    }

    async fn encode(&self, text: &str) -> PointResult<Vec<f32>> {
        let request = EmbeddingRequest {
            model: self.model.model_name().to_string(),
            input: vec![text.to_string()],
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.config.base_url))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PointError::Embedding(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        let embedding_response: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| PointError::Embedding(e.to_string()))?;

        // Sort by index in case the API ever returns out of order
        let mut data = embedding_response.data;
        data.sort_by_key(|d| d.index);

        data.into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| PointError::Embedding("No embedding returned".to_string()))
    }
}
