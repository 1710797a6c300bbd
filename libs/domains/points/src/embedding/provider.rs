use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{PointError, PointResult};

/// Trait for text embedding models
///
/// An embedder maps text to a fixed-length vector for one named model.
/// Implementations are read-mostly shared services, loaded once per process
/// and safe for concurrent use.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Embedder: Send + Sync {
    /// The model name this embedder is registered under
    fn model_name(&self) -> &str;

    /// The fixed output dimension of the model
    fn dimension(&self) -> u32;

    /// Encode text into an embedding vector of length `dimension()`
    async fn encode(&self, text: &str) -> PointResult<Vec<f32>>;
}

impl std::fmt::Debug for dyn Embedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Embedder")
            .field("model_name", &self.model_name())
            .finish_non_exhaustive()
    }
}

/// Registry of embedders keyed by model name
///
/// Resolved per request; an unrecognized name fails with
/// [`PointError::UnknownModel`].
#[derive(Default)]
pub struct EmbedderRegistry {
    embedders: HashMap<String, Arc<dyn Embedder>>,
}

impl EmbedderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, embedder: Arc<dyn Embedder>) {
        self.embedders
            .insert(embedder.model_name().to_string(), embedder);
    }

    pub fn with(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.register(embedder);
        self
    }

    pub fn get(&self, model_name: &str) -> PointResult<Arc<dyn Embedder>> {
        self.embedders
            .get(model_name)
            .cloned()
            .ok_or_else(|| PointError::UnknownModel(model_name.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.embedders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_unknown_model() {
        let registry = EmbedderRegistry::new();
        let err = registry.get("no-such-model").unwrap_err();
        assert!(matches!(err, PointError::UnknownModel(name) if name == "no-such-model"));
    }

    #[test]
    fn test_registry_resolves_registered_embedder() {
        let mut mock = MockEmbedder::new();
        mock.expect_model_name().return_const("my-model".to_string());
        mock.expect_dimension().return_const(8u32);

        let registry = EmbedderRegistry::new().with(Arc::new(mock));
        let embedder = registry.get("my-model").unwrap();
        assert_eq!(embedder.dimension(), 8);
    }
}
