mod openai;
mod provider;

pub use openai::{EmbeddingModel, OpenAiConfig, OpenAiEmbedder, openai_registry};
pub use provider::{Embedder, EmbedderRegistry};

#[cfg(test)]
pub use provider::MockEmbedder;
