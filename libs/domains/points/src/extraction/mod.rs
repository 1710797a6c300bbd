mod openai;

pub use openai::OpenAiKeywordExtractor;

use async_trait::async_trait;

use crate::error::PointResult;

/// Trait for the keyword-extraction stage
///
/// Reduces raw text to its salient keywords before embedding. The stage is
/// best-effort: what a failure means for the request is decided by
/// [`ExtractionPolicy`], not by implementations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeywordExtractor: Send + Sync {
    /// Extract keyword-bearing text from the input
    async fn extract(&self, text: &str) -> PointResult<String>;
}

/// What an extraction failure does to the request carrying it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionPolicy {
    /// Log the failure and embed the original text instead
    #[default]
    FallbackToInput,
    /// Fail the whole request with an extraction error
    Fail,
}
