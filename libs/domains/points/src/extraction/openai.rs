use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::KeywordExtractor;
use crate::embedding::OpenAiConfig;
use crate::error::{PointError, PointResult};

const DEFAULT_EXTRACTION_MODEL: &str = "gpt-4o-mini";

const EXTRACTION_PROMPT: &str = "You are preparing vector data for a retrieval system. \
Extract the keywords that matter most from the following input and output only those \
keywords, nothing else.";

/// Keyword extractor backed by the OpenAI chat-completions API
pub struct OpenAiKeywordExtractor {
    client: Client,
    config: OpenAiConfig,
    model: String,
}

impl OpenAiKeywordExtractor {
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
            model: DEFAULT_EXTRACTION_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    pub fn from_env() -> PointResult<Self> {
        Ok(Self::new(OpenAiConfig::from_env()?))
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[async_trait]
impl KeywordExtractor for OpenAiKeywordExtractor {
    async fn extract(&self, text: &str) -> PointResult<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: EXTRACTION_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: text.to_string(),
                },
            ],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| PointError::Extraction(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PointError::Extraction(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| PointError::Extraction(e.to_string()))?;

        let keywords = chat_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .unwrap_or_default();

        if keywords.is_empty() {
            return Err(PointError::Extraction(
                "empty extraction response".to_string(),
            ));
        }

        Ok(keywords)
    }
}
