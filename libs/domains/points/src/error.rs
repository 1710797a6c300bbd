use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PointError {
    #[error("collection not found: {0}")]
    CollectionNotFound(String),

    #[error("point not found: {0}")]
    PointNotFound(String),

    #[error("no matching points found")]
    NoMatch,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid model name {0}, use a registered embedding model")]
    UnknownModel(String),

    #[error("{0}")]
    DimensionMismatch(String),

    #[error("keyword extraction failed: {0}")]
    Extraction(String),

    #[error("embedding error: {0}")]
    Embedding(String),

    #[error("store error: {0}")]
    Store(String),
}

pub type PointResult<T> = Result<T, PointError>;

impl From<qdrant_client::QdrantError> for PointError {
    fn from(err: qdrant_client::QdrantError) -> Self {
        PointError::Store(err.to_string())
    }
}

impl From<reqwest::Error> for PointError {
    fn from(err: reqwest::Error) -> Self {
        PointError::Embedding(err.to_string())
    }
}

impl From<serde_json::Error> for PointError {
    fn from(err: serde_json::Error) -> Self {
        PointError::Store(format!("JSON error: {}", err))
    }
}

/// Convert PointError to AppError for standardized HTTP error responses
impl From<PointError> for AppError {
    fn from(err: PointError) -> Self {
        match err {
            PointError::CollectionNotFound(name) => {
                AppError::NotFound(format!("Collection {} not found", name))
            }
            PointError::PointNotFound(id) => AppError::NotFound(format!("Point {} not found", id)),
            PointError::NoMatch => AppError::NotFound("No matching points found".to_string()),
            PointError::InvalidRequest(msg) => AppError::BadRequest(msg),
            PointError::UnknownModel(_) | PointError::DimensionMismatch(_) => {
                AppError::BadRequest(err.to_string())
            }
            PointError::Extraction(msg) => {
                AppError::InternalServerError(format!("Extraction error: {}", msg))
            }
            PointError::Embedding(msg) => {
                AppError::InternalServerError(format!("Embedding error: {}", msg))
            }
            PointError::Store(msg) => {
                AppError::InternalServerError(format!("Store error: {}", msg))
            }
        }
    }
}

impl IntoResponse for PointError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
