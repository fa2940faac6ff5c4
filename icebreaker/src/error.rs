use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IcebreakerError {
    #[error("Invalid request data")]
    Validation(Vec<String>),

    #[error("Unauthorized: Invalid API secret")]
    ApiAuth,

    #[error("Upstream API authentication failed: {0}")]
    UpstreamAuth(String),

    #[error("API rate limit exceeded, retry after {retry_after:?} seconds")]
    RateLimit { retry_after: Option<u64> },

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("LLM unavailable: {0}")]
    LlmUnavailable(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for IcebreakerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            IcebreakerError::Validation(details) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "success": false,
                    "error": "Invalid request data",
                    "details": details,
                }),
            ),
            IcebreakerError::ApiAuth => (
                StatusCode::UNAUTHORIZED,
                json!({
                    "success": false,
                    "error": "Unauthorized: Invalid API secret",
                }),
            ),
            IcebreakerError::UpstreamAuth(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "success": false,
                    "error": "Upstream API authentication failed. Please check your API key.",
                }),
            ),
            IcebreakerError::RateLimit { .. } => (
                StatusCode::TOO_MANY_REQUESTS,
                json!({
                    "success": false,
                    "error": "API rate limit exceeded. Please try again later.",
                }),
            ),
            IcebreakerError::Llm(detail) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "success": false,
                    "error": "Failed to customize message",
                    "details": detail,
                }),
            ),
            IcebreakerError::LlmUnavailable(detail) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "success": false,
                    "error": "Failed to customize message",
                    "details": detail,
                }),
            ),
            IcebreakerError::Extraction(msg) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "success": false,
                    "error": msg,
                }),
            ),
            internal @ (IcebreakerError::Http(_)
            | IcebreakerError::Json(_)
            | IcebreakerError::Internal(_)) => {
                tracing::error!(error = %internal, "Internal error mapped to response");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "success": false,
                        "error": "Internal server error",
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Outcome of a single generation attempt, shared across every caller
/// attached to the same in-flight fingerprint. Must be `Clone` so the
/// dedup store can broadcast it.
#[derive(Debug, Clone)]
pub enum GenerationError {
    RateLimit { retry_after: Option<u64> },
    Auth(String),
    Failed(String),
}

impl From<IcebreakerError> for GenerationError {
    fn from(err: IcebreakerError) -> Self {
        match err {
            IcebreakerError::RateLimit { retry_after } => GenerationError::RateLimit { retry_after },
            IcebreakerError::UpstreamAuth(msg) => GenerationError::Auth(msg),
            other => GenerationError::Failed(other.to_string()),
        }
    }
}

impl From<GenerationError> for IcebreakerError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::RateLimit { retry_after } => IcebreakerError::RateLimit { retry_after },
            GenerationError::Auth(msg) => IcebreakerError::UpstreamAuth(msg),
            GenerationError::Failed(msg) => IcebreakerError::Llm(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, IcebreakerError>;
