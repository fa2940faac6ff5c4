use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::state::AppState;
use crate::llm::LlmBackend;

#[derive(Debug, Clone, Serialize)]
pub struct HealthData {
    pub status: String,
    pub message: String,
    pub llm: LlmStatus,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LlmStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// `GET /health`
pub async fn health_check(State(state): State<AppState>) -> Json<HealthData> {
    let llm = if state.llm.is_available() {
        let provider = match state.llm.backend() {
            LlmBackend::OpenAI => "openai",
            LlmBackend::OpenRouter => "openrouter",
            LlmBackend::Ollama => "ollama",
            LlmBackend::LmStudio => "lmstudio",
            LlmBackend::OpenAICompatible { .. } => "openai-compatible",
            LlmBackend::Unavailable { .. } => "unavailable",
        };
        LlmStatus {
            status: "available".to_string(),
            provider: Some(provider.to_string()),
            model: state.llm.config().map(|c| c.model.clone()),
        }
    } else {
        LlmStatus {
            status: "unavailable".to_string(),
            provider: None,
            model: None,
        }
    };

    Json(HealthData {
        status: "ok".to_string(),
        message: "Icebreaker relay is running".to_string(),
        llm,
        timestamp: Utc::now(),
    })
}
