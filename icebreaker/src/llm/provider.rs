use std::sync::Arc;

use crate::config::{parse_llm_provider_model, LlmConfig};
use crate::error::{IcebreakerError, Result};
use crate::llm::api::LlmApiClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmBackend {
    OpenAI,
    OpenRouter,
    Ollama,
    LmStudio,
    OpenAICompatible { base_url: String },
    Unavailable { reason: String },
}

#[derive(Debug, Clone, Default)]
pub struct CompletionOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub top_p: Option<f32>,
    pub stop: Option<Vec<String>>,
}

impl CompletionOptions {
    /// Settings for template filling: low temperature keeps the model from
    /// paraphrasing text outside the placeholders.
    pub fn template_fill() -> Self {
        Self {
            temperature: Some(0.3),
            max_tokens: Some(1000),
            ..Default::default()
        }
    }
}

/// Chat-completion capability behind the relay. Resolves the backend from
/// the provider prefix of the configured model name.
#[derive(Debug, Clone)]
pub struct LlmProvider {
    backend: LlmBackend,
    config: Option<Arc<LlmConfig>>,
}

impl LlmProvider {
    pub fn new(config: Option<&LlmConfig>) -> Self {
        let Some(config) = config else {
            return Self::unavailable("No LLM configuration provided");
        };

        let (provider, _model) = parse_llm_provider_model(&config.model);

        let backend = match provider.to_lowercase().as_str() {
            "openai" => LlmBackend::OpenAI,
            "openrouter" => LlmBackend::OpenRouter,
            "ollama" => LlmBackend::Ollama,
            "lmstudio" => LlmBackend::LmStudio,
            _ => {
                if let Some(base_url) = &config.base_url {
                    LlmBackend::OpenAICompatible {
                        base_url: base_url.clone(),
                    }
                } else {
                    LlmBackend::Unavailable {
                        reason: format!("Unknown provider in model: {}", config.model),
                    }
                }
            }
        };

        Self {
            backend,
            config: Some(Arc::new(config.clone())),
        }
    }

    pub fn unavailable(reason: &str) -> Self {
        Self {
            backend: LlmBackend::Unavailable {
                reason: reason.to_string(),
            },
            config: None,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.backend, LlmBackend::Unavailable { .. })
    }

    pub fn backend(&self) -> &LlmBackend {
        &self.backend
    }

    pub fn config(&self) -> Option<&LlmConfig> {
        self.config.as_deref()
    }

    /// Run one chat completion. A failure is final; retrying is the
    /// caller's decision, never this layer's.
    pub async fn complete(
        &self,
        system_prompt: Option<&str>,
        prompt: &str,
        options: Option<&CompletionOptions>,
    ) -> Result<String> {
        if !self.is_available() {
            return Err(IcebreakerError::LlmUnavailable(self.unavailable_reason()));
        }

        let config = self
            .config()
            .ok_or_else(|| IcebreakerError::LlmUnavailable("No config available".to_string()))?;

        let client = LlmApiClient::new(config)?;
        client.complete(prompt, system_prompt, options).await
    }

    fn unavailable_reason(&self) -> String {
        match &self.backend {
            LlmBackend::Unavailable { reason } => reason.clone(),
            _ => "LLM completion is not available".to_string(),
        }
    }
}
