use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::{ApiError, OpenAIError},
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
        Stop,
    },
    Client,
};

use crate::{
    config::{parse_llm_provider_model, LlmConfig},
    error::{IcebreakerError, Result},
    llm::provider::CompletionOptions,
};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";
const LMSTUDIO_BASE_URL: &str = "http://localhost:1234/v1";

#[derive(Debug, Clone)]
struct ApiConfig {
    base_url: String,
    api_key: Option<String>,
    model: String,
    timeout_secs: u64,
}

#[derive(Clone)]
pub struct LlmApiClient {
    client: Client<OpenAIConfig>,
    config: ApiConfig,
}

impl LlmApiClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_config = ApiConfig::from_llm_config(config);

        let (provider, _) = parse_llm_provider_model(&config.model);
        let needs_api_key = !matches!(
            provider.to_lowercase().as_str(),
            "ollama" | "local" | "lmstudio"
        );

        if needs_api_key && api_config.api_key.is_none() {
            return Err(IcebreakerError::UpstreamAuth(
                "API key required for this provider".to_string(),
            ));
        }

        let openai_config = OpenAIConfig::new()
            .with_api_base(api_config.base_url.clone())
            .with_api_key(api_config.api_key.clone().unwrap_or_default());

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(api_config.timeout_secs))
            .build()
            .map_err(|error| {
                IcebreakerError::Llm(format!("Failed to create LLM HTTP client: {error}"))
            })?;

        // Template filling is never retried. A zero max_elapsed_time stops
        // async-openai's internal exponential backoff after the first
        // attempt; every failure surfaces to the caller immediately.
        let backoff = backoff::ExponentialBackoff {
            max_elapsed_time: Some(Duration::ZERO),
            ..Default::default()
        };

        let client = Client::with_config(openai_config)
            .with_http_client(http_client)
            .with_backoff(backoff);

        Ok(Self {
            client,
            config: api_config,
        })
    }

    /// Run exactly one chat completion attempt.
    pub async fn complete(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        options: Option<&CompletionOptions>,
    ) -> Result<String> {
        if prompt.trim().is_empty() {
            return Err(IcebreakerError::Internal(
                "Prompt cannot be empty".to_string(),
            ));
        }

        let request = self.build_request(prompt, system_prompt, options)?;

        match self.client.chat().create(request).await {
            Ok(response) => Self::extract_content(response),
            Err(error) => {
                if let Some(rate_limit_error) = Self::rate_limit_error(&error) {
                    return Err(rate_limit_error);
                }
                if let Some(auth_error) = Self::auth_error(&error) {
                    return Err(auth_error);
                }
                Err(Self::map_openai_error(error))
            }
        }
    }

    fn build_request(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        options: Option<&CompletionOptions>,
    ) -> Result<CreateChatCompletionRequest> {
        let mut messages = Vec::new();

        if let Some(system_prompt) = system_prompt.filter(|value| !value.trim().is_empty()) {
            messages.push(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system_prompt)
                    .build()
                    .map_err(|error| {
                        IcebreakerError::Internal(format!("Invalid system prompt: {error}"))
                    })?
                    .into(),
            );
        }

        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|error| {
                    IcebreakerError::Internal(format!("Invalid user prompt: {error}"))
                })?
                .into(),
        );

        let mut request = CreateChatCompletionRequestArgs::default();
        request.model(self.config.model.clone()).messages(messages);
        Self::apply_completion_options(&mut request, options);

        request.build().map_err(|error| {
            IcebreakerError::Internal(format!("Invalid LLM completion request: {error}"))
        })
    }

    fn apply_completion_options(
        request: &mut CreateChatCompletionRequestArgs,
        options: Option<&CompletionOptions>,
    ) {
        let Some(options) = options else {
            return;
        };

        if let Some(temperature) = options.temperature {
            request.temperature(temperature);
        }

        if let Some(max_tokens) = options.max_tokens {
            request.max_tokens(max_tokens);
        }

        if let Some(top_p) = options.top_p {
            request.top_p(top_p);
        }

        if let Some(stop) = options.stop.as_ref().filter(|values| !values.is_empty()) {
            request.stop(Stop::StringArray(stop.clone()));
        }
    }

    fn extract_content(response: CreateChatCompletionResponse) -> Result<String> {
        let message = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| IcebreakerError::Llm("LLM response contained no choices".to_string()))?
            .message
            .content
            .unwrap_or_default();

        let trimmed = message.trim();
        if trimmed.is_empty() {
            return Err(IcebreakerError::Llm(
                "LLM response contained empty content".to_string(),
            ));
        }

        Ok(trimmed.to_string())
    }

    fn rate_limit_error(error: &OpenAIError) -> Option<IcebreakerError> {
        match error {
            OpenAIError::Reqwest(reqwest_error)
                if reqwest_error.status() == Some(reqwest::StatusCode::TOO_MANY_REQUESTS) =>
            {
                Some(IcebreakerError::RateLimit { retry_after: None })
            }
            OpenAIError::ApiError(api_error) if Self::is_rate_limit_api_error(api_error) => {
                Some(IcebreakerError::RateLimit { retry_after: None })
            }
            _ => None,
        }
    }

    fn auth_error(error: &OpenAIError) -> Option<IcebreakerError> {
        match error {
            OpenAIError::Reqwest(reqwest_error)
                if reqwest_error.status() == Some(reqwest::StatusCode::UNAUTHORIZED)
                    || reqwest_error.status() == Some(reqwest::StatusCode::FORBIDDEN) =>
            {
                Some(IcebreakerError::UpstreamAuth(format!(
                    "LLM authentication failed: {reqwest_error}"
                )))
            }
            OpenAIError::ApiError(api_error) if Self::is_auth_api_error(api_error) => {
                Some(IcebreakerError::UpstreamAuth(format!(
                    "LLM authentication failed: {api_error}"
                )))
            }
            _ => None,
        }
    }

    fn is_rate_limit_api_error(api_error: &ApiError) -> bool {
        let message = api_error.message.to_lowercase();
        let error_type = api_error.r#type.clone().unwrap_or_default().to_lowercase();
        let code = api_error.code.clone().unwrap_or_default().to_lowercase();

        message.contains("rate limit")
            || message.contains("too many requests")
            || error_type.contains("rate_limit")
            || code.contains("rate_limit")
            || code == "insufficient_quota"
    }

    fn is_auth_api_error(api_error: &ApiError) -> bool {
        let message = api_error.message.to_lowercase();
        let error_type = api_error.r#type.clone().unwrap_or_default().to_lowercase();
        let code = api_error.code.clone().unwrap_or_default().to_lowercase();

        message.contains("unauthorized")
            || message.contains("forbidden")
            || message.contains("authentication")
            || message.contains("invalid api key")
            || code.contains("invalid_api_key")
            || code.contains("authentication")
            || error_type.contains("authentication")
    }

    fn map_openai_error(error: OpenAIError) -> IcebreakerError {
        match error {
            OpenAIError::Reqwest(reqwest_error) => {
                IcebreakerError::Llm(format!("LLM request failed: {reqwest_error}"))
            }
            OpenAIError::ApiError(api_error) => {
                IcebreakerError::Llm(format!("LLM API error: {api_error}"))
            }
            OpenAIError::JSONDeserialize(err) => {
                IcebreakerError::Llm(format!("Failed to parse LLM response: {err}"))
            }
            OpenAIError::InvalidArgument(message) => IcebreakerError::Internal(message),
            other => IcebreakerError::Llm(other.to_string()),
        }
    }
}

impl ApiConfig {
    fn from_llm_config(config: &LlmConfig) -> Self {
        let (provider, model) = parse_llm_provider_model(&config.model);

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| default_base_url(provider).to_string());

        let normalized_model = if provider.eq_ignore_ascii_case("local") {
            config.model.clone()
        } else {
            model.to_string()
        };

        Self {
            base_url,
            api_key: config.api_key.clone(),
            model: normalized_model,
            timeout_secs: config.timeout_secs,
        }
    }
}

fn default_base_url(provider: &str) -> &'static str {
    match provider.to_lowercase().as_str() {
        "openai" => OPENAI_BASE_URL,
        "openrouter" => OPENROUTER_BASE_URL,
        "ollama" => OLLAMA_BASE_URL,
        "lmstudio" => LMSTUDIO_BASE_URL,
        _ => OPENAI_BASE_URL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_llm_config() -> LlmConfig {
        LlmConfig {
            model: "ollama/llama3".to_string(),
            api_key: None,
            base_url: None,
            timeout_secs: 30,
        }
    }

    #[test]
    fn local_providers_do_not_require_api_key() {
        assert!(LlmApiClient::new(&test_llm_config()).is_ok());
    }

    #[test]
    fn hosted_provider_requires_api_key() {
        let config = LlmConfig {
            model: "openai/gpt-4-turbo".to_string(),
            ..test_llm_config()
        };
        assert!(matches!(
            LlmApiClient::new(&config),
            Err(IcebreakerError::UpstreamAuth(_))
        ));
    }

    #[test]
    fn provider_prefix_is_stripped_from_model() {
        let config = ApiConfig::from_llm_config(&LlmConfig {
            model: "openrouter/openai/gpt-4-turbo".to_string(),
            api_key: Some("sk-test".to_string()),
            base_url: None,
            timeout_secs: 30,
        });
        assert_eq!(config.model, "openai/gpt-4-turbo");
        assert_eq!(config.base_url, OPENROUTER_BASE_URL);
    }

    #[test]
    fn local_model_name_is_preserved() {
        let config = ApiConfig::from_llm_config(&LlmConfig {
            model: "llama3.2".to_string(),
            api_key: None,
            base_url: Some("http://localhost:8080/v1".to_string()),
            timeout_secs: 30,
        });
        assert_eq!(config.model, "llama3.2");
        assert_eq!(config.base_url, "http://localhost:8080/v1");
    }

    #[test]
    fn request_carries_system_and_user_messages() {
        let client = LlmApiClient::new(&test_llm_config()).expect("client");
        let request = client
            .build_request(
                "fill the template",
                Some("you fill templates"),
                Some(&CompletionOptions::template_fill()),
            )
            .expect("request");

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.temperature, Some(0.3));
        assert_eq!(request.max_tokens, Some(1000));
    }

    #[test]
    fn blank_system_prompt_is_dropped() {
        let client = LlmApiClient::new(&test_llm_config()).expect("client");
        let request = client
            .build_request("fill the template", Some("   "), None)
            .expect("request");
        assert_eq!(request.messages.len(), 1);
    }
}
