use serde::Deserialize;
use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cache: CacheConfig,
    pub llm: Option<LlmConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Shared secret required in the `X-API-Secret` header for `/api/*`
    /// routes. `None` leaves the API open (local development).
    pub api_secret: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub ttl_secs: u64,
    pub max_entries: usize,
}

/// LLM configuration for the template-filling completion model
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 3600,
            max_entries: 100,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("ICEBREAKER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("ICEBREAKER_PORT", 3000),
                api_secret: env::var("API_SECRET_KEY").ok().filter(|s| !s.is_empty()),
            },
            cache: CacheConfig {
                ttl_secs: parse_env_or("CACHE_TTL_SECS", 3600),
                max_entries: parse_env_or("CACHE_MAX_ENTRIES", 100),
            },
            llm: env::var("LLM_MODEL").ok().map(|model| LlmConfig {
                model,
                api_key: env::var("LLM_API_KEY").ok(),
                base_url: env::var("LLM_BASE_URL").ok(),
                timeout_secs: parse_env_or("LLM_TIMEOUT", 30),
            }),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

/// Known LLM providers that use OpenAI-compatible APIs
pub const KNOWN_LLM_PROVIDERS: &[&str] = &["openai", "openrouter", "ollama", "lmstudio"];

/// Parse an LLM model name into (provider, model) tuple.
///
/// `openrouter/openai/gpt-4-turbo` → `("openrouter", "openai/gpt-4-turbo")`.
pub fn parse_llm_provider_model(model: &str) -> (&str, &str) {
    if let Some((prefix, rest)) = model.split_once('/') {
        let prefix_lower = prefix.to_lowercase();
        if KNOWN_LLM_PROVIDERS.contains(&prefix_lower.as_str()) {
            return (prefix, rest);
        }
    }
    // Default to treating the whole string as a local model
    ("local", model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_cache_config_defaults() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        std::env::remove_var("CACHE_TTL_SECS");
        std::env::remove_var("CACHE_MAX_ENTRIES");

        let config = Config::default();
        assert_eq!(config.cache.ttl_secs, 3600);
        assert_eq!(config.cache.max_entries, 100);
    }

    #[test]
    fn test_cache_config_from_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        std::env::set_var("CACHE_TTL_SECS", "60");
        std::env::set_var("CACHE_MAX_ENTRIES", "10");

        let config = Config::default();
        assert_eq!(config.cache.ttl_secs, 60);
        assert_eq!(config.cache.max_entries, 10);

        std::env::remove_var("CACHE_TTL_SECS");
        std::env::remove_var("CACHE_MAX_ENTRIES");
    }

    #[test]
    fn test_llm_config_absent_without_model() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        std::env::remove_var("LLM_MODEL");

        let config = Config::default();
        assert!(config.llm.is_none());
    }

    #[test]
    fn test_llm_config_from_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        std::env::set_var("LLM_MODEL", "openrouter/openai/gpt-4-turbo");
        std::env::set_var("LLM_API_KEY", "sk-test");

        let config = Config::default();
        let llm = config.llm.expect("llm config should be present");
        assert_eq!(llm.model, "openrouter/openai/gpt-4-turbo");
        assert_eq!(llm.api_key.as_deref(), Some("sk-test"));
        assert_eq!(llm.timeout_secs, 30);

        std::env::remove_var("LLM_MODEL");
        std::env::remove_var("LLM_API_KEY");
    }

    #[test]
    fn test_empty_api_secret_is_treated_as_unset() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        std::env::set_var("API_SECRET_KEY", "");

        let config = Config::default();
        assert!(config.server.api_secret.is_none());

        std::env::remove_var("API_SECRET_KEY");
    }

    #[test]
    fn test_parse_provider_model_openrouter() {
        let (provider, model) = parse_llm_provider_model("openrouter/openai/gpt-4-turbo");
        assert_eq!(provider, "openrouter");
        assert_eq!(model, "openai/gpt-4-turbo");
    }

    #[test]
    fn test_parse_provider_model_unknown_prefix() {
        let (provider, model) = parse_llm_provider_model("llama3.2");
        assert_eq!(provider, "local");
        assert_eq!(model, "llama3.2");
    }
}
