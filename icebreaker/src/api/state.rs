use std::sync::Arc;

use crate::cache::MessageStore;
use crate::config::Config;
use crate::extract::ProfileExtractor;
use crate::llm::LlmProvider;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub llm: LlmProvider,
    pub store: MessageStore,
    pub extractor: ProfileExtractor,
}

impl AppState {
    pub fn new(config: Config, llm: LlmProvider) -> Self {
        let store = MessageStore::new(config.cache.ttl_secs, config.cache.max_entries);
        Self {
            config: Arc::new(config),
            llm,
            store,
            extractor: ProfileExtractor::new(),
        }
    }
}
