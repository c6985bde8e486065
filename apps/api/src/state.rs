use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::search::SearchIndex;
use crate::storage::MediaStore;
use crate::translation::Translator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub media: MediaStore,
    pub llm: LlmClient,
    pub config: Config,
    /// Translation backend. Default: LlmTranslator over `llm`.
    pub translator: Arc<dyn Translator>,
    /// Search backend. AlgoliaIndex when configured, DisabledIndex otherwise.
    pub search: Arc<dyn SearchIndex>,
}

#[cfg(test)]
pub(crate) mod testing {
    use std::time::Duration;

    use sqlx::postgres::PgPoolOptions;

    use super::*;
    use crate::config::test_config;
    use crate::search::DisabledIndex;
    use crate::translation::testing::FakeTranslator;

    /// State whose pool never connects; queries fail fast after a short timeout.
    pub async fn test_state() -> AppState {
        let config = test_config();
        let db = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy(&config.database_url)
            .expect("lazy pool");
        let llm = LlmClient::new(config.openai_api_key.clone(), config.openai_base_url.clone())
            .expect("llm client");
        AppState {
            db,
            media: MediaStore::from_config(&config).await,
            llm,
            config,
            translator: Arc::new(FakeTranslator::default()),
            search: Arc::new(DisabledIndex),
        }
    }
}
