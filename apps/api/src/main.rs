mod ai;
mod articles;
mod auth;
mod banners;
mod blocks;
mod config;
mod db;
mod errors;
mod html;
mod i18n;
mod llm_client;
mod media;
mod models;
mod public;
mod routes;
mod search;
mod slug;
mod state;
mod storage;
mod taxonomy;
mod tenants;
mod translation;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::search::{AlgoliaIndex, DisabledIndex, SearchIndex};
use crate::state::AppState;
use crate::storage::MediaStore;
use crate::translation::LlmTranslator;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting MediaCMS API v{}", env!("CARGO_PKG_VERSION"));

    // PostgreSQL (runs migrations)
    let db = create_pool(&config.database_url).await?;

    // S3 / MinIO
    let media = MediaStore::from_config(&config).await;
    info!("Media store initialized (bucket: {})", config.s3_bucket);

    // LLM client and the translator built on it
    let llm = LlmClient::new(config.openai_api_key.clone(), config.openai_base_url.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);
    let translator = Arc::new(LlmTranslator(llm.clone()));

    // Search index: hosted backend when configured, otherwise disabled
    let search: Arc<dyn SearchIndex> = match &config.search {
        Some(search_config) => Arc::new(AlgoliaIndex::new(search_config)?),
        None => {
            info!("Search credentials not set; search sync disabled");
            Arc::new(DisabledIndex)
        }
    };
    info!("Search backend: {}", search.backend());

    let state = AppState {
        db,
        media,
        llm,
        config: config.clone(),
        translator,
        search,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to tenant domains

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
