use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::articles::repo as article_repo;
use crate::errors::AppError;
use crate::routes::params::TenantQuery;
use crate::search::{build_records, SearchRecord};
use crate::state::AppState;
use crate::taxonomy::repo as taxonomy_repo;

/// Records per batch request.
const REINDEX_BATCH: usize = 500;

#[derive(Debug, Serialize)]
pub struct ReindexResponse {
    pub backend: &'static str,
    pub articles: usize,
    pub records: usize,
}

/// POST /api/admin/search/reindex
///
/// Rebuilds the records of every published article of the tenant. Unlike
/// publish-time sync, a backend failure here fails the request.
pub async fn reindex(
    State(state): State<AppState>,
    Query(q): Query<TenantQuery>,
) -> Result<Json<ReindexResponse>, AppError> {
    let articles = article_repo::all_published(&state.db, q.tenant_id).await?;
    let categories = taxonomy_repo::list_categories(&state.db, q.tenant_id).await?;
    let tags = taxonomy_repo::list_tags(&state.db, q.tenant_id).await?;

    let records: Vec<SearchRecord> = articles
        .iter()
        .flat_map(|a| build_records(a, &categories, &tags))
        .collect();

    for chunk in records.chunks(REINDEX_BATCH) {
        state.search.upsert(chunk).await?;
    }

    info!(
        "Reindexed tenant {}: {} articles, {} records ({})",
        q.tenant_id,
        articles.len(),
        records.len(),
        state.search.backend()
    );
    Ok(Json(ReindexResponse {
        backend: state.search.backend(),
        articles: articles.len(),
        records: records.len(),
    }))
}
