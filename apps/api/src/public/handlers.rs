use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::articles::repo::{self as article_repo, PublishedFilter};
use crate::banners::{is_valid_placement, repo as banner_repo};
use crate::blocks::repo as block_repo;
use crate::errors::AppError;
use crate::i18n::Lang;
use crate::models::tenant::TenantRow;
use crate::public::views::{
    category_term, tag_term, ArticleDetail, ArticleSummary, BannerView, BlockView, CategoryView,
    DetailContext, SiteView, TermView, WriterView,
};
use crate::routes::params::{PageQuery, Paged};
use crate::search::SearchHit;
use crate::state::AppState;
use crate::taxonomy::repo as taxonomy_repo;
use crate::tenants::repo as tenant_repo;

const RELATED_LIMIT: i64 = 4;
const DEFAULT_POPULAR: u32 = 5;
const MAX_POPULAR: u32 = 20;
const DEFAULT_SEARCH_LIMIT: u32 = 10;
const MAX_SEARCH_LIMIT: u32 = 50;

#[derive(Debug, Default, Deserialize)]
pub struct ArticleListQuery {
    pub category: Option<String>,
    pub tag: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BannerQuery {
    pub placement: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub limit: Option<u32>,
}

/// Active tenant by slug; unknown and inactive tenants are both 404.
async fn load_site(state: &AppState, slug: &str) -> Result<TenantRow, AppError> {
    tenant_repo::active_by_slug(&state.db, slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Site '{slug}' not found")))
}

async fn load_site_lang(
    state: &AppState,
    slug: &str,
    lang: &str,
) -> Result<(TenantRow, Lang), AppError> {
    let lang: Lang = lang.parse()?;
    Ok((load_site(state, slug).await?, lang))
}

fn clamp_limit(requested: Option<u32>, default: u32, max: u32) -> u32 {
    requested.unwrap_or(default).clamp(1, max)
}

/// GET /api/public/:tenant/theme
pub async fn site_theme(
    State(state): State<AppState>,
    Path(tenant): Path<String>,
) -> Result<Json<SiteView>, AppError> {
    Ok(Json(SiteView::from_row(load_site(&state, &tenant).await?)))
}

/// GET /api/public/:tenant/:lang/articles
pub async fn list_articles(
    State(state): State<AppState>,
    Path((tenant, lang)): Path<(String, String)>,
    Query(q): Query<ArticleListQuery>,
) -> Result<Json<Paged<ArticleSummary>>, AppError> {
    let (site, lang) = load_site_lang(&state, &tenant, &lang).await?;
    let page = PageQuery {
        page: q.page,
        per_page: q.per_page,
    }
    .resolve()?;

    let mut filter = PublishedFilter::default();
    if let Some(slug) = q.category.as_deref().filter(|s| !s.is_empty()) {
        let category = taxonomy_repo::category_by_slug(&state.db, site.id, slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category '{slug}' not found")))?;
        filter.category_id = Some(category.id);
    }
    if let Some(slug) = q.tag.as_deref().filter(|s| !s.is_empty()) {
        let tag = taxonomy_repo::tag_by_slug(&state.db, site.id, slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tag '{slug}' not found")))?;
        filter.tag_id = Some(tag.id);
    }

    let (rows, total) = article_repo::list_published(&state.db, site.id, filter, page).await?;
    let categories = taxonomy_repo::list_categories(&state.db, site.id).await?;
    let items = rows
        .iter()
        .map(|a| ArticleSummary::new(a, &categories, lang))
        .collect();
    Ok(Json(Paged::new(items, page, total)))
}

/// GET /api/public/:tenant/:lang/articles/popular
pub async fn popular_articles(
    State(state): State<AppState>,
    Path((tenant, lang)): Path<(String, String)>,
    Query(q): Query<LimitQuery>,
) -> Result<Json<Vec<ArticleSummary>>, AppError> {
    let (site, lang) = load_site_lang(&state, &tenant, &lang).await?;
    let limit = clamp_limit(q.limit, DEFAULT_POPULAR, MAX_POPULAR);

    let rows = article_repo::popular(&state.db, site.id, i64::from(limit)).await?;
    let categories = taxonomy_repo::list_categories(&state.db, site.id).await?;
    Ok(Json(
        rows.iter()
            .map(|a| ArticleSummary::new(a, &categories, lang))
            .collect(),
    ))
}

/// GET /api/public/:tenant/:lang/articles/:slug
///
/// Counts a view. A failed counter update is logged and the page is still served.
pub async fn article_detail(
    State(state): State<AppState>,
    Path((tenant, lang, slug)): Path<(String, String, String)>,
) -> Result<Json<ArticleDetail>, AppError> {
    let (site, lang) = load_site_lang(&state, &tenant, &lang).await?;
    let mut article = article_repo::get_published_by_slug(&state.db, site.id, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Article '{slug}' not found")))?;

    match article_repo::increment_views(&state.db, article.id).await {
        Ok(()) => article.view_count += 1,
        Err(e) => warn!("Could not count view for article {}: {e}", article.id),
    }

    let categories = taxonomy_repo::list_categories(&state.db, site.id).await?;
    let tags = taxonomy_repo::list_tags(&state.db, site.id).await?;
    let writer = match article.writer_id {
        Some(id) => taxonomy_repo::get_writer(&state.db, site.id, id).await?,
        None => None,
    };
    let related = article_repo::related(&state.db, &article, RELATED_LIMIT).await?;

    Ok(Json(ArticleDetail::new(
        &article,
        DetailContext {
            categories: &categories,
            tags: &tags,
            writer: writer.as_ref(),
            related: &related,
        },
        lang,
    )))
}

/// GET /api/public/:tenant/:lang/categories
pub async fn list_categories(
    State(state): State<AppState>,
    Path((tenant, lang)): Path<(String, String)>,
) -> Result<Json<Vec<CategoryView>>, AppError> {
    let (site, lang) = load_site_lang(&state, &tenant, &lang).await?;
    let rows = taxonomy_repo::list_categories(&state.db, site.id).await?;
    Ok(Json(rows.iter().map(|c| CategoryView::new(c, lang)).collect()))
}

/// GET /api/public/:tenant/:lang/tags
pub async fn list_tags(
    State(state): State<AppState>,
    Path((tenant, lang)): Path<(String, String)>,
) -> Result<Json<Vec<TermView>>, AppError> {
    let (site, lang) = load_site_lang(&state, &tenant, &lang).await?;
    let rows = taxonomy_repo::list_tags(&state.db, site.id).await?;
    Ok(Json(rows.iter().map(|t| tag_term(t, lang)).collect()))
}

/// GET /api/public/:tenant/:lang/categories/:slug
pub async fn category_detail(
    State(state): State<AppState>,
    Path((tenant, lang, slug)): Path<(String, String, String)>,
) -> Result<Json<TermView>, AppError> {
    let (site, lang) = load_site_lang(&state, &tenant, &lang).await?;
    let row = taxonomy_repo::category_by_slug(&state.db, site.id, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category '{slug}' not found")))?;
    Ok(Json(category_term(&row, lang)))
}

/// GET /api/public/:tenant/:lang/writers/:id
pub async fn writer_detail(
    State(state): State<AppState>,
    Path((tenant, lang, id)): Path<(String, String, Uuid)>,
) -> Result<Json<WriterView>, AppError> {
    let (site, lang) = load_site_lang(&state, &tenant, &lang).await?;
    let writer = taxonomy_repo::get_writer(&state.db, site.id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Writer {id} not found")))?;
    Ok(Json(WriterView::new(&writer, lang)))
}

/// GET /api/public/:tenant/:lang/banners
pub async fn live_banners(
    State(state): State<AppState>,
    Path((tenant, lang)): Path<(String, String)>,
    Query(q): Query<BannerQuery>,
) -> Result<Json<Vec<BannerView>>, AppError> {
    let (site, _lang) = load_site_lang(&state, &tenant, &lang).await?;
    let placement = q.placement.as_deref().filter(|p| !p.is_empty());
    if let Some(p) = placement {
        if !is_valid_placement(p) {
            return Err(AppError::Validation(format!("Unknown placement '{p}'")));
        }
    }

    let now = Utc::now();
    let banners = banner_repo::list_active(&state.db, site.id, placement)
        .await?
        .into_iter()
        .filter(|b| b.is_live(now))
        .map(BannerView::from)
        .collect();
    Ok(Json(banners))
}

/// GET /api/public/:tenant/:lang/blocks/:key
pub async fn content_block(
    State(state): State<AppState>,
    Path((tenant, lang, key)): Path<(String, String, String)>,
) -> Result<Json<BlockView>, AppError> {
    let (site, lang) = load_site_lang(&state, &tenant, &lang).await?;
    let block = block_repo::active_by_key(&state.db, site.id, &key)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Content block '{key}' not found")))?;
    Ok(Json(BlockView::new(&block, lang)))
}

/// GET /api/public/:tenant/:lang/search
pub async fn search_articles(
    State(state): State<AppState>,
    Path((tenant, lang)): Path<(String, String)>,
    Query(q): Query<SearchQuery>,
) -> Result<Json<Vec<SearchHit>>, AppError> {
    let (site, lang) = load_site_lang(&state, &tenant, &lang).await?;
    let query = q.q.as_deref().map(str::trim).unwrap_or_default();
    if query.is_empty() {
        return Err(AppError::Validation("q is required".to_string()));
    }
    let limit = clamp_limit(q.limit, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT);
    let hits = state.search.search(site.id, lang, query, limit).await?;
    Ok(Json(hits))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None, 5, 20), 5);
        assert_eq!(clamp_limit(Some(0), 5, 20), 1);
        assert_eq!(clamp_limit(Some(500), 5, 20), 20);
    }
}
