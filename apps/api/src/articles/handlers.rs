use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::types::Json as Jsonb;
use tracing::info;
use uuid::Uuid;

use crate::articles::publish::{
    finish_publication, prepare_publication, refresh_toc, resync_if_published, translate_article,
    unsync_article, PublishOutcome,
};
use crate::articles::repo;
use crate::errors::AppError;
use crate::i18n::{Lang, Localized};
use crate::models::article::{ArticleRow, ArticleStatus, TocByLang};
use crate::models::taxonomy::{CategoryRow, TagRow};
use crate::routes::params::{PageQuery, Paged, TenantQuery};
use crate::slug::resolve_slug;
use crate::state::AppState;
use crate::taxonomy::handlers::{extract_tag_candidates, suggest_from_candidates};
use crate::taxonomy::repo as taxonomy_repo;
use crate::taxonomy::suggest::TagSuggestions;
use crate::translation::TranslationReport;

#[derive(Debug, Deserialize)]
pub struct ArticleListQuery {
    pub tenant_id: Uuid,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Editable article fields. Status and publish time change only through
/// the publish/unpublish endpoints.
#[derive(Debug, Deserialize)]
pub struct ArticleInput {
    pub slug: Option<String>,
    pub title: Localized,
    #[serde(default)]
    pub excerpt: Localized,
    #[serde(default)]
    pub content: Localized,
    #[serde(default)]
    pub meta_title: Localized,
    #[serde(default)]
    pub meta_description: Localized,
    pub featured_image_url: Option<String>,
    #[serde(default)]
    pub category_ids: Vec<Uuid>,
    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
    pub writer_id: Option<Uuid>,
}

impl ArticleInput {
    fn validate(&self) -> Result<(), AppError> {
        if self.title.is_missing(Lang::SOURCE) {
            return Err(AppError::Validation(format!(
                "title.{} is required",
                Lang::SOURCE
            )));
        }
        Ok(())
    }

    /// Copies the editable fields onto `article` and rebuilds its TOC.
    fn apply_to(self, article: &mut ArticleRow) -> Result<(), AppError> {
        article.slug = resolve_slug(
            self.slug.as_deref().or(Some(article.slug.as_str())),
            &self.title,
        )?;
        article.title = Jsonb(self.title);
        article.excerpt = Jsonb(self.excerpt);
        article.content = Jsonb(self.content);
        article.meta_title = Jsonb(self.meta_title);
        article.meta_description = Jsonb(self.meta_description);
        article.featured_image_url = self.featured_image_url;
        article.category_ids = dedup(self.category_ids);
        article.tag_ids = dedup(self.tag_ids);
        article.writer_id = self.writer_id;
        refresh_toc(article);
        Ok(())
    }
}

fn dedup(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

#[derive(Debug, Default, Deserialize)]
pub struct PublishRequest {
    #[serde(default)]
    pub force_retranslate: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct TranslateRequest {
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    pub article: ArticleRow,
    pub translation: TranslationReport,
    /// `None` for drafts, which are not indexed.
    pub search_synced: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub article: ArticleRow,
    /// `None` for drafts, which are not indexed.
    pub search_synced: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct UnpublishResponse {
    pub article: ArticleRow,
    pub search_synced: bool,
}

async fn load_article(state: &AppState, tenant_id: Uuid, id: Uuid) -> Result<ArticleRow, AppError> {
    repo::get(&state.db, tenant_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Article {id} not found")))
}

async fn load_taxonomy(
    state: &AppState,
    tenant_id: Uuid,
) -> Result<(Vec<CategoryRow>, Vec<TagRow>), AppError> {
    let categories = taxonomy_repo::list_categories(&state.db, tenant_id).await?;
    let tags = taxonomy_repo::list_tags(&state.db, tenant_id).await?;
    Ok((categories, tags))
}

async fn resync_after_edit(
    state: &AppState,
    article: &ArticleRow,
) -> Result<Option<bool>, AppError> {
    if !article.is_published() {
        return Ok(None);
    }
    let (categories, tags) = load_taxonomy(state, article.tenant_id).await?;
    Ok(resync_if_published(state.search.as_ref(), article, &categories, &tags).await)
}

/// GET /api/admin/articles
pub async fn list_articles(
    State(state): State<AppState>,
    Query(q): Query<ArticleListQuery>,
) -> Result<Json<Paged<ArticleRow>>, AppError> {
    let status = q.status.as_deref().map(ArticleStatus::parse).transpose()?;
    let page = PageQuery {
        page: q.page,
        per_page: q.per_page,
    }
    .resolve()?;
    let (items, total) = repo::list(&state.db, q.tenant_id, status, page).await?;
    Ok(Json(Paged::new(items, page, total)))
}

/// POST /api/admin/articles
pub async fn create_article(
    State(state): State<AppState>,
    Query(q): Query<TenantQuery>,
    Json(input): Json<ArticleInput>,
) -> Result<(StatusCode, Json<ArticleRow>), AppError> {
    input.validate()?;
    let now = Utc::now();
    let mut article = ArticleRow {
        id: Uuid::new_v4(),
        tenant_id: q.tenant_id,
        slug: String::new(),
        status: ArticleStatus::Draft.as_str().to_string(),
        title: Jsonb(Localized::default()),
        excerpt: Jsonb(Localized::default()),
        content: Jsonb(Localized::default()),
        meta_title: Jsonb(Localized::default()),
        meta_description: Jsonb(Localized::default()),
        toc: Jsonb(TocByLang::new()),
        featured_image_url: None,
        category_ids: Vec::new(),
        tag_ids: Vec::new(),
        writer_id: None,
        view_count: 0,
        published_at: None,
        created_at: now,
        updated_at: now,
    };
    input.apply_to(&mut article)?;

    let saved = repo::insert(&state.db, &article).await?;
    info!("Created article {} ({}) for tenant {}", saved.id, saved.slug, saved.tenant_id);
    Ok((StatusCode::CREATED, Json(saved)))
}

/// GET /api/admin/articles/:id
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(q): Query<TenantQuery>,
) -> Result<Json<ArticleRow>, AppError> {
    Ok(Json(load_article(&state, q.tenant_id, id).await?))
}

/// PUT /api/admin/articles/:id
///
/// A published article stays published and is re-synced to search.
pub async fn update_article(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(q): Query<TenantQuery>,
    Json(input): Json<ArticleInput>,
) -> Result<Json<UpdateResponse>, AppError> {
    input.validate()?;
    let mut article = load_article(&state, q.tenant_id, id).await?;
    input.apply_to(&mut article)?;

    let article = repo::update(&state.db, &article).await?;
    let search_synced = resync_after_edit(&state, &article).await?;
    Ok(Json(UpdateResponse {
        article,
        search_synced,
    }))
}

/// DELETE /api/admin/articles/:id
pub async fn delete_article(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(q): Query<TenantQuery>,
) -> Result<StatusCode, AppError> {
    if !repo::delete(&state.db, q.tenant_id, id).await? {
        return Err(AppError::NotFound(format!("Article {id} not found")));
    }
    unsync_article(state.search.as_ref(), id).await;
    info!("Deleted article {id}");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/admin/articles/:id/publish
pub async fn publish_article(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(q): Query<TenantQuery>,
    body: Option<Json<PublishRequest>>,
) -> Result<Json<PublishOutcome>, AppError> {
    let req = body.map(|Json(b)| b).unwrap_or_default();
    let mut article = load_article(&state, q.tenant_id, id).await?;

    let translation = prepare_publication(
        state.translator.as_ref(),
        &mut article,
        req.force_retranslate,
        Utc::now(),
    )
    .await;

    let article = repo::update(&state.db, &article).await?;
    let (categories, tags) = load_taxonomy(&state, article.tenant_id).await?;
    let outcome = finish_publication(
        state.search.as_ref(),
        article,
        translation,
        &categories,
        &tags,
    )
    .await;
    Ok(Json(outcome))
}

/// POST /api/admin/articles/:id/unpublish
pub async fn unpublish_article(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(q): Query<TenantQuery>,
) -> Result<Json<UnpublishResponse>, AppError> {
    let mut article = load_article(&state, q.tenant_id, id).await?;
    article.status = ArticleStatus::Draft.as_str().to_string();

    let article = repo::update(&state.db, &article).await?;
    let search_synced = unsync_article(state.search.as_ref(), article.id).await;
    Ok(Json(UnpublishResponse {
        article,
        search_synced,
    }))
}

/// POST /api/admin/articles/:id/translate
///
/// Translates without publishing. Published articles are re-synced.
pub async fn translate_article_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(q): Query<TenantQuery>,
    body: Option<Json<TranslateRequest>>,
) -> Result<Json<TranslateResponse>, AppError> {
    let force = body.map(|Json(b)| b.force).unwrap_or_default();
    let mut article = load_article(&state, q.tenant_id, id).await?;

    let translation = translate_article(state.translator.as_ref(), &mut article, force).await;
    let article = repo::update(&state.db, &article).await?;
    let search_synced = resync_after_edit(&state, &article).await?;
    Ok(Json(TranslateResponse {
        article,
        translation,
        search_synced,
    }))
}

/// POST /api/admin/articles/:id/suggest-tags
pub async fn suggest_article_tags(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(q): Query<TenantQuery>,
) -> Result<Json<TagSuggestions>, AppError> {
    let article = load_article(&state, q.tenant_id, id).await?;
    let text = format!(
        "{}\n{}",
        article.title.get(Lang::SOURCE),
        article.content.get(Lang::SOURCE)
    );
    let candidates = extract_tag_candidates(&state, &text, 8).await?;
    suggest_from_candidates(&state, q.tenant_id, &candidates)
        .await
        .map(Json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::article::testing::sample_article;

    fn input(json: &str) -> ArticleInput {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_validate_requires_source_title() {
        assert!(input(r#"{"title":{"en":"Ramen"}}"#).validate().is_err());
        assert!(input(r#"{"title":{"ja":"ラーメン"}}"#).validate().is_ok());
    }

    #[test]
    fn test_apply_derives_slug_and_toc() {
        let mut article = sample_article();
        article.slug = String::new();
        input(
            r#"{
                "title": {"ja": "ラーメン", "en": "Best Ramen in Tokyo"},
                "content": {"ja": "<h2>醤油</h2><p>x</p>"},
                "tag_ids": ["6f1c1d3a-6a53-4c52-9d9e-3c5b8f6a0c11", "6f1c1d3a-6a53-4c52-9d9e-3c5b8f6a0c11"]
            }"#,
        )
        .apply_to(&mut article)
        .unwrap();

        assert_eq!(article.slug, "best-ramen-in-tokyo");
        assert_eq!(article.tag_ids.len(), 1);
        assert_eq!(article.toc[&Lang::Ja][0].id, "heading-1");
        assert!(article.content.get(Lang::Ja).contains("id=\"heading-1\""));
    }

    #[test]
    fn test_apply_keeps_existing_slug_when_omitted() {
        let mut article = sample_article();
        input(r#"{"title":{"ja":"ラーメン","en":"Something Else"}}"#)
            .apply_to(&mut article)
            .unwrap();
        assert_eq!(article.slug, "ramen-guide");
    }

    #[test]
    fn test_apply_does_not_touch_status() {
        let mut article = sample_article();
        article.status = ArticleStatus::Published.as_str().to_string();
        input(r#"{"title":{"ja":"ラーメン"}}"#)
            .apply_to(&mut article)
            .unwrap();
        assert!(article.is_published());
    }

    #[tokio::test]
    async fn test_edit_responses_carry_search_status() {
        use crate::articles::publish::resync_if_published;
        use crate::search::testing::RecordingIndex;

        let mut article = sample_article();
        article.status = ArticleStatus::Published.as_str().to_string();
        let failing = RecordingIndex {
            fail: true,
            ..Default::default()
        };
        let search_synced = resync_if_published(&failing, &article, &[], &[]).await;
        let body = serde_json::to_value(UpdateResponse {
            article: article.clone(),
            search_synced,
        })
        .unwrap();
        assert_eq!(body["search_synced"], false);

        article.status = ArticleStatus::Draft.as_str().to_string();
        let search_synced = resync_if_published(&failing, &article, &[], &[]).await;
        let body = serde_json::to_value(TranslateResponse {
            article,
            translation: TranslationReport::default(),
            search_synced,
        })
        .unwrap();
        assert!(body["search_synced"].is_null());
    }
}
