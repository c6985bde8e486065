//! Axum route handlers for categories, tags and writers.

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

use crate::articles::publish::resync_articles;
use crate::articles::repo as article_repo;
use crate::errors::AppError;
use crate::html::{html_to_text, truncate_chars};
use crate::i18n::{Lang, Localized};
use crate::models::article::ArticleRow;
use crate::models::taxonomy::{CategoryRow, TagRow, WriterRow};
use crate::routes::params::TenantQuery;
use crate::slug::resolve_slug;
use crate::state::AppState;
use crate::taxonomy::prompts::{TAG_EXTRACT_PROMPT, TAG_EXTRACT_SYSTEM};
use crate::taxonomy::repo;
use crate::taxonomy::suggest::{match_candidates, TagSuggestions};
use crate::translation::{translate_fields, FieldJob, TranslationReport};

const DEFAULT_MAX_TAGS: u32 = 8;
const MAX_TAG_TEXT_CHARS: usize = 6_000;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CategoryInput {
    pub slug: Option<String>,
    pub name: Localized,
    #[serde(default)]
    pub description: Localized,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Deserialize)]
pub struct TagInput {
    pub slug: Option<String>,
    pub name: Localized,
}

#[derive(Debug, Deserialize)]
pub struct WriterInput {
    pub name: String,
    #[serde(default)]
    pub bio: Localized,
    pub icon_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TranslateRequest {
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
pub struct Translated<T> {
    pub item: T,
    pub translation: TranslationReport,
}

#[derive(Debug, Deserialize)]
pub struct SuggestTagsRequest {
    pub text: Option<String>,
    pub candidates: Option<Vec<String>>,
    pub max_tags: Option<u32>,
}

fn require_source(value: &Localized, field: &str) -> Result<(), AppError> {
    if value.is_missing(Lang::SOURCE) {
        return Err(AppError::Validation(format!(
            "{field}.{} is required",
            Lang::SOURCE
        )));
    }
    Ok(())
}

/// Pushes fresh records for published articles whose category or tag names changed.
async fn resync_referencing(
    state: &AppState,
    tenant_id: Uuid,
    articles: &[ArticleRow],
) -> Result<(), AppError> {
    if !articles.iter().any(|a| a.is_published()) {
        return Ok(());
    }
    let categories = repo::list_categories(&state.db, tenant_id).await?;
    let tags = repo::list_tags(&state.db, tenant_id).await?;
    let synced = resync_articles(state.search.as_ref(), articles, &categories, &tags).await;
    info!("Re-synced {synced} article(s) after taxonomy change");
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Categories
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/admin/categories
pub async fn list_categories(
    State(state): State<AppState>,
    Query(q): Query<TenantQuery>,
) -> Result<Json<Vec<CategoryRow>>, AppError> {
    Ok(Json(repo::list_categories(&state.db, q.tenant_id).await?))
}

/// POST /api/admin/categories
pub async fn create_category(
    State(state): State<AppState>,
    Query(q): Query<TenantQuery>,
    Json(input): Json<CategoryInput>,
) -> Result<(StatusCode, Json<CategoryRow>), AppError> {
    require_source(&input.name, "name")?;
    let now = Utc::now();
    let row = CategoryRow {
        id: Uuid::new_v4(),
        tenant_id: q.tenant_id,
        slug: resolve_slug(input.slug.as_deref(), &input.name)?,
        name: Jsonb(input.name),
        description: Jsonb(input.description),
        sort_order: input.sort_order,
        created_at: now,
        updated_at: now,
    };
    let saved = repo::insert_category(&state.db, &row).await?;
    info!("Created category {} ({}) for tenant {}", saved.id, saved.slug, saved.tenant_id);
    Ok((StatusCode::CREATED, Json(saved)))
}

/// PUT /api/admin/categories/:id
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(q): Query<TenantQuery>,
    Json(input): Json<CategoryInput>,
) -> Result<Json<CategoryRow>, AppError> {
    require_source(&input.name, "name")?;
    let mut row = repo::get_category(&state.db, q.tenant_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category {id} not found")))?;

    row.slug = resolve_slug(input.slug.as_deref().or(Some(row.slug.as_str())), &input.name)?;
    row.name = Jsonb(input.name);
    row.description = Jsonb(input.description);
    row.sort_order = input.sort_order;

    let saved = repo::update_category(&state.db, &row).await?;
    let affected = article_repo::published_with_category(&state.db, q.tenant_id, id).await?;
    resync_referencing(&state, q.tenant_id, &affected).await?;
    Ok(Json(saved))
}

/// DELETE /api/admin/categories/:id
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(q): Query<TenantQuery>,
) -> Result<StatusCode, AppError> {
    if !repo::delete_category(&state.db, q.tenant_id, id).await? {
        return Err(AppError::NotFound(format!("Category {id} not found")));
    }
    let detached = article_repo::remove_category_ref(&state.db, q.tenant_id, id).await?;
    info!("Deleted category {id}; detached from {} article(s)", detached.len());
    resync_referencing(&state, q.tenant_id, &detached).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/admin/categories/:id/translate
pub async fn translate_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(q): Query<TenantQuery>,
    body: Option<Json<TranslateRequest>>,
) -> Result<Json<Translated<CategoryRow>>, AppError> {
    let force = body.map(|Json(b)| b.force).unwrap_or_default();
    let mut row = repo::get_category(&state.db, q.tenant_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category {id} not found")))?;

    let translation = translate_fields(
        state.translator.as_ref(),
        vec![
            FieldJob::plain("name", &mut row.name.0),
            FieldJob::plain("description", &mut row.description.0),
        ],
        force,
    )
    .await;

    let item = repo::update_category(&state.db, &row).await?;
    let affected = article_repo::published_with_category(&state.db, q.tenant_id, id).await?;
    resync_referencing(&state, q.tenant_id, &affected).await?;
    Ok(Json(Translated { item, translation }))
}

// ────────────────────────────────────────────────────────────────────────────
// Tags
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/admin/tags
pub async fn list_tags(
    State(state): State<AppState>,
    Query(q): Query<TenantQuery>,
) -> Result<Json<Vec<TagRow>>, AppError> {
    Ok(Json(repo::list_tags(&state.db, q.tenant_id).await?))
}

/// POST /api/admin/tags
pub async fn create_tag(
    State(state): State<AppState>,
    Query(q): Query<TenantQuery>,
    Json(input): Json<TagInput>,
) -> Result<(StatusCode, Json<TagRow>), AppError> {
    require_source(&input.name, "name")?;
    let now = Utc::now();
    let row = TagRow {
        id: Uuid::new_v4(),
        tenant_id: q.tenant_id,
        slug: resolve_slug(input.slug.as_deref(), &input.name)?,
        name: Jsonb(input.name),
        created_at: now,
        updated_at: now,
    };
    let saved = repo::insert_tag(&state.db, &row).await?;
    info!("Created tag {} ({}) for tenant {}", saved.id, saved.slug, saved.tenant_id);
    Ok((StatusCode::CREATED, Json(saved)))
}

/// PUT /api/admin/tags/:id
pub async fn update_tag(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(q): Query<TenantQuery>,
    Json(input): Json<TagInput>,
) -> Result<Json<TagRow>, AppError> {
    require_source(&input.name, "name")?;
    let mut row = repo::get_tag(&state.db, q.tenant_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tag {id} not found")))?;

    row.slug = resolve_slug(input.slug.as_deref().or(Some(row.slug.as_str())), &input.name)?;
    row.name = Jsonb(input.name);

    let saved = repo::update_tag(&state.db, &row).await?;
    let affected = article_repo::published_with_tag(&state.db, q.tenant_id, id).await?;
    resync_referencing(&state, q.tenant_id, &affected).await?;
    Ok(Json(saved))
}

/// DELETE /api/admin/tags/:id
pub async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(q): Query<TenantQuery>,
) -> Result<StatusCode, AppError> {
    if !repo::delete_tag(&state.db, q.tenant_id, id).await? {
        return Err(AppError::NotFound(format!("Tag {id} not found")));
    }
    let detached = article_repo::remove_tag_ref(&state.db, q.tenant_id, id).await?;
    info!("Deleted tag {id}; detached from {} article(s)", detached.len());
    resync_referencing(&state, q.tenant_id, &detached).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/admin/tags/:id/translate
pub async fn translate_tag(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(q): Query<TenantQuery>,
    body: Option<Json<TranslateRequest>>,
) -> Result<Json<Translated<TagRow>>, AppError> {
    let force = body.map(|Json(b)| b.force).unwrap_or_default();
    let mut row = repo::get_tag(&state.db, q.tenant_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tag {id} not found")))?;

    let translation = translate_fields(
        state.translator.as_ref(),
        vec![FieldJob::plain("name", &mut row.name.0)],
        force,
    )
    .await;

    let item = repo::update_tag(&state.db, &row).await?;
    let affected = article_repo::published_with_tag(&state.db, q.tenant_id, id).await?;
    resync_referencing(&state, q.tenant_id, &affected).await?;
    Ok(Json(Translated { item, translation }))
}

/// POST /api/admin/tags/suggest
///
/// Matches caller-supplied candidates, or LLM-extracted ones from `text`,
/// against the tenant's existing tags.
pub async fn suggest_tags(
    State(state): State<AppState>,
    Query(q): Query<TenantQuery>,
    Json(req): Json<SuggestTagsRequest>,
) -> Result<Json<TagSuggestions>, AppError> {
    let candidates = match (req.candidates, req.text) {
        (Some(candidates), _) if !candidates.is_empty() => candidates,
        (_, Some(text)) if !text.trim().is_empty() => {
            extract_tag_candidates(&state, &text, req.max_tags.unwrap_or(DEFAULT_MAX_TAGS))
                .await?
        }
        _ => {
            return Err(AppError::Validation(
                "Provide either non-empty candidates or text".to_string(),
            ))
        }
    };

    suggest_from_candidates(&state, q.tenant_id, &candidates)
        .await
        .map(Json)
}

pub async fn suggest_from_candidates(
    state: &AppState,
    tenant_id: Uuid,
    candidates: &[String],
) -> Result<TagSuggestions, AppError> {
    let tags = repo::list_tags(&state.db, tenant_id).await?;
    Ok(match_candidates(
        candidates,
        &tags,
        state.config.tag_match_threshold,
    ))
}

/// Asks the LLM for tag names describing `text` (HTML is stripped first).
pub async fn extract_tag_candidates(
    state: &AppState,
    text: &str,
    max_tags: u32,
) -> Result<Vec<String>, AppError> {
    let plain = html_to_text(text);
    let prompt = TAG_EXTRACT_PROMPT
        .replace("{max_tags}", &max_tags.clamp(1, 20).to_string())
        .replace("{text}", truncate_chars(&plain, MAX_TAG_TEXT_CHARS));

    let mut candidates: Vec<String> = state
        .llm
        .call_json(&prompt, TAG_EXTRACT_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Tag extraction failed: {e}")))?;
    candidates.truncate(max_tags as usize);
    Ok(candidates)
}

// ────────────────────────────────────────────────────────────────────────────
// Writers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/admin/writers
pub async fn list_writers(
    State(state): State<AppState>,
    Query(q): Query<TenantQuery>,
) -> Result<Json<Vec<WriterRow>>, AppError> {
    Ok(Json(repo::list_writers(&state.db, q.tenant_id).await?))
}

/// POST /api/admin/writers
pub async fn create_writer(
    State(state): State<AppState>,
    Query(q): Query<TenantQuery>,
    Json(input): Json<WriterInput>,
) -> Result<(StatusCode, Json<WriterRow>), AppError> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }
    let now = Utc::now();
    let row = WriterRow {
        id: Uuid::new_v4(),
        tenant_id: q.tenant_id,
        name: input.name.trim().to_string(),
        bio: Jsonb(input.bio),
        icon_url: input.icon_url,
        created_at: now,
        updated_at: now,
    };
    let saved = repo::insert_writer(&state.db, &row).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// PUT /api/admin/writers/:id
pub async fn update_writer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(q): Query<TenantQuery>,
    Json(input): Json<WriterInput>,
) -> Result<Json<WriterRow>, AppError> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }
    let mut row = repo::get_writer(&state.db, q.tenant_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Writer {id} not found")))?;

    row.name = input.name.trim().to_string();
    row.bio = Jsonb(input.bio);
    row.icon_url = input.icon_url;

    Ok(Json(repo::update_writer(&state.db, &row).await?))
}

/// DELETE /api/admin/writers/:id
pub async fn delete_writer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(q): Query<TenantQuery>,
) -> Result<StatusCode, AppError> {
    if !repo::delete_writer(&state.db, q.tenant_id, id).await? {
        return Err(AppError::NotFound(format!("Writer {id} not found")));
    }
    article_repo::clear_writer_ref(&state.db, q.tenant_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/admin/writers/:id/translate
pub async fn translate_writer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(q): Query<TenantQuery>,
    body: Option<Json<TranslateRequest>>,
) -> Result<Json<Translated<WriterRow>>, AppError> {
    let force = body.map(|Json(b)| b.force).unwrap_or_default();
    let mut row = repo::get_writer(&state.db, q.tenant_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Writer {id} not found")))?;

    let translation = translate_fields(
        state.translator.as_ref(),
        vec![FieldJob::plain("bio", &mut row.bio.0)],
        force,
    )
    .await;

    let item = repo::update_writer(&state.db, &row).await?;
    Ok(Json(Translated { item, translation }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_source_rejects_translation_only_names() {
        let mut name = Localized::default();
        name.set(Lang::En, "Food");
        assert!(require_source(&name, "name").is_err());
        assert!(require_source(&Localized::source("グルメ"), "name").is_ok());
    }

    #[test]
    fn test_category_input_defaults() {
        let input: CategoryInput = serde_json::from_str(r#"{"name":{"ja":"旅行"}}"#).unwrap();
        assert!(input.slug.is_none());
        assert_eq!(input.sort_order, 0);
        assert!(input.description.is_empty());
    }
}
