use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::types::Json as Jsonb;
use uuid::Uuid;

use crate::blocks::{is_valid_block_key, repo};
use crate::errors::AppError;
use crate::i18n::Localized;
use crate::models::content_block::ContentBlockRow;
use crate::routes::params::TenantQuery;
use crate::state::AppState;
use crate::translation::{translate_fields, FieldJob, TranslationReport};

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct BlockInput {
    pub key: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: Localized,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl BlockInput {
    fn validate(&self) -> Result<(), AppError> {
        if !is_valid_block_key(&self.key) {
            return Err(AppError::Validation(format!(
                "Invalid block key '{}': use lowercase letters, digits, '-' and '_'",
                self.key
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TranslateRequest {
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
pub struct TranslatedBlock {
    pub item: ContentBlockRow,
    pub translation: TranslationReport,
}

/// GET /api/admin/content-blocks
pub async fn list_blocks(
    State(state): State<AppState>,
    Query(q): Query<TenantQuery>,
) -> Result<Json<Vec<ContentBlockRow>>, AppError> {
    Ok(Json(repo::list(&state.db, q.tenant_id).await?))
}

/// POST /api/admin/content-blocks
///
/// A duplicate key within the tenant is a 409.
pub async fn create_block(
    State(state): State<AppState>,
    Query(q): Query<TenantQuery>,
    Json(input): Json<BlockInput>,
) -> Result<(StatusCode, Json<ContentBlockRow>), AppError> {
    input.validate()?;
    let now = Utc::now();
    let row = ContentBlockRow {
        id: Uuid::new_v4(),
        tenant_id: q.tenant_id,
        key: input.key,
        title: input.title,
        content: Jsonb(input.content),
        is_active: input.is_active,
        created_at: now,
        updated_at: now,
    };
    Ok((StatusCode::CREATED, Json(repo::insert(&state.db, &row).await?)))
}

/// PUT /api/admin/content-blocks/:id
pub async fn update_block(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(q): Query<TenantQuery>,
    Json(input): Json<BlockInput>,
) -> Result<Json<ContentBlockRow>, AppError> {
    input.validate()?;
    let mut row = repo::get(&state.db, q.tenant_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Content block {id} not found")))?;
    row.key = input.key;
    row.title = input.title;
    row.content = Jsonb(input.content);
    row.is_active = input.is_active;
    Ok(Json(repo::update(&state.db, &row).await?))
}

/// DELETE /api/admin/content-blocks/:id
pub async fn delete_block(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(q): Query<TenantQuery>,
) -> Result<StatusCode, AppError> {
    if !repo::delete(&state.db, q.tenant_id, id).await? {
        return Err(AppError::NotFound(format!("Content block {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/admin/content-blocks/:id/translate
pub async fn translate_block(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(q): Query<TenantQuery>,
    body: Option<Json<TranslateRequest>>,
) -> Result<Json<TranslatedBlock>, AppError> {
    let force = body.map(|Json(b)| b.force).unwrap_or_default();
    let mut row = repo::get(&state.db, q.tenant_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Content block {id} not found")))?;

    let translation = translate_fields(
        state.translator.as_ref(),
        vec![FieldJob::html("content", &mut row.content.0)],
        force,
    )
    .await;

    let item = repo::update(&state.db, &row).await?;
    Ok(Json(TranslatedBlock { item, translation }))
}
