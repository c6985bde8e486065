use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use sqlx::types::Json as Jsonb;
use tracing::{info, warn};
use uuid::Uuid;

use crate::articles::publish::unsync_articles;
use crate::articles::repo as article_repo;
use crate::errors::AppError;
use crate::i18n::{Lang, Localized};
use crate::media::repo as media_repo;
use crate::models::tenant::{TenantRow, Theme};
use crate::slug::is_valid_slug;
use crate::state::AppState;
use crate::tenants::repo;
use crate::tenants::theme::validate_theme;

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct TenantInput {
    pub slug: String,
    pub name: Localized,
    pub domain: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub theme: Option<Theme>,
}

impl TenantInput {
    fn validate(&self) -> Result<(), AppError> {
        if !is_valid_slug(&self.slug) {
            return Err(AppError::Validation(format!(
                "Invalid tenant slug '{}': use lowercase letters, digits and single hyphens",
                self.slug
            )));
        }
        if self.name.is_missing(Lang::SOURCE) {
            return Err(AppError::Validation(format!("name.{} is required", Lang::SOURCE)));
        }
        if let Some(theme) = &self.theme {
            validate_theme(theme)?;
        }
        Ok(())
    }
}

async fn load_tenant(state: &AppState, id: Uuid) -> Result<TenantRow, AppError> {
    repo::get(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tenant {id} not found")))
}

/// GET /api/admin/tenants
pub async fn list_tenants(State(state): State<AppState>) -> Result<Json<Vec<TenantRow>>, AppError> {
    Ok(Json(repo::list(&state.db).await?))
}

/// POST /api/admin/tenants
pub async fn create_tenant(
    State(state): State<AppState>,
    Json(input): Json<TenantInput>,
) -> Result<(StatusCode, Json<TenantRow>), AppError> {
    input.validate()?;
    let now = Utc::now();
    let row = TenantRow {
        id: Uuid::new_v4(),
        slug: input.slug,
        name: Jsonb(input.name),
        domain: input.domain.filter(|d| !d.trim().is_empty()),
        theme: Jsonb(input.theme.unwrap_or_default()),
        is_active: input.is_active,
        created_at: now,
        updated_at: now,
    };
    let saved = repo::insert(&state.db, &row).await?;
    info!("Created tenant {} ({})", saved.id, saved.slug);
    Ok((StatusCode::CREATED, Json(saved)))
}

/// GET /api/admin/tenants/:id
pub async fn get_tenant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TenantRow>, AppError> {
    Ok(Json(load_tenant(&state, id).await?))
}

/// PUT /api/admin/tenants/:id
///
/// The theme is left untouched when the body carries none.
pub async fn update_tenant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<TenantInput>,
) -> Result<Json<TenantRow>, AppError> {
    input.validate()?;
    let mut row = load_tenant(&state, id).await?;
    row.slug = input.slug;
    row.name = Jsonb(input.name);
    row.domain = input.domain.filter(|d| !d.trim().is_empty());
    row.is_active = input.is_active;
    if let Some(theme) = input.theme {
        row.theme = Jsonb(theme);
    }
    Ok(Json(repo::update(&state.db, &row).await?))
}

/// DELETE /api/admin/tenants/:id
///
/// Removes the tenant's search records and stored media before the rows.
/// Failures on either external system are logged and do not block deletion.
pub async fn delete_tenant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let tenant = load_tenant(&state, id).await?;

    let article_ids: Vec<Uuid> = article_repo::all_published(&state.db, id)
        .await?
        .iter()
        .map(|a| a.id)
        .collect();
    if !unsync_articles(state.search.as_ref(), &article_ids).await {
        warn!("Search cleanup incomplete for tenant {id}");
    }

    for file in media_repo::list_all(&state.db, id).await? {
        if let Err(e) = state.media.delete(&file.storage_key).await {
            warn!("Storage cleanup failed for {}: {e}", file.storage_key);
        }
    }

    repo::delete(&state.db, id).await?;
    info!("Deleted tenant {} ({})", tenant.id, tenant.slug);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/admin/tenants/:id/theme
pub async fn get_theme(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Theme>, AppError> {
    let tenant = load_tenant(&state, id).await?;
    Ok(Json(tenant.theme.0))
}

/// PUT /api/admin/tenants/:id/theme
pub async fn put_theme(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(theme): Json<Theme>,
) -> Result<Json<Theme>, AppError> {
    validate_theme(&theme)?;
    let mut tenant = load_tenant(&state, id).await?;
    tenant.theme = Jsonb(theme);
    let saved = repo::update(&state.db, &tenant).await?;
    Ok(Json(saved.theme.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(json: &str) -> TenantInput {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_tenant_input_defaults_to_active() {
        let t = input(r#"{"slug":"tokyo-eats","name":{"ja":"東京グルメ"}}"#);
        assert!(t.is_active);
        assert!(t.theme.is_none());
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_tenant_input_rejects_bad_slug_and_theme() {
        assert!(input(r#"{"slug":"Tokyo Eats","name":{"ja":"東京"}}"#)
            .validate()
            .is_err());
        assert!(input(r#"{"slug":"tokyo","name":{"en":"Tokyo"}}"#)
            .validate()
            .is_err());
        assert!(input(
            r#"{"slug":"tokyo","name":{"ja":"東京"},"theme":{"primary_color":"navy"}}"#
        )
        .validate()
        .is_err());
    }
}
