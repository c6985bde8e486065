use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::banners::{is_valid_placement, repo, PLACEMENTS};
use crate::errors::AppError;
use crate::models::banner::BannerRow;
use crate::routes::params::TenantQuery;
use crate::state::AppState;

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct BannerInput {
    pub title: String,
    pub image_url: String,
    pub link_url: Option<String>,
    pub placement: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}

impl BannerInput {
    fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("title is required".to_string()));
        }
        if self.image_url.trim().is_empty() {
            return Err(AppError::Validation("image_url is required".to_string()));
        }
        if !is_valid_placement(&self.placement) {
            return Err(AppError::Validation(format!(
                "placement must be one of {}",
                PLACEMENTS.join(", ")
            )));
        }
        if let (Some(start), Some(end)) = (self.starts_at, self.ends_at) {
            if end < start {
                return Err(AppError::Validation(
                    "ends_at must not be before starts_at".to_string(),
                ));
            }
        }
        Ok(())
    }

    fn apply_to(self, row: &mut BannerRow) {
        row.title = self.title.trim().to_string();
        row.image_url = self.image_url;
        row.link_url = self.link_url.filter(|l| !l.trim().is_empty());
        row.placement = self.placement;
        row.sort_order = self.sort_order;
        row.is_active = self.is_active;
        row.starts_at = self.starts_at;
        row.ends_at = self.ends_at;
    }
}

/// GET /api/admin/banners
pub async fn list_banners(
    State(state): State<AppState>,
    Query(q): Query<TenantQuery>,
) -> Result<Json<Vec<BannerRow>>, AppError> {
    Ok(Json(repo::list(&state.db, q.tenant_id).await?))
}

/// POST /api/admin/banners
pub async fn create_banner(
    State(state): State<AppState>,
    Query(q): Query<TenantQuery>,
    Json(input): Json<BannerInput>,
) -> Result<(StatusCode, Json<BannerRow>), AppError> {
    input.validate()?;
    let now = Utc::now();
    let mut row = BannerRow {
        id: Uuid::new_v4(),
        tenant_id: q.tenant_id,
        title: String::new(),
        image_url: String::new(),
        link_url: None,
        placement: String::new(),
        sort_order: 0,
        is_active: true,
        starts_at: None,
        ends_at: None,
        created_at: now,
        updated_at: now,
    };
    input.apply_to(&mut row);
    Ok((StatusCode::CREATED, Json(repo::insert(&state.db, &row).await?)))
}

/// PUT /api/admin/banners/:id
pub async fn update_banner(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(q): Query<TenantQuery>,
    Json(input): Json<BannerInput>,
) -> Result<Json<BannerRow>, AppError> {
    input.validate()?;
    let mut row = repo::get(&state.db, q.tenant_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Banner {id} not found")))?;
    input.apply_to(&mut row);
    Ok(Json(repo::update(&state.db, &row).await?))
}

/// DELETE /api/admin/banners/:id
pub async fn delete_banner(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(q): Query<TenantQuery>,
) -> Result<StatusCode, AppError> {
    if !repo::delete(&state.db, q.tenant_id, id).await? {
        return Err(AppError::NotFound(format!("Banner {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(json: &str) -> BannerInput {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_banner_validation() {
        let ok = r#"{"title":"Sale","image_url":"https://x/y.png","placement":"sidebar"}"#;
        assert!(input(ok).validate().is_ok());
        assert!(input(ok).is_active);

        let bad_placement = r#"{"title":"Sale","image_url":"https://x/y.png","placement":"modal"}"#;
        assert!(input(bad_placement).validate().is_err());

        let inverted = r#"{"title":"Sale","image_url":"https://x/y.png","placement":"footer",
            "starts_at":"2024-05-02T00:00:00Z","ends_at":"2024-05-01T00:00:00Z"}"#;
        assert!(input(inverted).validate().is_err());
    }
}
