use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::media::{repo, store_media, NewMedia};
use crate::models::media::MediaFileRow;
use crate::routes::params::{PageQuery, Paged, TenantQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MediaListQuery {
    pub tenant_id: Uuid,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(format!("Malformed multipart body: {}", e.body_text()))
    }
}

/// GET /api/admin/media
pub async fn list_media(
    State(state): State<AppState>,
    Query(q): Query<MediaListQuery>,
) -> Result<Json<Paged<MediaFileRow>>, AppError> {
    let page = PageQuery {
        page: q.page,
        per_page: q.per_page,
    }
    .resolve()?;
    let (items, total) = repo::list(&state.db, q.tenant_id, page).await?;
    Ok(Json(Paged::new(items, page, total)))
}

/// POST /api/admin/media (multipart: `file`, optional `alt_text`)
pub async fn upload_media(
    State(state): State<AppState>,
    Query(q): Query<TenantQuery>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<MediaFileRow>), AppError> {
    let mut file: Option<(String, String, bytes::Bytes)> = None;
    let mut alt_text: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                file = Some((file_name, content_type, bytes));
            }
            Some("alt_text") => {
                alt_text = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    let (file_name, content_type, bytes) =
        file.ok_or_else(|| AppError::Validation("Missing 'file' field".to_string()))?;

    let saved = store_media(
        &state,
        q.tenant_id,
        NewMedia {
            file_name,
            content_type,
            bytes,
            alt_text,
        },
    )
    .await?;
    info!("Uploaded media {} ({} bytes) for tenant {}", saved.id, saved.size_bytes, saved.tenant_id);
    Ok((StatusCode::CREATED, Json(saved)))
}

/// DELETE /api/admin/media/:id
///
/// The row is removed even when the object delete fails.
pub async fn delete_media(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(q): Query<TenantQuery>,
) -> Result<StatusCode, AppError> {
    let file = repo::get(&state.db, q.tenant_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Media file {id} not found")))?;

    if let Err(e) = state.media.delete(&file.storage_key).await {
        warn!("Could not delete object for media {id}: {e}");
    }
    repo::delete(&state.db, q.tenant_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
