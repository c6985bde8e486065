//! Media library: uploaded and generated files kept in object storage.

pub mod handlers;
pub mod repo;

use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::media::MediaFileRow;
use crate::state::AppState;
use crate::storage::{is_allowed_content_type, media_key};
use crate::tenants::repo as tenant_repo;

pub struct NewMedia {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
    pub alt_text: Option<String>,
}

/// Checks type, size and tenant, writes the object, then records the row. The object
/// is removed again when the row cannot be written.
pub async fn store_media(
    state: &AppState,
    tenant_id: Uuid,
    new: NewMedia,
) -> Result<MediaFileRow, AppError> {
    if !is_allowed_content_type(&new.content_type) {
        return Err(AppError::Validation(format!(
            "Unsupported content type '{}' (allowed: image/*, video/mp4, application/pdf)",
            new.content_type
        )));
    }
    if new.bytes.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }
    if new.bytes.len() > state.config.max_upload_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "File is {} bytes; the limit is {}",
            new.bytes.len(),
            state.config.max_upload_bytes
        )));
    }

    if tenant_repo::get(&state.db, tenant_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Tenant {tenant_id} not found")));
    }

    let key = media_key(tenant_id, &new.file_name);
    let size_bytes = new.bytes.len() as i64;
    let url = state.media.put(&key, new.bytes, &new.content_type).await?;

    let row = MediaFileRow {
        id: Uuid::new_v4(),
        tenant_id,
        file_name: new.file_name,
        storage_key: key,
        url,
        content_type: new.content_type,
        size_bytes,
        alt_text: new.alt_text.filter(|a| !a.trim().is_empty()),
        created_at: Utc::now(),
    };

    match repo::insert(&state.db, &row).await {
        Ok(saved) => Ok(saved),
        Err(e) => {
            if let Err(cleanup) = state.media.delete(&row.storage_key).await {
                tracing::warn!("Orphaned object after failed insert: {cleanup}");
            }
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::test_state;

    fn new_media(content_type: &str, len: usize) -> NewMedia {
        NewMedia {
            file_name: "photo.png".to_string(),
            content_type: content_type.to_string(),
            bytes: Bytes::from(vec![0u8; len]),
            alt_text: None,
        }
    }

    #[tokio::test]
    async fn test_rejects_unsupported_type_before_upload() {
        let state = test_state().await;
        let err = store_media(&state, Uuid::new_v4(), new_media("text/html", 10))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_rejects_oversized_and_empty_files() {
        let mut state = test_state().await;
        state.config.max_upload_bytes = 16;

        let err = store_media(&state, Uuid::new_v4(), new_media("image/png", 17))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));

        let err = store_media(&state, Uuid::new_v4(), new_media("image/png", 0))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
