use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MediaFileRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub file_name: String,
    pub storage_key: String,
    pub url: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub alt_text: Option<String>,
    pub created_at: DateTime<Utc>,
}
