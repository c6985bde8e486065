use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::i18n::Localized;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CategoryRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub slug: String,
    pub name: Json<Localized>,
    pub description: Json<Localized>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TagRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub slug: String,
    pub name: Json<Localized>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WriterRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub bio: Json<Localized>,
    pub icon_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
