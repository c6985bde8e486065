use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::i18n::Localized;

/// A reusable piece of localized HTML addressed by key (e.g. "about", "footer-notice").
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContentBlockRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub key: String,
    pub title: String,
    pub content: Json<Localized>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
