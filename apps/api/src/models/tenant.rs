use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::i18n::Localized;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub label: Localized,
    pub url: String,
}

/// Per-tenant visual and navigation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub background_color: String,
    pub text_color: String,
    pub logo_url: Option<String>,
    pub favicon_url: Option<String>,
    pub header_text: Localized,
    pub footer_text: Localized,
    pub menu: Vec<MenuItem>,
    pub copyright: Option<String>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_color: "#1a1a1a".to_string(),
            secondary_color: "#4a4a4a".to_string(),
            accent_color: "#e60033".to_string(),
            background_color: "#ffffff".to_string(),
            text_color: "#222222".to_string(),
            logo_url: None,
            favicon_url: None,
            header_text: Localized::default(),
            footer_text: Localized::default(),
            menu: Vec::new(),
            copyright: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TenantRow {
    pub id: Uuid,
    pub slug: String,
    pub name: Json<Localized>,
    pub domain: Option<String>,
    pub theme: Json<Theme>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
