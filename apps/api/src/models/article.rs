use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;
use crate::i18n::{Lang, Localized};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleStatus {
    Draft,
    Published,
}

impl ArticleStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ArticleStatus::Draft => "draft",
            ArticleStatus::Published => "published",
        }
    }

    pub fn parse(s: &str) -> Result<Self, AppError> {
        match s {
            "draft" => Ok(ArticleStatus::Draft),
            "published" => Ok(ArticleStatus::Published),
            other => Err(AppError::Validation(format!(
                "Unknown article status '{other}' (expected draft or published)"
            ))),
        }
    }
}

/// A heading of the article body, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    pub id: String,
    pub text: String,
    pub level: u8,
}

pub type TocByLang = BTreeMap<Lang, Vec<TocEntry>>;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ArticleRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub slug: String,
    pub status: String,
    pub title: Json<Localized>,
    pub excerpt: Json<Localized>,
    pub content: Json<Localized>,
    pub meta_title: Json<Localized>,
    pub meta_description: Json<Localized>,
    pub toc: Json<TocByLang>,
    pub featured_image_url: Option<String>,
    pub category_ids: Vec<Uuid>,
    pub tag_ids: Vec<Uuid>,
    pub writer_id: Option<Uuid>,
    pub view_count: i64,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ArticleRow {
    pub fn is_published(&self) -> bool {
        self.status == ArticleStatus::Published.as_str()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    pub fn sample_article() -> ArticleRow {
        ArticleRow {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            slug: "ramen-guide".to_string(),
            status: "draft".to_string(),
            title: Json(Localized::source("ラーメンガイド")),
            excerpt: Json(Localized::source("東京のラーメン店を紹介します。")),
            content: Json(Localized::source(
                "<h2>醤油</h2><p>定番です。</p><h3>おすすめ</h3><p>ここ。</p>",
            )),
            meta_title: Json(Localized::default()),
            meta_description: Json(Localized::default()),
            toc: Json(TocByLang::new()),
            featured_image_url: None,
            category_ids: Vec::new(),
            tag_ids: Vec::new(),
            writer_id: None,
            view_count: 0,
            published_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [ArticleStatus::Draft, ArticleStatus::Published] {
            assert_eq!(ArticleStatus::parse(status.as_str()).unwrap(), status);
        }
        assert!(ArticleStatus::parse("archived").is_err());
    }

    #[test]
    fn test_toc_map_uses_language_codes_as_keys() {
        let mut toc = TocByLang::new();
        toc.insert(
            Lang::En,
            vec![TocEntry {
                id: "heading-1".into(),
                text: "Intro".into(),
                level: 2,
            }],
        );
        let json = serde_json::to_value(&toc).unwrap();
        assert_eq!(json["en"][0]["id"], "heading-1");
    }
}
