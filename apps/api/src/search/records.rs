use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::html::{html_to_text, truncate_chars};
use crate::i18n::Lang;
use crate::models::article::ArticleRow;
use crate::models::taxonomy::{CategoryRow, TagRow};
use crate::search::SearchHit;

/// Hosted indexes cap record size; the body is cut well below that.
pub const MAX_BODY_CHARS: usize = 8_000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchRecord {
    #[serde(rename = "objectID")]
    pub object_id: String,
    pub tenant_id: Uuid,
    pub article_id: Uuid,
    pub lang: Lang,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub body: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub published_at: Option<i64>,
    pub featured_image_url: Option<String>,
}

impl SearchRecord {
    pub fn to_hit(&self) -> SearchHit {
        SearchHit {
            article_id: self.article_id,
            slug: self.slug.clone(),
            title: self.title.clone(),
            excerpt: self.excerpt.clone(),
            featured_image_url: self.featured_image_url.clone(),
            published_at: self.published_at,
        }
    }
}

pub fn object_id(article_id: Uuid, lang: Lang) -> String {
    format!("{article_id}_{lang}")
}

/// Builds one record per language. Missing translations fall back to the
/// source language so untranslated articles are still findable everywhere.
///
/// `categories` and `tags` may contain rows the article does not reference;
/// only the referenced ones are used, and dangling IDs are skipped.
pub fn build_records(
    article: &ArticleRow,
    categories: &[CategoryRow],
    tags: &[TagRow],
) -> Vec<SearchRecord> {
    let article_categories: Vec<_> = article
        .category_ids
        .iter()
        .filter_map(|id| categories.iter().find(|c| c.id == *id))
        .collect();
    let article_tags: Vec<_> = article
        .tag_ids
        .iter()
        .filter_map(|id| tags.iter().find(|t| t.id == *id))
        .collect();

    Lang::ALL
        .into_iter()
        .map(|lang| {
            let body = html_to_text(article.content.resolve(lang));
            SearchRecord {
                object_id: object_id(article.id, lang),
                tenant_id: article.tenant_id,
                article_id: article.id,
                lang,
                slug: article.slug.clone(),
                title: article.title.resolve(lang).to_string(),
                excerpt: article.excerpt.resolve(lang).to_string(),
                body: truncate_chars(&body, MAX_BODY_CHARS).to_string(),
                categories: article_categories
                    .iter()
                    .map(|c| c.name.resolve(lang).to_string())
                    .collect(),
                tags: article_tags
                    .iter()
                    .map(|t| t.name.resolve(lang).to_string())
                    .collect(),
                published_at: article.published_at.map(|t| t.timestamp()),
                featured_image_url: article.featured_image_url.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Localized;
    use crate::models::article::testing::sample_article;
    use crate::models::taxonomy::testing::{sample_category, sample_tag};

    #[test]
    fn test_one_record_per_language_with_fallback() {
        let mut article = sample_article();
        article.title.0.set(Lang::En, "Ramen Guide");
        let records = build_records(&article, &[], &[]);

        assert_eq!(records.len(), 4);
        let en = records.iter().find(|r| r.lang == Lang::En).unwrap();
        let ko = records.iter().find(|r| r.lang == Lang::Ko).unwrap();
        assert_eq!(en.title, "Ramen Guide");
        assert_eq!(ko.title, article.title.get(Lang::Ja));
        assert_eq!(en.object_id, format!("{}_en", article.id));
    }

    #[test]
    fn test_body_is_plain_text_and_truncated() {
        let mut article = sample_article();
        let long = format!("<p>{}</p>", "あ".repeat(MAX_BODY_CHARS + 50));
        article.content.0 = Localized::source(long);
        let records = build_records(&article, &[], &[]);
        let ja = &records[0];
        assert!(!ja.body.contains("<p>"));
        assert_eq!(ja.body.chars().count(), MAX_BODY_CHARS);
    }

    #[test]
    fn test_dangling_taxonomy_ids_are_skipped() {
        let tenant_id = Uuid::new_v4();
        let category = sample_category(tenant_id, "food", "グルメ");
        let tag = sample_tag(tenant_id, "ramen", "ラーメン");
        let mut article = sample_article();
        article.category_ids = vec![Uuid::new_v4(), category.id];
        article.tag_ids = vec![tag.id];

        let records = build_records(&article, &[category], &[tag]);
        assert_eq!(records[0].categories, vec!["グルメ".to_string()]);
        assert_eq!(records[0].tags, vec!["ラーメン".to_string()]);
    }
}
