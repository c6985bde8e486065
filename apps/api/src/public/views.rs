//! Localized read models. Every text field is resolved to one language, with
//! the source language standing in for missing translations.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::i18n::{Lang, Localized};
use crate::models::article::{ArticleRow, TocEntry};
use crate::models::banner::BannerRow;
use crate::models::content_block::ContentBlockRow;
use crate::models::taxonomy::{CategoryRow, TagRow, WriterRow};
use crate::models::tenant::{TenantRow, Theme};

#[derive(Debug, Serialize)]
pub struct SiteView {
    pub slug: String,
    pub name: Localized,
    pub domain: Option<String>,
    pub theme: Theme,
}

impl SiteView {
    pub fn from_row(tenant: TenantRow) -> Self {
        Self {
            slug: tenant.slug,
            name: tenant.name.0,
            domain: tenant.domain,
            theme: tenant.theme.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TermView {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CategoryView {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: String,
}

impl CategoryView {
    pub fn new(row: &CategoryRow, lang: Lang) -> Self {
        Self {
            id: row.id,
            slug: row.slug.clone(),
            name: row.name.resolve(lang).to_string(),
            description: row.description.resolve(lang).to_string(),
        }
    }
}

pub fn category_term(row: &CategoryRow, lang: Lang) -> TermView {
    TermView {
        id: row.id,
        slug: row.slug.clone(),
        name: row.name.resolve(lang).to_string(),
    }
}

pub fn tag_term(row: &TagRow, lang: Lang) -> TermView {
    TermView {
        id: row.id,
        slug: row.slug.clone(),
        name: row.name.resolve(lang).to_string(),
    }
}

#[derive(Debug, Serialize)]
pub struct WriterView {
    pub id: Uuid,
    pub name: String,
    pub bio: String,
    pub icon_url: Option<String>,
}

impl WriterView {
    pub fn new(row: &WriterRow, lang: Lang) -> Self {
        Self {
            id: row.id,
            name: row.name.clone(),
            bio: row.bio.resolve(lang).to_string(),
            icon_url: row.icon_url.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ArticleSummary {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub featured_image_url: Option<String>,
    pub categories: Vec<TermView>,
    pub view_count: i64,
    pub published_at: Option<DateTime<Utc>>,
}

/// Resolves loose category ids; ids that no longer exist are skipped.
fn resolve_categories(ids: &[Uuid], categories: &[CategoryRow], lang: Lang) -> Vec<TermView> {
    ids.iter()
        .filter_map(|id| categories.iter().find(|c| c.id == *id))
        .map(|c| category_term(c, lang))
        .collect()
}

impl ArticleSummary {
    pub fn new(article: &ArticleRow, categories: &[CategoryRow], lang: Lang) -> Self {
        Self {
            id: article.id,
            slug: article.slug.clone(),
            title: article.title.resolve(lang).to_string(),
            excerpt: article.excerpt.resolve(lang).to_string(),
            featured_image_url: article.featured_image_url.clone(),
            categories: resolve_categories(&article.category_ids, categories, lang),
            view_count: article.view_count,
            published_at: article.published_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ArticleDetail {
    pub id: Uuid,
    pub slug: String,
    /// Language the body is served in; the source language when `lang` has no translation.
    pub content_lang: Lang,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub meta_title: String,
    pub meta_description: String,
    pub toc: Vec<TocEntry>,
    pub featured_image_url: Option<String>,
    pub categories: Vec<TermView>,
    pub tags: Vec<TermView>,
    pub writer: Option<WriterView>,
    pub related: Vec<ArticleSummary>,
    pub view_count: i64,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

pub struct DetailContext<'a> {
    pub categories: &'a [CategoryRow],
    pub tags: &'a [TagRow],
    pub writer: Option<&'a WriterRow>,
    pub related: &'a [ArticleRow],
}

impl ArticleDetail {
    pub fn new(article: &ArticleRow, ctx: DetailContext<'_>, lang: Lang) -> Self {
        let content_lang = if article.content.is_missing(lang) {
            Lang::SOURCE
        } else {
            lang
        };
        let meta_title = match article.meta_title.resolve(lang) {
            "" => article.title.resolve(lang),
            title => title,
        };
        let meta_description = match article.meta_description.resolve(lang) {
            "" => article.excerpt.resolve(lang),
            description => description,
        };

        Self {
            id: article.id,
            slug: article.slug.clone(),
            content_lang,
            title: article.title.resolve(lang).to_string(),
            excerpt: article.excerpt.resolve(lang).to_string(),
            content: article.content.get(content_lang).to_string(),
            meta_title: meta_title.to_string(),
            meta_description: meta_description.to_string(),
            toc: article.toc.get(&content_lang).cloned().unwrap_or_default(),
            featured_image_url: article.featured_image_url.clone(),
            categories: resolve_categories(&article.category_ids, ctx.categories, lang),
            tags: article
                .tag_ids
                .iter()
                .filter_map(|id| ctx.tags.iter().find(|t| t.id == *id))
                .map(|t| tag_term(t, lang))
                .collect(),
            writer: ctx.writer.map(|w| WriterView::new(w, lang)),
            related: ctx
                .related
                .iter()
                .map(|a| ArticleSummary::new(a, ctx.categories, lang))
                .collect(),
            view_count: article.view_count,
            published_at: article.published_at,
            updated_at: article.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BannerView {
    pub id: Uuid,
    pub title: String,
    pub image_url: String,
    pub link_url: Option<String>,
    pub placement: String,
}

impl From<BannerRow> for BannerView {
    fn from(row: BannerRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            image_url: row.image_url,
            link_url: row.link_url,
            placement: row.placement,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BlockView {
    pub key: String,
    pub title: String,
    pub content: String,
}

impl BlockView {
    pub fn new(row: &ContentBlockRow, lang: Lang) -> Self {
        Self {
            key: row.key.clone(),
            title: row.title.clone(),
            content: row.content.resolve(lang).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::articles::publish::refresh_toc;
    use crate::models::article::testing::sample_article;
    use crate::models::taxonomy::testing::{sample_category, sample_tag};

    #[test]
    fn test_detail_falls_back_to_source_language() {
        let mut article = sample_article();
        refresh_toc(&mut article);

        let detail = ArticleDetail::new(
            &article,
            DetailContext {
                categories: &[],
                tags: &[],
                writer: None,
                related: &[],
            },
            Lang::Ko,
        );

        assert_eq!(detail.content_lang, Lang::Ja);
        assert_eq!(detail.title, "ラーメンガイド");
        assert_eq!(detail.toc.len(), 2);
        assert_eq!(detail.meta_title, "ラーメンガイド");
        assert_eq!(detail.meta_description, article.excerpt.get(Lang::Ja));
    }

    #[test]
    fn test_detail_uses_translation_when_present() {
        let mut article = sample_article();
        article.title.0.set(Lang::En, "Ramen Guide");
        article.content.0.set(Lang::En, "<h2>Soy</h2><p>Classic.</p>");
        refresh_toc(&mut article);

        let detail = ArticleDetail::new(
            &article,
            DetailContext {
                categories: &[],
                tags: &[],
                writer: None,
                related: &[],
            },
            Lang::En,
        );

        assert_eq!(detail.content_lang, Lang::En);
        assert_eq!(detail.title, "Ramen Guide");
        assert_eq!(detail.toc.len(), 1);
        assert_eq!(detail.toc[0].text, "Soy");
        // Excerpt has no English version yet.
        assert_eq!(detail.excerpt, article.excerpt.get(Lang::Ja));
    }

    #[test]
    fn test_dangling_references_are_skipped() {
        let mut article = sample_article();
        let food = sample_category(article.tenant_id, "food", "グルメ");
        let ramen = sample_tag(article.tenant_id, "ramen", "ラーメン");
        article.category_ids = vec![uuid::Uuid::new_v4(), food.id];
        article.tag_ids = vec![ramen.id, uuid::Uuid::new_v4()];

        let categories = [food];
        let tags = [ramen];
        let detail = ArticleDetail::new(
            &article,
            DetailContext {
                categories: &categories,
                tags: &tags,
                writer: None,
                related: &[],
            },
            Lang::En,
        );

        assert_eq!(detail.categories.len(), 1);
        assert_eq!(detail.categories[0].slug, "food");
        assert_eq!(detail.categories[0].name, "グルメ");
        assert_eq!(detail.tags.len(), 1);
    }
}
