//! Publish pipeline: translate → regenerate TOC → mark published → search sync.
//!
//! Translation and search failures are tolerated. They are logged and
//! returned to the caller in the outcome, and the article is still published.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::articles::toc::build_toc;
use crate::i18n::Lang;
use crate::models::article::{ArticleRow, ArticleStatus, TocByLang};
use crate::models::taxonomy::{CategoryRow, TagRow};
use crate::search::{article_object_ids, build_records, SearchIndex};
use crate::translation::{translate_fields, FieldJob, TranslationReport, Translator};

#[derive(Debug, Serialize)]
pub struct PublishOutcome {
    pub article: ArticleRow,
    pub translation: TranslationReport,
    pub search_synced: bool,
}

/// Translates every translatable field of the article in place.
pub async fn translate_article(
    translator: &dyn Translator,
    article: &mut ArticleRow,
    force: bool,
) -> TranslationReport {
    let ArticleRow {
        title,
        excerpt,
        content,
        meta_title,
        meta_description,
        ..
    } = article;

    let report = translate_fields(
        translator,
        vec![
            FieldJob::plain("title", &mut title.0),
            FieldJob::plain("excerpt", &mut excerpt.0),
            FieldJob::html("content", &mut content.0),
            FieldJob::plain("meta_title", &mut meta_title.0),
            FieldJob::plain("meta_description", &mut meta_description.0),
        ],
        force,
    )
    .await;

    refresh_toc(article);
    report
}

/// Rebuilds the per-language TOC and writes heading ids back into the content.
/// Languages without content get no TOC entry.
pub fn refresh_toc(article: &mut ArticleRow) {
    let mut toc = TocByLang::new();
    for lang in Lang::ALL {
        if article.content.is_missing(lang) {
            continue;
        }
        let result = build_toc(article.content.get(lang));
        article.content.0.set(lang, result.html);
        toc.insert(lang, result.entries);
    }
    article.toc.0 = toc;
}

/// Translation, TOC and status changes for publishing. Keeps the first
/// publish time when an article is re-published.
pub async fn prepare_publication(
    translator: &dyn Translator,
    article: &mut ArticleRow,
    force_retranslate: bool,
    now: DateTime<Utc>,
) -> TranslationReport {
    let report = translate_article(translator, article, force_retranslate).await;
    article.status = ArticleStatus::Published.as_str().to_string();
    article.published_at.get_or_insert(now);
    report
}

/// Pushes the article's records to the index. Returns whether the sync succeeded.
pub async fn sync_article(
    search: &dyn SearchIndex,
    article: &ArticleRow,
    categories: &[CategoryRow],
    tags: &[TagRow],
) -> bool {
    let records = build_records(article, categories, tags);
    match search.upsert(&records).await {
        Ok(()) => {
            info!("Synced article {} to search ({} records)", article.id, records.len());
            true
        }
        Err(e) => {
            warn!("Search sync failed for article {}: {e}", article.id);
            false
        }
    }
}

/// Syncs after an edit. Drafts are not in the index, so they return `None`.
pub async fn resync_if_published(
    search: &dyn SearchIndex,
    article: &ArticleRow,
    categories: &[CategoryRow],
    tags: &[TagRow],
) -> Option<bool> {
    if !article.is_published() {
        return None;
    }
    Some(sync_article(search, article, categories, tags).await)
}

/// Re-pushes published articles after a category or tag they reference
/// changed. Returns how many synced.
pub async fn resync_articles(
    search: &dyn SearchIndex,
    articles: &[ArticleRow],
    categories: &[CategoryRow],
    tags: &[TagRow],
) -> usize {
    let mut synced = 0;
    for article in articles.iter().filter(|a| a.is_published()) {
        if sync_article(search, article, categories, tags).await {
            synced += 1;
        }
    }
    synced
}

/// Syncs a freshly persisted publication and assembles the response.
pub async fn finish_publication(
    search: &dyn SearchIndex,
    article: ArticleRow,
    translation: TranslationReport,
    categories: &[CategoryRow],
    tags: &[TagRow],
) -> PublishOutcome {
    let search_synced = sync_article(search, &article, categories, tags).await;
    info!(
        "Published article {} ({} translated, {} failed, search_synced={search_synced})",
        article.id,
        translation.translated.len(),
        translation.failed.len()
    );
    PublishOutcome {
        article,
        translation,
        search_synced,
    }
}

/// Removes all of the article's records from the index. Returns whether it succeeded.
pub async fn unsync_article(search: &dyn SearchIndex, article_id: Uuid) -> bool {
    unsync_articles(search, &[article_id]).await
}

/// Removes every language record of each article in one call.
pub async fn unsync_articles(search: &dyn SearchIndex, article_ids: &[Uuid]) -> bool {
    if article_ids.is_empty() {
        return true;
    }
    let object_ids: Vec<String> = article_ids
        .iter()
        .flat_map(|id| article_object_ids(*id))
        .collect();
    match search.delete(&object_ids).await {
        Ok(()) => true,
        Err(e) => {
            warn!(
                "Search removal failed for {} article(s): {e}",
                article_ids.len()
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::models::article::testing::sample_article;
    use crate::models::taxonomy::testing::{sample_category, sample_tag};
    use crate::search::testing::RecordingIndex;
    use crate::translation::testing::FakeTranslator;

    #[tokio::test]
    async fn test_publish_translates_and_builds_toc_for_every_language() {
        let translator = FakeTranslator::default();
        let mut article = sample_article();
        let now = Utc::now();

        let report = prepare_publication(&translator, &mut article, false, now).await;

        assert!(report.is_complete());
        assert!(article.is_published());
        assert_eq!(article.published_at, Some(now));
        assert_eq!(article.title.get(Lang::En), "[en] ラーメンガイド");
        for lang in Lang::ALL {
            let toc = &article.toc[&lang];
            assert_eq!(toc.len(), 2, "toc for {lang}");
            assert_eq!(toc[0].id, "heading-1");
            assert!(article.content.get(lang).contains("id=\"heading-1\""));
        }
    }

    #[tokio::test]
    async fn test_republish_keeps_first_publish_time() {
        let translator = FakeTranslator::default();
        let mut article = sample_article();
        let first = Utc::now() - Duration::days(3);
        article.published_at = Some(first);

        prepare_publication(&translator, &mut article, false, Utc::now()).await;
        assert_eq!(article.published_at, Some(first));
    }

    #[tokio::test]
    async fn test_publish_survives_translation_failures() {
        let translator = FakeTranslator::failing(vec![Lang::Ko]);
        let mut article = sample_article();

        let report = prepare_publication(&translator, &mut article, false, Utc::now()).await;

        assert!(article.is_published());
        assert!(!report.is_complete());
        assert!(report.failed.iter().all(|f| f.lang == Lang::Ko));
        // Korean falls back to the source; no TOC for a language without content.
        assert!(article.content.is_missing(Lang::Ko));
        assert!(!article.toc.contains_key(&Lang::Ko));
        assert!(article.toc.contains_key(&Lang::Zh));
    }

    #[tokio::test]
    async fn test_sync_reports_failure_without_error() {
        let article = sample_article();

        let ok = RecordingIndex::default();
        assert!(sync_article(&ok, &article, &[], &[]).await);
        assert_eq!(ok.upserted.lock().unwrap().len(), 4);

        let failing = RecordingIndex {
            fail: true,
            ..Default::default()
        };
        assert!(!sync_article(&failing, &article, &[], &[]).await);
        assert!(!unsync_article(&failing, article.id).await);
    }

    #[tokio::test]
    async fn test_unsync_removes_every_language() {
        let index = RecordingIndex::default();
        let id = Uuid::new_v4();
        assert!(unsync_article(&index, id).await);
        assert_eq!(index.deleted.lock().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_publication_outcome_reports_search_failure() {
        let translator = FakeTranslator::failing(vec![Lang::Zh]);
        let mut article = sample_article();
        let translation = prepare_publication(&translator, &mut article, false, Utc::now()).await;

        let failing = RecordingIndex {
            fail: true,
            ..Default::default()
        };
        let outcome = finish_publication(&failing, article.clone(), translation, &[], &[]).await;
        assert!(!outcome.search_synced);
        assert!(outcome.article.is_published());
        assert!(outcome.translation.failed.iter().all(|f| f.lang == Lang::Zh));

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["search_synced"], false);
        assert_eq!(json["article"]["status"], "published");
        assert!(json["translation"]["failed"].as_array().is_some_and(|f| !f.is_empty()));

        let index = RecordingIndex::default();
        let outcome =
            finish_publication(&index, article, TranslationReport::default(), &[], &[]).await;
        assert!(outcome.search_synced);
        assert_eq!(index.upserted.lock().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_edit_resync_only_for_published_articles() {
        let mut article = sample_article();
        let failing = RecordingIndex {
            fail: true,
            ..Default::default()
        };
        assert_eq!(resync_if_published(&failing, &article, &[], &[]).await, None);

        article.status = ArticleStatus::Published.as_str().to_string();
        assert_eq!(resync_if_published(&failing, &article, &[], &[]).await, Some(false));

        let index = RecordingIndex::default();
        assert_eq!(resync_if_published(&index, &article, &[], &[]).await, Some(true));
    }

    #[tokio::test]
    async fn test_resync_after_taxonomy_change_uses_current_names() {
        let mut published = sample_article();
        published.status = ArticleStatus::Published.as_str().to_string();
        let mut category = sample_category(published.tenant_id, "food", "グルメ");
        let tag = sample_tag(published.tenant_id, "ramen", "ラーメン");
        published.category_ids = vec![category.id];
        published.tag_ids = vec![tag.id];
        let mut draft = sample_article();
        draft.category_ids = vec![category.id];

        category.name.0.set(Lang::Ja, "食べ歩き");
        let index = RecordingIndex::default();
        let synced = resync_articles(
            &index,
            &[published.clone(), draft],
            std::slice::from_ref(&category),
            std::slice::from_ref(&tag),
        )
        .await;
        assert_eq!(synced, 1);
        let records = index.upserted.lock().unwrap().clone();
        assert_eq!(records.len(), 4);
        assert!(records.iter().all(|r| r.categories == vec!["食べ歩き".to_string()]));

        // Tag deleted: its reference is gone from the article and from the lookup.
        published.tag_ids.clear();
        let index = RecordingIndex::default();
        resync_articles(&index, &[published], &[category], &[]).await;
        assert!(index.upserted.lock().unwrap().iter().all(|r| r.tags.is_empty()));
    }

    #[tokio::test]
    async fn test_unsync_many_articles_in_one_call() {
        let index = RecordingIndex::default();
        let ids = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        assert!(unsync_articles(&index, &ids).await);
        let deleted = index.deleted.lock().unwrap();
        assert_eq!(deleted.len(), 12);
        assert!(deleted.contains(&format!("{}_ko", ids[2])));

        let failing = RecordingIndex {
            fail: true,
            ..Default::default()
        };
        assert!(!unsync_articles(&failing, &ids).await);
        assert!(unsync_articles(&failing, &[]).await);
    }
}
