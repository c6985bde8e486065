//! Search index sync.
//!
//! Published articles are pushed to a hosted search index, one record per
//! (article, language). The index sits behind the `SearchIndex` trait so the
//! HTTP backend can be swapped for `DisabledIndex` when no credentials are
//! configured, or for a fake in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::i18n::Lang;

pub mod algolia;
pub mod handlers;
pub mod records;

pub use algolia::AlgoliaIndex;
pub use records::{build_records, object_id, SearchRecord};

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("search API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// A single hit returned to the public search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    pub article_id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub featured_image_url: Option<String>,
    pub published_at: Option<i64>,
}

#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Name of the backend, for logs and health output.
    fn backend(&self) -> &'static str;

    async fn upsert(&self, records: &[SearchRecord]) -> Result<(), SearchError>;

    async fn delete(&self, object_ids: &[String]) -> Result<(), SearchError>;

    async fn search(
        &self,
        tenant_id: Uuid,
        lang: Lang,
        query: &str,
        limit: u32,
    ) -> Result<Vec<SearchHit>, SearchError>;
}

/// Used when search credentials are absent. Writes are dropped, searches are empty.
pub struct DisabledIndex;

#[async_trait]
impl SearchIndex for DisabledIndex {
    fn backend(&self) -> &'static str {
        "disabled"
    }

    async fn upsert(&self, records: &[SearchRecord]) -> Result<(), SearchError> {
        tracing::debug!("Search disabled, dropping {} record(s)", records.len());
        Ok(())
    }

    async fn delete(&self, _object_ids: &[String]) -> Result<(), SearchError> {
        Ok(())
    }

    async fn search(
        &self,
        _tenant_id: Uuid,
        _lang: Lang,
        _query: &str,
        _limit: u32,
    ) -> Result<Vec<SearchHit>, SearchError> {
        Ok(Vec::new())
    }
}

/// Every object ID an article may occupy in the index.
pub fn article_object_ids(article_id: Uuid) -> Vec<String> {
    Lang::ALL
        .into_iter()
        .map(|lang| object_id(article_id, lang))
        .collect()
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// In-memory index that records writes; optionally fails every write.
    #[derive(Default)]
    pub struct RecordingIndex {
        pub upserted: Mutex<Vec<SearchRecord>>,
        pub deleted: Mutex<Vec<String>>,
        pub fail: bool,
    }

    #[async_trait]
    impl SearchIndex for RecordingIndex {
        fn backend(&self) -> &'static str {
            "recording"
        }

        async fn upsert(&self, records: &[SearchRecord]) -> Result<(), SearchError> {
            if self.fail {
                return Err(SearchError::Api {
                    status: 503,
                    message: "unavailable".into(),
                });
            }
            self.upserted.lock().unwrap().extend_from_slice(records);
            Ok(())
        }

        async fn delete(&self, object_ids: &[String]) -> Result<(), SearchError> {
            if self.fail {
                return Err(SearchError::Api {
                    status: 503,
                    message: "unavailable".into(),
                });
            }
            self.deleted.lock().unwrap().extend_from_slice(object_ids);
            Ok(())
        }

        async fn search(
            &self,
            tenant_id: Uuid,
            lang: Lang,
            query: &str,
            limit: u32,
        ) -> Result<Vec<SearchHit>, SearchError> {
            let query = query.to_lowercase();
            Ok(self
                .upserted
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.tenant_id == tenant_id && r.lang == lang)
                .filter(|r| r.title.to_lowercase().contains(&query))
                .take(limit as usize)
                .map(SearchRecord::to_hit)
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_index_is_silent() {
        let index = DisabledIndex;
        index.upsert(&[]).await.unwrap();
        index.delete(&["x_ja".to_string()]).await.unwrap();
        let hits = index
            .search(Uuid::new_v4(), Lang::Ja, "tokyo", 10)
            .await
            .unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_article_object_ids_cover_every_language() {
        let id = Uuid::new_v4();
        let ids = article_object_ids(id);
        assert_eq!(ids.len(), 4);
        assert!(ids.contains(&format!("{id}_ko")));
    }
}
