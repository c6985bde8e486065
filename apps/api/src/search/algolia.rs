//! Search backend speaking the Algolia REST API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::SearchConfig;
use crate::i18n::Lang;
use crate::search::{SearchError, SearchHit, SearchIndex, SearchRecord};

#[derive(Clone)]
pub struct AlgoliaIndex {
    client: Client,
    app_id: String,
    api_key: String,
    index: String,
}

#[derive(Debug, Serialize)]
struct BatchRequest<'a> {
    requests: Vec<BatchOperation<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
enum BatchOperation<'a> {
    UpdateObject { body: &'a SearchRecord },
    DeleteObject { body: ObjectRef<'a> },
}

#[derive(Debug, Serialize)]
struct ObjectRef<'a> {
    #[serde(rename = "objectID")]
    object_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    hits: Vec<SearchRecord>,
}

impl AlgoliaIndex {
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()?,
            app_id: config.app_id.clone(),
            api_key: config.api_key.clone(),
            index: config.index.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "https://{}.algolia.net/1/indexes/{}{}",
            self.app_id, self.index, path
        )
    }

    async fn send_batch(&self, batch: &BatchRequest<'_>) -> Result<(), SearchError> {
        let response = self
            .client
            .post(self.url("/batch"))
            .header("X-Algolia-Application-Id", &self.app_id)
            .header("X-Algolia-API-Key", &self.api_key)
            .json(batch)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

#[async_trait]
impl SearchIndex for AlgoliaIndex {
    fn backend(&self) -> &'static str {
        "algolia"
    }

    async fn upsert(&self, records: &[SearchRecord]) -> Result<(), SearchError> {
        if records.is_empty() {
            return Ok(());
        }
        let batch = BatchRequest {
            requests: records
                .iter()
                .map(|body| BatchOperation::UpdateObject { body })
                .collect(),
        };
        self.send_batch(&batch).await?;
        info!("Pushed {} record(s) to index '{}'", records.len(), self.index);
        Ok(())
    }

    async fn delete(&self, object_ids: &[String]) -> Result<(), SearchError> {
        if object_ids.is_empty() {
            return Ok(());
        }
        let batch = BatchRequest {
            requests: object_ids
                .iter()
                .map(|id| BatchOperation::DeleteObject {
                    body: ObjectRef { object_id: id },
                })
                .collect(),
        };
        self.send_batch(&batch).await?;
        info!(
            "Removed {} record(s) from index '{}'",
            object_ids.len(),
            self.index
        );
        Ok(())
    }

    async fn search(
        &self,
        tenant_id: Uuid,
        lang: Lang,
        query: &str,
        limit: u32,
    ) -> Result<Vec<SearchHit>, SearchError> {
        let body = json!({
            "query": query,
            "hitsPerPage": limit,
            "filters": search_filters(tenant_id, lang),
            "attributesToRetrieve": [
                "objectID", "tenant_id", "article_id", "lang", "slug", "title",
                "excerpt", "body", "categories", "tags", "published_at", "featured_image_url"
            ],
        });

        let response = self
            .client
            .post(self.url("/query"))
            .header("X-Algolia-Application-Id", &self.app_id)
            .header("X-Algolia-API-Key", &self.api_key)
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;
        let parsed: QueryResponse = response.json().await?;

        debug!("Search '{query}' returned {} hit(s)", parsed.hits.len());
        Ok(parsed.hits.iter().map(SearchRecord::to_hit).collect())
    }
}

fn search_filters(tenant_id: Uuid, lang: Lang) -> String {
    format!("tenant_id:\"{tenant_id}\" AND lang:\"{lang}\"")
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SearchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(SearchError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_serializes_algolia_actions() {
        let record = SearchRecord {
            object_id: "a_ja".into(),
            tenant_id: Uuid::nil(),
            article_id: Uuid::nil(),
            lang: Lang::Ja,
            slug: "a".into(),
            title: "t".into(),
            excerpt: String::new(),
            body: String::new(),
            categories: vec![],
            tags: vec![],
            published_at: None,
            featured_image_url: None,
        };
        let batch = BatchRequest {
            requests: vec![
                BatchOperation::UpdateObject { body: &record },
                BatchOperation::DeleteObject {
                    body: ObjectRef { object_id: "b_en" },
                },
            ],
        };
        let value = serde_json::to_value(&batch).unwrap();
        assert_eq!(value["requests"][0]["action"], "updateObject");
        assert_eq!(value["requests"][0]["body"]["objectID"], "a_ja");
        assert_eq!(value["requests"][1]["action"], "deleteObject");
        assert_eq!(value["requests"][1]["body"]["objectID"], "b_en");
    }

    #[test]
    fn test_filters_scope_tenant_and_language() {
        let filters = search_filters(Uuid::nil(), Lang::Zh);
        assert!(filters.contains("lang:\"zh\""));
        assert!(filters.contains("00000000-0000-0000-0000-000000000000"));
    }
}
