//! Hosted search index REST client
//!
//! Thin wrapper over the index endpoints the migration needs. Every write
//! returns a task id; `wait_task` polls until the task is published.

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::SearchConfig;
use crate::document::SearchDocument;
use crate::error::{Result, SearchError};

/// Longest API error body kept in errors and logs
const MAX_ERROR_BODY: usize = 500;

/// Handle on an asynchronous index task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TaskRef {
    #[serde(rename = "taskID")]
    pub task_id: i64,
}

#[derive(Debug, Deserialize)]
struct TaskStatus {
    status: String,
}

/// Search response; hits stay as raw JSON
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub hits: Vec<Value>,
}

/// Index settings applied before documents are pushed
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSettings {
    pub searchable_attributes: Vec<String>,
    pub attributes_for_faceting: Vec<String>,
    pub custom_ranking: Vec<String>,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            searchable_attributes: ["name", "keywords", "description", "category"]
                .map(String::from)
                .to_vec(),
            attributes_for_faceting: ["category", "keywords", "searchable(tags)"]
                .map(String::from)
                .to_vec(),
            custom_ranking: vec!["desc(updated_at)".to_string()],
        }
    }
}

pub struct SearchClient {
    client: Client,
    config: SearchConfig,
    base_url: String,
}

impl SearchClient {
    pub fn new(config: SearchConfig) -> Self {
        let base_url = config.endpoint();
        Self {
            client: Client::new(),
            config,
            base_url,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    fn index_url(&self, index: &str, suffix: &str) -> String {
        format!(
            "{}/1/indexes/{}{}",
            self.base_url,
            urlencoding::encode(index),
            suffix
        )
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("X-Algolia-Application-Id", &self.config.app_id)
            .header("X-Algolia-API-Key", &self.config.admin_key)
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|i| body.is_char_boundary(*i))
                    .unwrap_or(0);
                body.truncate(cut);
                body.push_str("...");
            }
            return Err(SearchError::Api { status, body });
        }

        Ok(response.json().await?)
    }

    /// Add or replace one object under its `objectID`.
    pub async fn save_object(&self, index: &str, object_id: &str, body: &Value) -> Result<TaskRef> {
        let url = self.index_url(index, &format!("/{}", urlencoding::encode(object_id)));
        self.send(self.request(Method::PUT, &url).json(body)).await
    }

    pub async fn search(&self, index: &str, query: &str) -> Result<SearchResponse> {
        let url = self.index_url(index, "/query");
        self.send(self.request(Method::POST, &url).json(&json!({ "query": query })))
            .await
    }

    pub async fn delete_object(&self, index: &str, object_id: &str) -> Result<TaskRef> {
        let url = self.index_url(index, &format!("/{}", urlencoding::encode(object_id)));
        self.send(self.request(Method::DELETE, &url)).await
    }

    pub async fn set_settings(&self, index: &str, settings: &IndexSettings) -> Result<TaskRef> {
        let url = self.index_url(index, "/settings");
        self.send(self.request(Method::PUT, &url).json(settings)).await
    }

    /// Add documents in one batch request.
    pub async fn batch_add(&self, index: &str, docs: &[SearchDocument]) -> Result<TaskRef> {
        let requests: Vec<Value> = docs
            .iter()
            .map(|doc| json!({ "action": "addObject", "body": doc }))
            .collect();

        let url = self.index_url(index, "/batch");
        self.send(self.request(Method::POST, &url).json(&json!({ "requests": requests })))
            .await
    }

    /// Remove every object, keeping settings.
    pub async fn clear(&self, index: &str) -> Result<TaskRef> {
        let url = self.index_url(index, "/clear");
        self.send(self.request(Method::POST, &url)).await
    }

    /// Atomically replace `destination` with `source`; `source` disappears.
    pub async fn move_index(&self, source: &str, destination: &str) -> Result<TaskRef> {
        let url = self.index_url(source, "/operation");
        let body = json!({ "operation": "move", "destination": destination });
        self.send(self.request(Method::POST, &url).json(&body)).await
    }

    /// Poll until the task is published or `max_polls` runs out.
    pub async fn wait_task(&self, index: &str, task: TaskRef) -> Result<()> {
        let url = self.index_url(index, &format!("/task/{}", task.task_id));

        for attempt in 1..=self.config.max_polls {
            let status: TaskStatus = self.send(self.request(Method::GET, &url)).await?;
            if status.status == "published" {
                tracing::debug!(index, task = task.task_id, attempt, "task published");
                return Ok(());
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }

        Err(SearchError::TaskTimeout {
            index: index.to_owned(),
            task_id: task.task_id,
            attempts: self.config.max_polls,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_names_are_encoded() {
        let client = SearchClient::new(
            SearchConfig::new("APP", "KEY", "tools").with_base_url("http://localhost:1"),
        );
        assert_eq!(
            client.index_url("my tools", "/batch"),
            "http://localhost:1/1/indexes/my%20tools/batch"
        );
    }

    #[test]
    fn default_settings_shape() {
        let value = serde_json::to_value(IndexSettings::default()).unwrap();
        assert_eq!(value["searchableAttributes"][0], "name");
        assert!(value.get("attributesForFaceting").is_some());
    }
}
