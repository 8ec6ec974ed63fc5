//! Search service credentials and tuning

use std::time::Duration;

use crate::error::{Result, SearchError};

pub const DEFAULT_BATCH_SIZE: usize = 1000;
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);
const DEFAULT_MAX_POLLS: u32 = 240;

#[derive(Clone)]
pub struct SearchConfig {
    pub app_id: String,
    pub admin_key: String,
    /// Live index the migration ends up replacing
    pub index_name: String,
    /// Documents per batch request
    pub batch_size: usize,
    /// Override for the API host (tests point this at a mock server)
    pub base_url: Option<String>,
    /// Delay between task status checks
    pub poll_interval: Duration,
    /// Task status checks before giving up
    pub max_polls: u32,
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("app_id", &self.app_id)
            .field("admin_key", &"<redacted>")
            .field("index_name", &self.index_name)
            .field("batch_size", &self.batch_size)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl SearchConfig {
    pub fn new(
        app_id: impl Into<String>,
        admin_key: impl Into<String>,
        index_name: impl Into<String>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            admin_key: admin_key.into(),
            index_name: index_name.into(),
            batch_size: DEFAULT_BATCH_SIZE,
            base_url: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }

    /// Read `ALGOLIA_APP_ID`, `ALGOLIA_ADMIN_KEY` and `ALGOLIA_INDEX_NAME`.
    ///
    /// Fails naming every variable that is unset or blank.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut missing = Vec::new();
        let mut read = |key: &'static str| match lookup(key).filter(|v| !v.trim().is_empty()) {
            Some(v) => v,
            None => {
                missing.push(key);
                String::new()
            }
        };

        let app_id = read("ALGOLIA_APP_ID");
        let admin_key = read("ALGOLIA_ADMIN_KEY");
        let index_name = read("ALGOLIA_INDEX_NAME");

        if !missing.is_empty() {
            return Err(SearchError::MissingConfig(missing));
        }
        Ok(Self::new(app_id, admin_key, index_name))
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_polling(mut self, interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = interval;
        self.max_polls = max_polls;
        self
    }

    /// Name of the index documents are staged into before the swap.
    pub fn staging_index(&self) -> String {
        format!("{}_staging", self.index_name)
    }

    /// API host, defaulting to the application's write endpoint.
    pub fn endpoint(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_owned(),
            None => format!("https://{}.algolia.net", self.app_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn reads_all_three_variables() {
        let config = SearchConfig::from_lookup(lookup(&[
            ("ALGOLIA_APP_ID", "APP"),
            ("ALGOLIA_ADMIN_KEY", "KEY"),
            ("ALGOLIA_INDEX_NAME", "tools"),
        ]))
        .unwrap();

        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(config.staging_index(), "tools_staging");
        assert_eq!(config.endpoint(), "https://APP.algolia.net");
    }

    #[test]
    fn names_every_missing_variable() {
        let err = SearchConfig::from_lookup(lookup(&[("ALGOLIA_APP_ID", "APP"), ("ALGOLIA_ADMIN_KEY", " ")]))
            .unwrap_err();
        match err {
            SearchError::MissingConfig(keys) => {
                assert_eq!(keys, vec!["ALGOLIA_ADMIN_KEY", "ALGOLIA_INDEX_NAME"])
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn base_url_override_trims_slash() {
        let config = SearchConfig::new("a", "k", "i").with_base_url("http://127.0.0.1:9999/");
        assert_eq!(config.endpoint(), "http://127.0.0.1:9999");
        assert!(!format!("{config:?}").contains("\"k\""));
    }
}
