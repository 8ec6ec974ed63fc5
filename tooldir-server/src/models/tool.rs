//! Catalogued tools and the identifiers that point at them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::validation::required_text;
use super::ValidationError;

const MAX_TOOL_ID_LEN: usize = 128;
const MAX_USER_ID_LEN: usize = 128;

/// External unique id of a tool (`tool_unique_id` on the wire)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ToolId(String);

impl ToolId {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        required_text("tool_unique_id", s, MAX_TOOL_ID_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Authenticated caller id (the token subject)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        required_text("user_id", s, MAX_USER_ID_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A catalogued tool
///
/// Only the fields the API reads are typed; everything else the scraper
/// stored travels in `extra` and is serialized back inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub id: Uuid,
    pub unique_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Tool {
    /// Minimal tool record, used when seeding stores.
    pub fn new(unique_id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            unique_id: unique_id.into(),
            name: name.into(),
            description: None,
            link: None,
            category: None,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
            extra: Map::new(),
        }
    }
}
