//! Share links and favorites

use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Pagination, Paginated, Tool};

/// Length of generated share tokens
pub const SHARE_TOKEN_LEN: usize = 12;

/// Persistent share link for a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Share {
    pub id: Uuid,
    pub user_id: String,
    pub tool_unique_id: String,
    pub share_id: String,
    pub created_at: DateTime<Utc>,
}

/// A share token resolved to its tool
#[derive(Debug, Clone, Serialize)]
pub struct SharedTool {
    pub share_id: String,
    pub user_id: String,
    pub tool_unique_id: String,
    pub created_at: DateTime<Utc>,
    pub tool: Tool,
}

impl SharedTool {
    pub fn new(share: Share, tool: Tool) -> Self {
        Self {
            share_id: share.share_id,
            user_id: share.user_id,
            tool_unique_id: share.tool_unique_id,
            created_at: share.created_at,
            tool,
        }
    }
}

/// Random URL-safe share token
pub fn generate_share_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SHARE_TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// User bookmark on a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: String,
    pub tool_unique_id: String,
    pub created_at: DateTime<Utc>,
}

/// Result of `GET /api/favorites`: a page, or only the count
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum FavoriteListing {
    Page(Paginated<Favorite>),
    Count { count: i64 },
}

/// `GET /api/favorites` query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FavoriteListParams {
    pub skip: Option<u64>,
    pub limit: Option<u32>,
    #[serde(default)]
    pub count_only: bool,
}

impl FavoriteListParams {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(
            self.skip.unwrap_or(0),
            self.limit.unwrap_or(super::pagination::DEFAULT_LIMIT),
        )
    }
}

/// Body of `POST /api/favorites` and `POST /api/shares`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolRefRequest {
    #[serde(default)]
    pub tool_unique_id: String,
}
