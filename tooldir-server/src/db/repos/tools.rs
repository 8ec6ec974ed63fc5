//! Tool catalogue repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::db::store::{DbError, ToolStore};
use crate::models::Tool;

const TOOL_COLUMNS: &str =
    "id, unique_id, name, description, link, category, tags, created_at, updated_at, extra";

#[derive(Debug, FromRow)]
struct ToolRow {
    id: Uuid,
    unique_id: String,
    name: String,
    description: Option<String>,
    link: Option<String>,
    category: Option<String>,
    tags: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    extra: Json<Map<String, Value>>,
}

impl From<ToolRow> for Tool {
    fn from(row: ToolRow) -> Self {
        Self {
            id: row.id,
            unique_id: row.unique_id,
            name: row.name,
            description: row.description,
            link: row.link,
            category: row.category,
            tags: row.tags,
            created_at: row.created_at,
            updated_at: row.updated_at,
            extra: row.extra.0,
        }
    }
}

/// Postgres-backed tool catalogue
#[derive(Clone)]
pub struct ToolRepo {
    pool: PgPool,
}

impl ToolRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ToolStore for ToolRepo {
    async fn get(&self, unique_id: &str) -> Result<Option<Tool>, DbError> {
        let row: Option<ToolRow> =
            sqlx::query_as(&format!("SELECT {TOOL_COLUMNS} FROM tools WHERE unique_id = $1"))
                .bind(unique_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(Tool::from))
    }

    async fn exists(&self, unique_id: &str) -> Result<bool, DbError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM tools WHERE unique_id = $1)")
                .bind(unique_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn list_all(&self) -> Result<Vec<Tool>, DbError> {
        let rows: Vec<ToolRow> = sqlx::query_as(&format!(
            "SELECT {TOOL_COLUMNS} FROM tools ORDER BY created_at ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Tool::from).collect())
    }

    async fn upsert(&self, tool: Tool) -> Result<Tool, DbError> {
        let row: ToolRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO tools (id, unique_id, name, description, link, category, tags, extra)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (unique_id) DO UPDATE SET
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                link = EXCLUDED.link,
                category = EXCLUDED.category,
                tags = EXCLUDED.tags,
                extra = EXCLUDED.extra,
                updated_at = NOW()
            RETURNING {TOOL_COLUMNS}
            "#
        ))
        .bind(tool.id)
        .bind(&tool.unique_id)
        .bind(&tool.name)
        .bind(&tool.description)
        .bind(&tool.link)
        .bind(&tool.category)
        .bind(&tool.tags)
        .bind(Json(&tool.extra))
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}
