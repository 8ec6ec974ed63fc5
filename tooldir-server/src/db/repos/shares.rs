//! Share link repository

use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::store::{DbError, ShareStore};
use crate::models::{Paginated, Pagination, Share, ToolId, UserId};

/// Postgres-backed share links
#[derive(Clone)]
pub struct ShareRepo {
    pool: PgPool,
}

impl ShareRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ShareRow {
    id: uuid::Uuid,
    user_id: String,
    tool_unique_id: String,
    share_id: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<ShareRow> for Share {
    fn from(r: ShareRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            tool_unique_id: r.tool_unique_id,
            share_id: r.share_id,
            created_at: r.created_at,
        }
    }
}

#[async_trait]
impl ShareStore for ShareRepo {
    async fn insert(&self, user: &UserId, tool: &ToolId, share_id: &str) -> Result<Share, DbError> {
        let row: Option<ShareRow> = sqlx::query_as(
            r#"
            INSERT INTO shares (user_id, tool_unique_id, share_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (share_id) DO NOTHING
            RETURNING id, user_id, tool_unique_id, share_id, created_at
            "#,
        )
        .bind(user.as_str())
        .bind(tool.as_str())
        .bind(share_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Share::from).ok_or_else(|| DbError::Conflict {
            resource: "share",
            id: share_id.to_owned(),
            reason: "token already in use",
        })
    }

    async fn get(&self, share_id: &str) -> Result<Option<Share>, DbError> {
        let row: Option<ShareRow> = sqlx::query_as(
            "SELECT id, user_id, tool_unique_id, share_id, created_at FROM shares WHERE share_id = $1",
        )
        .bind(share_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Share::from))
    }

    async fn list_for_user(&self, user: &UserId, page: Pagination) -> Result<Paginated<Share>, DbError> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM shares WHERE user_id = $1")
            .bind(user.as_str())
            .fetch_one(&self.pool)
            .await?;

        let rows: Vec<ShareRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, tool_unique_id, share_id, created_at
            FROM shares
            WHERE user_id = $1
            ORDER BY created_at DESC, id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user.as_str())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Paginated::new(rows.into_iter().map(Share::from).collect(), total, page))
    }

    async fn delete(&self, share_id: &str) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM shares WHERE share_id = $1")
            .bind(share_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("share", share_id));
        }
        Ok(())
    }
}
