//! Favorites repository
//!
//! Uniqueness of (user, tool) is a table constraint; insert uses
//! ON CONFLICT DO NOTHING and reports the conflict when no row comes back.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::store::{DbError, FavoriteStore};
use crate::models::{Favorite, Paginated, Pagination, ToolId, UserId};

/// Postgres-backed favorites
#[derive(Clone)]
pub struct FavoriteRepo {
    pool: PgPool,
}

impl FavoriteRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct FavoriteRow {
    id: uuid::Uuid,
    user_id: String,
    tool_unique_id: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<FavoriteRow> for Favorite {
    fn from(r: FavoriteRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            tool_unique_id: r.tool_unique_id,
            created_at: r.created_at,
        }
    }
}

#[async_trait]
impl FavoriteStore for FavoriteRepo {
    async fn insert(&self, user: &UserId, tool: &ToolId) -> Result<Favorite, DbError> {
        let row: Option<FavoriteRow> = sqlx::query_as(
            r#"
            INSERT INTO favorites (user_id, tool_unique_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, tool_unique_id) DO NOTHING
            RETURNING id, user_id, tool_unique_id, created_at
            "#,
        )
        .bind(user.as_str())
        .bind(tool.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Favorite::from).ok_or_else(|| DbError::Conflict {
            resource: "favorite",
            id: tool.as_str().to_owned(),
            reason: "already exists",
        })
    }

    async fn delete(&self, user: &UserId, tool: &ToolId) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND tool_unique_id = $2")
            .bind(user.as_str())
            .bind(tool.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("favorite", tool.as_str()));
        }
        Ok(())
    }

    async fn list(&self, user: &UserId, page: Pagination) -> Result<Paginated<Favorite>, DbError> {
        let total = self.count(user).await?;
        let rows: Vec<FavoriteRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, tool_unique_id, created_at
            FROM favorites
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

        Ok(Paginated::new(
            rows.into_iter().map(Favorite::from).collect(),
            total,
            page,
        ))
    }

    async fn count(&self, user: &UserId) -> Result<i64, DbError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM favorites WHERE user_id = $1")
            .bind(user.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn exists(&self, user: &UserId, tool: &ToolId) -> Result<bool, DbError> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM favorites WHERE user_id = $1 AND tool_unique_id = $2)",
        )
        .bind(user.as_str())
        .bind(tool.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}
