//! Site queue repository
//!
//! Filters are pushed through `QueryBuilder` with bound values; the ORDER BY
//! expression comes from the closed `SiteSortKey` set.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::db::store::{DbError, SiteStore};
use crate::models::{
    N8nSite, NewSite, Paginated, Pagination, Site, SiteFilter, SitePatch, SiteSortKey, Sort,
};

const SITE_COLUMNS: &str =
    "id, name, url, priority, status, description, category, tags, created_at, last_updated_at";

const PRIORITY_RANK: &str =
    "CASE priority WHEN 'high' THEN 2 WHEN 'medium' THEN 1 ELSE 0 END";

/// Raw row; enums are stored as text
#[derive(Debug, FromRow)]
struct SiteRow {
    id: Uuid,
    name: String,
    url: String,
    priority: String,
    status: String,
    description: Option<String>,
    category: Option<String>,
    tags: Vec<String>,
    created_at: DateTime<Utc>,
    last_updated_at: DateTime<Utc>,
}

impl TryFrom<SiteRow> for Site {
    type Error = DbError;

    fn try_from(row: SiteRow) -> Result<Self, Self::Error> {
        let decode = |e: crate::models::ValidationError| DbError::Decode {
            resource: "site",
            reason: e.to_string(),
        };

        Ok(Site {
            id: row.id,
            name: row.name,
            url: row.url,
            priority: row.priority.parse().map_err(decode)?,
            status: row.status.parse().map_err(decode)?,
            description: row.description,
            category: row.category,
            tags: row.tags,
            created_at: row.created_at,
            last_updated_at: row.last_updated_at,
        })
    }
}

/// Postgres-backed site queue
#[derive(Clone)]
pub struct SiteRepo {
    pool: PgPool,
}

impl SiteRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &SiteFilter) {
    qb.push(" WHERE TRUE");
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(priority) = filter.priority {
        qb.push(" AND priority = ").push_bind(priority.as_str());
    }
    if let Some(category) = &filter.category {
        qb.push(" AND category = ").push_bind(category.clone());
    }
}

fn order_expr(key: SiteSortKey) -> &'static str {
    match key {
        SiteSortKey::CreatedAt => "created_at",
        SiteSortKey::LastUpdatedAt => "last_updated_at",
        SiteSortKey::Name => "name",
        SiteSortKey::Priority => PRIORITY_RANK,
        SiteSortKey::Status => "status",
    }
}

#[async_trait]
impl SiteStore for SiteRepo {
    async fn insert(&self, site: NewSite) -> Result<Site, DbError> {
        let row: SiteRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO sites (name, url, priority, description, category, tags)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {SITE_COLUMNS}
            "#
        ))
        .bind(site.name.as_str())
        .bind(site.url.as_str())
        .bind(site.priority.as_str())
        .bind(site.description)
        .bind(site.category)
        .bind(site.tags)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn get(&self, id: Uuid) -> Result<Site, DbError> {
        let row: SiteRow = sqlx::query_as(&format!("SELECT {SITE_COLUMNS} FROM sites WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("site", id))?;

        row.try_into()
    }

    async fn list(
        &self,
        filter: &SiteFilter,
        sort: Sort<SiteSortKey>,
        page: Pagination,
    ) -> Result<Paginated<Site>, DbError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM sites");
        push_filters(&mut count, filter);
        let (total,): (i64,) = count.build_query_as().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {SITE_COLUMNS} FROM sites"));
        push_filters(&mut qb, filter);
        qb.push(" ORDER BY ")
            .push(order_expr(sort.key))
            .push(" ")
            .push(sort.direction())
            .push(", id ASC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows: Vec<SiteRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        let items = rows
            .into_iter()
            .map(Site::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paginated::new(items, total, page))
    }

    async fn update(&self, id: Uuid, patch: SitePatch) -> Result<Site, DbError> {
        let row: Option<SiteRow> = sqlx::query_as(&format!(
            r#"
            UPDATE sites SET
                name = COALESCE($2, name),
                url = COALESCE($3, url),
                priority = COALESCE($4, priority),
                status = COALESCE($5, status),
                description = CASE WHEN $10 THEN $6 ELSE description END,
                category = CASE WHEN $11 THEN $7 ELSE category END,
                tags = COALESCE($8, tags),
                last_updated_at = NOW()
            WHERE id = $1 AND ($9::TEXT IS NULL OR status = $9)
            RETURNING {SITE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.name.as_ref().map(|n| n.as_str()))
        .bind(patch.url.as_ref().map(|u| u.as_str()))
        .bind(patch.priority.map(|p| p.as_str()))
        .bind(patch.status.map(|s| s.as_str()))
        .bind(patch.description.clone().flatten())
        .bind(patch.category.clone().flatten())
        .bind(patch.tags)
        .bind(patch.expected_status.map(|s| s.as_str()))
        .bind(patch.description.is_some())
        .bind(patch.category.is_some())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => row.try_into(),
            None if patch.expected_status.is_some() => {
                // Distinguish a missing row from a lost status race
                self.get(id).await?;
                Err(DbError::Conflict {
                    resource: "site",
                    id: id.to_string(),
                    reason: "status changed concurrently",
                })
            }
            None => Err(DbError::not_found("site", id)),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM sites WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("site", id));
        }
        Ok(())
    }

    async fn n8n_feed(&self, limit: u32) -> Result<Vec<N8nSite>, DbError> {
        let rows: Vec<(Uuid, String, Option<String>)> = sqlx::query_as(&format!(
            r#"
            SELECT id, url, category
            FROM sites
            ORDER BY {PRIORITY_RANK} DESC, created_at ASC, id ASC
            LIMIT $1
            "#
        ))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, link, category_id)| N8nSite {
                id,
                link,
                category_id,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SitePriority;

    #[test]
    fn priority_order_uses_rank() {
        assert_eq!(order_expr(SiteSortKey::Priority), PRIORITY_RANK);
        assert_eq!(order_expr(SiteSortKey::Name), "name");
    }

    #[test]
    fn filters_bind_every_field() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM sites");
        push_filters(
            &mut qb,
            &SiteFilter {
                priority: Some(SitePriority::High),
                category: Some("ai".into()),
                ..Default::default()
            },
        );
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM sites WHERE TRUE AND priority = $1 AND category = $2"
        );
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn insert_defaults_to_pending() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool");
        crate::db::migrations::run(&pool).await.expect("migrations");

        let repo = SiteRepo::new(pool);
        let site = repo
            .insert(NewSite {
                name: crate::models::SiteName::new("Example").unwrap(),
                url: crate::models::SiteUrl::new("https://example.com").unwrap(),
                priority: SitePriority::Medium,
                description: None,
                category: None,
                tags: vec![],
            })
            .await
            .expect("insert");

        assert_eq!(site.status, crate::models::SiteStatus::Pending);
        repo.delete(site.id).await.expect("cleanup");
    }
}
