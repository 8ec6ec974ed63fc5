//! Blog article and glossary term repository
//!
//! Cross references live in UUID[] columns. Relinking an article rewrites
//! its list and patches the reverse lists on the affected terms inside one
//! transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::db::store::{ContentStore, DbError};
use crate::models::{
    Article, ArticleSortKey, GlossaryTerm, IdDiff, Paginated, Pagination, Sort, TermSortKey,
};

const ARTICLE_COLUMNS: &str =
    "id, title, slug, summary, content, glossary_term_ids, created_at, updated_at, extra";

const TERM_COLUMNS: &str =
    "id, name, slug, definitions, related_article_ids, created_at, updated_at, extra";

#[derive(Debug, FromRow)]
struct ArticleRow {
    id: Uuid,
    title: String,
    slug: String,
    summary: Option<String>,
    content: Option<String>,
    glossary_term_ids: Vec<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    extra: Json<Map<String, Value>>,
}

impl From<ArticleRow> for Article {
    fn from(r: ArticleRow) -> Self {
        Self {
            id: r.id,
            title: r.title,
            slug: r.slug,
            summary: r.summary,
            content: r.content,
            glossary_term_ids: r.glossary_term_ids,
            created_at: r.created_at,
            updated_at: r.updated_at,
            extra: r.extra.0,
        }
    }
}

#[derive(Debug, FromRow)]
struct TermRow {
    id: Uuid,
    name: String,
    slug: String,
    definitions: Vec<String>,
    related_article_ids: Vec<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    extra: Json<Map<String, Value>>,
}

impl From<TermRow> for GlossaryTerm {
    fn from(r: TermRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            slug: r.slug,
            definitions: r.definitions,
            related_article_ids: r.related_article_ids,
            created_at: r.created_at,
            updated_at: r.updated_at,
            extra: r.extra.0,
        }
    }
}

fn article_order(sort: Sort<ArticleSortKey>) -> String {
    let column = match sort.key {
        ArticleSortKey::CreatedAt => "created_at",
        ArticleSortKey::UpdatedAt => "updated_at",
        ArticleSortKey::Title => "title",
    };
    format!("{column} {}, id ASC", sort.direction())
}

fn term_order(sort: Sort<TermSortKey>) -> String {
    let column = match sort.key {
        TermSortKey::Name => "name",
        TermSortKey::CreatedAt => "created_at",
    };
    format!("{column} {}, id ASC", sort.direction())
}

/// Postgres-backed blog content
#[derive(Clone)]
pub struct ContentRepo {
    pool: PgPool,
}

impl ContentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentStore for ContentRepo {
    async fn list_articles(
        &self,
        sort: Sort<ArticleSortKey>,
        page: Pagination,
    ) -> Result<Paginated<Article>, DbError> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM blog_articles")
            .fetch_one(&self.pool)
            .await?;

        let rows: Vec<ArticleRow> = sqlx::query_as(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM blog_articles ORDER BY {} LIMIT $1 OFFSET $2",
            article_order(sort)
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Paginated::new(rows.into_iter().map(Article::from).collect(), total, page))
    }

    async fn get_article(&self, id: Uuid) -> Result<Article, DbError> {
        let row: ArticleRow =
            sqlx::query_as(&format!("SELECT {ARTICLE_COLUMNS} FROM blog_articles WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| DbError::not_found("article", id))?;
        Ok(row.into())
    }

    async fn get_article_by_slug(&self, slug: &str) -> Result<Article, DbError> {
        let row: ArticleRow =
            sqlx::query_as(&format!("SELECT {ARTICLE_COLUMNS} FROM blog_articles WHERE slug = $1"))
                .bind(slug)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| DbError::not_found("article", slug))?;
        Ok(row.into())
    }

    async fn articles_for_term(
        &self,
        term_id: Uuid,
        sort: Sort<ArticleSortKey>,
        page: Pagination,
    ) -> Result<Paginated<Article>, DbError> {
        let (total,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM blog_articles WHERE $1 = ANY(glossary_term_ids)")
                .bind(term_id)
                .fetch_one(&self.pool)
                .await?;

        let rows: Vec<ArticleRow> = sqlx::query_as(&format!(
            r#"
            SELECT {ARTICLE_COLUMNS}
            FROM blog_articles
            WHERE $1 = ANY(glossary_term_ids)
            ORDER BY {}
            LIMIT $2 OFFSET $3
            "#,
            article_order(sort)
        ))
        .bind(term_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Paginated::new(rows.into_iter().map(Article::from).collect(), total, page))
    }

    async fn articles_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Article>, DbError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<ArticleRow> = sqlx::query_as(&format!(
            r#"
            SELECT {ARTICLE_COLUMNS}
            FROM blog_articles
            WHERE id = ANY($1)
            ORDER BY array_position($1, id)
            "#
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Article::from).collect())
    }

    async fn list_terms(
        &self,
        sort: Sort<TermSortKey>,
        page: Pagination,
    ) -> Result<Paginated<GlossaryTerm>, DbError> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM glossary_terms")
            .fetch_one(&self.pool)
            .await?;

        let rows: Vec<TermRow> = sqlx::query_as(&format!(
            "SELECT {TERM_COLUMNS} FROM glossary_terms ORDER BY {} LIMIT $1 OFFSET $2",
            term_order(sort)
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Paginated::new(rows.into_iter().map(GlossaryTerm::from).collect(), total, page))
    }

    async fn get_term(&self, id: Uuid) -> Result<GlossaryTerm, DbError> {
        let row: TermRow =
            sqlx::query_as(&format!("SELECT {TERM_COLUMNS} FROM glossary_terms WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| DbError::not_found("glossary term", id))?;
        Ok(row.into())
    }

    async fn terms_by_ids(&self, ids: &[Uuid]) -> Result<Vec<GlossaryTerm>, DbError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<TermRow> = sqlx::query_as(&format!(
            r#"
            SELECT {TERM_COLUMNS}
            FROM glossary_terms
            WHERE id = ANY($1)
            ORDER BY array_position($1, id)
            "#
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(GlossaryTerm::from).collect())
    }

    async fn relink_article(&self, article_id: Uuid, term_ids: &[Uuid]) -> Result<Article, DbError> {
        let mut tx = self.pool.begin().await?;

        let current: Option<(Vec<Uuid>,)> = sqlx::query_as(
            "SELECT glossary_term_ids FROM blog_articles WHERE id = $1 FOR UPDATE",
        )
        .bind(article_id)
        .fetch_optional(&mut *tx)
        .await?;

        let (current,) = current.ok_or_else(|| DbError::not_found("article", article_id))?;
        let diff = IdDiff::between(&current, term_ids);

        let row: ArticleRow = sqlx::query_as(&format!(
            r#"
            UPDATE blog_articles
            SET glossary_term_ids = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {ARTICLE_COLUMNS}
            "#
        ))
        .bind(article_id)
        .bind(term_ids)
        .fetch_one(&mut *tx)
        .await?;

        if !diff.added.is_empty() {
            sqlx::query(
                r#"
                UPDATE glossary_terms
                SET related_article_ids = array_append(related_article_ids, $1),
                    updated_at = NOW()
                WHERE id = ANY($2) AND NOT ($1 = ANY(related_article_ids))
                "#,
            )
            .bind(article_id)
            .bind(&diff.added)
            .execute(&mut *tx)
            .await?;
        }

        if !diff.removed.is_empty() {
            sqlx::query(
                r#"
                UPDATE glossary_terms
                SET related_article_ids = array_remove(related_article_ids, $1),
                    updated_at = NOW()
                WHERE id = ANY($2)
                "#,
            )
            .bind(article_id)
            .bind(&diff.removed)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!(
            article = %article_id,
            added = diff.added.len(),
            removed = diff.removed.len(),
            "relinked glossary terms"
        );
        Ok(row.into())
    }
}
