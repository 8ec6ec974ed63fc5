//! Storage traits
//!
//! One trait per resource. The services only see these traits, so the
//! same business rules run against Postgres and the in-memory store.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    Article, ArticleSortKey, Favorite, GlossaryTerm, N8nSite, NewSite, Paginated, Pagination,
    Share, Site, SiteFilter, SitePatch, SiteSortKey, Sort, TermSortKey, Tool, ToolId, UserId,
};

/// Storage error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("conflict: {resource} '{id}' {reason}")]
    Conflict {
        resource: &'static str,
        id: String,
        reason: &'static str,
    },

    #[error("corrupt {resource} row: {reason}")]
    Decode { resource: &'static str, reason: String },
}

impl DbError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

#[async_trait]
pub trait SiteStore: Send + Sync {
    async fn insert(&self, site: NewSite) -> Result<Site, DbError>;

    async fn get(&self, id: Uuid) -> Result<Site, DbError>;

    async fn list(
        &self,
        filter: &SiteFilter,
        sort: Sort<SiteSortKey>,
        page: Pagination,
    ) -> Result<Paginated<Site>, DbError>;

    /// Apply a patch. Fails with `Conflict` when `expected_status` is set
    /// and no longer matches.
    async fn update(&self, id: Uuid, patch: SitePatch) -> Result<Site, DbError>;

    async fn delete(&self, id: Uuid) -> Result<(), DbError>;

    /// Highest priority first, oldest first within a tier.
    async fn n8n_feed(&self, limit: u32) -> Result<Vec<N8nSite>, DbError>;
}

#[async_trait]
pub trait ToolStore: Send + Sync {
    async fn get(&self, unique_id: &str) -> Result<Option<Tool>, DbError>;

    async fn exists(&self, unique_id: &str) -> Result<bool, DbError>;

    /// Every tool, oldest first.
    async fn list_all(&self) -> Result<Vec<Tool>, DbError>;

    async fn upsert(&self, tool: Tool) -> Result<Tool, DbError>;
}

#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// Insert a favorite; `Conflict` if the pair already exists.
    async fn insert(&self, user: &UserId, tool: &ToolId) -> Result<Favorite, DbError>;

    /// Delete a favorite; `NotFound` if there was none.
    async fn delete(&self, user: &UserId, tool: &ToolId) -> Result<(), DbError>;

    /// Newest first.
    async fn list(&self, user: &UserId, page: Pagination) -> Result<Paginated<Favorite>, DbError>;

    async fn count(&self, user: &UserId) -> Result<i64, DbError>;

    async fn exists(&self, user: &UserId, tool: &ToolId) -> Result<bool, DbError>;
}

#[async_trait]
pub trait ShareStore: Send + Sync {
    async fn insert(&self, user: &UserId, tool: &ToolId, share_id: &str) -> Result<Share, DbError>;

    async fn get(&self, share_id: &str) -> Result<Option<Share>, DbError>;

    /// Newest first.
    async fn list_for_user(&self, user: &UserId, page: Pagination) -> Result<Paginated<Share>, DbError>;

    async fn delete(&self, share_id: &str) -> Result<(), DbError>;
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn list_articles(
        &self,
        sort: Sort<ArticleSortKey>,
        page: Pagination,
    ) -> Result<Paginated<Article>, DbError>;

    async fn get_article(&self, id: Uuid) -> Result<Article, DbError>;

    async fn get_article_by_slug(&self, slug: &str) -> Result<Article, DbError>;

    /// Articles whose `glossary_term_ids` contain `term_id`.
    async fn articles_for_term(
        &self,
        term_id: Uuid,
        sort: Sort<ArticleSortKey>,
        page: Pagination,
    ) -> Result<Paginated<Article>, DbError>;

    async fn articles_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Article>, DbError>;

    async fn list_terms(
        &self,
        sort: Sort<TermSortKey>,
        page: Pagination,
    ) -> Result<Paginated<GlossaryTerm>, DbError>;

    async fn get_term(&self, id: Uuid) -> Result<GlossaryTerm, DbError>;

    /// Batch lookup; unknown ids are skipped, result follows `ids` order.
    async fn terms_by_ids(&self, ids: &[Uuid]) -> Result<Vec<GlossaryTerm>, DbError>;

    /// Replace the article's term list and update the reverse references
    /// on every added or removed term, atomically.
    async fn relink_article(&self, article_id: Uuid, term_ids: &[Uuid]) -> Result<Article, DbError>;
}
