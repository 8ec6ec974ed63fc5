//! In-memory store
//!
//! Implements every storage trait over plain collections behind one
//! `RwLock`. Backs the test suite and `tooldir serve --in-memory`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::{
    ContentStore, DbError, FavoriteStore, ShareStore, SiteStore, ToolStore,
};
use crate::models::{
    Article, ArticleSortKey, Favorite, GlossaryTerm, IdDiff, N8nSite, NewSite, Paginated,
    Pagination, Share, Site, SiteFilter, SitePatch, SiteSortKey, SiteStatus, Sort, TermSortKey,
    Tool, ToolId, UserId,
};

#[derive(Default)]
struct Inner {
    sites: HashMap<Uuid, Site>,
    tools: HashMap<String, Tool>,
    favorites: Vec<Favorite>,
    shares: Vec<Share>,
    articles: HashMap<Uuid, Article>,
    terms: HashMap<Uuid, GlossaryTerm>,
}

/// Process-local store
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an article as-is.
    pub async fn insert_article(&self, article: Article) -> Article {
        self.inner
            .write()
            .await
            .articles
            .insert(article.id, article.clone());
        article
    }

    /// Seed a glossary term as-is.
    pub async fn insert_term(&self, term: GlossaryTerm) -> GlossaryTerm {
        self.inner.write().await.terms.insert(term.id, term.clone());
        term
    }
}

fn newest_first<T>(items: &mut [T], created: impl Fn(&T) -> (chrono::DateTime<Utc>, Uuid)) {
    items.sort_by(|a, b| {
        let (ca, ia) = created(a);
        let (cb, ib) = created(b);
        cb.cmp(&ca).then_with(|| ia.cmp(&ib))
    });
}

#[async_trait]
impl SiteStore for MemoryStore {
    async fn insert(&self, site: NewSite) -> Result<Site, DbError> {
        let now = Utc::now();
        let site = Site {
            id: Uuid::new_v4(),
            name: site.name.as_str().to_owned(),
            url: site.url.as_str().to_owned(),
            priority: site.priority,
            status: SiteStatus::default(),
            description: site.description,
            category: site.category,
            tags: site.tags,
            created_at: now,
            last_updated_at: now,
        };
        self.inner.write().await.sites.insert(site.id, site.clone());
        Ok(site)
    }

    async fn get(&self, id: Uuid) -> Result<Site, DbError> {
        self.inner
            .read()
            .await
            .sites
            .get(&id)
            .cloned()
            .ok_or_else(|| DbError::not_found("site", id))
    }

    async fn list(
        &self,
        filter: &SiteFilter,
        sort: Sort<SiteSortKey>,
        page: Pagination,
    ) -> Result<Paginated<Site>, DbError> {
        let inner = self.inner.read().await;
        let mut matching: Vec<Site> = inner
            .sites
            .values()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        matching.sort_by(|a, b| sort.compare(a, b));

        Ok(Paginated::new(page.slice(&matching), matching.len() as i64, page))
    }

    async fn update(&self, id: Uuid, patch: SitePatch) -> Result<Site, DbError> {
        let mut inner = self.inner.write().await;
        let site = inner
            .sites
            .get_mut(&id)
            .ok_or_else(|| DbError::not_found("site", id))?;

        if let Some(expected) = patch.expected_status {
            if site.status != expected {
                return Err(DbError::Conflict {
                    resource: "site",
                    id: id.to_string(),
                    reason: "status changed concurrently",
                });
            }
        }

        patch.apply_to(site, Utc::now());
        Ok(site.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        self.inner
            .write()
            .await
            .sites
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DbError::not_found("site", id))
    }

    async fn n8n_feed(&self, limit: u32) -> Result<Vec<N8nSite>, DbError> {
        let inner = self.inner.read().await;
        let mut sites: Vec<&Site> = inner.sites.values().collect();
        sites.sort_by(|a, b| {
            b.priority
                .rank()
                .cmp(&a.priority.rank())
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(sites
            .into_iter()
            .take(limit as usize)
            .map(N8nSite::from)
            .collect())
    }
}

#[async_trait]
impl ToolStore for MemoryStore {
    async fn get(&self, unique_id: &str) -> Result<Option<Tool>, DbError> {
        Ok(self.inner.read().await.tools.get(unique_id).cloned())
    }

    async fn exists(&self, unique_id: &str) -> Result<bool, DbError> {
        Ok(self.inner.read().await.tools.contains_key(unique_id))
    }

    async fn list_all(&self) -> Result<Vec<Tool>, DbError> {
        let mut tools: Vec<Tool> = self.inner.read().await.tools.values().cloned().collect();
        tools.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(tools)
    }

    async fn upsert(&self, mut tool: Tool) -> Result<Tool, DbError> {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner.tools.get(&tool.unique_id) {
            tool.id = existing.id;
            tool.created_at = existing.created_at;
            tool.updated_at = Utc::now();
        }
        inner.tools.insert(tool.unique_id.clone(), tool.clone());
        Ok(tool)
    }
}

#[async_trait]
impl FavoriteStore for MemoryStore {
    async fn insert(&self, user: &UserId, tool: &ToolId) -> Result<Favorite, DbError> {
        let mut inner = self.inner.write().await;
        let taken = inner
            .favorites
            .iter()
            .any(|f| f.user_id == user.as_str() && f.tool_unique_id == tool.as_str());
        if taken {
            return Err(DbError::Conflict {
                resource: "favorite",
                id: tool.as_str().to_owned(),
                reason: "already exists",
            });
        }

        let favorite = Favorite {
            id: Uuid::new_v4(),
            user_id: user.as_str().to_owned(),
            tool_unique_id: tool.as_str().to_owned(),
            created_at: Utc::now(),
        };
        inner.favorites.push(favorite.clone());
        Ok(favorite)
    }

    async fn delete(&self, user: &UserId, tool: &ToolId) -> Result<(), DbError> {
        let mut inner = self.inner.write().await;
        let before = inner.favorites.len();
        inner
            .favorites
            .retain(|f| !(f.user_id == user.as_str() && f.tool_unique_id == tool.as_str()));

        if inner.favorites.len() == before {
            return Err(DbError::not_found("favorite", tool.as_str()));
        }
        Ok(())
    }

    async fn list(&self, user: &UserId, page: Pagination) -> Result<Paginated<Favorite>, DbError> {
        let inner = self.inner.read().await;
        let mut mine: Vec<Favorite> = inner
            .favorites
            .iter()
            .filter(|f| f.user_id == user.as_str())
            .cloned()
            .collect();
        newest_first(&mut mine, |f| (f.created_at, f.id));

        Ok(Paginated::new(page.slice(&mine), mine.len() as i64, page))
    }

    async fn count(&self, user: &UserId) -> Result<i64, DbError> {
        let inner = self.inner.read().await;
        Ok(inner
            .favorites
            .iter()
            .filter(|f| f.user_id == user.as_str())
            .count() as i64)
    }

    async fn exists(&self, user: &UserId, tool: &ToolId) -> Result<bool, DbError> {
        let inner = self.inner.read().await;
        Ok(inner
            .favorites
            .iter()
            .any(|f| f.user_id == user.as_str() && f.tool_unique_id == tool.as_str()))
    }
}

#[async_trait]
impl ShareStore for MemoryStore {
    async fn insert(&self, user: &UserId, tool: &ToolId, share_id: &str) -> Result<Share, DbError> {
        let mut inner = self.inner.write().await;
        if inner.shares.iter().any(|s| s.share_id == share_id) {
            return Err(DbError::Conflict {
                resource: "share",
                id: share_id.to_owned(),
                reason: "token already in use",
            });
        }

        let share = Share {
            id: Uuid::new_v4(),
            user_id: user.as_str().to_owned(),
            tool_unique_id: tool.as_str().to_owned(),
            share_id: share_id.to_owned(),
            created_at: Utc::now(),
        };
        inner.shares.push(share.clone());
        Ok(share)
    }

    async fn get(&self, share_id: &str) -> Result<Option<Share>, DbError> {
        let inner = self.inner.read().await;
        Ok(inner.shares.iter().find(|s| s.share_id == share_id).cloned())
    }

    async fn list_for_user(&self, user: &UserId, page: Pagination) -> Result<Paginated<Share>, DbError> {
        let inner = self.inner.read().await;
        let mut mine: Vec<Share> = inner
            .shares
            .iter()
            .filter(|s| s.user_id == user.as_str())
            .cloned()
            .collect();
        newest_first(&mut mine, |s| (s.created_at, s.id));

        Ok(Paginated::new(page.slice(&mine), mine.len() as i64, page))
    }

    async fn delete(&self, share_id: &str) -> Result<(), DbError> {
        let mut inner = self.inner.write().await;
        let before = inner.shares.len();
        inner.shares.retain(|s| s.share_id != share_id);

        if inner.shares.len() == before {
            return Err(DbError::not_found("share", share_id));
        }
        Ok(())
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn list_articles(
        &self,
        sort: Sort<ArticleSortKey>,
        page: Pagination,
    ) -> Result<Paginated<Article>, DbError> {
        let inner = self.inner.read().await;
        let mut articles: Vec<Article> = inner.articles.values().cloned().collect();
        articles.sort_by(|a, b| sort.compare(a, b));

        Ok(Paginated::new(page.slice(&articles), articles.len() as i64, page))
    }

    async fn get_article(&self, id: Uuid) -> Result<Article, DbError> {
        self.inner
            .read()
            .await
            .articles
            .get(&id)
            .cloned()
            .ok_or_else(|| DbError::not_found("article", id))
    }

    async fn get_article_by_slug(&self, slug: &str) -> Result<Article, DbError> {
        self.inner
            .read()
            .await
            .articles
            .values()
            .find(|a| a.slug == slug)
            .cloned()
            .ok_or_else(|| DbError::not_found("article", slug))
    }

    async fn articles_for_term(
        &self,
        term_id: Uuid,
        sort: Sort<ArticleSortKey>,
        page: Pagination,
    ) -> Result<Paginated<Article>, DbError> {
        let inner = self.inner.read().await;
        let mut articles: Vec<Article> = inner
            .articles
            .values()
            .filter(|a| a.glossary_term_ids.contains(&term_id))
            .cloned()
            .collect();
        articles.sort_by(|a, b| sort.compare(a, b));

        Ok(Paginated::new(page.slice(&articles), articles.len() as i64, page))
    }

    async fn articles_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Article>, DbError> {
        let inner = self.inner.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| inner.articles.get(id).cloned())
            .collect())
    }

    async fn list_terms(
        &self,
        sort: Sort<TermSortKey>,
        page: Pagination,
    ) -> Result<Paginated<GlossaryTerm>, DbError> {
        let inner = self.inner.read().await;
        let mut terms: Vec<GlossaryTerm> = inner.terms.values().cloned().collect();
        terms.sort_by(|a, b| sort.compare(a, b));

        Ok(Paginated::new(page.slice(&terms), terms.len() as i64, page))
    }

    async fn get_term(&self, id: Uuid) -> Result<GlossaryTerm, DbError> {
        self.inner
            .read()
            .await
            .terms
            .get(&id)
            .cloned()
            .ok_or_else(|| DbError::not_found("glossary term", id))
    }

    async fn terms_by_ids(&self, ids: &[Uuid]) -> Result<Vec<GlossaryTerm>, DbError> {
        let inner = self.inner.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| inner.terms.get(id).cloned())
            .collect())
    }

    async fn relink_article(&self, article_id: Uuid, term_ids: &[Uuid]) -> Result<Article, DbError> {
        let mut inner = self.inner.write().await;
        let now = Utc::now();

        let article = inner
            .articles
            .get_mut(&article_id)
            .ok_or_else(|| DbError::not_found("article", article_id))?;
        let diff = IdDiff::between(&article.glossary_term_ids, term_ids);
        article.glossary_term_ids = term_ids.to_vec();
        article.updated_at = now;
        let updated = article.clone();

        for id in &diff.added {
            if let Some(term) = inner.terms.get_mut(id) {
                if !term.related_article_ids.contains(&article_id) {
                    term.related_article_ids.push(article_id);
                    term.updated_at = now;
                }
            }
        }
        for id in &diff.removed {
            if let Some(term) = inner.terms.get_mut(id) {
                term.related_article_ids.retain(|a| *a != article_id);
                term.updated_at = now;
            }
        }

        Ok(updated)
    }
}
