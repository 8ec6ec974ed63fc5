//! Site queue manager
//!
//! A prioritized work-list of crawl targets. No scheduling, locking or
//! retry of its own; status only changes through explicit updates.

use std::sync::Arc;

use uuid::Uuid;

use crate::config::SiteQueueConfig;
use crate::db::SiteStore;
use crate::error::{Error, Result};
use crate::models::{
    N8nSite, NewSite, Paginated, Pagination, Site, SiteFilter, SitePatch, SiteSortKey, Sort,
};

/// Default and maximum size of the n8n feed
pub const N8N_DEFAULT_LIMIT: u32 = 100;
pub const N8N_MAX_LIMIT: u32 = 1000;

#[derive(Clone)]
pub struct SiteQueue {
    store: Arc<dyn SiteStore>,
    config: SiteQueueConfig,
}

impl SiteQueue {
    pub fn new(store: Arc<dyn SiteStore>, config: SiteQueueConfig) -> Self {
        Self { store, config }
    }

    /// Insert a validated site; it always starts out `pending`.
    pub async fn add_site(&self, site: NewSite) -> Result<Site> {
        let site = self.store.insert(site).await?;
        tracing::info!(site = %site.id, priority = %site.priority, "site queued");
        Ok(site)
    }

    pub async fn get_site(&self, id: Uuid) -> Result<Site> {
        Ok(self.store.get(id).await?)
    }

    pub async fn list_sites(
        &self,
        filter: &SiteFilter,
        sort: Sort<SiteSortKey>,
        page: Pagination,
    ) -> Result<Paginated<Site>> {
        Ok(self.store.list(filter, sort, page).await?)
    }

    /// Apply the supplied fields. An empty patch returns the stored record.
    ///
    /// With `enforce_transitions` a status change must follow the transition
    /// table, and is applied only if nobody changed the status in between.
    pub async fn update_site(&self, id: Uuid, mut patch: SitePatch) -> Result<Site> {
        if patch.is_empty() {
            return self.get_site(id).await;
        }

        if self.config.enforce_transitions {
            if let Some(next) = patch.status {
                let current = self.store.get(id).await?;
                if !current.status.can_transition_to(next) {
                    return Err(Error::Conflict(format!(
                        "cannot move site from {} to {}",
                        current.status, next
                    )));
                }
                patch.expected_status = Some(current.status);
            }
        }

        let site = self.store.update(id, patch).await?;
        tracing::debug!(site = %site.id, status = %site.status, "site updated");
        Ok(site)
    }

    pub async fn delete_site(&self, id: Uuid) -> Result<()> {
        self.store.delete(id).await?;
        tracing::info!(site = %id, "site removed");
        Ok(())
    }

    /// Reduced projection for the n8n workflow, highest priority first.
    pub async fn sites_for_n8n(&self, limit: Option<u32>) -> Result<Vec<N8nSite>> {
        let limit = limit
            .unwrap_or(N8N_DEFAULT_LIMIT)
            .clamp(1, N8N_MAX_LIMIT);
        Ok(self.store.n8n_feed(limit).await?)
    }
}
