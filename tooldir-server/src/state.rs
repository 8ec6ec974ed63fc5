//! Application state shared across handlers

use crate::auth::TokenVerifier;
use crate::config::AppConfig;
use crate::db::Stores;
use crate::services::{BlogService, FavoritesService, SharesService, SiteQueue};

/// Shared application state, handed to the router as `Arc<AppState>`
#[derive(Clone)]
pub struct AppState {
    pub sites: SiteQueue,
    pub favorites: FavoritesService,
    pub shares: SharesService,
    pub blog: BlogService,
    pub tokens: TokenVerifier,
    pub storage: &'static str,
    pub strict_transitions: bool,
}

impl AppState {
    pub fn new(stores: Stores, config: &AppConfig) -> Self {
        Self {
            sites: SiteQueue::new(stores.sites, config.sites),
            favorites: FavoritesService::new(stores.favorites, stores.tools.clone()),
            shares: SharesService::new(stores.shares, stores.tools),
            blog: BlogService::new(stores.content),
            tokens: TokenVerifier::new(&config.auth.jwt_secret),
            storage: stores.backend,
            strict_transitions: config.sites.enforce_transitions,
        }
    }
}
