//! Storage layer - traits, Postgres repositories, in-memory store
//!
//! # Design Principles
//!
//! - Services depend on the traits in [`store`], never on a concrete backend
//! - Connection pool is shared by clone - no Arc<Mutex<Connection>>
//! - Rely on DB constraints, handle conflicts - no check-then-insert
//! - Transactions for multi-row operations

pub mod store;
pub mod pool;
pub mod migrations;
pub mod repos;
pub mod memory;

use std::sync::Arc;

use sqlx::PgPool;

pub use memory::MemoryStore;
pub use pool::{create_pool, create_pool_with_options};
pub use store::{ContentStore, DbError, FavoriteStore, ShareStore, SiteStore, ToolStore};

/// One handle per resource, shared by the services
#[derive(Clone)]
pub struct Stores {
    pub sites: Arc<dyn SiteStore>,
    pub tools: Arc<dyn ToolStore>,
    pub favorites: Arc<dyn FavoriteStore>,
    pub shares: Arc<dyn ShareStore>,
    pub content: Arc<dyn ContentStore>,
    /// Backend name reported by `/health`
    pub backend: &'static str,
}

impl Stores {
    /// Postgres repositories over one pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            sites: Arc::new(repos::SiteRepo::new(pool.clone())),
            tools: Arc::new(repos::ToolRepo::new(pool.clone())),
            favorites: Arc::new(repos::FavoriteRepo::new(pool.clone())),
            shares: Arc::new(repos::ShareRepo::new(pool.clone())),
            content: Arc::new(repos::ContentRepo::new(pool)),
            backend: "postgres",
        }
    }

    /// Every resource backed by the same in-memory store.
    pub fn memory(store: Arc<MemoryStore>) -> Self {
        Self {
            sites: store.clone(),
            tools: store.clone(),
            favorites: store.clone(),
            shares: store.clone(),
            content: store,
            backend: "memory",
        }
    }
}
