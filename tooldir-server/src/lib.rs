//! tooldir-server: REST backend for the tool directory
//!
//! Site queue for the scraping pipeline, blog articles with glossary
//! cross references, shareable tool links and per-user favorites.
//!
//! Handlers validate input into typed models, call a service, and the
//! service talks to storage through the traits in [`db::store`]. Postgres
//! and the in-memory store implement the same traits.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod models;
pub mod services;
pub mod state;

pub use config::{AppConfig, AuthConfig, SiteQueueConfig};
pub use db::{create_pool, MemoryStore, Stores};
pub use error::{Error, Result};
pub use http::{build_router, run_server, ServerConfig};
pub use state::AppState;
