//! tooldir-search: hosted search index client and tools migration
//!
//! The `tooldir sync-search` command loads every tool from the database
//! and hands the raw records to [`migrate`], which stages them in a
//! side index and swaps it over the live one.

pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod migrate;

pub use client::{IndexSettings, SearchClient, SearchResponse, TaskRef};
pub use config::SearchConfig;
pub use document::{flatten_tool, SearchDocument};
pub use error::{Result, SearchError};
pub use migrate::{check_connectivity, migrate, MigrationReport};
