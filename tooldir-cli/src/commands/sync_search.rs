//! Tools → search index sync command

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{Map, Value};

use tooldir_search::{migrate, SearchClient, SearchConfig};
use tooldir_server::db::repos::ToolRepo;
use tooldir_server::db::{create_pool, ToolStore};

#[derive(Parser, Debug)]
pub struct SyncSearchArgs {
    /// Database URL (overrides .env files)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Documents per batch request
    #[arg(long, default_value_t = tooldir_search::config::DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,
}

/// Replace the search index with every stored tool.
///
/// Credentials are checked before the database is touched.
pub async fn run_sync_search(args: SyncSearchArgs) -> Result<()> {
    let config = SearchConfig::from_env()
        .context("Search credentials missing")?
        .with_batch_size(args.batch_size);

    let database_url = args
        .database_url
        .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or ~/.tooldir/.env")?;
    let pool = create_pool(&database_url)
        .await
        .context("Failed to create database pool")?;

    let tools = ToolRepo::new(pool)
        .list_all()
        .await
        .context("Failed to load tools")?;
    tracing::info!(count = tools.len(), index = %config.index_name, "Loaded tools");

    let records = tools
        .into_iter()
        .map(|tool| match serde_json::to_value(tool)? {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        })
        .collect::<Result<Vec<_>, serde_json::Error>>()
        .context("Failed to serialize tools")?;

    let client = SearchClient::new(config);
    let report = migrate(&client, &records).await.map_err(|e| {
        tracing::error!("Search migration failed: {}", e);
        e
    })?;

    tracing::info!(
        total = report.total,
        indexed = report.indexed,
        skipped = report.skipped,
        batches = report.batches,
        "Search migration complete"
    );
    Ok(())
}
