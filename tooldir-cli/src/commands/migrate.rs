//! Schema migration command

use anyhow::{Context, Result};
use clap::Parser;

use tooldir_server::db::{create_pool, migrations};

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL (overrides .env files)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

/// Create missing tables and indexes, then exit.
pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let database_url = args
        .database_url
        .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or ~/.tooldir/.env")?;

    let pool = create_pool(&database_url)
        .await
        .context("Failed to create database pool")?;
    migrations::run(&pool)
        .await
        .context("Failed to apply schema migrations")?;

    tracing::info!("Schema is up to date");
    Ok(())
}
