//! HTTP server command

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use tooldir_server::db::{create_pool_with_options, migrations, pool::DEFAULT_MAX_CONNECTIONS};
use tooldir_server::http::{run_server, ServerConfig};
use tooldir_server::{AppConfig, AppState, AuthConfig, MemoryStore, SiteQueueConfig, Stores};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: 127.0.0.1:3030)
    #[arg(long, short = 'b', default_value = "127.0.0.1:3030")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Frontend origin allowed to call the API (repeatable or comma-separated)
    #[arg(long = "allow-origin", env = "TOOLDIR_ALLOWED_ORIGINS", value_delimiter = ',')]
    pub allowed_origins: Vec<String>,

    /// Database URL (overrides .env files)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Secret used to verify bearer tokens
    #[arg(long, env = "TOOLDIR_JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Maximum pooled database connections
    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Keep everything in process memory (no database; data is lost on exit)
    #[arg(long)]
    pub in_memory: bool,

    /// Only allow pending→active, active→paused|completed, paused→active
    #[arg(long)]
    pub strict_transitions: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let jwt_secret = args
        .jwt_secret
        .filter(|s| !s.trim().is_empty())
        .context("TOOLDIR_JWT_SECRET not set. Set via --jwt-secret, env, or ~/.tooldir/.env")?;

    let stores = if args.in_memory {
        tracing::warn!("In-memory mode: nothing is persisted");
        Stores::memory(Arc::new(MemoryStore::new()))
    } else {
        let database_url = args
            .database_url
            .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or ~/.tooldir/.env")?;

        let pool = create_pool_with_options(&database_url, args.max_connections)
            .await
            .context("Failed to create database pool")?;
        migrations::run(&pool)
            .await
            .context("Failed to apply schema migrations")?;
        Stores::postgres(pool)
    };

    let mut server = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
        ..ServerConfig::default()
    };
    if !args.allowed_origins.is_empty() {
        server.allowed_origins = args.allowed_origins;
    }

    let config = AppConfig {
        server,
        auth: AuthConfig { jwt_secret },
        sites: SiteQueueConfig {
            enforce_transitions: args.strict_transitions,
        },
    };

    tracing::info!(
        bind = %config.server.bind_addr,
        strict_transitions = config.sites.enforce_transitions,
        "Starting tooldir server"
    );

    let state = Arc::new(AppState::new(stores, &config));
    run_server(state, config.server)
        .await
        .context("Server error")?;

    Ok(())
}
