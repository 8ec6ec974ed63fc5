use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

use tracing_setup::{init_tracing, TracingConfig};

#[derive(Parser, Debug)]
#[command(
    name = "tooldir",
    author,
    version,
    about = "Tool directory backend: REST API, schema migrations and search index sync",
    long_about = "Serve the tool directory REST API (site queue, blog, glossary, shares, \
                  favorites), apply the Postgres schema, and push the tools collection \
                  into the hosted search index."
)]
struct Cli {
    /// Debug logging (RUST_LOG still takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Create or update the database schema and exit
    Migrate(commands::migrate::MigrateArgs),
    /// Replace the search index with every stored tool
    SyncSearch(commands::sync_search::SyncSearchArgs),
    /// Mint a bearer token for a user id
    Token(commands::token::TokenArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let loaded = config::load_dotenv();
    let cli = Cli::parse();
    init_tracing(&TracingConfig { debug: cli.debug }).ok();
    config::log_loaded(&loaded);

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Migrate(args) => commands::run_migrate(args).await?,
        Commands::SyncSearch(args) => commands::run_sync_search(args).await?,
        Commands::Token(args) => commands::run_token(args)?,
    }
    Ok(())
}
