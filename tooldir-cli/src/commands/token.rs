//! Bearer token minting for operators and local development

use anyhow::{Context, Result};
use clap::Parser;

use tooldir_server::auth::issue_token;

#[derive(Parser, Debug)]
pub struct TokenArgs {
    /// User id placed in the token's `sub` claim
    #[arg(long, short = 'u')]
    pub user: String,

    /// Token lifetime in hours
    #[arg(long, default_value_t = 24)]
    pub ttl_hours: i64,

    /// Signing secret (must match the server's)
    #[arg(long, env = "TOOLDIR_JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,
}

/// Print a signed token to stdout.
pub fn run_token(args: TokenArgs) -> Result<()> {
    let secret = args
        .jwt_secret
        .filter(|s| !s.trim().is_empty())
        .context("TOOLDIR_JWT_SECRET not set. Set via --jwt-secret, env, or ~/.tooldir/.env")?;

    let token = issue_token(&secret, &args.user, chrono::Duration::hours(args.ttl_hours))
        .context("Failed to issue token")?;
    println!("{token}");
    Ok(())
}
