//! Console logging for the tooldir binary
//!
//! Usage:
//!   tooldir --debug serve                  # debug output from tooldir crates
//!   RUST_LOG=tooldir_search=trace tooldir sync-search
//!
//! RUST_LOG, when set, replaces the defaults entirely. Logs go to stderr so
//! `tooldir token` output can be piped.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str =
    "info,tooldir_server=info,tooldir_search=info,tower_http=info,sqlx=warn";
const DEBUG_DIRECTIVES: &str =
    "info,tooldir=debug,tooldir_server=debug,tooldir_search=debug,tower_http=debug,sqlx=info";

/// Logging options taken from the command line
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    pub debug: bool,
}

fn default_directives(debug: bool) -> &'static str {
    if debug {
        DEBUG_DIRECTIVES
    } else {
        DEFAULT_DIRECTIVES
    }
}

/// Install the global subscriber; fails if one is already set.
pub fn init_tracing(config: &TracingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(config.debug)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(config.debug)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
