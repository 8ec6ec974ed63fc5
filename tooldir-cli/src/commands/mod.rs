//! Command implementations for the tooldir CLI

pub mod migrate;
pub mod serve;
pub mod sync_search;
pub mod token;

pub use migrate::run_migrate;
pub use serve::run_serve;
pub use sync_search::run_sync_search;
pub use token::run_token;
