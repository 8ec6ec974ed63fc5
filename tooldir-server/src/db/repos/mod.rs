//! Postgres repository implementations
//!
//! Each repository follows these patterns:
//! - Conflicts handled via ON CONFLICT (no check-then-insert)
//! - Separate COUNT query so `total` survives an out-of-range `skip`
//! - Transactions for multi-row updates

pub mod sites;
pub mod tools;
pub mod favorites;
pub mod shares;
pub mod content;

pub use sites::SiteRepo;
pub use tools::ToolRepo;
pub use favorites::FavoriteRepo;
pub use shares::ShareRepo;
pub use content::ContentRepo;
