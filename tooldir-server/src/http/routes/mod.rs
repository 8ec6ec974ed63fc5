//! Route handlers organized by resource

pub mod health;
pub mod sites;
pub mod blog;
pub mod shares;
pub mod favorites;
