//! Business rules over the storage traits

pub mod sites;
pub mod favorites;
pub mod shares;
pub mod blog;

pub use sites::SiteQueue;
pub use favorites::FavoritesService;
pub use shares::SharesService;
pub use blog::BlogService;
