//! Domain models with validation at construction
//!
//! Request bodies are plain serde structs; their `validate()` methods
//! produce the typed values the services and stores work with.

pub mod validation;
pub mod pagination;
pub mod sort;
pub mod site;
pub mod tool;
pub mod share;
pub mod content;

pub use validation::ValidationError;
pub use pagination::{Pagination, Paginated, PaginationParams};
pub use sort::{Sort, SortKey};
pub use site::{
    CreateSiteRequest, N8nSite, NewSite, Site, SiteFilter, SiteListParams, SiteName, SitePatch,
    SitePriority, SiteSortKey, SiteStatus, SiteUrl, UpdateSiteRequest,
};
pub use tool::{Tool, ToolId, UserId};
pub use share::{
    generate_share_token, Favorite, FavoriteListParams, FavoriteListing, Share, SharedTool,
    ToolRefRequest,
};
pub use content::{
    dedup_ids, Article, ArticleSortKey, ArticleWithTerms, GlossaryTerm, IdDiff, ListParams,
    TermSortKey, TermWithArticles, UpdateArticleTermsRequest,
};
