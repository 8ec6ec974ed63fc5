//! Per-user favorites

use std::sync::Arc;

use crate::db::{FavoriteStore, ToolStore};
use crate::error::{Error, Result};
use crate::models::{Favorite, FavoriteListing, Pagination, ToolId, UserId};

#[derive(Clone)]
pub struct FavoritesService {
    favorites: Arc<dyn FavoriteStore>,
    tools: Arc<dyn ToolStore>,
}

impl FavoritesService {
    pub fn new(favorites: Arc<dyn FavoriteStore>, tools: Arc<dyn ToolStore>) -> Self {
        Self { favorites, tools }
    }

    /// Favorite a tool. Duplicate pairs fail with `Conflict`.
    pub async fn add_favorite(&self, user: &UserId, tool_id: &str) -> Result<Favorite> {
        let tool = ToolId::new(tool_id)?;
        if !self.tools.exists(tool.as_str()).await? {
            return Err(Error::not_found("tool", tool.as_str()));
        }

        let favorite = self.favorites.insert(user, &tool).await?;
        tracing::debug!(user = user.as_str(), tool = tool.as_str(), "favorite added");
        Ok(favorite)
    }

    pub async fn remove_favorite(&self, user: &UserId, tool_id: &str) -> Result<()> {
        let tool = ToolId::new(tool_id)?;
        self.favorites.delete(user, &tool).await?;
        tracing::debug!(user = user.as_str(), tool = tool.as_str(), "favorite removed");
        Ok(())
    }

    /// Newest first; with `count_only` just the total.
    pub async fn list_favorites(
        &self,
        user: &UserId,
        page: Pagination,
        count_only: bool,
    ) -> Result<FavoriteListing> {
        if count_only {
            let count = self.favorites.count(user).await?;
            return Ok(FavoriteListing::Count { count });
        }
        Ok(FavoriteListing::Page(self.favorites.list(user, page).await?))
    }

    pub async fn is_favorited(&self, user: &UserId, tool_id: &str) -> Result<bool> {
        let tool = ToolId::new(tool_id)?;
        Ok(self.favorites.exists(user, &tool).await?)
    }
}
