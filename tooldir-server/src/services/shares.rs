//! Shareable tool links
//!
//! A share maps a random token to one tool. Only the creator may delete it.

use std::sync::Arc;

use crate::db::{ShareStore, ToolStore};
use crate::error::{Error, Result};
use crate::models::{generate_share_token, Paginated, Pagination, Share, SharedTool, ToolId, UserId};

#[derive(Clone)]
pub struct SharesService {
    shares: Arc<dyn ShareStore>,
    tools: Arc<dyn ToolStore>,
}

impl SharesService {
    pub fn new(shares: Arc<dyn ShareStore>, tools: Arc<dyn ToolStore>) -> Self {
        Self { shares, tools }
    }

    pub async fn create_share(&self, user: &UserId, tool_id: &str) -> Result<Share> {
        let tool = ToolId::new(tool_id)?;
        if !self.tools.exists(tool.as_str()).await? {
            return Err(Error::not_found("tool", tool.as_str()));
        }

        let share = self
            .shares
            .insert(user, &tool, &generate_share_token())
            .await?;
        tracing::info!(share = %share.share_id, tool = tool.as_str(), "share created");
        Ok(share)
    }

    /// Resolve a token to its share record and the linked tool.
    pub async fn get_share(&self, share_id: &str) -> Result<SharedTool> {
        let share = self
            .shares
            .get(share_id)
            .await?
            .ok_or_else(|| Error::not_found("share", share_id))?;

        let tool = self
            .tools
            .get(&share.tool_unique_id)
            .await?
            .ok_or_else(|| Error::not_found("tool", &share.tool_unique_id))?;

        Ok(SharedTool::new(share, tool))
    }

    pub async fn list_user_shares(&self, user: &UserId, page: Pagination) -> Result<Paginated<Share>> {
        Ok(self.shares.list_for_user(user, page).await?)
    }

    pub async fn delete_share(&self, share_id: &str, user: &UserId) -> Result<()> {
        let share = self
            .shares
            .get(share_id)
            .await?
            .ok_or_else(|| Error::not_found("share", share_id))?;

        if share.user_id != user.as_str() {
            tracing::warn!(share = share_id, user = user.as_str(), "share delete by non-owner");
            return Err(Error::Forbidden("only the creator can delete this share".into()));
        }

        self.shares.delete(share_id).await?;
        tracing::info!(share = share_id, "share deleted");
        Ok(())
    }
}
