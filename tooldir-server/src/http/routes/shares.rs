//! Share link endpoints
//!
//! Resolving a token is public; creating, listing and deleting need a
//! bearer token.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};

use crate::http::error::ApiError;
use crate::http::extractors::{AuthUser, ValidJson, ValidQuery};
use crate::models::{Paginated, PaginationParams, Pagination, Share, SharedTool, ToolRefRequest};
use crate::state::AppState;

/// POST /api/shares
async fn create_share(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ValidJson(req): ValidJson<ToolRefRequest>,
) -> Result<(StatusCode, Json<Share>), ApiError> {
    let share = state.shares.create_share(&user, &req.tool_unique_id).await?;
    Ok((StatusCode::CREATED, Json(share)))
}

/// GET /api/shares/by-id/{share_id}
async fn get_share(
    State(state): State<Arc<AppState>>,
    Path(share_id): Path<String>,
) -> Result<Json<SharedTool>, ApiError> {
    Ok(Json(state.shares.get_share(&share_id).await?))
}

/// GET /api/shares/my-shares
async fn my_shares(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ValidQuery(params): ValidQuery<PaginationParams>,
) -> Result<Json<Paginated<Share>>, ApiError> {
    let page = Pagination::from(params);
    Ok(Json(state.shares.list_user_shares(&user, page).await?))
}

/// DELETE /api/shares/{share_id} - owner only
async fn delete_share(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(share_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.shares.delete_share(&share_id, &user).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Share routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/shares", post(create_share))
        .route("/api/shares/by-id/{share_id}", get(get_share))
        .route("/api/shares/my-shares", get(my_shares))
        .route("/api/shares/{share_id}", delete(delete_share))
}
