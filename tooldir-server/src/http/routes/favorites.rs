//! Favorites endpoints - every route needs a bearer token

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::http::error::ApiError;
use crate::http::extractors::{AuthUser, ValidJson, ValidQuery};
use crate::models::{Favorite, FavoriteListParams, FavoriteListing, ToolRefRequest};
use crate::state::AppState;

/// `GET /api/favorites/{tool_unique_id}` response
#[derive(Serialize)]
pub struct FavoriteStatus {
    pub tool_unique_id: String,
    pub is_favorited: bool,
}

/// POST /api/favorites
async fn add_favorite(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ValidJson(req): ValidJson<ToolRefRequest>,
) -> Result<(StatusCode, Json<Favorite>), ApiError> {
    let favorite = state.favorites.add_favorite(&user, &req.tool_unique_id).await?;
    Ok((StatusCode::CREATED, Json(favorite)))
}

/// GET /api/favorites?skip&limit&count_only
async fn list_favorites(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ValidQuery(params): ValidQuery<FavoriteListParams>,
) -> Result<Json<FavoriteListing>, ApiError> {
    let listing = state
        .favorites
        .list_favorites(&user, params.pagination(), params.count_only)
        .await?;
    Ok(Json(listing))
}

/// GET /api/favorites/{tool_unique_id}
async fn favorite_status(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(tool_unique_id): Path<String>,
) -> Result<Json<FavoriteStatus>, ApiError> {
    let is_favorited = state.favorites.is_favorited(&user, &tool_unique_id).await?;
    Ok(Json(FavoriteStatus {
        tool_unique_id,
        is_favorited,
    }))
}

/// DELETE /api/favorites/{tool_unique_id}
async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(tool_unique_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.favorites.remove_favorite(&user, &tool_unique_id).await?;
    Ok(Json(json!({ "success": true })))
}

/// Favorites routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/favorites", post(add_favorite).get(list_favorites))
        .route(
            "/api/favorites/{tool_unique_id}",
            get(favorite_status).delete(remove_favorite),
        )
}
