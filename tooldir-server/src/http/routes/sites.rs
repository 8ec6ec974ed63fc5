//! Site queue endpoints
//!
//! Unauthenticated; consumed by the scraping automation.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::http::error::ApiError;
use crate::http::extractors::{ValidJson, ValidQuery, ValidUuid};
use crate::models::{CreateSiteRequest, N8nSite, Paginated, Site, SiteListParams, UpdateSiteRequest};
use crate::state::AppState;

/// `GET /api/sites/n8n` query
#[derive(Debug, Default, Deserialize)]
pub struct N8nParams {
    pub limit: Option<u32>,
}

/// POST /api/sites - queue a new site (status starts as pending)
async fn create_site(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<CreateSiteRequest>,
) -> Result<(StatusCode, Json<Site>), ApiError> {
    let site = state.sites.add_site(req.validate()?).await?;
    Ok((StatusCode::CREATED, Json(site)))
}

/// GET /api/sites - filtered, sorted, paginated listing
async fn list_sites(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<SiteListParams>,
) -> Result<Json<Paginated<Site>>, ApiError> {
    let filter = params.filter()?;
    let sort = params.sort()?;
    let page = state
        .sites
        .list_sites(&filter, sort, params.pagination())
        .await?;
    Ok(Json(page))
}

/// GET /api/sites/n8n - reduced projection for the n8n workflow
async fn n8n_sites(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<N8nParams>,
) -> Result<Json<Vec<N8nSite>>, ApiError> {
    Ok(Json(state.sites.sites_for_n8n(params.limit).await?))
}

/// GET /api/sites/{id}
async fn get_site(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<Site>, ApiError> {
    Ok(Json(state.sites.get_site(id).await?))
}

/// PUT /api/sites/{id} - apply the supplied fields only
async fn update_site(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
    ValidJson(req): ValidJson<UpdateSiteRequest>,
) -> Result<Json<Site>, ApiError> {
    let patch = req.validate()?;
    Ok(Json(state.sites.update_site(id, patch).await?))
}

/// DELETE /api/sites/{id}
async fn delete_site(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<StatusCode, ApiError> {
    state.sites.delete_site(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Site queue routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/sites", get(list_sites).post(create_site))
        .route("/api/sites/n8n", get(n8n_sites))
        .route(
            "/api/sites/{id}",
            get(get_site).put(update_site).delete(delete_site),
        )
}
