//! Blog article and glossary term endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};

use crate::http::error::ApiError;
use crate::http::extractors::{ValidJson, ValidQuery, ValidUuid};
use crate::models::{
    Article, ArticleSortKey, ArticleWithTerms, GlossaryTerm, ListParams, Paginated, TermSortKey,
    TermWithArticles, UpdateArticleTermsRequest,
};
use crate::state::AppState;

/// GET /api/blog/articles
async fn list_articles(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<ListParams>,
) -> Result<Json<Paginated<Article>>, ApiError> {
    let sort = params.sort::<ArticleSortKey>()?;
    Ok(Json(state.blog.list_articles(sort, params.pagination()).await?))
}

/// GET /api/blog/articles/{id} - article with glossary terms resolved
async fn get_article(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<ArticleWithTerms>, ApiError> {
    Ok(Json(state.blog.get_article(id).await?))
}

/// GET /api/blog/articles/slug/{slug}
async fn get_article_by_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<ArticleWithTerms>, ApiError> {
    Ok(Json(state.blog.get_article_by_slug(&slug).await?))
}

/// GET /api/blog/by-term/{term_id}
async fn articles_by_term(
    State(state): State<Arc<AppState>>,
    ValidUuid(term_id): ValidUuid,
    ValidQuery(params): ValidQuery<ListParams>,
) -> Result<Json<Paginated<Article>>, ApiError> {
    let sort = params.sort::<ArticleSortKey>()?;
    let page = state
        .blog
        .articles_for_term(term_id, sort, params.pagination())
        .await?;
    Ok(Json(page))
}

/// GET /api/blog/glossary-terms
async fn list_terms(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<ListParams>,
) -> Result<Json<Paginated<GlossaryTerm>>, ApiError> {
    let sort = params.sort::<TermSortKey>()?;
    Ok(Json(state.blog.list_terms(sort, params.pagination()).await?))
}

/// GET /api/blog/glossary-terms/{id} - term with related articles resolved
async fn get_term(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<TermWithArticles>, ApiError> {
    Ok(Json(state.blog.get_term(id).await?))
}

/// PUT /api/blog/articles/{id}/glossary-terms - replace links both ways
async fn update_article_terms(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
    ValidJson(req): ValidJson<UpdateArticleTermsRequest>,
) -> Result<Json<ArticleWithTerms>, ApiError> {
    let term_ids = req.term_ids()?;
    Ok(Json(state.blog.update_article_terms(id, &term_ids).await?))
}

/// Blog routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/blog/articles", get(list_articles))
        .route("/api/blog/articles/{id}", get(get_article))
        .route("/api/blog/articles/slug/{slug}", get(get_article_by_slug))
        .route(
            "/api/blog/articles/{id}/glossary-terms",
            put(update_article_terms),
        )
        .route("/api/blog/by-term/{term_id}", get(articles_by_term))
        .route("/api/blog/glossary-terms", get(list_terms))
        .route("/api/blog/glossary-terms/{id}", get(get_term))
}
